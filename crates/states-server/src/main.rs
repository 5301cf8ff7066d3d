//! states-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite fun-fact store, and serves the `/states` API over HTTP.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use states_api::AppState;
use states_core::reference::{JsonFileSource, StateSource as _};
use states_server::ServerConfig;
use states_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "U.S. states fun-facts server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(cli.config).context("failed to load configuration")?;

  let data_path = expand_tilde(&server_cfg.data_path);
  let store_path = expand_tilde(&server_cfg.store_path);

  let states = JsonFileSource::new(&data_path);
  // The dataset is re-read per request, so a bad file is not fatal here.
  match states.load_states().await {
    Ok(records) => tracing::info!(path = ?data_path, states = records.len(), "loaded state dataset"),
    Err(e) => tracing::warn!(error = %e, "state dataset is not readable; requests will fail until fixed"),
  }

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  tracing::info!(path = ?store_path, "opened fun-fact store");

  let app = states_server::app(AppState::new(store, states));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
