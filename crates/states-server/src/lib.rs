//! HTTP host for the states fun-facts API.
//!
//! Mounts the [`states_api`] router under `/states`, adds the negotiated 404
//! fallback and request tracing, and defines the runtime configuration.

pub mod fallback;

use std::path::PathBuf;

use axum::Router;
use serde::Deserialize;
use states_api::{AppState, states_router};
use states_core::{reference::StateSource, store::FunFactStore};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
///
/// Layered as built-in defaults, then the TOML file, then `STATES_*`
/// environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// JSON dataset of state reference records; re-read on every request.
  pub data_path:  PathBuf,
  /// SQLite file holding the fun-fact documents.
  pub store_path: PathBuf,
}

impl ServerConfig {
  pub fn load(file: PathBuf) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 3000)?
      .set_default("data_path", "data/states.json")?
      .set_default("store_path", "states.db")?
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("STATES"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn app<S, R>(state: AppState<S, R>) -> Router
where
  S: FunFactStore + 'static,
  R: StateSource + 'static,
{
  Router::new()
    .nest("/states", states_router(state))
    .fallback(fallback::not_found)
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
