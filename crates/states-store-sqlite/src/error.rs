//! Error type for `states-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] states_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  /// A stored document that no longer decodes.
  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

impl From<Error> for states_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(core) => core,
      other => states_core::Error::Backend(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
