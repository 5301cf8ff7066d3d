//! Error types for `states-core`.

use std::path::PathBuf;

use thiserror::Error;

use crate::code::StateCode;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid state code: {0:?}")]
  InvalidStateCode(String),

  #[error("state data unavailable at {path:?}: {reason}")]
  DataUnavailable { path: PathBuf, reason: String },

  #[error("no fun facts stored for {0}")]
  EntryNotFound(StateCode),

  /// A 1-based position outside `[1, len]`.
  #[error("invalid index {position}: entry has {len} fun facts")]
  InvalidIndex { position: i64, len: usize },

  #[error("store backend error: {0}")]
  Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
