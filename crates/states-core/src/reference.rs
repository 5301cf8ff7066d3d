//! The `StateSource` trait and its implementations.
//!
//! Reference data is immutable. Sources hand out fresh copies on every call,
//! so nothing downstream can observe another request's view of the data.

use std::{
  future::Future,
  path::{Path, PathBuf},
  sync::Arc,
};

use crate::{Error, Result, StateCode, record::StateRecord};

/// Supplies the static per-state reference records.
pub trait StateSource: Send + Sync {
  /// Load every record, in dataset order.
  ///
  /// Fails with [`Error::DataUnavailable`] if the backing data cannot be read
  /// or parsed.
  fn load_states(&self) -> impl Future<Output = Result<Vec<StateRecord>>> + Send + '_;

  /// Find the record for `code`. `None` means no such state.
  fn find_state<'a>(
    &'a self,
    code: &'a StateCode,
  ) -> impl Future<Output = Result<Option<StateRecord>>> + Send + 'a {
    async move {
      Ok(self.load_states().await?.into_iter().find(|s| s.code == *code))
    }
  }
}

// ─── JSON file ───────────────────────────────────────────────────────────────

/// Reads the dataset from a JSON file on every call. No caching.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
  path: PathBuf,
}

impl JsonFileSource {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }

  fn unavailable(&self, reason: impl ToString) -> Error {
    Error::DataUnavailable {
      path:   self.path.clone(),
      reason: reason.to_string(),
    }
  }
}

impl StateSource for JsonFileSource {
  async fn load_states(&self) -> Result<Vec<StateRecord>> {
    let raw = tokio::fs::read_to_string(&self.path)
      .await
      .map_err(|e| self.unavailable(e))?;
    serde_json::from_str(&raw).map_err(|e| self.unavailable(e))
  }
}

// ─── In-memory ───────────────────────────────────────────────────────────────

/// A fixed, process-wide set of records.
#[derive(Debug, Clone)]
pub struct StaticSource {
  records: Arc<[StateRecord]>,
}

impl StaticSource {
  pub fn new(records: impl Into<Arc<[StateRecord]>>) -> Self {
    Self { records: records.into() }
  }

  /// Parse a dataset from JSON text.
  pub fn from_json(raw: &str) -> Result<Self> {
    let records: Vec<StateRecord> =
      serde_json::from_str(raw).map_err(|e| Error::DataUnavailable {
        path:   PathBuf::from("<inline>"),
        reason: e.to_string(),
      })?;
    Ok(Self::new(records))
  }
}

impl StateSource for StaticSource {
  async fn load_states(&self) -> Result<Vec<StateRecord>> { Ok(self.records.to_vec()) }
}
