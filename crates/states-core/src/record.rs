//! Reference records for each state and the merged per-request view.
//!
//! A [`StateRecord`] comes straight from the static dataset and is never
//! mutated. The [`MergedStateView`] is computed on read by appending the
//! store-held fun facts to the record's own.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{StateCode, fact::FunFactEntry};

/// One state from the static dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
  /// The state's name, e.g. `"Kansas"`.
  pub state:          String,
  pub code:           StateCode,
  pub nickname:       String,
  pub capital_city:   String,
  pub population:     u64,
  pub admission_date: NaiveDate,
  /// Dataset-provided facts. Absent for most states.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub funfacts:       Option<Vec<String>>,
  /// Remaining dataset attributes (slug, website, image URLs, ...), passed
  /// through untouched.
  #[serde(flatten)]
  pub extra:          Map<String, Value>,
}

impl StateRecord {
  /// The dataset-provided facts, empty if absent.
  pub fn own_funfacts(&self) -> &[String] { self.funfacts.as_deref().unwrap_or_default() }

  /// Merge with the store entry for this state, if any.
  ///
  /// The result holds the record's own facts followed by the entry's facts.
  pub fn merge(mut self, entry: Option<&FunFactEntry>) -> MergedStateView {
    let mut funfacts = self.funfacts.take().unwrap_or_default();
    if let Some(entry) = entry {
      funfacts.extend(entry.funfacts.iter().cloned());
    }
    MergedStateView { record: self, funfacts }
  }
}

/// A reference record with every known fun fact attached. Never stored.
#[derive(Debug, Clone, Serialize)]
pub struct MergedStateView {
  /// Always has `funfacts: None`, so the flattened output carries a single
  /// `funfacts` key.
  #[serde(flatten)]
  pub record:   StateRecord,
  pub funfacts: Vec<String>,
}
