//! Fun-fact entries — the mutable, user-contributed half of a state's facts.
//!
//! Callers address facts by 1-based position. Every position is checked
//! against `[1, len]` before it is turned into a slice offset, so a zero or
//! negative position can never underflow.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, StateCode};

/// The stored fun facts for one state. At most one entry exists per code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunFactEntry {
  pub state_code: StateCode,
  #[serde(default)]
  pub funfacts:   Vec<String>,
}

impl FunFactEntry {
  pub fn new(state_code: StateCode) -> Self {
    Self { state_code, funfacts: Vec::new() }
  }

  /// Append `facts` in order. Duplicates are kept.
  pub fn append<I>(&mut self, facts: I)
  where
    I: IntoIterator<Item = String>,
  {
    self.funfacts.extend(facts);
  }

  /// Replace the fact at 1-based `position`.
  pub fn overwrite_at(&mut self, position: i64, fact: String) -> Result<()> {
    let offset = self.offset(position)?;
    self.funfacts[offset] = fact;
    Ok(())
  }

  /// Remove the fact at 1-based `position`, shifting later facts left.
  /// Returns the removed fact.
  pub fn remove_at(&mut self, position: i64) -> Result<String> {
    let offset = self.offset(position)?;
    Ok(self.funfacts.remove(offset))
  }

  fn offset(&self, position: i64) -> Result<usize> {
    let len = self.funfacts.len();
    let in_range = position >= 1 && usize::try_from(position).is_ok_and(|p| p <= len);
    if !in_range {
      return Err(Error::InvalidIndex { position, len });
    }
    Ok(position as usize - 1)
  }
}
