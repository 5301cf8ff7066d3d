//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! State codes are stored as their uppercase string. Fact lists are stored
//! as compact JSON arrays.

use states_core::{StateCode, fact::FunFactEntry};

use crate::Result;

pub fn encode_code(code: &StateCode) -> String { code.as_str().to_owned() }

pub fn encode_facts(facts: &[String]) -> Result<String> { Ok(serde_json::to_string(facts)?) }

pub fn decode_facts(s: &str) -> Result<Vec<String>> { Ok(serde_json::from_str(s)?) }

// ─── Raw row type ─────────────────────────────────────────────────────────────

/// An untyped `funfact_entries` row as read from SQLite.
pub struct RawEntry {
  pub state_code: String,
  pub funfacts:   String,
}

impl RawEntry {
  pub fn into_entry(self) -> Result<FunFactEntry> {
    Ok(FunFactEntry {
      state_code: StateCode::parse(&self.state_code)?,
      funfacts:   decode_facts(&self.funfacts)?,
    })
  }
}
