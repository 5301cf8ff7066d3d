//! Two-letter state codes.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// The two codes outside the contiguous 48 states.
pub const NON_CONTIGUOUS: [&str; 2] = ["AK", "HI"];

/// A two-letter state code, always stored uppercase.
///
/// Parsing is case-insensitive, so `"ks"`, `"Ks"` and `"KS"` all produce the
/// same code. Equality between codes is therefore a case-insensitive match
/// on the original input.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct StateCode(String);

impl StateCode {
  pub fn parse(raw: &str) -> Result<Self, Error> {
    let trimmed = raw.trim();
    if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
      Ok(Self(trimmed.to_ascii_uppercase()))
    } else {
      Err(Error::InvalidStateCode(raw.to_owned()))
    }
  }

  pub fn as_str(&self) -> &str { &self.0 }

  /// `false` only for Alaska and Hawaii.
  pub fn is_contiguous(&self) -> bool {
    !NON_CONTIGUOUS.contains(&self.as_str())
  }
}

impl FromStr for StateCode {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

impl TryFrom<String> for StateCode {
  type Error = Error;

  fn try_from(value: String) -> Result<Self, Self::Error> { Self::parse(&value) }
}

impl From<StateCode> for String {
  fn from(code: StateCode) -> Self { code.0 }
}

impl fmt::Display for StateCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}
