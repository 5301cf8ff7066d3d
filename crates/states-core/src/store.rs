//! The `FunFactStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `states-store-sqlite`).
//! Higher layers (`states-api`, `states-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::{StateCode, fact::FunFactEntry};

/// Abstraction over a persistent fun-fact store, keyed by state code.
///
/// Every mutating method must be durable and atomic per key by the time its
/// future resolves: two overlapping appends to the same code both land, in
/// some order, with no lost update.
///
/// Backend errors convert into [`crate::Error`], which lets callers tell a
/// missing entry or a bad position apart from a storage failure.
pub trait FunFactStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  /// Fetch the entry for `code`. Returns `None` if nothing was ever stored.
  fn get<'a>(
    &'a self,
    code: &'a StateCode,
  ) -> impl Future<Output = Result<Option<FunFactEntry>, Self::Error>> + Send + 'a;

  /// All entries, in no particular order.
  fn list(&self) -> impl Future<Output = Result<Vec<FunFactEntry>, Self::Error>> + Send + '_;

  /// Append `facts` to the entry for `code`, creating it if absent.
  ///
  /// Not idempotent: appending the same facts twice stores them twice.
  fn append(
    &self,
    code: StateCode,
    facts: Vec<String>,
  ) -> impl Future<Output = Result<FunFactEntry, Self::Error>> + Send + '_;

  /// Replace the fact at 1-based `position`.
  ///
  /// Fails with [`crate::Error::EntryNotFound`] if no entry exists and with
  /// [`crate::Error::InvalidIndex`] if `position` is outside `[1, len]`.
  fn overwrite(
    &self,
    code: StateCode,
    position: i64,
    fact: String,
  ) -> impl Future<Output = Result<FunFactEntry, Self::Error>> + Send + '_;

  /// Remove the fact at 1-based `position`; later facts shift left.
  ///
  /// Fails like [`FunFactStore::overwrite`].
  fn remove(
    &self,
    code: StateCode,
    position: i64,
  ) -> impl Future<Output = Result<FunFactEntry, Self::Error>> + Send + '_;
}
