//! [`SqliteStore`] — the SQLite implementation of [`FunFactStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use states_core::{StateCode, fact::FunFactEntry, store::FunFactStore};

use crate::{
  Error, Result,
  encode::{RawEntry, decode_facts, encode_code, encode_facts},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A fun-fact store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls
/// run on the connection's own thread, one at a time, so each mutation's
/// read-modify-write transaction is atomic with respect to every other.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Load the document for `code`, let `apply` edit it, and write it back,
  /// all inside one transaction.
  ///
  /// With `create` set, a missing document starts out empty; otherwise it
  /// fails with `EntryNotFound`. If `apply` fails nothing is written.
  async fn mutate<F>(&self, code: StateCode, create: bool, apply: F) -> Result<FunFactEntry>
  where
    F: FnOnce(&mut FunFactEntry) -> states_core::Result<()> + Send + 'static,
  {
    self
      .conn
      .call(move |conn| Ok(mutate_in_tx(conn, code, create, apply)))
      .await?
  }
}

fn mutate_in_tx<F>(
  conn: &mut rusqlite::Connection,
  code: StateCode,
  create: bool,
  apply: F,
) -> Result<FunFactEntry>
where
  F: FnOnce(&mut FunFactEntry) -> states_core::Result<()>,
{
  let key = encode_code(&code);
  let tx = conn.transaction()?;

  let existing: Option<String> = tx
    .query_row(
      "SELECT funfacts FROM funfact_entries WHERE state_code = ?1",
      rusqlite::params![key],
      |row| row.get(0),
    )
    .optional()?;

  let mut entry = match existing {
    Some(json) => FunFactEntry { state_code: code, funfacts: decode_facts(&json)? },
    None if create => FunFactEntry::new(code),
    None => return Err(states_core::Error::EntryNotFound(code).into()),
  };

  // Dropping `tx` on the error path rolls back.
  apply(&mut entry)?;

  let json = encode_facts(&entry.funfacts)?;
  tx.execute(
    "INSERT INTO funfact_entries (state_code, funfacts) VALUES (?1, ?2)
     ON CONFLICT (state_code) DO UPDATE SET funfacts = excluded.funfacts",
    rusqlite::params![key, json],
  )?;
  tx.commit()?;

  Ok(entry)
}

// ─── FunFactStore impl ───────────────────────────────────────────────────────

impl FunFactStore for SqliteStore {
  type Error = Error;

  async fn get(&self, code: &StateCode) -> Result<Option<FunFactEntry>> {
    let key = encode_code(code);

    let raw: Option<RawEntry> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT state_code, funfacts FROM funfact_entries WHERE state_code = ?1",
              rusqlite::params![key],
              |row| {
                Ok(RawEntry {
                  state_code: row.get(0)?,
                  funfacts:   row.get(1)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEntry::into_entry).transpose()
  }

  async fn list(&self) -> Result<Vec<FunFactEntry>> {
    let raws: Vec<RawEntry> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT state_code, funfacts FROM funfact_entries")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawEntry {
              state_code: row.get(0)?,
              funfacts:   row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEntry::into_entry).collect()
  }

  async fn append(&self, code: StateCode, facts: Vec<String>) -> Result<FunFactEntry> {
    let added = facts.len();
    let entry = self
      .mutate(code, true, move |entry| {
        entry.append(facts);
        Ok(())
      })
      .await?;
    tracing::debug!(state = %entry.state_code, added, total = entry.funfacts.len(), "appended fun facts");
    Ok(entry)
  }

  async fn overwrite(&self, code: StateCode, position: i64, fact: String) -> Result<FunFactEntry> {
    let entry = self
      .mutate(code, false, move |entry| entry.overwrite_at(position, fact))
      .await?;
    tracing::debug!(state = %entry.state_code, position, "overwrote fun fact");
    Ok(entry)
  }

  async fn remove(&self, code: StateCode, position: i64) -> Result<FunFactEntry> {
    let entry = self
      .mutate(code, false, move |entry| entry.remove_at(position).map(drop))
      .await?;
    tracing::debug!(state = %entry.state_code, position, "removed fun fact");
    Ok(entry)
  }
}
