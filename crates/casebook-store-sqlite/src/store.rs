//! The SQLite implementation of [`CaseStore`].

use std::path::Path;

use casebook_core::{
  case::{Case, CaseId, NewCase, Subscription},
  store::CaseStore,
};
use rusqlite::OptionalExtension as _;

use crate::{
  encode::{RawCase, RawSubscription, assemble, encode_subscriptions},
  schema::{SCHEMA, TEAR_DOWN},
  Error, Result,
};

// ─── Write outcomes ──────────────────────────────────────────────────────────

/// Result of an update closure; domain failures are carried out of the
/// connection thread as values and turned into errors on the async side.
enum Outcome<T> {
  Done(T),
  Missing,
  NameTaken,
}

fn not_found(id: CaseId) -> Error { casebook_core::Error::NotFound(id).into() }

fn name_taken(name: String) -> Error { casebook_core::Error::DuplicateName(name).into() }

// ─── Row helpers (connection thread) ─────────────────────────────────────────

fn load_case(conn: &rusqlite::Connection, case_id: i64) -> rusqlite::Result<Option<RawCase>> {
  let head = conn
    .query_row(
      "SELECT case_id, name, note FROM cases WHERE case_id = ?1",
      rusqlite::params![case_id],
      |row| {
        Ok(RawCase {
          case_id:       row.get(0)?,
          name:          row.get(1)?,
          note:          row.get(2)?,
          subscriptions: Vec::new(),
        })
      },
    )
    .optional()?;

  let Some(mut raw) = head else { return Ok(None) };

  let mut stmt = conn.prepare(
    "SELECT case_id, entity_id, events FROM subscriptions
     WHERE case_id = ?1 ORDER BY position",
  )?;
  raw.subscriptions = stmt
    .query_map(rusqlite::params![case_id], |row| {
      Ok(RawSubscription {
        case_id:   row.get(0)?,
        entity_id: row.get(1)?,
        events:    row.get(2)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(Some(raw))
}

fn case_id_by_name(conn: &rusqlite::Connection, name: &str) -> rusqlite::Result<Option<i64>> {
  conn
    .query_row(
      "SELECT case_id FROM cases WHERE name = ?1",
      rusqlite::params![name],
      |row| row.get(0),
    )
    .optional()
}

fn case_exists(conn: &rusqlite::Connection, case_id: i64) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM cases WHERE case_id = ?1",
        rusqlite::params![case_id],
        |_| Ok(()),
      )
      .optional()?
      .is_some(),
  )
}

fn write_subscriptions(
  conn:    &rusqlite::Connection,
  case_id: i64,
  rows:    &[(String, String)],
) -> rusqlite::Result<()> {
  conn.execute(
    "DELETE FROM subscriptions WHERE case_id = ?1",
    rusqlite::params![case_id],
  )?;
  let mut stmt = conn.prepare(
    "INSERT INTO subscriptions (case_id, position, entity_id, events)
     VALUES (?1, ?2, ?3, ?4)",
  )?;
  for (position, (entity_id, events)) in rows.iter().enumerate() {
    stmt.execute(rusqlite::params![case_id, position as i64, entity_id, events])?;
  }
  Ok(())
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Casebook case store backed by a single SQLite file.
///
/// Clones share one connection thread.
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

  /// Open an in-memory store, mostly for tests.
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

  async fn fetch(&self, id: CaseId) -> Result<Option<Case>> {
    let raw = self.conn.call(move |conn| Ok(load_case(conn, id.0)?)).await?;
    raw.map(RawCase::into_case).transpose()
  }
}

// ─── CaseStore impl ──────────────────────────────────────────────────────────

impl CaseStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn create(&self, input: NewCase) -> Result<Case> {
    let rows = encode_subscriptions(&input.subscriptions)?;
    let name = input.name.clone();
    let note = input.note.clone();

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if case_id_by_name(&tx, &name)?.is_some() {
          return Ok(None);
        }
        tx.execute(
          "INSERT INTO cases (name, note) VALUES (?1, ?2)",
          rusqlite::params![name, note],
        )?;
        let case_id = tx.last_insert_rowid();
        write_subscriptions(&tx, case_id, &rows)?;
        tx.commit()?;
        Ok(Some(case_id))
      })
      .await?;

    let Some(case_id) = inserted else {
      return Err(name_taken(input.name));
    };
    Ok(Case {
      id:            CaseId(case_id),
      name:          input.name,
      note:          input.note,
      subscriptions: input.subscriptions,
    })
  }

  async fn update(
    &self,
    id:   CaseId,
    name: Option<String>,
    note: Option<String>,
  ) -> Result<Case> {
    let wanted = name.clone();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !case_exists(&tx, id.0)? {
          return Ok(Outcome::Missing);
        }
        if let Some(name) = &name
          && case_id_by_name(&tx, name)?.is_some_and(|owner| owner != id.0)
        {
          return Ok(Outcome::NameTaken);
        }
        tx.execute(
          "UPDATE cases
           SET name = COALESCE(?2, name), note = COALESCE(?3, note)
           WHERE case_id = ?1",
          rusqlite::params![id.0, name, note],
        )?;
        let raw = load_case(&tx, id.0)?;
        tx.commit()?;
        Ok(raw.map_or(Outcome::Missing, Outcome::Done))
      })
      .await?;

    match outcome {
      Outcome::Done(raw) => raw.into_case(),
      Outcome::Missing => Err(not_found(id)),
      Outcome::NameTaken => Err(name_taken(wanted.unwrap_or_default())),
    }
  }

  async fn replace_subscriptions(
    &self,
    id:            CaseId,
    subscriptions: Vec<Subscription>,
  ) -> Result<Case> {
    let rows = encode_subscriptions(&subscriptions)?;

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !case_exists(&tx, id.0)? {
          return Ok(None);
        }
        write_subscriptions(&tx, id.0, &rows)?;
        let raw = load_case(&tx, id.0)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.ok_or_else(|| not_found(id))?.into_case()
  }

  async fn delete(&self, id: CaseId) -> Result<()> {
    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM subscriptions WHERE case_id = ?1",
          rusqlite::params![id.0],
        )?;
        let removed = tx.execute(
          "DELETE FROM cases WHERE case_id = ?1",
          rusqlite::params![id.0],
        )?;
        tx.commit()?;
        Ok(removed)
      })
      .await?;

    if removed == 0 {
      return Err(not_found(id));
    }
    Ok(())
  }

  async fn tear_down(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(TEAR_DOWN)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get(&self, id: CaseId) -> Result<Case> {
    self.fetch(id).await?.ok_or_else(|| not_found(id))
  }

  async fn find_by_name(&self, name: &str) -> Result<Option<Case>> {
    let name = name.to_owned();
    let raw = self
      .conn
      .call(move |conn| match case_id_by_name(conn, &name)? {
        Some(case_id) => Ok(load_case(conn, case_id)?),
        None => Ok(None),
      })
      .await?;
    raw.map(RawCase::into_case).transpose()
  }

  async fn list(&self) -> Result<Vec<Case>> {
    let (cases, subscriptions) = self
      .conn
      .call(|conn| {
        let cases = conn
          .prepare("SELECT case_id, name, note FROM cases ORDER BY case_id")?
          .query_map([], |row| {
            Ok(RawCase {
              case_id:       row.get(0)?,
              name:          row.get(1)?,
              note:          row.get(2)?,
              subscriptions: Vec::new(),
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let subscriptions = conn
          .prepare(
            "SELECT case_id, entity_id, events FROM subscriptions
             ORDER BY case_id, position",
          )?
          .query_map([], |row| {
            Ok(RawSubscription {
              case_id:   row.get(0)?,
              entity_id: row.get(1)?,
              events:    row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((cases, subscriptions))
      })
      .await?;

    assemble(cases, subscriptions)
  }
}
