//! [`SqliteStore`] — the SQLite implementation of [`GuestStore`].

use std::{
  path::Path,
  sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
  },
};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tokio::sync::watch;
use uuid::Uuid;

use soiree_core::{
  guest::{Guest, NewGuest},
  store::{GuestStore, StoreSnapshot},
};

use crate::{
  Error, Result,
  encode::{RawGuest, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A guest store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection and watch channel are
/// reference-counted, so clones act as concurrent writers against the same
/// collection and publish to the same subscribers.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
  seq:  Arc<AtomicU64>,
  tx:   Arc<watch::Sender<StoreSnapshot>>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;

    // Seed the channel with the rows already on disk, so opening an
    // existing file never presents as an empty roster.
    let raws = conn.call(|conn| Ok(query_all(conn)?)).await?;
    let guests = raws
      .into_iter()
      .map(RawGuest::into_guest)
      .collect::<Result<Vec<_>>>()?;

    let (tx, _rx) =
      watch::channel(StoreSnapshot { seq: 0, guests: guests.into() });

    Ok(Self {
      conn,
      seq: Arc::new(AtomicU64::new(0)),
      tx: Arc::new(tx),
    })
  }

  /// List the collection and emit it as the next snapshot.
  async fn publish(&self) -> Result<()> {
    let guests = self.list_guests().await?;
    let seq    = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
    tracing::debug!(seq, guests = guests.len(), "publishing guest snapshot");
    self.tx.send_replace(StoreSnapshot { seq, guests: guests.into() });
    Ok(())
  }
}

/// Read every `guests` row in creation order.
///
/// `rowid` breaks ties between rows inserted in the same batch, which all
/// share one `created_at`.
fn query_all(conn: &rusqlite::Connection) -> rusqlite::Result<Vec<RawGuest>> {
  let mut stmt = conn.prepare(
    "SELECT guest_id, name, number, checked_in_at, created_at
     FROM guests
     ORDER BY created_at ASC, rowid ASC",
  )?;
  let rows = stmt
    .query_map([], |row| {
      Ok(RawGuest {
        guest_id:      row.get(0)?,
        name:          row.get(1)?,
        number:        row.get(2)?,
        checked_in_at: row.get(3)?,
        created_at:    row.get(4)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

// ─── GuestStore impl ─────────────────────────────────────────────────────────

impl GuestStore for SqliteStore {
  type Error = Error;

  async fn add_guest(&self, input: NewGuest) -> Result<Guest> {
    let guest = input.into_guest(Uuid::new_v4(), Utc::now());

    let id_str      = encode_uuid(guest.guest_id);
    let name        = guest.name.clone();
    let number      = guest.number.clone();
    let created_str = encode_dt(guest.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO guests (guest_id, name, number, checked_in_at, created_at)
           VALUES (?1, ?2, ?3, NULL, ?4)",
          rusqlite::params![id_str, name, number, created_str],
        )?;
        Ok(())
      })
      .await?;

    self.publish().await?;
    Ok(guest)
  }

  async fn get_guest(&self, id: Uuid) -> Result<Option<Guest>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawGuest> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT guest_id, name, number, checked_in_at, created_at
               FROM guests WHERE guest_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawGuest {
                  guest_id:      row.get(0)?,
                  name:          row.get(1)?,
                  number:        row.get(2)?,
                  checked_in_at: row.get(3)?,
                  created_at:    row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawGuest::into_guest).transpose()
  }

  async fn list_guests(&self) -> Result<Vec<Guest>> {
    let raws = self.conn.call(|conn| Ok(query_all(conn)?)).await?;
    raws.into_iter().map(RawGuest::into_guest).collect()
  }

  async fn replace_guests(&self, inputs: Vec<NewGuest>) -> Result<Vec<Guest>> {
    let now = Utc::now();
    let guests: Vec<Guest> = inputs
      .into_iter()
      .map(|input| input.into_guest(Uuid::new_v4(), now))
      .collect();

    let rows: Vec<(String, String, Option<String>, String)> = guests
      .iter()
      .map(|g| {
        (
          encode_uuid(g.guest_id),
          g.name.clone(),
          g.number.clone(),
          encode_dt(g.created_at),
        )
      })
      .collect();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM guests", [])?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO guests (guest_id, name, number, checked_in_at, created_at)
             VALUES (?1, ?2, ?3, NULL, ?4)",
          )?;
          for (id, name, number, created) in &rows {
            stmt.execute(rusqlite::params![id, name, number, created])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::info!(guests = guests.len(), "replaced guest collection");
    self.publish().await?;
    Ok(guests)
  }

  async fn mark_checked_in(&self, id: Uuid) -> Result<Guest> {
    let id_str  = encode_uuid(id);
    let now_str = encode_dt(Utc::now());

    let updated = self
      .conn
      .call(move |conn| {
        // First write wins: COALESCE keeps an existing timestamp over ours.
        let n = conn.execute(
          "UPDATE guests
           SET checked_in_at = COALESCE(checked_in_at, ?2)
           WHERE guest_id = ?1",
          rusqlite::params![id_str, now_str],
        )?;
        Ok(n)
      })
      .await?;

    if updated == 0 {
      return Err(Error::GuestNotFound(id));
    }

    let guest = self
      .get_guest(id)
      .await?
      .ok_or(Error::GuestNotFound(id))?;

    self.publish().await?;
    Ok(guest)
  }

  fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
    self.tx.subscribe()
  }
}
