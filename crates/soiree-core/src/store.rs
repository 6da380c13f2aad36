//! The `GuestStore` trait and the snapshot type its subscription emits.
//!
//! The trait is implemented by storage backends (e.g. `soiree-store-sqlite`).
//! Higher layers (`soiree-registry`, `soiree-api`) depend on this
//! abstraction, not on any concrete backend.

use std::{future::Future, sync::Arc};

use tokio::sync::watch;
use uuid::Uuid;

use crate::guest::{Guest, NewGuest};

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// One full-collection snapshot emitted by a store after a committed write.
///
/// Every snapshot carries the complete guest list, so a subscriber that
/// misses intermediate emissions can always catch up from the latest one.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
  /// Increments once per publication; purely informational.
  pub seq:    u64,
  pub guests: Arc<[Guest]>,
}

impl StoreSnapshot {
  /// The snapshot of a store with no guests.
  pub fn empty() -> Self {
    Self { seq: 0, guests: Vec::new().into() }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a guest record store backend.
///
/// Writes are serialised by the backend; consistency between concurrent
/// actors is last-write-wins as applied by the backend, surfaced to
/// observers through the snapshot stream. `checked_in_at` is the one
/// exception: the first write wins and later writes are ignored.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait GuestStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new guest. `guest_id` and `created_at` are set by the store.
  fn add_guest(
    &self,
    input: NewGuest,
  ) -> impl Future<Output = Result<Guest, Self::Error>> + Send + '_;

  /// Retrieve a guest by UUID. Returns `None` if not found.
  fn get_guest(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Guest>, Self::Error>> + Send + '_;

  /// List the full collection in creation order.
  fn list_guests(
    &self,
  ) -> impl Future<Output = Result<Vec<Guest>, Self::Error>> + Send + '_;

  /// Atomically replace the whole collection with `inputs`.
  ///
  /// Every existing guest is deleted and the new ones inserted in a single
  /// transaction; observers see the old collection or the new one, never a
  /// mix. An empty `inputs` clears the roster. Replacement guests start
  /// not-checked-in regardless of any prior state.
  fn replace_guests(
    &self,
    inputs: Vec<NewGuest>,
  ) -> impl Future<Output = Result<Vec<Guest>, Self::Error>> + Send + '_;

  /// Record that a guest has arrived and return the updated record.
  ///
  /// The check-in timestamp is assigned by the store on the first call and
  /// is never overwritten; calling again returns the guest unchanged with
  /// its original timestamp.
  fn mark_checked_in(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Guest, Self::Error>> + Send + '_;

  /// Subscribe to the snapshot stream.
  ///
  /// The receiver always holds the latest [`StoreSnapshot`]; intermediate
  /// snapshots may be coalesced under load. When the store is dropped the
  /// sender side closes, which subscribers must treat as a stale-data
  /// signal, not as an empty collection.
  fn subscribe(&self) -> watch::Receiver<StoreSnapshot>;
}
