//! [`GuestRegistry`] — the live mirror of a guest store.

use std::sync::Arc;

use tokio::{
  sync::{RwLock, watch},
  task::JoinHandle,
};
use uuid::Uuid;

use soiree_core::{
  Error, Result,
  guest::{Guest, NewGuest},
  store::{GuestStore, StoreSnapshot},
};

use crate::overlay::CheckInOverlay;

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// An immutable view of the mirrored collection, including any optimistic
/// check-in patches not yet confirmed by the store.
#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
  /// Increments on every republication.
  pub revision: u64,
  /// True once the store's snapshot stream has closed; the guests shown
  /// are then the last known collection, not live data.
  pub stale:    bool,
  pub guests:   Arc<[Guest]>,
}

impl RegistrySnapshot {
  /// Look up one guest in this snapshot.
  pub fn get(&self, id: Uuid) -> Option<&Guest> {
    self.guests.iter().find(|g| g.guest_id == id)
  }

  /// Case-insensitive substring filter on guest names.
  pub fn filter_name(&self, needle: &str) -> Vec<Guest> {
    let needle = needle.to_lowercase();
    self
      .guests
      .iter()
      .filter(|g| g.name.to_lowercase().contains(&needle))
      .cloned()
      .collect()
  }
}

// ─── Mirror state ────────────────────────────────────────────────────────────

/// Mirror state guarded by the registry's lock.
pub(crate) struct Inner {
  /// The last authoritative collection received from the store.
  pub confirmed: Arc<[Guest]>,
  /// Optimistic check-in patches applied on top of `confirmed`.
  pub overlay:   CheckInOverlay,
  /// Sequence number of `confirmed`; absorbs are monotone in it.
  pub last_seq:  u64,
  pub revision:  u64,
  pub stale:     bool,
}

impl Inner {
  /// Adopt an authoritative snapshot and drop the overlay patches it
  /// settles. Returns false when `snap` has already been applied.
  fn absorb(&mut self, snap: StoreSnapshot) -> bool {
    if snap.seq <= self.last_seq {
      return false;
    }
    self.overlay.reconcile(&snap.guests);
    self.confirmed = snap.guests;
    self.last_seq = snap.seq;
    self.revision += 1;
    true
  }

  /// The published view: `confirmed` with the overlay applied.
  pub fn compose(&self) -> RegistrySnapshot {
    let guests: Arc<[Guest]> = if self.overlay.is_empty() {
      Arc::clone(&self.confirmed)
    } else {
      self
        .confirmed
        .iter()
        .map(|g| self.overlay.apply(g))
        .collect::<Vec<_>>()
        .into()
    };
    RegistrySnapshot {
      revision: self.revision,
      stale: self.stale,
      guests,
    }
  }
}

// ─── Registry ────────────────────────────────────────────────────────────────

/// The authoritative in-memory mirror of a [`GuestStore`].
///
/// The registry owns exactly one store subscription, consumed on a
/// background task, and serves reads synchronously from the latest composed
/// snapshot. Writes go through the store and absorb its snapshot before
/// returning, so a read that follows a write through the same registry sees
/// it. Dropping the registry (or calling [`GuestRegistry::close`]) stops
/// the background task.
pub struct GuestRegistry<S> {
  pub(crate) store: Arc<S>,
  pub(crate) inner: Arc<RwLock<Inner>>,
  pub(crate) tx:    Arc<watch::Sender<RegistrySnapshot>>,
  task:             JoinHandle<()>,
}

impl<S: GuestStore> GuestRegistry<S> {
  /// Subscribe to `store` and spawn the mirror task.
  ///
  /// Must be called from within a tokio runtime. The mirror starts from the
  /// store's current snapshot, so the registry is usable immediately.
  pub fn spawn(store: Arc<S>) -> Self {
    let mut rx = store.subscribe();
    let seed = rx.borrow_and_update().clone();

    let (tx, _) = watch::channel(RegistrySnapshot {
      revision: 0,
      stale:    false,
      guests:   Arc::clone(&seed.guests),
    });
    let tx = Arc::new(tx);

    let inner = Arc::new(RwLock::new(Inner {
      confirmed: seed.guests,
      overlay: CheckInOverlay::default(),
      last_seq: seed.seq,
      revision: 0,
      stale: false,
    }));

    let task = tokio::spawn(run(rx, Arc::clone(&inner), Arc::clone(&tx)));

    Self { store, inner, tx, task }
  }

  /// The latest published snapshot.
  pub fn snapshot(&self) -> RegistrySnapshot {
    self.tx.borrow().clone()
  }

  /// Look up one guest in the current snapshot.
  pub fn get(&self, id: Uuid) -> Option<Guest> {
    self.tx.borrow().get(id).cloned()
  }

  /// Subscribe to mirror updates. The receiver always holds the latest
  /// [`RegistrySnapshot`].
  pub fn subscribe(&self) -> watch::Receiver<RegistrySnapshot> {
    self.tx.subscribe()
  }

  /// Append one guest to the roster.
  pub async fn add_one(&self, input: NewGuest) -> Result<Guest> {
    let guest = self
      .store
      .add_guest(input)
      .await
      .map_err(|e| Error::Persistence(Box::new(e)))?;
    self.refresh().await;
    Ok(guest)
  }

  /// Atomically replace the whole roster. An empty `inputs` clears it.
  pub async fn replace_all(&self, inputs: Vec<NewGuest>) -> Result<Vec<Guest>> {
    let replaced = self
      .store
      .replace_guests(inputs)
      .await
      .map_err(|e| Error::Persistence(Box::new(e)))?;
    self.refresh().await;
    Ok(replaced)
  }

  /// Stop consuming the store stream. Reads keep serving the last snapshot.
  pub fn close(&self) {
    self.task.abort();
  }

  /// Absorb the store's current snapshot immediately.
  ///
  /// Stores publish their snapshot before a write call returns, so calling
  /// this right after a successful write makes the mirror reflect it
  /// without waiting for the background task.
  pub(crate) async fn refresh(&self) {
    let snap = self.store.subscribe().borrow().clone();
    let mut inner = self.inner.write().await;
    if inner.absorb(snap) {
      self.tx.send_replace(inner.compose());
    }
  }
}

impl<S> Drop for GuestRegistry<S> {
  fn drop(&mut self) {
    self.task.abort();
  }
}

// ─── Mirror task ─────────────────────────────────────────────────────────────

/// Consume the store's snapshot stream until it closes.
async fn run(
  mut rx: watch::Receiver<StoreSnapshot>,
  inner: Arc<RwLock<Inner>>,
  tx: Arc<watch::Sender<RegistrySnapshot>>,
) {
  loop {
    if rx.changed().await.is_err() {
      // Sender dropped: the store's stream is gone. Keep serving the last
      // mirrored collection, flagged stale.
      let mut inner = inner.write().await;
      inner.stale = true;
      inner.revision += 1;
      tx.send_replace(inner.compose());
      tracing::warn!("guest snapshot stream closed; mirror is stale");
      return;
    }

    let snap = rx.borrow_and_update().clone();
    let seq = snap.seq;
    let mut inner = inner.write().await;
    if inner.absorb(snap) {
      tx.send_replace(inner.compose());
      tracing::debug!(seq, revision = inner.revision, "absorbed store snapshot");
    }
  }
}
