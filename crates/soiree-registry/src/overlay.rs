//! Optimistic check-in patches layered over the confirmed collection.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use soiree_core::guest::Guest;
use uuid::Uuid;

/// Check-ins applied locally but not yet confirmed by the store.
///
/// A patch never overrides an authoritative timestamp: [`apply`] leaves a
/// guest the store already shows as checked in untouched, and [`reconcile`]
/// drops every patch the store has settled or orphaned.
///
/// [`apply`]: CheckInOverlay::apply
/// [`reconcile`]: CheckInOverlay::reconcile
#[derive(Debug, Default)]
pub(crate) struct CheckInOverlay {
  pending: HashMap<Uuid, DateTime<Utc>>,
}

impl CheckInOverlay {
  pub fn is_empty(&self) -> bool { self.pending.is_empty() }

  /// Record a provisional check-in at `at`.
  pub fn insert(&mut self, id: Uuid, at: DateTime<Utc>) {
    self.pending.insert(id, at);
  }

  /// Discard the patch for `id`, if any.
  pub fn remove(&mut self, id: Uuid) {
    self.pending.remove(&id);
  }

  /// Drop every patch the confirmed collection settles: the guest now has
  /// an authoritative timestamp, or is no longer in the collection.
  pub fn reconcile(&mut self, confirmed: &[Guest]) {
    self.pending.retain(|id, _| {
      confirmed
        .iter()
        .find(|g| g.guest_id == *id)
        .is_some_and(|g| g.checked_in_at.is_none())
    });
  }

  /// Return `guest` with its pending patch applied, or a plain clone.
  pub fn apply(&self, guest: &Guest) -> Guest {
    match self.pending.get(&guest.guest_id) {
      Some(&at) if guest.checked_in_at.is_none() => Guest {
        checked_in_at: Some(at),
        ..guest.clone()
      },
      _ => guest.clone(),
    }
  }
}
