//! Two-phase check-in against the mirror and the store.

use chrono::Utc;
use uuid::Uuid;

use soiree_core::{Error, Result, guest::Guest, store::GuestStore};

use crate::registry::GuestRegistry;

impl<S: GuestStore> GuestRegistry<S> {
  /// Record a guest's arrival.
  ///
  /// The mirror shows the guest as checked in immediately, with a
  /// provisional timestamp; the store's timestamp replaces it once the
  /// write settles. A guest already checked in is returned unchanged, so
  /// repeated calls for the same guest are safe.
  pub async fn check_in(&self, id: Uuid) -> Result<Guest> {
    {
      let mut inner = self.inner.write().await;
      let current = inner.compose();
      let guest = current.get(id).ok_or(Error::GuestNotFound(id))?;
      if guest.checked_in_at.is_some() {
        return Ok(guest.clone());
      }
      inner.overlay.insert(id, Utc::now());
      inner.revision += 1;
      self.tx.send_replace(inner.compose());
    }

    match self.store.mark_checked_in(id).await {
      Ok(guest) => {
        // The write's own snapshot settles the provisional patch.
        self.refresh().await;
        tracing::info!(guest_id = %id, "guest checked in");
        Ok(guest)
      }
      Err(e) => {
        // Roll back the provisional patch and republish without it.
        let mut inner = self.inner.write().await;
        inner.overlay.remove(id);
        inner.revision += 1;
        self.tx.send_replace(inner.compose());
        tracing::warn!(guest_id = %id, error = %e, "check-in failed");
        Err(Error::Persistence(Box::new(e)))
      }
    }
  }
}
