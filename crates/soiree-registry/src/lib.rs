//! The authoritative in-memory guest mirror and check-in engine.
//!
//! [`GuestRegistry`] owns exactly one [`soiree_core::store::GuestStore`]
//! subscription, consumed on a background task, and republishes immutable
//! [`RegistrySnapshot`]s on its own watch channel. Writes absorb the
//! store's snapshot before returning, so a read that follows a write
//! through the same registry sees it. Check-ins are applied optimistically
//! and reconciled against the store's snapshots; the confirmed value
//! always wins.

mod checkin;
mod overlay;
mod registry;

pub use registry::{GuestRegistry, RegistrySnapshot};
pub use soiree_core::{Error, Result};
