//! Error types for `soiree-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// A guest name was empty after trimming whitespace.
  /// Raised before any state changes; nothing is persisted.
  #[error("guest name must not be empty")]
  EmptyName,

  #[error("guest not found: {0}")]
  GuestNotFound(Uuid),

  /// The backing store rejected or lost a write. Any optimistic local
  /// patch for that write has been rolled back by the time this surfaces.
  #[error("persistence error: {0}")]
  Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// The store's snapshot stream closed. The mirror keeps serving its last
  /// collection with the stale flag raised.
  #[error("store subscription lost; mirror may be stale")]
  SubscriptionLost,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
