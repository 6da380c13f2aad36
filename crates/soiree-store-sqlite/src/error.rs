//! Error type for `soiree-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Attempted to check in a guest that does not exist.
  #[error("guest not found: {0}")]
  GuestNotFound(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
