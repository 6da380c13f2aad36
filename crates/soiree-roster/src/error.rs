//! Error types for the roster codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("roster is empty: no header row")]
  Empty,

  #[error("no Name column in the header row")]
  MissingNameColumn,

  #[error("unterminated quoted field starting on line {0}")]
  UnterminatedQuote(usize),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
