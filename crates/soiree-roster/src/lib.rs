//! Roster CSV codec for Soirée.
//!
//! Converts between CSV text and [`soiree_core`] guest types. Pure and
//! synchronous; no HTTP or database dependencies.
//!
//! # Quick start
//!
//! ```
//! let csv = "Name,Phone Number\r\nAda Lovelace,555-0100\r\n";
//! let parsed = soiree_roster::parse(csv).unwrap();
//! assert_eq!(parsed.guests.len(), 1);
//! ```

pub mod error;
mod parse;
mod serialize;

pub use error::{Error, Result};
use soiree_core::guest::{Guest, NewGuest};

// ─── Public types ────────────────────────────────────────────────────────────

/// The result of parsing a roster CSV.
#[derive(Debug)]
pub struct ParsedRoster {
  /// Importable guests, in row order.
  pub guests:  Vec<NewGuest>,
  /// Data rows dropped because their name field was blank.
  pub skipped: usize,
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Parse a roster CSV.
///
/// The header row must contain a `Name` column; a phone column named
/// `Phone`, `Phone Number` or `Number` is optional and all other columns
/// are ignored. Header matching is case-insensitive. Rows whose name is
/// blank are dropped and counted in [`ParsedRoster::skipped`]; fully blank
/// rows are not counted at all.
pub fn parse(input: &str) -> Result<ParsedRoster> {
  parse::parse_roster(input)
}

/// Serialize `guests` as a roster CSV with CRLF record endings.
///
/// Columns: `Name`, `Phone Number`, `Status`, `Checked In At`. Status uses
/// the same strings as the JSON API; the timestamp is RFC 3339, blank when
/// the guest has not checked in. The output feeds back into [`parse`],
/// which ignores the two status columns.
pub fn serialize(guests: &[Guest]) -> String {
  serialize::write_roster(guests)
}

// ─── Round-trip test ─────────────────────────────────────────────────────────
