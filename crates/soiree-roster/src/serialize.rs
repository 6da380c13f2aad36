//! Roster CSV writer.
//!
//! Produces an RFC 4180 document with CRLF record endings: a fixed header
//! followed by one row per guest, in collection order.

use chrono::SecondsFormat;
use soiree_core::guest::{CheckInStatus, Guest};

/// Header row of every exported roster.
pub(crate) const HEADER: &str = "Name,Phone Number,Status,Checked In At";

pub(crate) fn write_roster(guests: &[Guest]) -> String {
  let mut out = String::new();
  out.push_str(HEADER);
  out.push_str("\r\n");

  for guest in guests {
    let status = match guest.status() {
      CheckInStatus::CheckedIn => "checked-in",
      CheckInStatus::NotCheckedIn => "not-checked-in",
    };
    let checked_in_at = guest
      .checked_in_at
      .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true))
      .unwrap_or_default();

    out.push_str(&escape_field(&guest.name));
    out.push(',');
    out.push_str(&escape_field(guest.number.as_deref().unwrap_or_default()));
    out.push(',');
    out.push_str(status);
    out.push(',');
    out.push_str(&checked_in_at);
    out.push_str("\r\n");
  }

  out
}

/// Quote `s` when it contains a comma, quote or line break, doubling any
/// quotes inside (RFC 4180 §2).
fn escape_field(s: &str) -> String {
  if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r')
  {
    format!("\"{}\"", s.replace('"', "\"\""))
  } else {
    s.to_owned()
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use uuid::Uuid;

  use super::*;

  fn guest(name: &str, number: Option<&str>, checked_in: bool) -> Guest {
    let at = Utc.with_ymd_and_hms(2024, 6, 1, 19, 2, 0).unwrap();
    Guest {
      guest_id:      Uuid::new_v4(),
      name:          name.to_owned(),
      number:        number.map(str::to_owned),
      checked_in_at: checked_in.then_some(at),
      created_at:    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
  }

  #[test]
  fn header_comes_first() {
    let out = write_roster(&[]);
    assert_eq!(out, "Name,Phone Number,Status,Checked In At\r\n");
  }

  #[test]
  fn rows_carry_status_and_timestamp() {
    let out = write_roster(&[
      guest("Ada Lovelace", Some("555-0100"), true),
      guest("Grace Hopper", None, false),
    ]);
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(
      lines[1],
      "Ada Lovelace,555-0100,checked-in,2024-06-01T19:02:00Z"
    );
    assert_eq!(lines[2], "Grace Hopper,,not-checked-in,");
  }

  #[test]
  fn fields_with_commas_and_quotes_are_escaped() {
    let out = write_roster(&[guest("Lovelace, Ada \"Countess\"", None, false)]);
    assert!(
      out.contains("\"Lovelace, Ada \"\"Countess\"\"\",,not-checked-in,\r\n"),
      "got:\n{out}"
    );
  }
}
