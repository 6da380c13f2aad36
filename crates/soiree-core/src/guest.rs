//! Guest — the single record type of the registry.
//!
//! A guest's check-in state is derived from `checked_in_at` rather than
//! stored alongside it, so status and timestamp can never disagree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Whether a guest has arrived at the event.
///
/// Serialises as `"checked-in"` / `"not-checked-in"`, the strings used at
/// every presentation boundary (JSON API, roster export).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckInStatus {
  NotCheckedIn,
  CheckedIn,
}

/// A guest on the event roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
  pub guest_id:      Uuid,
  pub name:          String,
  /// Free-text phone number; no format is enforced.
  pub number:        Option<String>,
  /// Set by the store on the first successful check-in, then immutable.
  pub checked_in_at: Option<DateTime<Utc>>,
  /// Store-assigned; orders the collection stably for display.
  pub created_at:    DateTime<Utc>,
}

impl Guest {
  /// The guest's check-in status, derived from [`Guest::checked_in_at`].
  pub fn status(&self) -> CheckInStatus {
    if self.checked_in_at.is_some() {
      CheckInStatus::CheckedIn
    } else {
      CheckInStatus::NotCheckedIn
    }
  }
}

// ─── NewGuest ────────────────────────────────────────────────────────────────

/// Validated input to [`crate::store::GuestStore::add_guest`] and
/// [`crate::store::GuestStore::replace_guests`].
///
/// `guest_id` and `created_at` are always assigned by the store; they are not
/// accepted from callers. The fields are private so a `NewGuest` can only
/// exist with a non-empty name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGuest {
  name:   String,
  number: Option<String>,
}

impl NewGuest {
  /// Validate and construct. Leading and trailing whitespace is stripped
  /// from both fields; a name that is empty afterwards is rejected with
  /// [`Error::EmptyName`], and a number that is empty becomes `None`.
  pub fn new(name: impl Into<String>, number: Option<String>) -> Result<Self> {
    let name = name.into().trim().to_owned();
    if name.is_empty() {
      return Err(Error::EmptyName);
    }
    let number = number
      .map(|n| n.trim().to_owned())
      .filter(|n| !n.is_empty());
    Ok(Self { name, number })
  }

  pub fn name(&self) -> &str { &self.name }

  pub fn number(&self) -> Option<&str> { self.number.as_deref() }

  /// Materialise this input as a stored [`Guest`] with store-assigned
  /// identity. New guests are never checked in.
  pub fn into_guest(self, guest_id: Uuid, created_at: DateTime<Utc>) -> Guest {
    Guest {
      guest_id,
      name: self.name,
      number: self.number,
      checked_in_at: None,
      created_at,
    }
  }
}
