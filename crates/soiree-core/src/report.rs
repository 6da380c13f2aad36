//! Attendance report — derived from a guest collection, never stored.
//!
//! All computations are pure and total: absent data yields zero counts, a
//! `None` peak window, and empty arrival lists rather than errors.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::guest::Guest;

/// Width of the peak-attendance window.
const WINDOW_MINUTES: i64 = 15;

/// Maximum length of each arrival list.
const ARRIVALS_SHOWN: usize = 5;

// ─── Types ───────────────────────────────────────────────────────────────────

/// The busiest check-in window, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakWindow {
  pub start: DateTime<Utc>,
  /// Exclusive; always `start` plus fifteen minutes.
  pub end:   DateTime<Utc>,
  pub count: usize,
}

/// Attendance figures for a guest collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
  pub attended:        usize,
  pub not_attended:    usize,
  /// `None` until at least one guest has checked in.
  pub peak:            Option<PeakWindow>,
  /// The earliest check-ins, ascending by time; at most five.
  pub first_arrivals:  Vec<Guest>,
  /// The latest check-ins, ascending by time; at most five.
  pub latest_arrivals: Vec<Guest>,
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

impl Report {
  /// Compute the report for `guests`.
  pub fn compute(guests: &[Guest]) -> Self {
    let mut arrivals: Vec<(DateTime<Utc>, &Guest)> = guests
      .iter()
      .filter_map(|g| g.checked_in_at.map(|at| (at, g)))
      .collect();
    // Secondary key keeps the order total even for simultaneous arrivals.
    arrivals.sort_by_key(|(at, g)| (*at, g.guest_id));

    let attended     = arrivals.len();
    let not_attended = guests.len() - attended;

    let first_arrivals = arrivals
      .iter()
      .take(ARRIVALS_SHOWN)
      .map(|(_, g)| (*g).clone())
      .collect();
    let latest_arrivals = arrivals
      [arrivals.len().saturating_sub(ARRIVALS_SHOWN)..]
      .iter()
      .map(|(_, g)| (*g).clone())
      .collect();

    Self {
      attended,
      not_attended,
      peak: peak_window(&arrivals),
      first_arrivals,
      latest_arrivals,
    }
  }
}

/// Floor `at` to the start of its 15-minute window.
///
/// Epoch seconds are floored to a multiple of 900, which lands on :00, :15,
/// :30 and :45 wall-clock boundaries in UTC.
fn window_start(at: DateTime<Utc>) -> DateTime<Utc> {
  let window  = WINDOW_MINUTES * 60;
  let floored = at.timestamp() - at.timestamp().rem_euclid(window);
  DateTime::from_timestamp(floored, 0).unwrap_or(at)
}

/// The window with the most check-ins.
///
/// Ties go to the earliest window: buckets iterate in ascending start order
/// and only a strictly greater count displaces the current best.
fn peak_window(arrivals: &[(DateTime<Utc>, &Guest)]) -> Option<PeakWindow> {
  let mut buckets: BTreeMap<DateTime<Utc>, usize> = BTreeMap::new();
  for (at, _) in arrivals {
    *buckets.entry(window_start(*at)).or_insert(0) += 1;
  }

  let mut best: Option<(DateTime<Utc>, usize)> = None;
  for (&start, &count) in &buckets {
    if best.is_none_or(|(_, c)| count > c) {
      best = Some((start, count));
    }
  }

  best.map(|(start, count)| PeakWindow {
    start,
    end: start + Duration::minutes(WINDOW_MINUTES),
    count,
  })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
