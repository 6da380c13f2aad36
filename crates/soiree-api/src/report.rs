//! Handler for `GET /report`.

use std::sync::Arc;

use axum::{Json, extract::State};
use soiree_core::{report::Report, store::GuestStore};
use soiree_registry::GuestRegistry;

/// `GET /report`
///
/// Attendance figures computed over the current mirror snapshot, so
/// optimistic check-ins not yet confirmed by the store are counted.
pub async fn handler<S>(
  State(registry): State<Arc<GuestRegistry<S>>>,
) -> Json<Report>
where
  S: GuestStore,
{
  let snap = registry.snapshot();
  Json(Report::compute(&snap.guests))
}
