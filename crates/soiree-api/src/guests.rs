//! Handlers for `/guests` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/guests` | Optional `?search=<substring>` |
//! | `POST` | `/guests` | Body: `{"name":"…","number":"…"}` |
//! | `PUT`  | `/guests` | Body: array of the POST shape; replaces the roster |
//! | `GET`  | `/guests/:id` | 404 if not found |
//! | `POST` | `/guests/:id/check-in` | Idempotent; 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use soiree_core::{
  guest::{CheckInStatus, Guest, NewGuest},
  store::GuestStore,
};
use soiree_registry::GuestRegistry;
use uuid::Uuid;

use crate::error::ApiError;

// ─── Wire types ──────────────────────────────────────────────────────────────

/// A guest as presented on the wire: the stored fields plus the status
/// derived from the check-in timestamp.
#[derive(Debug, Serialize)]
pub struct GuestBody {
  pub guest_id:      Uuid,
  pub name:          String,
  pub number:        Option<String>,
  pub status:        CheckInStatus,
  pub checked_in_at: Option<DateTime<Utc>>,
  pub created_at:    DateTime<Utc>,
}

impl From<&Guest> for GuestBody {
  fn from(g: &Guest) -> Self {
    Self {
      guest_id:      g.guest_id,
      name:          g.name.clone(),
      number:        g.number.clone(),
      status:        g.status(),
      checked_in_at: g.checked_in_at,
      created_at:    g.created_at,
    }
  }
}

/// The mirrored collection with its freshness markers.
#[derive(Debug, Serialize)]
pub struct CollectionBody {
  pub revision: u64,
  pub stale:    bool,
  pub guests:   Vec<GuestBody>,
}

/// Input shape shared by `POST /guests` and `PUT /guests`.
#[derive(Debug, Deserialize)]
pub struct GuestInput {
  pub name:   String,
  pub number: Option<String>,
}

impl GuestInput {
  fn into_new_guest(self) -> Result<NewGuest, ApiError> {
    NewGuest::new(self.name, self.number).map_err(ApiError::from)
  }
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub search: Option<String>,
}

/// `GET /guests[?search=<substring>]`
pub async fn list<S>(
  State(registry): State<Arc<GuestRegistry<S>>>,
  Query(params): Query<ListParams>,
) -> Json<CollectionBody>
where
  S: GuestStore,
{
  let snap = registry.snapshot();
  let guests: Vec<GuestBody> = match params.search.as_deref() {
    Some(needle) if !needle.trim().is_empty() => snap
      .filter_name(needle.trim())
      .iter()
      .map(GuestBody::from)
      .collect(),
    _ => snap.guests.iter().map(GuestBody::from).collect(),
  };
  Json(CollectionBody {
    revision: snap.revision,
    stale: snap.stale,
    guests,
  })
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /guests` — body: `{"name":"…","number":"…"}`
pub async fn create<S>(
  State(registry): State<Arc<GuestRegistry<S>>>,
  Json(body): Json<GuestInput>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GuestStore,
{
  let input = body.into_new_guest()?;
  let guest = registry.add_one(input).await?;
  Ok((StatusCode::CREATED, Json(GuestBody::from(&guest))))
}

// ─── Replace ─────────────────────────────────────────────────────────────────

/// `PUT /guests` — body: an array of the POST shape.
///
/// Replaces the entire roster atomically; an empty array clears it. Any
/// invalid entry rejects the whole request, leaving the roster untouched.
pub async fn replace<S>(
  State(registry): State<Arc<GuestRegistry<S>>>,
  Json(body): Json<Vec<GuestInput>>,
) -> Result<Json<Vec<GuestBody>>, ApiError>
where
  S: GuestStore,
{
  let inputs = body
    .into_iter()
    .map(GuestInput::into_new_guest)
    .collect::<Result<Vec<_>, _>>()?;
  let replaced = registry.replace_all(inputs).await?;
  Ok(Json(replaced.iter().map(GuestBody::from).collect()))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /guests/:id`
pub async fn get_one<S>(
  State(registry): State<Arc<GuestRegistry<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<GuestBody>, ApiError>
where
  S: GuestStore,
{
  let guest = registry
    .get(id)
    .ok_or_else(|| ApiError::NotFound(format!("guest {id} not found")))?;
  Ok(Json(GuestBody::from(&guest)))
}

// ─── Check-in ────────────────────────────────────────────────────────────────

/// `POST /guests/:id/check-in`
///
/// Idempotent: a guest who is already checked in comes back unchanged,
/// with the original timestamp.
pub async fn check_in<S>(
  State(registry): State<Arc<GuestRegistry<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<GuestBody>, ApiError>
where
  S: GuestStore,
{
  let guest = registry.check_in(id).await?;
  Ok(Json(GuestBody::from(&guest)))
}
