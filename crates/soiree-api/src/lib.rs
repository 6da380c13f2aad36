//! JSON REST API and server for Soirée.
//!
//! Exposes an axum [`Router`] backed by a [`GuestRegistry`] over any
//! [`soiree_core::store::GuestStore`]. Reads are served from the registry's
//! in-memory mirror; a write is reflected in the mirror before its response
//! is sent. Auth, TLS, and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", soiree_api::api_router(registry.clone()))
//! ```

pub mod error;
pub mod guests;
pub mod report;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use soiree_core::store::GuestStore;
use soiree_registry::GuestRegistry;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// `SOIREE_*` environment.
///
/// Every field falls back to its default, so the server starts with no
/// config file at all.
#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       3210,
      store_path: PathBuf::from("soiree.db"),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `registry`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(registry: Arc<GuestRegistry<S>>) -> Router<()>
where
  S: GuestStore + 'static,
{
  Router::new()
    // Guests
    .route(
      "/guests",
      get(guests::list::<S>)
        .post(guests::create::<S>)
        .put(guests::replace::<S>),
    )
    .route("/guests/{id}", get(guests::get_one::<S>))
    .route("/guests/{id}/check-in", post(guests::check_in::<S>))
    // Report
    .route("/report", get(report::handler::<S>))
    .with_state(registry)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use serde_json::{Value, json};
  use soiree_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;
  use uuid::Uuid;

  async fn app() -> Router {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    api_router(Arc::new(GuestRegistry::spawn(store)))
  }

  async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    let resp   = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes  = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    // Extractor rejections have plain-text bodies; map those to Null.
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
  }

  async fn create_guest(app: &Router, name: &str, number: Option<&str>) -> Value {
    let payload = json!({ "name": name, "number": number });
    let (status, body) = request(app, "POST", "/guests", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body
  }

  fn names_of(collection: &Value) -> Vec<&str> {
    collection["guests"]
      .as_array()
      .unwrap()
      .iter()
      .map(|g| g["name"].as_str().unwrap())
      .collect()
  }

  // ── Listing ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_starts_empty() {
    let app = app().await;
    let (status, body) = request(&app, "GET", "/guests", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stale"], json!(false));
    assert_eq!(body["guests"], json!([]));
  }

  #[tokio::test]
  async fn a_created_guest_is_listed_immediately() {
    let app     = app().await;
    let created = create_guest(&app, "Grace Hopper", None).await;

    let (_, body) = request(&app, "GET", "/guests", None).await;
    let guests = body["guests"].as_array().unwrap();
    assert_eq!(guests.len(), 1);
    assert_eq!(guests[0]["guest_id"], created["guest_id"]);
  }

  #[tokio::test]
  async fn search_filters_by_name_fragment() {
    let app = app().await;
    create_guest(&app, "Ada Lovelace", None).await;
    create_guest(&app, "Grace Hopper", None).await;
    create_guest(&app, "Adam Smith", None).await;

    let (status, body) = request(&app, "GET", "/guests?search=ada", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names_of(&body), vec!["Ada Lovelace", "Adam Smith"]);
  }

  // ── Creating ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_returns_the_stored_guest() {
    let app = app().await;
    let (status, body) = request(
      &app,
      "POST",
      "/guests",
      Some(json!({ "name": "Ada Lovelace", "number": "555-0100" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], json!("Ada Lovelace"));
    assert_eq!(body["number"], json!("555-0100"));
    assert_eq!(body["status"], json!("not-checked-in"));
    assert_eq!(body["checked_in_at"], Value::Null);
  }

  #[tokio::test]
  async fn create_with_blank_name_is_rejected() {
    let app = app().await;
    let (status, body) =
      request(&app, "POST", "/guests", Some(json!({ "name": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("name"), "error: {message}");
  }

  // ── Replacing ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn put_replaces_the_whole_roster() {
    let app = app().await;
    create_guest(&app, "Ada Lovelace", None).await;

    let (status, body) = request(
      &app,
      "PUT",
      "/guests",
      Some(json!([
        { "name": "Grace Hopper", "number": "555-0199" },
        { "name": "Edsger Dijkstra" },
      ])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, listed) = request(&app, "GET", "/guests", None).await;
    assert_eq!(names_of(&listed), vec!["Grace Hopper", "Edsger Dijkstra"]);
  }

  #[tokio::test]
  async fn put_an_empty_array_clears_the_roster() {
    let app = app().await;
    create_guest(&app, "Ada Lovelace", None).await;

    let (status, _) = request(&app, "PUT", "/guests", Some(json!([]))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = request(&app, "GET", "/guests", None).await;
    assert_eq!(listed["guests"], json!([]));
  }

  #[tokio::test]
  async fn put_with_one_bad_row_changes_nothing() {
    let app = app().await;
    create_guest(&app, "Ada Lovelace", None).await;

    let (status, _) = request(
      &app,
      "PUT",
      "/guests",
      Some(json!([{ "name": "Grace Hopper" }, { "name": "" }])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, listed) = request(&app, "GET", "/guests", None).await;
    assert_eq!(names_of(&listed), vec!["Ada Lovelace"]);
  }

  // ── Fetching one ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_one_finds_a_created_guest() {
    let app     = app().await;
    let created = create_guest(&app, "Ada Lovelace", Some("555-0100")).await;
    let id      = created["guest_id"].as_str().unwrap();

    let (status, body) =
      request(&app, "GET", &format!("/guests/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], json!("Ada Lovelace"));
    assert_eq!(body["number"], json!("555-0100"));
  }

  #[tokio::test]
  async fn get_one_returns_404_for_unknown_ids() {
    let app = app().await;
    let (status, body) =
      request(&app, "GET", &format!("/guests/{}", Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("not found"), "error: {message}");
  }

  #[tokio::test]
  async fn malformed_guest_ids_are_rejected() {
    let app = app().await;
    let (status, _) = request(&app, "GET", "/guests/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  // ── Checking in ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn check_in_stamps_the_guest_once() {
    let app     = app().await;
    let created = create_guest(&app, "Ada Lovelace", None).await;
    let id      = created["guest_id"].as_str().unwrap().to_string();

    let (status, first) =
      request(&app, "POST", &format!("/guests/{id}/check-in"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["status"], json!("checked-in"));
    assert!(first["checked_in_at"].is_string());

    let (status, second) =
      request(&app, "POST", &format!("/guests/{id}/check-in"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["checked_in_at"], first["checked_in_at"]);
  }

  #[tokio::test]
  async fn check_in_unknown_guest_is_404() {
    let app = app().await;
    let uri = format!("/guests/{}/check-in", Uuid::new_v4());
    let (status, _) = request(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Report ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn report_reflects_checked_in_guests() {
    let app = app().await;
    let ada = create_guest(&app, "Ada Lovelace", None).await;
    create_guest(&app, "Grace Hopper", None).await;
    let id = ada["guest_id"].as_str().unwrap().to_string();
    request(&app, "POST", &format!("/guests/{id}/check-in"), None).await;

    let (status, body) = request(&app, "GET", "/report", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["attended"], json!(1));
    assert_eq!(body["not_attended"], json!(1));
    assert_eq!(body["first_arrivals"].as_array().unwrap().len(), 1);
    assert!(body["peak"].is_object(), "peak: {}", body["peak"]);
  }

  #[tokio::test]
  async fn report_on_an_empty_roster_has_sentinels() {
    let app = app().await;
    let (status, body) = request(&app, "GET", "/report", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["attended"], json!(0));
    assert_eq!(body["peak"], Value::Null);
    assert_eq!(body["first_arrivals"], json!([]));
  }
}
