//! Async HTTP client wrapping the soiree JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use soiree_core::{guest::Guest, report::Report};
use uuid::Uuid;

/// Connection settings for the soiree API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// A guest payload for `POST /guests` and `PUT /guests`.
#[derive(Debug, Serialize)]
pub struct NewGuestBody {
  pub name:   String,
  pub number: Option<String>,
}

/// The guest collection as served by `GET /guests`.
#[derive(Debug, Deserialize)]
pub struct Collection {
  pub revision: u64,
  pub stale:    bool,
  pub guests:   Vec<Guest>,
}

/// Async HTTP client for the soiree JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: reqwest::Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  // ── Guests ────────────────────────────────────────────────────────────────

  /// `GET /api/guests[?search=<fragment>]`
  pub async fn list_guests(&self, search: Option<&str>) -> Result<Collection> {
    let mut req = self.client.get(self.url("/guests"));
    if let Some(needle) = search {
      req = req.query(&[("search", needle)]);
    }
    let resp = req.send().await.context("GET /guests failed")?;
    let resp = expect_success(resp, "GET /guests").await?;
    resp.json().await.context("deserialising guest list")
  }

  /// `POST /api/guests`
  pub async fn add_guest(&self, guest: &NewGuestBody) -> Result<Guest> {
    let resp = self
      .client
      .post(self.url("/guests"))
      .json(guest)
      .send()
      .await
      .context("POST /guests failed")?;
    let resp = expect_success(resp, "POST /guests").await?;
    resp.json().await.context("deserialising created guest")
  }

  /// `PUT /api/guests` — replaces the entire roster.
  pub async fn replace_guests(
    &self,
    guests: &[NewGuestBody],
  ) -> Result<Vec<Guest>> {
    let resp = self
      .client
      .put(self.url("/guests"))
      .json(guests)
      .send()
      .await
      .context("PUT /guests failed")?;
    let resp = expect_success(resp, "PUT /guests").await?;
    resp.json().await.context("deserialising replaced roster")
  }

  /// `POST /api/guests/{id}/check-in`
  pub async fn check_in(&self, id: Uuid) -> Result<Guest> {
    let resp = self
      .client
      .post(self.url(&format!("/guests/{id}/check-in")))
      .send()
      .await
      .context("POST /guests/{id}/check-in failed")?;
    let resp = expect_success(resp, "check-in").await?;
    resp.json().await.context("deserialising checked-in guest")
  }

  // ── Report ────────────────────────────────────────────────────────────────

  /// `GET /api/report`
  pub async fn report(&self) -> Result<Report> {
    let resp = self
      .client
      .get(self.url("/report"))
      .send()
      .await
      .context("GET /report failed")?;
    let resp = expect_success(resp, "GET /report").await?;
    resp.json().await.context("deserialising report")
  }
}

/// Surface the server's `{"error": …}` message when a request fails.
async fn expect_success(
  resp: reqwest::Response,
  what: &str,
) -> Result<reqwest::Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let detail = resp
    .json::<serde_json::Value>()
    .await
    .ok()
    .and_then(|v| v["error"].as_str().map(str::to_string));
  match detail {
    Some(msg) => Err(anyhow!("{what} → {status}: {msg}")),
    None => Err(anyhow!("{what} → {status}")),
  }
}
