//! Async HTTP client wrapping the Ludz JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use ludz_core::{
  event::Event,
  participant::{Participant, Pub, PubRule},
  roster::BulkOutcome,
  score::{History, Standing},
};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use uuid::Uuid;

/// Connection settings for the Ludz API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// What a roll produced, as returned by the server.
#[derive(Debug, Deserialize)]
pub struct Roll {
  pub codename: String,
  pub title:    Option<String>,
  pub event:    Event,
}

#[derive(Debug, Deserialize)]
pub struct Score {
  pub score: u32,
}

/// Async HTTP client for the Ludz JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn request(&self, method: Method, path: &str) -> RequestBuilder {
    self.client.request(method, self.url(path))
  }

  async fn send<T: DeserializeOwned>(&self, req: RequestBuilder, what: &str) -> Result<T> {
    let resp = req.send().await.with_context(|| format!("{what} failed"))?;
    let resp = check(resp, what).await?;
    resp.json().await.with_context(|| format!("deserialising {what}"))
  }

  async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
    self.send(self.request(Method::GET, path), &format!("GET {path}")).await
  }

  async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
    self
      .send(self.request(Method::POST, path).json(body), &format!("POST {path}"))
      .await
  }

  // ── Participants ──────────────────────────────────────────────────────────

  /// `GET /api/participants`
  pub async fn list_participants(&self) -> Result<Vec<Participant>> {
    self.get("/participants").await
  }

  /// `POST /api/participants`
  pub async fn add_participant(&self, name: &str, codename: &str) -> Result<Participant> {
    self
      .post("/participants", &json!({ "name": name, "codename": codename }))
      .await
  }

  /// `POST /api/participants/bulk`
  pub async fn import_participants(
    &self,
    text: &str,
    delimiter: Option<char>,
  ) -> Result<BulkOutcome> {
    self
      .post("/participants/bulk", &json!({ "text": text, "delimiter": delimiter }))
      .await
  }

  /// `GET /api/participants/{id}/history`
  pub async fn history(&self, id: Uuid) -> Result<History> {
    self.get(&format!("/participants/{id}/history")).await
  }

  /// `GET /api/participants/{id}/score`
  pub async fn score(&self, id: Uuid) -> Result<Score> {
    self.get(&format!("/participants/{id}/score")).await
  }

  // ── Pubs ──────────────────────────────────────────────────────────────────

  /// `GET /api/pubs`
  pub async fn list_pubs(&self) -> Result<Vec<Pub>> {
    self.get("/pubs").await
  }

  /// `POST /api/pubs`
  pub async fn add_pub(&self, name: &str) -> Result<Pub> {
    self.post("/pubs", &json!({ "name": name })).await
  }

  /// `GET /api/pubs/{id}/rules`
  pub async fn pub_rules(&self, pub_id: Uuid) -> Result<Vec<PubRule>> {
    self.get(&format!("/pubs/{pub_id}/rules")).await
  }

  /// `POST /api/pubs/{id}/rules`
  pub async fn add_pub_rule(&self, pub_id: Uuid, text: &str) -> Result<PubRule> {
    self.post(&format!("/pubs/{pub_id}/rules"), &json!({ "text": text })).await
  }

  /// `POST /api/pubs/{id}/rules/roll`
  pub async fn roll_pub_rule(&self, pub_id: Uuid) -> Result<PubRule> {
    self.post(&format!("/pubs/{pub_id}/rules/roll"), &Value::Null).await
  }

  // ── Rolls ─────────────────────────────────────────────────────────────────

  /// `POST /api/challenges/roll`
  pub async fn roll_challenge(
    &self,
    participant_id: Option<Uuid>,
    pub_id: Option<Uuid>,
  ) -> Result<Roll> {
    self
      .post(
        "/challenges/roll",
        &json!({ "participant_id": participant_id, "pub_id": pub_id }),
      )
      .await
  }

  /// `POST /api/forfeits/roll`
  pub async fn roll_forfeit(
    &self,
    participant_id: Uuid,
    tier: &str,
    pub_id: Option<Uuid>,
  ) -> Result<Roll> {
    self
      .post(
        "/forfeits/roll",
        &json!({ "participant_id": participant_id, "tier": tier, "pub_id": pub_id }),
      )
      .await
  }

  // ── Leaderboard ───────────────────────────────────────────────────────────

  /// `GET /api/leaderboard`
  pub async fn leaderboard(&self) -> Result<Vec<Standing>> {
    self.get("/leaderboard").await
  }
}

/// Turn a non-2xx response into an error carrying the server's message.
async fn check(resp: Response, what: &str) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let message = resp
    .json::<Value>()
    .await
    .ok()
    .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_owned))
    .unwrap_or_else(|| status.to_string());
  Err(anyhow!("{what} → {status}: {message}"))
}
