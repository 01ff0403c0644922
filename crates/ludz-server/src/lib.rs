//! HTTP server for Ludz.
//!
//! Mounts the JSON API under `/api` and adds the Easter-egg routes, which
//! need secrets from configuration.

pub mod auth;
pub mod egg;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use ludz_api::{ApiState, api_router};
use ludz_core::{egg::EggGate, store::StagStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `LUDZ_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  pub store_path:          PathBuf,
  /// JSON catalog replacing the built-in one.
  #[serde(default)]
  pub catalog_path:        Option<PathBuf>,
  #[serde(default = "default_delimiter")]
  pub roster_delimiter:    char,
  pub admin_username:      String,
  pub admin_password_hash: String,
  pub egg_password_hash:   String,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8080 }

fn default_delimiter() -> char { ';' }

impl ServerConfig {
  pub fn auth(&self) -> AuthConfig {
    AuthConfig {
      admin_username:      self.admin_username.clone(),
      admin_password_hash: self.admin_password_hash.clone(),
      egg_password_hash:   self.egg_password_hash.clone(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the server's own handlers.
pub struct AppState<S> {
  pub api:  ApiState<S>,
  pub eggs: EggGate<S>,
  pub auth: Arc<AuthConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      api:  self.api.clone(),
      eggs: self.eggs.clone(),
      auth: self.auth.clone(),
    }
  }
}

impl<S: StagStore> AppState<S> {
  pub fn new(store: Arc<S>, api: ApiState<S>, auth: AuthConfig) -> Self {
    Self { api, eggs: EggGate::new(store), auth: Arc::new(auth) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full axum [`Router`]: `/api/*` plus `/egg/*`, traced.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: StagStore + 'static,
{
  let eggs = Router::new()
    .route("/egg/{name}",          get(egg::status::<S>))
    .route("/egg/{name}/claim",    post(egg::claim::<S>))
    .route("/egg/{name}/override", post(egg::override_flag::<S>))
    .with_state(state.clone());

  Router::new()
    .nest("/api", api_router(state.api))
    .merge(eggs)
    .layer(TraceLayer::new_for_http())
}
