//! Handlers for `/pubs` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/pubs` | Ordered by name |
//! | `POST` | `/pubs` | Body: `{"name":"Augustiner"}` |
//! | `GET`  | `/pubs/:id` | 404 if not found |
//! | `GET`  | `/pubs/:id/rules` | Rules in the order they were added |
//! | `POST` | `/pubs/:id/rules` | Body: `{"text":"..."}` |
//! | `POST` | `/pubs/:id/rules/roll` | Draws a standard rule and saves it |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use ludz_core::{
  participant::{Pub, PubRule},
  store::StagStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

/// `GET /pubs`
pub async fn list<S: StagStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Pub>>, ApiError> {
  Ok(Json(state.roster.list_pubs().await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name: String,
}

/// `POST /pubs`
pub async fn create<S: StagStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let venue = state.roster.register_pub(&body.name).await?;
  Ok((StatusCode::CREATED, Json(venue)))
}

/// `GET /pubs/:id`
pub async fn get_one<S: StagStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Pub>, ApiError> {
  Ok(Json(state.roster.get_pub(id).await?))
}

// ─── Rules ────────────────────────────────────────────────────────────────────

/// `GET /pubs/:id/rules`
pub async fn rules<S: StagStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<PubRule>>, ApiError> {
  Ok(Json(state.roster.pub_rules(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct RuleBody {
  pub text: String,
}

/// `POST /pubs/:id/rules`
pub async fn add_rule<S: StagStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<RuleBody>,
) -> Result<impl IntoResponse, ApiError> {
  let rule = state.roster.add_pub_rule(id, &body.text).await?;
  Ok((StatusCode::CREATED, Json(rule)))
}

/// `POST /pubs/:id/rules/roll`
pub async fn roll_rule<S: StagStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
  // Resolve the pub first so an unknown id never consumes a draw.
  state.roster.get_pub(id).await?;
  let text = state.randomizer.draw_pub_rule()?;
  let rule = state.roster.add_pub_rule(id, &text).await?;
  Ok((StatusCode::CREATED, Json(rule)))
}
