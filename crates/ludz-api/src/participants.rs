//! Handlers for `/participants` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/participants` | Ordered by codename |
//! | `POST` | `/participants` | Body: `{"name":"Max","codename":"Wolf"}` |
//! | `POST` | `/participants/bulk` | Body: `{"text":"Max;Wolf\n...","delimiter":";"}` |
//! | `GET`  | `/participants/:id` | 404 if not found |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use ludz_core::{participant::Participant, roster::BulkOutcome, store::StagStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /participants`
pub async fn list<S: StagStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Participant>>, ApiError> {
  Ok(Json(state.roster.list_participants().await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:     String,
  pub codename: String,
}

/// `POST /participants`, returns 201 + the stored participant.
pub async fn create<S: StagStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let participant = state.roster.register_participant(&body.name, &body.codename).await?;
  Ok((StatusCode::CREATED, Json(participant)))
}

// ─── Bulk ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BulkBody {
  /// One `name<delimiter>codename` pair per line.
  pub text:      String,
  /// Overrides the server's configured delimiter.
  pub delimiter: Option<char>,
}

/// `POST /participants/bulk`
pub async fn bulk<S: StagStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<BulkBody>,
) -> Result<Json<BulkOutcome>, ApiError> {
  let delimiter = body.delimiter.unwrap_or(state.roster_delimiter);
  Ok(Json(state.roster.bulk_register(&body.text, delimiter).await?))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /participants/:id`
pub async fn get_one<S: StagStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Participant>, ApiError> {
  Ok(Json(state.roster.get_participant(id).await?))
}
