//! Easter-egg handlers.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/egg/{name}` | `{name, solved}` |
//! | `POST` | `/egg/{name}/claim` | Body: `{"password", "participant_id"}`; 401 on a wrong guess, 409 once solved |
//! | `POST` | `/egg/{name}/override` | Body: `{"solved"}`; admin Basic auth |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use ludz_core::{egg::EasterEgg, store::StagStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::{Admin, verify_egg_password}, error::Error};

/// `GET /egg/{name}`
pub async fn status<S: StagStore>(
  State(state): State<AppState<S>>,
  Path(name): Path<String>,
) -> Result<Json<EasterEgg>, Error> {
  Ok(Json(state.eggs.status(&name).await?))
}

#[derive(Debug, Deserialize)]
pub struct ClaimBody {
  pub password:       String,
  /// Who takes the reward forfeit.
  pub participant_id: Uuid,
}

/// `POST /egg/{name}/claim`
///
/// A correct guess flips the flag and appends a tier-3 forfeit for the
/// claimant, in one write.
pub async fn claim<S: StagStore>(
  State(state): State<AppState<S>>,
  Path(name): Path<String>,
  Json(body): Json<ClaimBody>,
) -> Result<impl IntoResponse, Error> {
  if let Err(e) = verify_egg_password(&body.password, &state.auth) {
    tracing::warn!(egg = %name, "wrong easter egg password");
    return Err(e);
  }

  let event = state.eggs.claim(&name, body.participant_id).await?;
  Ok((StatusCode::CREATED, Json(event)))
}

#[derive(Debug, Deserialize)]
pub struct OverrideBody {
  pub solved: bool,
}

/// `POST /egg/{name}/override`
pub async fn override_flag<S: StagStore>(
  _admin: Admin,
  State(state): State<AppState<S>>,
  Path(name): Path<String>,
  Json(body): Json<OverrideBody>,
) -> Result<Json<EasterEgg>, Error> {
  Ok(Json(state.eggs.set(&name, body.solved).await?))
}
