//! Read projections: leaderboard, score and history.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/leaderboard` | Sets `ETag`; honours `If-None-Match` |
//! | `GET`  | `/participants/:id/score` | `{"participant_id", "score"}` |
//! | `GET`  | `/participants/:id/history` | Forfeits and challenges, oldest first |

use axum::{
  Json,
  extract::{Path, State},
  http::{HeaderMap, HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use ludz_core::{
  score::{History, leaderboard_etag},
  store::StagStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

/// `GET /leaderboard`
pub async fn leaderboard<S: StagStore>(
  State(state): State<ApiState<S>>,
  headers: HeaderMap,
) -> Result<Response, ApiError> {
  let participants = state.roster.list_participants().await?;
  let standings = state.scorer.leaderboard(&participants).await?;
  let etag = leaderboard_etag(&standings);

  let unchanged = headers
    .get(header::IF_NONE_MATCH)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|v| v.trim_matches('"') == etag.trim_matches('"'));

  let mut response = if unchanged {
    StatusCode::NOT_MODIFIED.into_response()
  } else {
    Json(standings).into_response()
  };
  if let Ok(value) = HeaderValue::from_str(&etag) {
    response.headers_mut().insert(header::ETAG, value);
  }
  Ok(response)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreBody {
  pub participant_id: Uuid,
  pub score:          u32,
}

/// `GET /participants/:id/score`
pub async fn score<S: StagStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ScoreBody>, ApiError> {
  state.roster.get_participant(id).await?;
  let score = state.scorer.score(id).await?;
  Ok(Json(ScoreBody { participant_id: id, score }))
}

/// `GET /participants/:id/history`
pub async fn history<S: StagStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<History>, ApiError> {
  state.roster.get_participant(id).await?;
  Ok(Json(state.scorer.history(id).await?))
}
