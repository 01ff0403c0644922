//! Handlers for `/events`: direct access to the ledger.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/events` | Optional `?participant_id`, `?pub_id`; append order |
//! | `POST` | `/events` | Body: [`NewEvent`]; records a confirmed draw |

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use ludz_core::{
  event::{Event, NewEvent},
  store::StagStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub participant_id: Option<Uuid>,
  /// Narrows the result to one venue.
  pub pub_id:         Option<Uuid>,
}

/// `GET /events[?participant_id=<id>][&pub_id=<id>]`
pub async fn list<S: StagStore>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Event>>, ApiError> {
  let events = match params.participant_id {
    Some(id) => state.ledger.events_for(id, params.pub_id).await?,
    None => {
      let mut all = state.ledger.all_events().await?;
      if let Some(pub_id) = params.pub_id {
        all.retain(|e| e.pub_id == Some(pub_id));
      }
      all
    }
  };
  Ok(Json(events))
}

/// `POST /events`, returns 201 + the stored event.
pub async fn create<S: StagStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewEvent>,
) -> Result<impl IntoResponse, ApiError> {
  let event = state.ledger.record_event(body).await?;
  Ok((StatusCode::CREATED, Json(event)))
}
