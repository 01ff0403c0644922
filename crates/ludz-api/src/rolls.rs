//! Roll-and-record handlers: draw from the catalog, then append the result
//! to the ledger in the same request.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/catalog` | The loaded catalog |
//! | `POST` | `/challenges/roll` | Body: `{"participant_id"?, "pub_id"?}`; victim drawn when omitted |
//! | `POST` | `/forfeits/roll` | Body: `{"participant_id", "tier", "pub_id"?}` |
//!
//! If the append fails the drawn result is reported in the error only; it is
//! never persisted.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use ludz_core::{
  catalog::{Catalog, Tier},
  event::{Event, NewEvent},
  store::StagStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

/// `GET /catalog`
pub async fn catalog<S: StagStore>(State(state): State<ApiState<S>>) -> Json<Catalog> {
  Json(state.randomizer.catalog().clone())
}

/// What a roll produced, for display.
#[derive(Debug, Serialize, Deserialize)]
pub struct Roll {
  pub codename: String,
  /// Forfeit title; absent for challenges.
  pub title:    Option<String>,
  pub event:    Event,
}

// ─── Challenges ───────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ChallengeBody {
  /// Who does it; drawn uniformly from the roster when omitted.
  pub participant_id: Option<Uuid>,
  pub pub_id:         Option<Uuid>,
}

/// `POST /challenges/roll`
pub async fn roll_challenge<S: StagStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<ChallengeBody>,
) -> Result<impl IntoResponse, ApiError> {
  let participant = match body.participant_id {
    Some(id) => state.roster.get_participant(id).await?,
    None => {
      let everyone = state.roster.list_participants().await?;
      state.randomizer.pick_participant(&everyone)?
    }
  };

  let description = state.randomizer.draw_challenge()?;
  let mut input = NewEvent::challenge(participant.participant_id, description);
  input.pub_id = body.pub_id;
  let event = state.ledger.record_event(input).await?;

  Ok((
    StatusCode::CREATED,
    Json(Roll { codename: participant.codename, title: None, event }),
  ))
}

// ─── Forfeits ─────────────────────────────────────────────────────────────────

/// A tier given either as a level (`2`) or a name (`"tier2"`, `"Tier 2"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TierParam {
  Level(u8),
  Name(String),
}

impl TierParam {
  pub fn resolve(&self) -> Result<Tier, ludz_core::Error> {
    match self {
      TierParam::Level(level) => Tier::from_level(*level),
      TierParam::Name(name) => name.parse(),
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct ForfeitBody {
  pub participant_id: Uuid,
  pub tier:           TierParam,
  pub pub_id:         Option<Uuid>,
}

/// `POST /forfeits/roll`
pub async fn roll_forfeit<S: StagStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<ForfeitBody>,
) -> Result<impl IntoResponse, ApiError> {
  let tier = body.tier.resolve()?;
  let participant = state.roster.get_participant(body.participant_id).await?;

  let entry = state.randomizer.draw_forfeit(tier)?;
  let mut input = NewEvent::forfeit(participant.participant_id, tier, entry.summary());
  input.pub_id = body.pub_id;
  let event = state.ledger.record_event(input).await?;

  Ok((
    StatusCode::CREATED,
    Json(Roll { codename: participant.codename, title: Some(entry.title), event }),
  ))
}
