//! Events, the ledger's unit.
//!
//! An event records that a participant completed a challenge or a forfeit.
//! Events are written once and never updated or removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Tier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
  Challenge,
  Forfeit,
}

impl EventKind {
  /// The discriminant stored in the `kind` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Challenge => "challenge",
      Self::Forfeit => "forfeit",
    }
  }
}

/// A persisted challenge or forfeit completion.
///
/// `tier` is `Some` exactly when `kind` is [`EventKind::Forfeit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
  pub event_id:       Uuid,
  pub participant_id: Uuid,
  pub pub_id:         Option<Uuid>,
  pub kind:           EventKind,
  pub tier:           Option<Tier>,
  pub description:    String,
  /// Server-assigned; never changes after creation.
  pub recorded_at:    DateTime<Utc>,
}

// ─── NewEvent ────────────────────────────────────────────────────────────────

/// Input to [`crate::ledger::Ledger::record_event`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
  pub participant_id: Uuid,
  pub kind:           EventKind,
  pub description:    String,
  #[serde(default)]
  pub tier:           Option<Tier>,
  #[serde(default)]
  pub pub_id:         Option<Uuid>,
}

impl NewEvent {
  pub fn challenge(participant_id: Uuid, description: impl Into<String>) -> Self {
    Self {
      participant_id,
      kind: EventKind::Challenge,
      description: description.into(),
      tier: None,
      pub_id: None,
    }
  }

  pub fn forfeit(
    participant_id: Uuid,
    tier: Tier,
    description: impl Into<String>,
  ) -> Self {
    Self {
      participant_id,
      kind: EventKind::Forfeit,
      description: description.into(),
      tier: Some(tier),
      pub_id: None,
    }
  }

  /// Attach the venue where the event happened.
  pub fn at_pub(mut self, pub_id: Uuid) -> Self {
    self.pub_id = Some(pub_id);
    self
  }
}

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`crate::store::StagStore::select_events`]. Empty filter
/// selects the whole ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventFilter {
  pub participant_id: Option<Uuid>,
  pub pub_id:         Option<Uuid>,
}

impl EventFilter {
  /// Predicate form of the filter; backends must select exactly the events
  /// for which this returns `true`.
  pub fn matches(&self, event: &Event) -> bool {
    self.participant_id.is_none_or(|p| p == event.participant_id)
      && self.pub_id.is_none_or(|p| event.pub_id == Some(p))
  }
}
