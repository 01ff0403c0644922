//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings and UUIDs as hyphenated
//! lowercase strings. Tiers are stored as their numeric level.

use chrono::{DateTime, Utc};
use ludz_core::{
  catalog::Tier,
  event::{Event, EventKind},
  participant::{Participant, Pub, PubRule},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── EventKind ────────────────────────────────────────────────────────────────

pub fn encode_kind(k: EventKind) -> &'static str { k.as_str() }

pub fn decode_kind(s: &str) -> Result<EventKind> {
  match s {
    "challenge" => Ok(EventKind::Challenge),
    "forfeit" => Ok(EventKind::Forfeit),
    other => Err(Error::Decode(format!("unknown event kind: {other:?}"))),
  }
}

// ─── Tier ─────────────────────────────────────────────────────────────────────

pub fn encode_tier(t: Tier) -> i64 { i64::from(t.level()) }

pub fn decode_tier(level: i64) -> Result<Tier> {
  u8::try_from(level)
    .ok()
    .and_then(|l| Tier::from_level(l).ok())
    .ok_or_else(|| Error::Decode(format!("unknown tier level: {level}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `participants` row.
pub struct RawParticipant {
  pub participant_id: String,
  pub name:           String,
  pub codename:       String,
  pub created_at:     String,
}

impl RawParticipant {
  pub const COLUMNS: &'static str = "participant_id, name, codename, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      participant_id: row.get(0)?,
      name:           row.get(1)?,
      codename:       row.get(2)?,
      created_at:     row.get(3)?,
    })
  }

  pub fn into_participant(self) -> Result<Participant> {
    Ok(Participant {
      participant_id: decode_uuid(&self.participant_id)?,
      name:           self.name,
      codename:       self.codename,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `pubs` row.
pub struct RawPub {
  pub pub_id:     String,
  pub name:       String,
  pub created_at: String,
}

impl RawPub {
  pub const COLUMNS: &'static str = "pub_id, name, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      pub_id:     row.get(0)?,
      name:       row.get(1)?,
      created_at: row.get(2)?,
    })
  }

  pub fn into_pub(self) -> Result<Pub> {
    Ok(Pub {
      pub_id:     decode_uuid(&self.pub_id)?,
      name:       self.name,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `pub_rules` row.
pub struct RawPubRule {
  pub rule_id:     String,
  pub pub_id:      String,
  pub text:        String,
  pub recorded_at: String,
}

impl RawPubRule {
  pub fn into_rule(self) -> Result<PubRule> {
    Ok(PubRule {
      rule_id:     decode_uuid(&self.rule_id)?,
      pub_id:      decode_uuid(&self.pub_id)?,
      text:        self.text,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}

/// Raw values read directly from an `events` row.
pub struct RawEvent {
  pub event_id:       String,
  pub participant_id: String,
  pub pub_id:         Option<String>,
  pub kind:           String,
  pub tier:           Option<i64>,
  pub description:    String,
  pub recorded_at:    String,
}

impl RawEvent {
  pub const COLUMNS: &'static str =
    "event_id, participant_id, pub_id, kind, tier, description, recorded_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      event_id:       row.get(0)?,
      participant_id: row.get(1)?,
      pub_id:         row.get(2)?,
      kind:           row.get(3)?,
      tier:           row.get(4)?,
      description:    row.get(5)?,
      recorded_at:    row.get(6)?,
    })
  }

  pub fn into_event(self) -> Result<Event> {
    let kind = decode_kind(&self.kind)?;
    let tier = self.tier.map(decode_tier).transpose()?;
    if (kind == EventKind::Forfeit) != tier.is_some() {
      return Err(Error::Decode(format!(
        "event {} has kind {} with tier {:?}",
        self.event_id, self.kind, self.tier
      )));
    }

    Ok(Event {
      event_id: decode_uuid(&self.event_id)?,
      participant_id: decode_uuid(&self.participant_id)?,
      pub_id: self.pub_id.as_deref().map(decode_uuid).transpose()?,
      kind,
      tier,
      description: self.description,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}
