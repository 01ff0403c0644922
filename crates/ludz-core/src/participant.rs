//! Roster records: participants, pubs and pub rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered player, addressed by codename for the night.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
  pub participant_id: Uuid,
  pub name:           String,
  pub codename:       String,
  pub created_at:     DateTime<Utc>,
}

/// A venue on the crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pub {
  pub pub_id:     Uuid,
  pub name:       String,
  pub created_at: DateTime<Utc>,
}

/// A house rule attached to a pub. Append-only; duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubRule {
  pub rule_id:     Uuid,
  pub pub_id:      Uuid,
  pub text:        String,
  pub recorded_at: DateTime<Utc>,
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::StagStore::insert_participant`]. Fields are
/// already trimmed and non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParticipant {
  pub name:     String,
  pub codename: String,
}

impl NewParticipant {
  /// Parse one `name<delim>codename` roster line, splitting at the first
  /// delimiter. Returns `None` when the delimiter is missing or either side
  /// is blank after trimming.
  pub fn parse_line(line: &str, delimiter: char) -> Option<Self> {
    let (name, codename) = line.split_once(delimiter)?;
    let (name, codename) = (name.trim(), codename.trim());
    if name.is_empty() || codename.is_empty() {
      return None;
    }
    Some(Self { name: name.to_owned(), codename: codename.to_owned() })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_trims_both_sides() {
    let p = NewParticipant::parse_line("Max ; Wolf", ';').unwrap();
    assert_eq!(p.name, "Max");
    assert_eq!(p.codename, "Wolf");
  }

  #[test]
  fn parse_splits_at_first_delimiter() {
    let p = NewParticipant::parse_line("Otto|The|Hammer", '|').unwrap();
    assert_eq!(p.name, "Otto");
    assert_eq!(p.codename, "The|Hammer");
  }

  #[test]
  fn parse_rejects_malformed_lines() {
    assert!(NewParticipant::parse_line("no-delimiter", ';').is_none());
    assert!(NewParticipant::parse_line(" ; ", ';').is_none());
    assert!(NewParticipant::parse_line("Max;", ';').is_none());
    assert!(NewParticipant::parse_line(";Wolf", ';').is_none());
    assert!(NewParticipant::parse_line("Max;Wolf", '|').is_none());
  }
}
