//! The scorer: leaderboard, per-participant scores and history.
//!
//! Everything here is a pure projection over the current ledger. Nothing is
//! cached; each call performs a fresh scan, so two calls against an
//! unchanged ledger produce identical output.

use std::{collections::HashMap, sync::Arc};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{
  Result,
  catalog::TierWeights,
  event::{Event, EventKind},
  ledger::Ledger,
  participant::Participant,
  store::StagStore,
};

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
  pub participant_id: Uuid,
  pub codename:       String,
  pub score:          u32,
}

/// Un-aggregated audit listing for one participant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
  pub forfeits:   Vec<Event>,
  pub challenges: Vec<Event>,
}

// ─── Pure functions ──────────────────────────────────────────────────────────

/// Sum of forfeit weights; challenges score nothing.
pub fn score_events<'a>(
  events: impl IntoIterator<Item = &'a Event>,
  weights: &TierWeights,
) -> u32 {
  events
    .into_iter()
    .filter(|e| e.kind == EventKind::Forfeit)
    .filter_map(|e| e.tier)
    .map(|t| weights.weight(t))
    .sum()
}

/// Build standings for `participants` from `events`, sorted by score
/// descending. The sort is stable: ties keep their input order.
pub fn rank(
  participants: &[Participant],
  events: &[Event],
  weights: &TierWeights,
) -> Vec<Standing> {
  let mut by_participant: HashMap<Uuid, Vec<&Event>> = HashMap::new();
  for event in events {
    by_participant.entry(event.participant_id).or_default().push(event);
  }

  let mut standings: Vec<Standing> = participants
    .iter()
    .map(|p| Standing {
      participant_id: p.participant_id,
      codename:       p.codename.clone(),
      score:          by_participant
        .get(&p.participant_id)
        .map_or(0, |evs| score_events(evs.iter().copied(), weights)),
    })
    .collect();
  standings.sort_by(|a, b| b.score.cmp(&a.score));
  standings
}

/// Split a participant's events into forfeits and challenges, preserving
/// chronological order within each.
pub fn split_history(events: Vec<Event>) -> History {
  let (forfeits, challenges) =
    events.into_iter().partition(|e| e.kind == EventKind::Forfeit);
  History { forfeits, challenges }
}

/// Quoted hex SHA-256 over the ordered standings. Equal standings in equal
/// order always yield the same tag.
pub fn leaderboard_etag(standings: &[Standing]) -> String {
  let mut hasher = Sha256::new();
  for s in standings {
    hasher.update(s.participant_id.as_bytes());
    hasher.update(s.codename.as_bytes());
    hasher.update([0]);
    hasher.update(s.score.to_le_bytes());
  }
  format!("\"{}\"", hex::encode(hasher.finalize()))
}

// ─── Scorer ──────────────────────────────────────────────────────────────────

/// Computes scores and leaderboards from the ledger.
pub struct Scorer<S> {
  ledger:  Ledger<S>,
  weights: TierWeights,
}

impl<S> Clone for Scorer<S> {
  fn clone(&self) -> Self {
    Self { ledger: self.ledger.clone(), weights: self.weights }
  }
}

impl<S: StagStore> Scorer<S> {
  /// A scorer using the canonical 1 / 3 / 9 weights.
  pub fn new(store: Arc<S>) -> Self {
    Self { ledger: Ledger::new(store), weights: TierWeights::CANONICAL }
  }

  /// Total forfeit points for one participant.
  pub async fn score(&self, participant_id: Uuid) -> Result<u32> {
    let events = self.ledger.events_for(participant_id, None).await?;
    Ok(score_events(&events, &self.weights))
  }

  /// One standing per entry of `participants`, highest score first.
  pub async fn leaderboard(&self, participants: &[Participant]) -> Result<Vec<Standing>> {
    let events = self.ledger.all_events().await?;
    Ok(rank(participants, &events, &self.weights))
  }

  /// Full chronological forfeit and challenge listing.
  pub async fn history(&self, participant_id: Uuid) -> Result<History> {
    let events = self.ledger.events_for(participant_id, None).await?;
    Ok(split_history(events))
  }
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};

  use super::*;
  use crate::catalog::Tier;

  fn participant(codename: &str) -> Participant {
    Participant {
      participant_id: Uuid::new_v4(),
      name:           format!("{codename} (real name)"),
      codename:       codename.into(),
      created_at:     Utc.timestamp_opt(0, 0).unwrap(),
    }
  }

  fn event(p: &Participant, kind: EventKind, tier: Option<Tier>, secs: i64) -> Event {
    Event {
      event_id: Uuid::new_v4(),
      participant_id: p.participant_id,
      pub_id: None,
      kind,
      tier,
      description: "something daft".into(),
      recorded_at: Utc.timestamp_opt(secs, 0).unwrap(),
    }
  }

  fn forfeit(p: &Participant, tier: Tier) -> Event {
    event(p, EventKind::Forfeit, Some(tier), 0)
  }

  #[test]
  fn tier_one_one_three_scores_eleven() {
    let p = participant("Wolf");
    let events = [
      forfeit(&p, Tier::Tier1),
      forfeit(&p, Tier::Tier1),
      forfeit(&p, Tier::Tier3),
    ];
    assert_eq!(score_events(&events, &TierWeights::CANONICAL), 11);
  }

  #[test]
  fn challenges_score_nothing() {
    let p = participant("Wolf");
    let events = [
      event(&p, EventKind::Challenge, None, 0),
      forfeit(&p, Tier::Tier2),
    ];
    assert_eq!(score_events(&events, &TierWeights::CANONICAL), 3);
  }

  #[test]
  fn ties_keep_input_order() {
    let a = participant("A");
    let b = participant("B");
    let c = participant("C");
    let d = participant("D");

    let mut events = Vec::new();
    // A: 5 = 3 + 1 + 1
    events.extend([forfeit(&a, Tier::Tier2), forfeit(&a, Tier::Tier1), forfeit(&a, Tier::Tier1)]);
    // B and C: 9 each
    events.push(forfeit(&b, Tier::Tier3));
    events.extend([forfeit(&c, Tier::Tier2), forfeit(&c, Tier::Tier2), forfeit(&c, Tier::Tier2)]);
    // D: challenges only
    events.push(event(&d, EventKind::Challenge, None, 0));

    let participants = [a, b, c, d];
    let standings = rank(&participants, &events, &TierWeights::CANONICAL);
    let order: Vec<_> = standings.iter().map(|s| (s.codename.as_str(), s.score)).collect();
    assert_eq!(order, [("B", 9), ("C", 9), ("A", 5), ("D", 0)]);

    // Reversed input flips the tie and nothing else.
    let reversed: Vec<_> = participants.iter().rev().cloned().collect();
    let standings = rank(&reversed, &events, &TierWeights::CANONICAL);
    let order: Vec<_> = standings.iter().map(|s| s.codename.as_str()).collect();
    assert_eq!(order, ["C", "B", "A", "D"]);
  }

  #[test]
  fn unknown_participants_in_events_are_ignored() {
    let a = participant("A");
    let stranger = participant("Ghost");
    let events = [forfeit(&stranger, Tier::Tier3)];
    let standings = rank(std::slice::from_ref(&a), &events, &TierWeights::CANONICAL);
    assert_eq!(standings.len(), 1);
    assert_eq!(standings[0].score, 0);
  }

  #[test]
  fn history_splits_and_keeps_order() {
    let p = participant("Wolf");
    let events = vec![
      event(&p, EventKind::Forfeit, Some(Tier::Tier1), 1),
      event(&p, EventKind::Challenge, None, 2),
      event(&p, EventKind::Forfeit, Some(Tier::Tier3), 3),
      event(&p, EventKind::Challenge, None, 4),
    ];
    let history = split_history(events.clone());
    assert_eq!(history.forfeits, [events[0].clone(), events[2].clone()]);
    assert_eq!(history.challenges, [events[1].clone(), events[3].clone()]);
  }

  #[test]
  fn etag_tracks_order_and_scores() {
    let a = participant("A");
    let b = participant("B");
    let s = |p: &Participant, score| Standing {
      participant_id: p.participant_id,
      codename: p.codename.clone(),
      score,
    };

    let one = [s(&a, 3), s(&b, 1)];
    assert_eq!(leaderboard_etag(&one), leaderboard_etag(&one.clone()));
    assert_ne!(leaderboard_etag(&one), leaderboard_etag(&[s(&b, 1), s(&a, 3)]));
    assert_ne!(leaderboard_etag(&one), leaderboard_etag(&[s(&a, 4), s(&b, 1)]));
  }
}
