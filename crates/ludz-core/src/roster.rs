//! The roster: participant and pub registries.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  participant::{NewParticipant, Participant, Pub, PubRule},
  store::StagStore,
};

/// Result of [`Roster::bulk_register`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkOutcome {
  pub registered: usize,
  /// Malformed lines plus lines rejected as duplicates. Blank lines are not
  /// counted.
  pub skipped:    usize,
}

/// Registers and lists participants, pubs and pub rules.
pub struct Roster<S> {
  store: Arc<S>,
}

impl<S> Clone for Roster<S> {
  fn clone(&self) -> Self { Self { store: self.store.clone() } }
}

impl<S: StagStore> Roster<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  // ── Participants ──────────────────────────────────────────────────────

  /// Register a participant. Both fields are trimmed; blank input is
  /// [`Error::InvalidArgument`], a taken name or codename is
  /// [`Error::Conflict`].
  pub async fn register_participant(
    &self,
    name: &str,
    codename: &str,
  ) -> Result<Participant> {
    let (name, codename) = (name.trim(), codename.trim());
    if name.is_empty() {
      return Err(Error::InvalidArgument("participant name is blank".into()));
    }
    if codename.is_empty() {
      return Err(Error::InvalidArgument("codename is blank".into()));
    }

    let existing = self.store.list_participants().await.map_err(Error::from_store)?;
    if existing.iter().any(|p| p.name == name) {
      return Err(Error::Conflict(format!("name {name:?} is already registered")));
    }
    if existing.iter().any(|p| p.codename == codename) {
      return Err(Error::Conflict(format!("codename {codename:?} is already taken")));
    }

    let participant = self
      .store
      .insert_participant(NewParticipant { name: name.to_owned(), codename: codename.to_owned() })
      .await
      .map_err(Error::from_store)?;
    tracing::info!(
      participant_id = %participant.participant_id,
      codename = %participant.codename,
      "registered participant"
    );
    Ok(participant)
  }

  /// Register one participant per `name<delimiter>codename` line.
  ///
  /// Malformed lines and duplicates are skipped without aborting the batch;
  /// a storage failure aborts it.
  pub async fn bulk_register(&self, text: &str, delimiter: char) -> Result<BulkOutcome> {
    let mut outcome = BulkOutcome::default();
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
      let Some(entry) = NewParticipant::parse_line(line, delimiter) else {
        tracing::warn!(%line, "skipping malformed roster line");
        outcome.skipped += 1;
        continue;
      };
      match self.register_participant(&entry.name, &entry.codename).await {
        Ok(_) => outcome.registered += 1,
        Err(Error::Conflict(reason) | Error::InvalidArgument(reason)) => {
          tracing::warn!(%line, %reason, "skipping roster line");
          outcome.skipped += 1;
        }
        Err(e) => return Err(e),
      }
    }
    Ok(outcome)
  }

  pub async fn get_participant(&self, id: Uuid) -> Result<Participant> {
    self
      .store
      .get_participant(id)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| Error::NotFound(format!("participant {id}")))
  }

  /// All participants, ordered by codename.
  pub async fn list_participants(&self) -> Result<Vec<Participant>> {
    let mut participants =
      self.store.list_participants().await.map_err(Error::from_store)?;
    participants.sort_by(|a, b| a.codename.cmp(&b.codename));
    Ok(participants)
  }

  // ── Pubs ──────────────────────────────────────────────────────────────

  pub async fn register_pub(&self, name: &str) -> Result<Pub> {
    let name = name.trim();
    if name.is_empty() {
      return Err(Error::InvalidArgument("pub name is blank".into()));
    }
    let venue = self.store.insert_pub(name.to_owned()).await.map_err(Error::from_store)?;
    tracing::info!(pub_id = %venue.pub_id, name = %venue.name, "registered pub");
    Ok(venue)
  }

  pub async fn get_pub(&self, id: Uuid) -> Result<Pub> {
    self
      .store
      .get_pub(id)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| Error::NotFound(format!("pub {id}")))
  }

  /// All pubs, ordered by name.
  pub async fn list_pubs(&self) -> Result<Vec<Pub>> {
    let mut pubs = self.store.list_pubs().await.map_err(Error::from_store)?;
    pubs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(pubs)
  }

  // ── Pub rules ─────────────────────────────────────────────────────────

  /// Attach a house rule to a pub.
  pub async fn add_pub_rule(&self, pub_id: Uuid, text: &str) -> Result<PubRule> {
    let text = text.trim();
    if text.is_empty() {
      return Err(Error::InvalidArgument("pub rule is blank".into()));
    }
    self.get_pub(pub_id).await?;
    let rule = self
      .store
      .insert_pub_rule(pub_id, text.to_owned())
      .await
      .map_err(Error::from_store)?;
    tracing::info!(%pub_id, rule = %rule.text, "added pub rule");
    Ok(rule)
  }

  /// Rules for `pub_id`, in the order they were added.
  pub async fn pub_rules(&self, pub_id: Uuid) -> Result<Vec<PubRule>> {
    self.get_pub(pub_id).await?;
    self.store.select_pub_rules(pub_id).await.map_err(Error::from_store)
  }
}
