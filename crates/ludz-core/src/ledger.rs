//! The ledger: the append-only event log.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  event::{Event, EventFilter, EventKind, NewEvent},
  store::StagStore,
};

/// Appends and queries events.
///
/// Every check runs before the write, so a failed call never leaves a
/// record behind.
pub struct Ledger<S> {
  store: Arc<S>,
}

impl<S> Clone for Ledger<S> {
  fn clone(&self) -> Self { Self { store: self.store.clone() } }
}

impl<S: StagStore> Ledger<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Append one event.
  ///
  /// - [`Error::NotFound`] if the participant, or the pub when given, does
  ///   not exist.
  /// - [`Error::InvalidArgument`] for a blank description or a forfeit
  ///   without a tier.
  ///
  /// A tier supplied with a challenge is dropped.
  pub async fn record_event(&self, mut input: NewEvent) -> Result<Event> {
    let description = input.description.trim();
    if description.is_empty() {
      return Err(Error::InvalidArgument("event description is blank".into()));
    }
    input.description = description.to_owned();

    match input.kind {
      EventKind::Forfeit if input.tier.is_none() => {
        return Err(Error::InvalidArgument("a forfeit requires a tier".into()));
      }
      EventKind::Challenge => input.tier = None,
      EventKind::Forfeit => {}
    }

    if self
      .store
      .get_participant(input.participant_id)
      .await
      .map_err(Error::from_store)?
      .is_none()
    {
      return Err(Error::NotFound(format!("participant {}", input.participant_id)));
    }
    if let Some(pub_id) = input.pub_id
      && self.store.get_pub(pub_id).await.map_err(Error::from_store)?.is_none()
    {
      return Err(Error::NotFound(format!("pub {pub_id}")));
    }

    let event = self.store.insert_event(input).await.map_err(Error::from_store)?;
    tracing::info!(
      event_id = %event.event_id,
      participant_id = %event.participant_id,
      kind = event.kind.as_str(),
      tier = ?event.tier,
      "recorded event"
    );
    Ok(event)
  }

  /// Events for one participant, optionally narrowed to one pub, in append
  /// order.
  pub async fn events_for(
    &self,
    participant_id: Uuid,
    pub_id: Option<Uuid>,
  ) -> Result<Vec<Event>> {
    self
      .store
      .select_events(EventFilter { participant_id: Some(participant_id), pub_id })
      .await
      .map_err(Error::from_store)
  }

  /// The whole ledger, in append order.
  pub async fn all_events(&self) -> Result<Vec<Event>> {
    self
      .store
      .select_events(EventFilter::default())
      .await
      .map_err(Error::from_store)
  }
}
