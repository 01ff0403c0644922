//! One-shot Easter-egg flags.
//!
//! A flag starts unsolved, can be unlocked exactly once, and can be forced
//! either way by an admin. This is party decoration, not access control.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  catalog::Tier,
  event::{Event, NewEvent},
  store::StagStore,
};

/// The egg shipped with the stock deployment.
pub const LEVEL3_FORFEIT: &str = "Level3Forfeit";

/// Description recorded for the forfeit an unlocked egg hands out.
pub const EGG_FORFEIT_DESCRIPTION: &str = "Secret Easter Egg Forfeit";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EasterEgg {
  pub name:   String,
  pub solved: bool,
}

pub struct EggGate<S> {
  store: Arc<S>,
}

impl<S> Clone for EggGate<S> {
  fn clone(&self) -> Self { Self { store: self.store.clone() } }
}

impl<S: StagStore> EggGate<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Current flag; an egg never written is unsolved.
  pub async fn status(&self, name: &str) -> Result<EasterEgg> {
    let egg = self.store.get_egg(name.to_owned()).await.map_err(Error::from_store)?;
    Ok(egg.unwrap_or_else(|| EasterEgg { name: name.to_owned(), solved: false }))
  }

  /// Mark the egg solved. [`Error::Conflict`] if someone got there first.
  pub async fn unlock(&self, name: &str) -> Result<EasterEgg> {
    if !self.store.unlock_egg(name.to_owned()).await.map_err(Error::from_store)? {
      return Err(already_used(name));
    }
    tracing::info!(egg = name, "easter egg unlocked");
    Ok(EasterEgg { name: name.to_owned(), solved: true })
  }

  /// Unlock the egg and award `participant_id` the tier-3 reward forfeit.
  ///
  /// Both happen or neither does: [`Error::NotFound`] for an unknown
  /// participant and [`Error::Conflict`] for a solved egg leave the flag and
  /// the ledger untouched.
  pub async fn claim(&self, name: &str, participant_id: Uuid) -> Result<Event> {
    if self
      .store
      .get_participant(participant_id)
      .await
      .map_err(Error::from_store)?
      .is_none()
    {
      return Err(Error::NotFound(format!("participant {participant_id}")));
    }

    let reward = NewEvent::forfeit(participant_id, Tier::Tier3, EGG_FORFEIT_DESCRIPTION);
    let event = self
      .store
      .unlock_egg_with_event(name.to_owned(), reward)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| already_used(name))?;

    tracing::info!(
      egg = name,
      %participant_id,
      event_id = %event.event_id,
      "easter egg claimed"
    );
    Ok(event)
  }

  /// Admin override: set the flag unconditionally.
  pub async fn set(&self, name: &str, solved: bool) -> Result<EasterEgg> {
    if name.trim().is_empty() {
      return Err(Error::InvalidArgument("egg name is blank".into()));
    }
    let egg = EasterEgg { name: name.to_owned(), solved };
    self.store.put_egg(egg.clone()).await.map_err(Error::from_store)?;
    tracing::warn!(egg = name, solved, "easter egg overridden");
    Ok(egg)
  }
}

fn already_used(name: &str) -> Error {
  Error::Conflict(format!("easter egg {name:?} has already been used"))
}
