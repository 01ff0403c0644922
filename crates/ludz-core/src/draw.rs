//! The randomizer: uniform draws from catalog partitions.
//!
//! Every draw is independent: there is no memory of earlier results and
//! repeats are expected.

use std::sync::{Arc, Mutex};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
  Error, Result,
  catalog::{Catalog, CatalogEntry, Tier},
  participant::Participant,
};

/// Draws challenges, forfeits, pub rules and victims.
///
/// The RNG is held behind a mutex for the duration of a single draw only, so
/// one `Randomizer` can be shared across request handlers.
pub struct Randomizer {
  catalog: Arc<Catalog>,
  rng:     Mutex<StdRng>,
}

impl Randomizer {
  /// A randomizer seeded from the operating system.
  pub fn new(catalog: Arc<Catalog>) -> Self {
    Self { catalog, rng: Mutex::new(StdRng::from_os_rng()) }
  }

  /// A deterministic randomizer for tests.
  pub fn with_seed(catalog: Arc<Catalog>, seed: u64) -> Self {
    Self { catalog, rng: Mutex::new(StdRng::seed_from_u64(seed)) }
  }

  pub fn catalog(&self) -> &Catalog { &self.catalog }

  /// Uniform choice over all hourly challenges.
  pub fn draw_challenge(&self) -> Result<String> {
    let challenge = self.pick(self.catalog.challenges(), "challenge catalog")?;
    tracing::debug!(%challenge, "drew challenge");
    Ok(challenge.clone())
  }

  /// Uniform choice over the forfeits of `tier`.
  pub fn draw_forfeit(&self, tier: Tier) -> Result<CatalogEntry> {
    let entry = self.pick(self.catalog.forfeits(tier), "forfeit tier")?;
    tracing::debug!(%tier, title = %entry.title, "drew forfeit");
    Ok(entry.clone())
  }

  /// Uniform choice over the standard pub rules.
  pub fn draw_pub_rule(&self) -> Result<String> {
    let rule = self.pick(self.catalog.pub_rules(), "pub rule catalog")?;
    tracing::debug!(%rule, "drew pub rule");
    Ok(rule.clone())
  }

  /// Uniform choice of who has to do the next hourly challenge.
  pub fn pick_participant(&self, participants: &[Participant]) -> Result<Participant> {
    let chosen = self.pick(participants, "participant list")?;
    tracing::debug!(codename = %chosen.codename, "picked participant");
    Ok(chosen.clone())
  }

  fn pick<'a, T>(&self, items: &'a [T], what: &str) -> Result<&'a T> {
    if items.is_empty() {
      return Err(Error::InvalidArgument(format!("cannot draw from an empty {what}")));
    }
    // A poisoned lock still holds a usable RNG.
    let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
    Ok(&items[rng.random_range(0..items.len())])
  }
}
