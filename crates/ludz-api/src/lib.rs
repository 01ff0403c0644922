//! JSON REST API for Ludz.
//!
//! Exposes an axum [`Router`] backed by any [`ludz_core::store::StagStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", ludz_api::api_router(state.clone()))
//! ```

pub mod error;
pub mod events;
pub mod participants;
pub mod pubs;
pub mod rolls;
pub mod standings;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use ludz_core::{
  catalog::Catalog, draw::Randomizer, ledger::Ledger, roster::Roster, score::Scorer,
  store::StagStore,
};

pub use error::ApiError;

/// The engine, wired to one shared store, as seen by the handlers.
pub struct ApiState<S> {
  pub roster:           Roster<S>,
  pub ledger:           Ledger<S>,
  pub scorer:           Scorer<S>,
  pub randomizer:       Arc<Randomizer>,
  /// Separator between name and codename in bulk registration text.
  pub roster_delimiter: char,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      roster:           self.roster.clone(),
      ledger:           self.ledger.clone(),
      scorer:           self.scorer.clone(),
      randomizer:       self.randomizer.clone(),
      roster_delimiter: self.roster_delimiter,
    }
  }
}

impl<S: StagStore> ApiState<S> {
  /// Build every engine component around `store` and `catalog`, with an
  /// OS-seeded randomizer and `;` as the roster delimiter.
  pub fn new(store: Arc<S>, catalog: Arc<Catalog>) -> Self {
    Self::with_randomizer(store, Arc::new(Randomizer::new(catalog)))
  }

  pub fn with_randomizer(store: Arc<S>, randomizer: Arc<Randomizer>) -> Self {
    Self {
      roster: Roster::new(store.clone()),
      ledger: Ledger::new(store.clone()),
      scorer: Scorer::new(store),
      randomizer,
      roster_delimiter: ';',
    }
  }

  pub fn with_delimiter(mut self, delimiter: char) -> Self {
    self.roster_delimiter = delimiter;
    self
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: StagStore + 'static,
{
  Router::new()
    .route("/catalog", get(rolls::catalog::<S>))
    // Participants
    .route("/participants", get(participants::list::<S>).post(participants::create::<S>))
    .route("/participants/bulk", post(participants::bulk::<S>))
    .route("/participants/{id}", get(participants::get_one::<S>))
    .route("/participants/{id}/score", get(standings::score::<S>))
    .route("/participants/{id}/history", get(standings::history::<S>))
    // Pubs
    .route("/pubs", get(pubs::list::<S>).post(pubs::create::<S>))
    .route("/pubs/{id}", get(pubs::get_one::<S>))
    .route("/pubs/{id}/rules", get(pubs::rules::<S>).post(pubs::add_rule::<S>))
    .route("/pubs/{id}/rules/roll", post(pubs::roll_rule::<S>))
    // Rolls
    .route("/challenges/roll", post(rolls::roll_challenge::<S>))
    .route("/forfeits/roll", post(rolls::roll_forfeit::<S>))
    // Ledger
    .route("/events", get(events::list::<S>).post(events::create::<S>))
    // Leaderboard
    .route("/leaderboard", get(standings::leaderboard::<S>))
    .with_state(state)
}
