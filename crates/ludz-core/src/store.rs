//! The `StagStore` trait: the storage collaborator behind the engine.
//!
//! The trait is implemented by storage backends (e.g. `ludz-store-sqlite`).
//! [`Roster`](crate::roster::Roster), [`Ledger`](crate::ledger::Ledger),
//! [`Scorer`](crate::score::Scorer) and [`EggGate`](crate::egg::EggGate) each
//! receive one shared instance at construction and depend on this
//! abstraction only.
//!
//! Backends deal in typed records. Validation and reference checks happen in
//! the engine; the backend only inserts and selects.

use std::future::Future;

use uuid::Uuid;

use crate::{
  egg::EasterEgg,
  event::{Event, EventFilter, NewEvent},
  participant::{NewParticipant, Participant, Pub, PubRule},
};

/// Error type returned by a [`StagStore`] backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// `true` when the backend refused a write because of a uniqueness
  /// constraint (two registrations racing for the same codename).
  fn is_conflict(&self) -> bool { false }
}

/// Abstraction over the hosted table store.
///
/// Writes are inserts only, except for the easter-egg flag
/// ([`StagStore::put_egg`], [`StagStore::unlock_egg`]). All methods return `Send` futures so the trait
/// can be used from axum handlers on a multi-threaded runtime.
pub trait StagStore: Send + Sync {
  type Error: StoreError;

  // ── Participants ──────────────────────────────────────────────────────

  /// Persist a participant; the store assigns id and `created_at`.
  fn insert_participant(
    &self,
    input: NewParticipant,
  ) -> impl Future<Output = Result<Participant, Self::Error>> + Send + '_;

  fn get_participant(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Participant>, Self::Error>> + Send + '_;

  /// All participants, in no particular order.
  fn list_participants(
    &self,
  ) -> impl Future<Output = Result<Vec<Participant>, Self::Error>> + Send + '_;

  // ── Pubs ──────────────────────────────────────────────────────────────

  fn insert_pub(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Pub, Self::Error>> + Send + '_;

  fn get_pub(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Pub>, Self::Error>> + Send + '_;

  fn list_pubs(&self) -> impl Future<Output = Result<Vec<Pub>, Self::Error>> + Send + '_;

  // ── Pub rules ─────────────────────────────────────────────────────────

  fn insert_pub_rule(
    &self,
    pub_id: Uuid,
    text: String,
  ) -> impl Future<Output = Result<PubRule, Self::Error>> + Send + '_;

  /// Rules for one pub, in append order.
  fn select_pub_rules(
    &self,
    pub_id: Uuid,
  ) -> impl Future<Output = Result<Vec<PubRule>, Self::Error>> + Send + '_;

  // ── Events (append-only) ──────────────────────────────────────────────

  /// Append one event; the store assigns id and `recorded_at`.
  fn insert_event(
    &self,
    input: NewEvent,
  ) -> impl Future<Output = Result<Event, Self::Error>> + Send + '_;

  /// Events matching `filter`, in append order.
  fn select_events(
    &self,
    filter: EventFilter,
  ) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send + '_;

  // ── Easter eggs ───────────────────────────────────────────────────────

  fn get_egg(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Option<EasterEgg>, Self::Error>> + Send + '_;

  /// Insert or overwrite the flag for `name`.
  fn put_egg(
    &self,
    egg: EasterEgg,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Flip `name` from unsolved to solved as one conditional write.
  /// `false` when it was already solved.
  fn unlock_egg(
    &self,
    name: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// [`StagStore::unlock_egg`] and [`StagStore::insert_event`] in one
  /// transaction. `None`, with nothing written, when the egg was already
  /// solved.
  fn unlock_egg_with_event(
    &self,
    name: String,
    reward: NewEvent,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + '_;
}
