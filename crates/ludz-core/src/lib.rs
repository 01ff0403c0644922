//! Core types and engine for Ludz, the stag-night challenge and forfeit
//! tracker.
//!
//! This crate is free of HTTP and database dependencies. The engine pieces
//! ([`roster::Roster`], [`ledger::Ledger`], [`score::Scorer`],
//! [`egg::EggGate`]) are generic over a [`store::StagStore`] backend and
//! share one instance of it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod catalog;
pub mod draw;
pub mod egg;
pub mod error;
pub mod event;
pub mod ledger;
pub mod participant;
pub mod roster;
pub mod score;
pub mod store;

pub use error::{Error, Result};
