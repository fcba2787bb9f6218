//! # Court Rotation
//!
//! Fair rotation of players over the courts of a multi-court racket sport session.
//!
//! Each call to [`generate_next_round`](crate::orchestrator::generate_next_round) takes the
//! roster, the rounds played so far and the number of rackets and courts, and produces the next
//! round with updated player statistics. Three things are balanced:
//! - **Playing time**: whoever has played least, and rested longest, plays next.
//! - **Partners**: teams are split to avoid pairing the same players again.
//! - **Opponents and courts**: candidate rounds are scored against past meetings and past court
//!   usage, and the best one is kept.
//!
//! # Documentation Overview
//!
//! - For the round generation steps, see the [`orchestrator`] module.
//! - For how players are spread over courts, see [`capacity`] and [`assignment_search`].
//! - For team splits and the scoring weights, see [`team_split`] and [`scoring`].
//! - For equipment counts and search settings, see
//!   [`Configuration`](crate::configuration::Configuration).
//! - For a ready-made, serializable session state, see [`Session`](crate::session::Session).
//! - For the CSV table of a session, see [`export`].
//!
//! # Usage Example
//!
//! ```
//! use court_rotation::prelude::*;
//!
//! let mut session = Session::new(&Configuration::new().with_rackets(8).with_courts(2));
//! for name in ["Ana", "Ben", "Cleo", "Dan", "Eve", "Finn", "Gus", "Hana"] {
//!     session.add_player(name);
//! }
//!
//! let round = session.generate_next_round(&mut ThreadRandom).unwrap();
//! assert_eq!(round.matches.len(), 2);
//! assert!(round.resting.is_empty());
//! ```
//!
//! The engine is synchronous and keeps no global state. Callers serialize calls on a session
//! and decide how to store and display it.
#![warn(missing_docs)]

pub mod assignment_search;
pub mod capacity;
pub mod configuration;
pub mod export;
pub mod history;
pub mod logger;
pub mod orchestrator;
pub mod player;
pub mod rng;
pub mod round;
pub mod scoring;
pub mod session;
pub mod team_split;

pub use anyhow;

/// Commonly used types and traits for quick access.
///
/// Import this prelude to get started easily:
/// ```rust
/// use court_rotation::prelude::*;
/// ```
///
/// Includes:
/// - [`Configuration`](crate::configuration::Configuration)
/// - [`Session`](crate::session::Session)
/// - the engine entry point and its records
/// - the random sources
pub mod prelude {
    pub use crate::configuration::Configuration;
    pub use crate::orchestrator::{generate_next_round, NextRound, RoundNotGenerated};
    pub use crate::player::Player;
    pub use crate::rng::{RandomSource, SeededRandom, ThreadRandom};
    pub use crate::round::{Match, Round};
    pub use crate::scoring::ScoringWeights;
    pub use crate::session::Session;
}
