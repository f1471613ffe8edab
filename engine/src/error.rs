//! Construction-time errors.
//!
//! These fail fast, before any agent task starts; no partial session exists
//! after a constructor returns an error. Runtime strategy failures are plain
//! `anyhow` errors surfaced by the owning agent's loop, and cancellation is
//! [`crate::tasks::Cancelled`], which is deliberately not represented here.

use thiserror::Error;

/// A round could not be constructed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("a round needs exactly one cluer, found {0}")]
    CluerCount(usize),

    #[error("a round needs exactly one buzzer, found {0}")]
    BuzzerCount(usize),

    #[error("a round needs exactly one judge, found {0}")]
    JudgeCount(usize),

    #[error("a round needs at least one guesser")]
    NoGuessers,
}
