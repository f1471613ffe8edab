//! Coordination core for asynchronous Taboo rounds.
//!
//! A round is a fixed set of role agents (one cluer, one buzzer, one judge,
//! one or more guessers) that only ever talk to each other through a shared
//! append-only event log. The coordinator owns the log, launches every agent
//! loop plus a deadline timer, and is the only piece of logic allowed to
//! declare the round over.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────┐  announce   ┌───────────┐  wait/next   ┌─────────────┐
//! │  Agents │────────────▶│ Event Log │─────────────▶│   Cursors   │
//! │ (roles) │             │ (sealed   │              │ (per-agent, │
//! └─────────┘             │  on end)  │              │  sinks, …)  │
//!      ▲                  └─────┬─────┘              └─────────────┘
//!      │ stop / drain           │ scan in log order
//! ┌────┴─────────┐              ▼
//! │ Coordinator  │◀── first terminal event wins
//! └──────────────┘
//! ```
//!
//! The main components:
//!
//! 1. **Event log** ([`log::EventLog`]): append-only, broadcast on append,
//!    atomically sealed with the terminal event exactly once.
//! 2. **Role agents** ([`players`]): loops over private cursors, producing
//!    derived events via pluggable decision strategies ([`strategy`]).
//! 3. **Cancellable task registry** ([`tasks::TaskSet`]): per-agent
//!    bookkeeping of in-flight decision calls, drained on `stop()`.
//! 4. **Coordinator** ([`game::Game`]): validates the role composition,
//!    supervises the loops, detects termination, tears everything down.

pub mod error;
pub mod events;
pub mod game;
pub mod log;
pub mod players;
pub mod session;
pub mod strategy;
pub mod tasks;

pub use error::GameError;
pub use events::{EndReason, Event, SystemKind};
pub use game::Game;
pub use log::{Cursor, EventLog};
pub use players::{Buzzer, Cluer, Guesser, Judge, Player, Role};
pub use session::Session;
pub use strategy::{
    BuzzRule, ClueSource, CluerView, ExactMatch, Guess, GuessChecker, GuessSource, GuesserView,
    TabooList,
};
pub use tasks::{Cancelled, TaskSet};
