//! Players for real rounds.
//!
//! The engine only knows strategy traits; this crate supplies the
//! implementations people actually play against: reasoning-backed strategies
//! over a chat endpoint, queue-backed human players, card generation, and
//! transcript rendering. The `taboo` binary wires them together.

pub mod cards;
pub mod config;
pub mod human;
pub mod llm;
pub mod render;
