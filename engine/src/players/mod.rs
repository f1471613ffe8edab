//! Role agents: polymorphic loops over the shared event log.
//!
//! Each role is an independent type behind the [`Player`] interface; the
//! coordinator depends only on the interface, never on a concrete variant.
//! Behavioral variation (human-driven, scripted, reasoning-backed) lives in
//! the strategy traits the roles consume, not in the roles themselves.

mod buzzer;
mod cluer;
mod guesser;
mod judge;

use std::fmt;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;

use crate::events::Event;
use crate::session::Session;
use crate::tasks::TaskSet;

pub use buzzer::Buzzer;
pub use cluer::Cluer;
pub use guesser::Guesser;
pub use judge::Judge;

/// The four roles of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Cluer,
    Buzzer,
    Guesser,
    Judge,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cluer => write!(f, "cluer"),
            Self::Buzzer => write!(f, "buzzer"),
            Self::Guesser => write!(f, "guesser"),
            Self::Judge => write!(f, "judge"),
        }
    }
}

/// Interface every role agent exposes to the coordinator.
#[async_trait]
pub trait Player: Send + Sync {
    fn role(&self) -> Role;

    /// Stable identifier, used in logs and in guess events.
    fn name(&self) -> &str;

    /// Bind this agent to exactly one session; required before `play()`.
    fn join(&self, session: Arc<Session>);

    /// The agent's main loop. Observes the stop condition at least once per
    /// log-wait wake and returns cleanly when the round has ended.
    async fn play(&self);

    /// Cooperative shutdown: cancel and drain any work this agent spawned.
    /// Idempotent; a no-op for agents with nothing in flight.
    async fn stop(&self) {}
}

/// Shared per-agent plumbing: the join-once session cell, the task registry,
/// and the announce helper.
pub(crate) struct Seat {
    name: String,
    session: OnceLock<Arc<Session>>,
    tasks: TaskSet,
}

impl Seat {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            session: OnceLock::new(),
            tasks: TaskSet::new(),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn join(&self, session: Arc<Session>) {
        if self.session.set(session).is_err() {
            panic!("player {} already joined a session", self.name);
        }
    }

    /// Panics if the agent has not joined a session yet; playing before
    /// `join()` is a programming error and must fail loudly.
    pub(crate) fn session(&self) -> &Arc<Session> {
        self.session
            .get()
            .unwrap_or_else(|| panic!("player {} has not joined a session; call join() first", self.name))
    }

    pub(crate) fn tasks(&self) -> &TaskSet {
        &self.tasks
    }

    /// Publish an event on behalf of this agent.
    pub(crate) fn announce(&self, event: Event) {
        let role = event.role_name();
        if self.session().publish(event) {
            tracing::debug!(player = %self.name, role, "announced");
        }
    }

    pub(crate) async fn stop(&self) {
        self.tasks.stop().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Event;

    #[test]
    #[should_panic(expected = "has not joined a session")]
    fn seat_fails_loudly_before_join() {
        let seat = Seat::new("loner");
        let _ = seat.session();
    }

    #[test]
    #[should_panic(expected = "already joined")]
    fn seat_rejects_a_second_join() {
        let seat = Seat::new("eager");
        let session = Session::new("apple", &[]);
        seat.join(Arc::clone(&session));
        seat.join(session);
    }

    #[test]
    fn announce_appends_to_the_session_log() {
        let seat = Seat::new("cluer");
        let session = Session::new("apple", &[]);
        seat.join(Arc::clone(&session));
        seat.announce(Event::clue("crunchy"));
        assert_eq!(session.history(), vec![Event::clue("crunchy")]);
    }
}
