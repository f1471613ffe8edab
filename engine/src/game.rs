//! Round coordinator: owns the log, launches the agents, detects the end.
//!
//! Termination policy (documented, not incidental): the coordinator scans
//! the log strictly in index order from its own cursor and the *first*
//! qualifying event ends the round, even if a later event in the same batch
//! would name a different outcome. An incorrect judgment never terminates
//! anything.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::error::GameError;
use crate::events::{EndReason, Event, SystemKind};
use crate::players::{Player, Role};
use crate::session::Session;

/// One complete round from construction to the terminal end event.
pub struct Game {
    session: Arc<Session>,
    players: Vec<Arc<dyn Player>>,
    duration: Duration,
}

fn validate_roles(players: &[Arc<dyn Player>]) -> Result<(), GameError> {
    let count = |role: Role| players.iter().filter(|p| p.role() == role).count();

    let cluers = count(Role::Cluer);
    if cluers != 1 {
        return Err(GameError::CluerCount(cluers));
    }
    let buzzers = count(Role::Buzzer);
    if buzzers != 1 {
        return Err(GameError::BuzzerCount(buzzers));
    }
    let judges = count(Role::Judge);
    if judges != 1 {
        return Err(GameError::JudgeCount(judges));
    }
    if count(Role::Guesser) < 1 {
        return Err(GameError::NoGuessers);
    }
    Ok(())
}

/// Reason and winner if `event` matches a terminal predicate.
fn terminal_outcome(event: &Event) -> Option<(EndReason, Option<String>)> {
    match event {
        Event::Buzzer { allowed: false, .. } => Some((EndReason::Buzzed, None)),
        Event::Judge {
            is_correct: true,
            by,
            ..
        } => Some((EndReason::Correct, by.clone())),
        Event::System {
            event: SystemKind::Timeout,
            ..
        } => Some((EndReason::Timeout, None)),
        _ => None,
    }
}

impl Game {
    /// Validate the role composition (exactly one cluer, buzzer and judge,
    /// at least one guesser), build the shared session, and join every
    /// player to it. Fails fast: no agent task exists on error.
    pub fn new(
        target: &str,
        taboo_words: &[String],
        players: Vec<Arc<dyn Player>>,
        duration: Duration,
    ) -> Result<Self, GameError> {
        validate_roles(&players)?;
        let session = Session::new(target, taboo_words);
        for player in &players {
            player.join(Arc::clone(&session));
        }
        Ok(Self {
            session,
            players,
            duration,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Append an event, visible to every waiter.
    pub fn publish(&self, event: Event) -> bool {
        self.session.publish(event)
    }

    /// Snapshot copy of the log at call time.
    pub fn history(&self) -> Vec<Event> {
        self.session.history()
    }

    /// Drive the round to completion and return the full history.
    ///
    /// Launches one loop per player plus the deadline timer, then scans the
    /// log for the first terminal event. On detection: seal the log with the
    /// end marker, drain every agent's in-flight work, and only then cancel
    /// the loops, treating cancellation as a normal silent outcome.
    pub async fn run(self) -> Vec<Event> {
        info!(
            target = %self.session.target(),
            players = self.players.len(),
            duration_secs = self.duration.as_secs(),
            "round started"
        );

        let mut loops = JoinSet::new();
        for player in &self.players {
            let player = Arc::clone(player);
            loops.spawn(async move { player.play().await });
        }
        let deadline_session = Arc::clone(&self.session);
        let duration = self.duration;
        loops.spawn(async move {
            tokio::time::sleep(duration).await;
            let _ = deadline_session.publish(Event::timeout());
        });

        let mut cursor = self.session.log().cursor(0);
        'scan: loop {
            for event in cursor.next_batch().await {
                if let Some((reason, winner)) = terminal_outcome(&event) {
                    self.session.finish(reason, winner);
                    break 'scan;
                }
            }
        }

        // The log is sealed, so no append can land after the end marker; now
        // drain in-flight decisions before the loops themselves go away.
        for player in &self.players {
            debug!(player = player.name(), "stopping");
            player.stop().await;
        }
        loops.shutdown().await;

        self.session.history()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EndReason;

    #[test]
    fn terminal_predicates() {
        assert_eq!(
            terminal_outcome(&Event::buzz("fruit", Some("taboo".into()))),
            Some((EndReason::Buzzed, None))
        );
        assert_eq!(terminal_outcome(&Event::buzz("hint", None)), None);
        assert_eq!(
            terminal_outcome(&Event::verdict("apple", true, Some("p1".into()))),
            Some((EndReason::Correct, Some("p1".into())))
        );
        assert_eq!(terminal_outcome(&Event::verdict("pear", false, None)), None);
        assert_eq!(
            terminal_outcome(&Event::timeout()),
            Some((EndReason::Timeout, None))
        );
        assert_eq!(
            terminal_outcome(&Event::end(EndReason::Timeout, None)),
            None
        );
        assert_eq!(terminal_outcome(&Event::clue("hint")), None);
    }
}
