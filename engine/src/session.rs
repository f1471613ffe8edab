//! Shared state of one round: the card, the log, and the stop flag.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::events::{EndReason, Event};
use crate::log::EventLog;

/// State shared by reference between the coordinator and every agent.
///
/// The stop flag is single-writer (the coordinator) and monotone: it flips
/// false→true exactly once per round, never back.
pub struct Session {
    target: String,
    taboo_words: Vec<String>,
    log: Arc<EventLog>,
    stop: CancellationToken,
}

impl Session {
    pub(crate) fn new(target: &str, taboo_words: &[String]) -> Arc<Self> {
        Arc::new(Self {
            target: target.trim().to_string(),
            taboo_words: taboo_words.iter().map(|w| w.trim().to_string()).collect(),
            log: Arc::new(EventLog::new()),
            stop: CancellationToken::new(),
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn taboo_words(&self) -> &[String] {
        &self.taboo_words
    }

    pub fn log(&self) -> &Arc<EventLog> {
        &self.log
    }

    /// Append an event, waking every waiter. Returns `false` (the event is
    /// dropped whole, never partially published) once the round has ended.
    pub fn publish(&self, event: Event) -> bool {
        let role = event.role_name();
        let accepted = self.log.append(event);
        if !accepted {
            debug!(role, "event dropped: round already ended");
        }
        accepted
    }

    /// Snapshot copy of the log at call time.
    pub fn history(&self) -> Vec<Event> {
        self.log.snapshot()
    }

    pub fn is_over(&self) -> bool {
        self.stop.is_cancelled()
    }

    /// Suspend until the round has ended.
    pub async fn finished(&self) {
        self.stop.cancelled().await;
    }

    /// Seal the log with the end marker and raise the stop flag.
    ///
    /// Crate-private: the coordinator is the only logic allowed to declare
    /// the round over. Returns `false` if the round already ended.
    pub(crate) fn finish(&self, reason: EndReason, winner: Option<String>) -> bool {
        let sealed = self.log.seal(Event::end(reason, winner.clone()));
        if sealed {
            self.stop.cancel();
            info!(%reason, winner = winner.as_deref().unwrap_or("none"), "round ended");
        }
        sealed
    }
}
