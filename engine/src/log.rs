//! Append-only event log with blocking readers.
//!
//! The log is the only shared mutable resource in a round. Producers append
//! under a mutex; the new length is published through a `tokio::sync::watch`
//! channel while the lock is still held, so observed lengths are monotone and
//! a waiter can never miss a wakeup: `watch`'s `wait_for` re-checks the
//! length predicate on every change.
//!
//! Sealing is the termination mechanism. [`EventLog::seal`] atomically
//! appends the terminal event and closes the log; it succeeds exactly once
//! per log, and every later [`EventLog::append`] is rejected under the same
//! lock. That single primitive carries both halves of the end-of-round
//! contract: exactly one end marker, and nothing after it.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use futures::Stream;
use tokio::sync::watch;

use crate::events::Event;

#[derive(Default)]
struct LogState {
    events: Vec<Event>,
    sealed: bool,
}

/// Shared append-only sequence of [`Event`]s.
pub struct EventLog {
    state: Mutex<LogState>,
    len_tx: watch::Sender<usize>,
}

impl EventLog {
    pub fn new() -> Self {
        let (len_tx, _) = watch::channel(0);
        Self {
            state: Mutex::new(LogState::default()),
            len_tx,
        }
    }

    /// Append an event at the next index and wake every waiter.
    ///
    /// Returns `false` (dropping the event, with no other side effects) if
    /// the log has been sealed.
    pub fn append(&self, event: Event) -> bool {
        let mut state = self.state.lock().expect("event log lock poisoned");
        if state.sealed {
            return false;
        }
        state.events.push(event);
        self.len_tx.send_replace(state.events.len());
        true
    }

    /// Append the terminal event and close the log.
    ///
    /// Returns `true` exactly once per log; a second seal is rejected just
    /// like any other post-seal append.
    pub fn seal(&self, event: Event) -> bool {
        let mut state = self.state.lock().expect("event log lock poisoned");
        if state.sealed {
            return false;
        }
        state.events.push(event);
        state.sealed = true;
        self.len_tx.send_replace(state.events.len());
        true
    }

    pub fn len(&self) -> usize {
        *self.len_tx.borrow()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_sealed(&self) -> bool {
        self.state.lock().expect("event log lock poisoned").sealed
    }

    /// Value-semantics copy of the whole log.
    pub fn snapshot(&self) -> Vec<Event> {
        self.state
            .lock()
            .expect("event log lock poisoned")
            .events
            .clone()
    }

    /// Copy of every event at index `start` or later.
    pub fn tail(&self, start: usize) -> Vec<Event> {
        let state = self.state.lock().expect("event log lock poisoned");
        state.events.get(start..).unwrap_or_default().to_vec()
    }

    /// Suspend until the log is longer than `index`, returning the new
    /// length. Immune to missed-wakeup races: an append that lands between
    /// the caller's length snapshot and this call is still observed.
    pub async fn wait_longer_than(&self, index: usize) -> usize {
        let mut rx = self.len_tx.subscribe();
        let len = rx
            .wait_for(|len| *len > index)
            .await
            .expect("event log notifier closed while the log is alive");
        *len
    }

    /// A private read position over this log, starting at `start`.
    pub fn cursor(self: &Arc<Self>, start: usize) -> Cursor {
        Cursor {
            log: Arc::clone(self),
            pos: start,
            pending: VecDeque::new(),
        }
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

/// A lazy, unbounded reader over an [`EventLog`].
///
/// The sequence never completes on its own; consumers stop pulling once they
/// observe whatever event they were waiting for (typically the end marker).
pub struct Cursor {
    log: Arc<EventLog>,
    pos: usize,
    pending: VecDeque<Event>,
}

impl Cursor {
    /// Index of the next event this cursor will yield.
    pub fn index(&self) -> usize {
        self.pos - self.pending.len()
    }

    /// Wait for and return the next batch of unseen events, in log order.
    pub async fn next_batch(&mut self) -> Vec<Event> {
        if !self.pending.is_empty() {
            return self.pending.drain(..).collect();
        }
        self.log.wait_longer_than(self.pos).await;
        let batch = self.log.tail(self.pos);
        self.pos += batch.len();
        batch
    }

    /// Wait for and return the next unseen event.
    pub async fn next(&mut self) -> Event {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return event;
            }
            self.log.wait_longer_than(self.pos).await;
            let batch = self.log.tail(self.pos);
            self.pos += batch.len();
            self.pending.extend(batch);
        }
    }

    /// Adapt this cursor into an infinite [`Stream`] of events.
    pub fn into_stream(self) -> impl Stream<Item = Event> {
        futures::stream::unfold(self, |mut cursor| async move {
            let event = cursor.next().await;
            Some((event, cursor))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EndReason, Event};

    fn clue(text: &str) -> Event {
        Event::clue(text)
    }

    #[test]
    fn append_grows_monotonically() {
        let log = EventLog::new();
        assert!(log.is_empty());
        assert!(log.append(clue("a")));
        assert!(log.append(clue("b")));
        assert_eq!(log.len(), 2);
        assert_eq!(log.snapshot().len(), 2);
    }

    #[test]
    fn snapshot_is_independent_copy() {
        let log = EventLog::new();
        log.append(clue("a"));
        let mut first = log.snapshot();
        first.push(clue("bogus"));
        assert_eq!(log.len(), 1);
        assert_eq!(log.snapshot().len(), 1);
    }

    #[test]
    fn seal_succeeds_exactly_once() {
        let log = EventLog::new();
        log.append(clue("a"));
        assert!(log.seal(Event::end(EndReason::Buzzed, None)));
        assert!(!log.seal(Event::end(EndReason::Timeout, None)));
        assert!(!log.append(clue("late")));
        assert!(log.is_sealed());

        let events = log.snapshot();
        assert_eq!(events.len(), 2);
        assert!(events.last().unwrap().is_end());
    }

    #[tokio::test]
    async fn wait_observes_append_before_the_wait_started() {
        let log = EventLog::new();
        log.append(clue("early"));
        // The append already happened; the wait must return immediately.
        assert_eq!(log.wait_longer_than(0).await, 1);
    }

    #[tokio::test]
    async fn wait_is_woken_by_a_later_append() {
        let log = Arc::new(EventLog::new());
        let waiter = {
            let log = Arc::clone(&log);
            tokio::spawn(async move { log.wait_longer_than(0).await })
        };
        tokio::task::yield_now().await;
        log.append(clue("a"));
        assert_eq!(waiter.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn cursor_yields_prefix_consistent_order() {
        let log = Arc::new(EventLog::new());
        log.append(clue("a"));
        log.append(clue("b"));

        let mut cursor = log.cursor(0);
        assert_eq!(cursor.next().await, clue("a"));
        assert_eq!(cursor.next().await, clue("b"));
        assert_eq!(cursor.index(), 2);

        log.append(clue("c"));
        assert_eq!(cursor.next().await, clue("c"));
    }

    #[tokio::test]
    async fn cursor_restarts_from_any_index() {
        let log = Arc::new(EventLog::new());
        log.append(clue("a"));
        log.append(clue("b"));
        log.append(clue("c"));

        let mut cursor = log.cursor(2);
        assert_eq!(cursor.next().await, clue("c"));
    }

    #[tokio::test]
    async fn next_batch_returns_everything_unseen() {
        let log = Arc::new(EventLog::new());
        log.append(clue("a"));
        log.append(clue("b"));

        let mut cursor = log.cursor(0);
        assert_eq!(cursor.next_batch().await, vec![clue("a"), clue("b")]);

        log.append(clue("c"));
        assert_eq!(cursor.next_batch().await, vec![clue("c")]);
    }
}
