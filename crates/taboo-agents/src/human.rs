//! Queue-backed strategies for human players.
//!
//! A human player is an ordinary strategy whose decisions arrive over an
//! unbounded channel. `next_*` suspends on the queue, so the owning agent
//! can cancel a human who never answers just like a slow model call.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;

use taboo_engine::strategy::{ClueSource, CluerView, Guess, GuessSource, GuesserView};

/// Cloneable handle for feeding decisions into a human strategy.
pub struct Submit<T> {
    tx: UnboundedSender<T>,
}

// Manual impl: deriving would bound T: Clone, which the sender does not need.
impl<T> Clone for Submit<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> Submit<T> {
    /// Queue one decision. Returns `false` if the player is gone.
    pub fn submit(&self, item: T) -> bool {
        self.tx.send(item).is_ok()
    }
}

pub struct HumanCluer {
    rx: Mutex<UnboundedReceiver<String>>,
}

impl HumanCluer {
    pub fn new() -> (Self, Submit<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx: Mutex::new(rx) }, Submit { tx })
    }
}

#[async_trait]
impl ClueSource for HumanCluer {
    async fn next_clue(&self, _view: CluerView) -> Result<String> {
        self.rx
            .lock()
            .await
            .recv()
            .await
            .ok_or_else(|| anyhow!("clue input closed"))
    }
}

pub struct HumanGuesser {
    rx: Mutex<UnboundedReceiver<Guess>>,
}

impl HumanGuesser {
    pub fn new() -> (Self, Submit<Guess>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx: Mutex::new(rx) }, Submit { tx })
    }
}

#[async_trait]
impl GuessSource for HumanGuesser {
    async fn next_guess(&self, _view: GuesserView) -> Result<Guess> {
        self.rx
            .lock()
            .await
            .recv()
            .await
            .ok_or_else(|| anyhow!("guess input closed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluer_view() -> CluerView {
        CluerView {
            target: "apple".into(),
            taboo_words: vec![],
            history: vec![],
        }
    }

    #[tokio::test]
    async fn submitted_clues_come_out_in_order() {
        let (cluer, submit) = HumanCluer::new();
        assert!(submit.submit("crunchy".into()));
        assert!(submit.submit("orchard".into()));

        assert_eq!(cluer.next_clue(cluer_view()).await.unwrap(), "crunchy");
        assert_eq!(cluer.next_clue(cluer_view()).await.unwrap(), "orchard");
    }

    #[tokio::test]
    async fn dropped_handle_surfaces_as_an_error() {
        let (cluer, submit) = HumanCluer::new();
        drop(submit);
        assert!(cluer.next_clue(cluer_view()).await.is_err());
    }

    #[tokio::test]
    async fn cloned_handles_feed_the_same_guesser() {
        let (guesser, submit) = HumanGuesser::new();
        let other = submit.clone();
        other.submit(Guess::new("apple"));

        let view = GuesserView {
            player_id: "p1".into(),
            history: vec![],
        };
        assert_eq!(guesser.next_guess(view).await.unwrap().guess, "apple");
    }
}
