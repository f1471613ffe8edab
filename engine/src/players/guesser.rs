//! Guessers: produce guesses once at least one clue has been seen.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use super::{Player, Role, Seat};
use crate::events::Event;
use crate::session::Session;
use crate::strategy::{Guess, GuessSource, GuesserView};
use crate::tasks::Cancelled;

pub struct Guesser {
    seat: Seat,
    player_id: String,
    source: Arc<dyn GuessSource>,
}

impl Guesser {
    pub fn new(player_id: impl Into<String>, source: Arc<dyn GuessSource>) -> Self {
        let player_id = player_id.into();
        Self {
            seat: Seat::new(player_id.clone()),
            player_id,
            source,
        }
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }
}

/// Case-, whitespace- and punctuation-insensitive form of a guess, used to
/// suppress duplicates. Empty output means the guess was only noise.
pub(crate) fn normalize(guess: &str) -> String {
    guess
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl Player for Guesser {
    fn role(&self) -> Role {
        Role::Guesser
    }

    fn name(&self) -> &str {
        &self.player_id
    }

    fn join(&self, session: Arc<Session>) {
        self.seat.join(session);
    }

    async fn play(&self) {
        let session = Arc::clone(self.seat.session());

        // Never guess into pre-clue silence. A guesser joining mid-game
        // waits for the next clue on its own cursor; any clue already in the
        // snapshot counts as seen.
        let seen = session.history();
        if !seen.iter().any(|e| matches!(e, Event::Cluer { .. })) {
            let mut cursor = session.log().cursor(seen.len());
            loop {
                let event = tokio::select! {
                    _ = session.finished() => return,
                    event = cursor.next() => event,
                };
                if matches!(event, Event::Cluer { .. }) {
                    break;
                }
            }
        }

        let mut announced: HashSet<String> = HashSet::new();
        while !session.is_over() {
            let view = GuesserView {
                player_id: self.player_id.clone(),
                history: session.history(),
            };
            let source = Arc::clone(&self.source);
            match self
                .seat
                .tasks()
                .run(async move { source.next_guess(view).await })
                .await
            {
                Err(Cancelled) => return,
                Ok(Err(err)) => {
                    error!(player = self.name(), error = %err, "guess strategy failed; loop ends");
                    return;
                }
                Ok(Ok(Guess { guess, rationale })) => {
                    let key = normalize(&guess);
                    if key.is_empty() || !announced.insert(key) {
                        continue;
                    }
                    self.seat
                        .announce(Event::guess(&self.player_id, guess, rationale));
                }
            }
        }
    }

    async fn stop(&self) {
        self.seat.stop().await;
    }
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn normalize_collapses_case_whitespace_and_punctuation() {
        assert_eq!(normalize("Apple"), "apple");
        assert_eq!(normalize("  apple "), "apple");
        assert_eq!(normalize("apple!"), "apple");
        assert_eq!(normalize("New   York."), "new york");
    }

    #[test]
    fn normalize_reduces_noise_to_empty() {
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("?!"), "");
        assert_eq!(normalize(""), "");
    }
}
