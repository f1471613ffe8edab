//! The judge: rules on every guess against the target.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use super::{Player, Role, Seat};
use crate::events::Event;
use crate::session::Session;
use crate::strategy::GuessChecker;
use crate::tasks::Cancelled;

pub struct Judge {
    seat: Seat,
    checker: Arc<dyn GuessChecker>,
}

impl Judge {
    pub fn new(checker: Arc<dyn GuessChecker>) -> Self {
        Self {
            seat: Seat::new("judge"),
            checker,
        }
    }
}

#[async_trait]
impl Player for Judge {
    fn role(&self) -> Role {
        Role::Judge
    }

    fn name(&self) -> &str {
        self.seat.name()
    }

    fn join(&self, session: Arc<Session>) {
        self.seat.join(session);
    }

    async fn play(&self) {
        let session = Arc::clone(self.seat.session());
        let mut cursor = session.log().cursor(0);
        loop {
            let batch = tokio::select! {
                _ = session.finished() => return,
                batch = cursor.next_batch() => batch,
            };
            for event in batch {
                let Event::Guesser {
                    player_id, guess, ..
                } = event
                else {
                    continue;
                };
                let checker = Arc::clone(&self.checker);
                let target = session.target().to_string();
                let verdict = {
                    let guess = guess.clone();
                    self.seat
                        .tasks()
                        .run(async move { checker.check(target, guess).await })
                        .await
                };
                match verdict {
                    Err(Cancelled) => return,
                    Ok(Err(err)) => {
                        error!(player = self.name(), error = %err, "guess check failed; loop ends");
                        return;
                    }
                    Ok(Ok(is_correct)) => {
                        self.seat
                            .announce(Event::verdict(guess, is_correct, Some(player_id)));
                        if is_correct {
                            // A win leaves nothing to judge; the coordinator
                            // turns the verdict into the end of the round.
                            return;
                        }
                    }
                }
            }
        }
    }

    async fn stop(&self) {
        self.seat.stop().await;
    }
}
