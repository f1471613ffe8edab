//! The buzzer: rules on every clue against the taboo list.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use super::{Player, Role, Seat};
use crate::events::Event;
use crate::session::Session;
use crate::strategy::BuzzRule;
use crate::tasks::Cancelled;

pub struct Buzzer {
    seat: Seat,
    rule: Arc<dyn BuzzRule>,
}

impl Buzzer {
    pub fn new(rule: Arc<dyn BuzzRule>) -> Self {
        Self {
            seat: Seat::new("buzzer"),
            rule,
        }
    }
}

#[async_trait]
impl Player for Buzzer {
    fn role(&self) -> Role {
        Role::Buzzer
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
                let Event::Cluer { clue } = event else {
                    continue;
                };
                let rule = Arc::clone(&self.rule);
                let taboo_words = session.taboo_words().to_vec();
                let decision = {
                    let clue = clue.clone();
                    self.seat
                        .tasks()
                        .run(async move { rule.violates(clue, taboo_words).await })
                        .await
                };
                match decision {
                    Err(Cancelled) => return,
                    Ok(Err(err)) => {
                        error!(player = self.name(), error = %err, "buzz rule failed; loop ends");
                        return;
                    }
                    Ok(Ok(reason)) => self.seat.announce(Event::buzz(clue, reason)),
                }
            }
        }
    }

    async fn stop(&self) {
        self.seat.stop().await;
    }
}
