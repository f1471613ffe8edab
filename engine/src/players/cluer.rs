//! The cluer: produces hints toward the target word.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use super::{Player, Role, Seat};
use crate::events::Event;
use crate::session::Session;
use crate::strategy::{ClueSource, CluerView};
use crate::tasks::Cancelled;

pub struct Cluer {
    seat: Seat,
    source: Arc<dyn ClueSource>,
}

impl Cluer {
    pub fn new(source: Arc<dyn ClueSource>) -> Self {
        Self {
            seat: Seat::new("cluer"),
            source,
        }
    }
}

#[async_trait]
impl Player for Cluer {
    fn role(&self) -> Role {
        Role::Cluer
    }

    fn name(&self) -> &str {
        self.seat.name()
    }

    fn join(&self, session: Arc<Session>) {
        self.seat.join(session);
    }

    async fn play(&self) {
        let session = Arc::clone(self.seat.session());
        while !session.is_over() {
            let view = CluerView {
                target: session.target().to_string(),
                taboo_words: session.taboo_words().to_vec(),
                history: session.history(),
            };
            let source = Arc::clone(&self.source);
            match self
                .seat
                .tasks()
                .run(async move { source.next_clue(view).await })
                .await
            {
                Err(Cancelled) => return,
                Ok(Err(err)) => {
                    error!(player = self.name(), error = %err, "clue strategy failed; loop ends");
                    return;
                }
                Ok(Ok(clue)) => self.seat.announce(Event::clue(clue)),
            }
        }
    }

    async fn stop(&self) {
        self.seat.stop().await;
    }
}
