//! Game cards: a target word plus the taboo words that make it hard.

use anyhow::Result;
use serde::Deserialize;

use crate::llm::ChatClient;

const CARD_RULES: &str = "You are creating a game card for the game Taboo. Each \
    card has a target word and a list of 5 taboo words. One player (the cluer) \
    will try to get the others to guess the target word by giving clues, but \
    cannot use any taboo word, or they lose. The taboo words should be the most \
    obvious clues for the target, so the cluer has to be creative. For example, \
    for the target \"apple\" the taboo words might be [\"fruit\", \"red\", \
    \"pie\", \"tree\", \"juice\"].";

#[derive(Debug, Clone, Deserialize)]
pub struct Card {
    pub target: String,
    pub taboo_words: Vec<String>,
}

impl Card {
    pub fn new(target: impl Into<String>, taboo_words: Vec<String>) -> Self {
        Self {
            target: target.into(),
            taboo_words,
        }
    }

    /// Let the model invent both the target and its taboo words.
    pub async fn generate(client: &ChatClient) -> Result<Card> {
        let system = format!(
            "{CARD_RULES} Answer with JSON only: \
             {{\"target\": \"...\", \"taboo_words\": [\"...\"]}}"
        );
        client
            .chat_json(
                &client.config().model,
                2_000,
                &system,
                "Create one interesting card.",
            )
            .await
    }

    /// Taboo words for a caller-chosen target.
    pub async fn for_target(client: &ChatClient, target: &str) -> Result<Card> {
        let system = format!(
            "{CARD_RULES} You will be given the target word. Answer with JSON \
             only: {{\"target\": \"...\", \"taboo_words\": [\"...\"]}}"
        );
        let user = format!("Target word: {target}");
        let card: Card = client
            .chat_json(&client.config().model, 2_000, &system, &user)
            .await?;
        // The model sometimes restates the target with different casing; the
        // caller's spelling wins.
        Ok(Card::new(target, card.taboo_words))
    }
}
