//! Reasoning-backed strategies over an OpenAI-compatible chat endpoint.
//!
//! One [`ChatClient`] is shared by every strategy in a round. The creative
//! roles ask for free-form JSON and tolerate fenced output; the buzzer and
//! judge memoize their verdicts so a repeated clue or guess never costs a
//! second call.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use taboo_engine::strategy::{
    BuzzRule, ClueSource, CluerView, Guess, GuessChecker, GuessSource, GuesserView,
};
use taboo_engine::Event;

use crate::config::LlmConfig;

/// Thin client for `{base}/chat/completions`.
pub struct ChatClient {
    config: LlmConfig,
    client: reqwest::Client,
}

impl ChatClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to create HTTP client")?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// One chat turn; returns the assistant message content.
    pub async fn chat(
        &self,
        model: &str,
        max_tokens: u32,
        system: &str,
        user: &str,
    ) -> Result<String> {
        let request_body = serde_json::json!({
            "model": model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user}
            ],
            "max_tokens": max_tokens,
            "temperature": 1.0
        });

        let mut request = self
            .client
            .post(self.config.chat_url())
            .header("Content-Type", "application/json")
            .json(&request_body);
        if !self.config.api_key.is_empty() {
            request = request.header("Authorization", format!("Bearer {}", self.config.api_key));
        }

        let response = request.send().await.context("chat request failed")?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("chat endpoint error ({status}): {body}"));
        }

        let resp_json: serde_json::Value =
            response.json().await.context("chat response was not JSON")?;
        let content = resp_json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow!("chat response has no message content"))?;
        Ok(content.to_string())
    }

    /// One chat turn whose answer must parse as `T`, fences tolerated.
    pub async fn chat_json<T: DeserializeOwned>(
        &self,
        model: &str,
        max_tokens: u32,
        system: &str,
        user: &str,
    ) -> Result<T> {
        let content = self.chat(model, max_tokens, system, user).await?;
        parse_json(&content)
    }
}

/// Parse a model answer as JSON, stripping Markdown code fences first.
pub(crate) fn parse_json<T: DeserializeOwned>(content: &str) -> Result<T> {
    let stripped = strip_fences(content);
    serde_json::from_str(stripped)
        .with_context(|| format!("model answer was not the expected JSON: {stripped:?}"))
}

fn strip_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    // Drop a language tag like "json" on the opening fence line.
    match inner.split_once('\n') {
        Some((first, rest)) if !first.trim().is_empty() && !first.trim().starts_with('{') => {
            rest.trim()
        }
        _ => inner.trim(),
    }
}

/// Compact one-event-per-line JSON rendering of the history for prompts.
fn history_lines(history: &[Event]) -> String {
    history
        .iter()
        .filter_map(|e| serde_json::to_string(e).ok())
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct LlmCluer {
    client: Arc<ChatClient>,
    model: String,
}

impl LlmCluer {
    pub fn new(client: Arc<ChatClient>) -> Self {
        let model = client.config().model.clone();
        Self { client, model }
    }
}

#[derive(Deserialize)]
struct ClueAnswer {
    clue: String,
}

#[async_trait]
impl ClueSource for LlmCluer {
    async fn next_clue(&self, view: CluerView) -> Result<String> {
        let system = "You are the cluer in a game of Taboo. Give a single word or \
            short phrase that hints at the target word without using any taboo \
            word. Do not repeat earlier clues. \
            Answer with JSON only: {\"clue\": \"...\"}";
        let user = format!(
            "Target word: {}\nTaboo words: {}\nGame so far:\n{}",
            view.target,
            view.taboo_words.join(", "),
            history_lines(&view.history),
        );
        let answer: ClueAnswer = self
            .client
            .chat_json(&self.model, 20_000, system, &user)
            .await?;
        debug!(clue = %answer.clue, "cluer strategy answered");
        Ok(answer.clue)
    }
}

pub struct LlmBuzzer {
    client: Arc<ChatClient>,
    model: String,
    cache: Mutex<HashMap<String, Option<String>>>,
}

impl LlmBuzzer {
    pub fn new(client: Arc<ChatClient>) -> Self {
        let model = client.config().fast_model.clone();
        Self {
            client,
            model,
            cache: Mutex::new(HashMap::new()),
        }
    }
}

#[derive(Deserialize)]
struct BuzzAnswer {
    buzz: bool,
    justification: String,
}

#[async_trait]
impl BuzzRule for LlmBuzzer {
    async fn violates(&self, clue: String, taboo_words: Vec<String>) -> Result<Option<String>> {
        if let Some(verdict) = self.cache.lock().await.get(&clue) {
            return Ok(verdict.clone());
        }
        let system = "You are the buzzer in a game of Taboo. Decide whether the \
            clue IS one of the taboo words, or a minor variation of one such as \
            singular/plural. A clue with merely similar meaning is allowed. \
            Answer with JSON only: {\"buzz\": true|false, \"justification\": \"...\"}";
        let user = format!("Clue: {}\nTaboo words: {}", clue, taboo_words.join(", "));
        let answer: BuzzAnswer = self
            .client
            .chat_json(&self.model, 2_000, system, &user)
            .await?;
        let verdict = answer.buzz.then_some(answer.justification);
        self.cache.lock().await.insert(clue, verdict.clone());
        Ok(verdict)
    }
}

pub struct LlmGuesser {
    client: Arc<ChatClient>,
    model: String,
    personality: Option<String>,
}

impl LlmGuesser {
    pub fn new(client: Arc<ChatClient>, personality: Option<String>) -> Self {
        let model = client.config().model.clone();
        Self {
            client,
            model,
            personality,
        }
    }
}

#[async_trait]
impl GuessSource for LlmGuesser {
    async fn next_guess(&self, view: GuesserView) -> Result<Guess> {
        let system = "You are a guesser in a game of Taboo. Guess the target word \
            from the clues so far. Do not repeat a guess already judged \
            incorrect. \
            Answer with JSON only: {\"guess\": \"...\", \"rationale\": \"...\"}";
        let mut user = format!(
            "Your player id: {}\nGame so far:\n{}",
            view.player_id,
            history_lines(&view.history),
        );
        if let Some(personality) = &self.personality {
            user.push_str(&format!("\nYour personality: {personality}"));
        }
        let guess: Guess = self
            .client
            .chat_json(&self.model, 20_000, system, &user)
            .await?;
        debug!(player = %view.player_id, guess = %guess.guess, "guess strategy answered");
        Ok(guess)
    }
}

pub struct LlmJudge {
    client: Arc<ChatClient>,
    model: String,
    cache: Mutex<HashMap<String, bool>>,
}

impl LlmJudge {
    pub fn new(client: Arc<ChatClient>) -> Self {
        let model = client.config().fast_model.clone();
        Self {
            client,
            model,
            cache: Mutex::new(HashMap::new()),
        }
    }
}

#[derive(Deserialize)]
struct JudgeAnswer {
    is_correct: bool,
}

#[async_trait]
impl GuessChecker for LlmJudge {
    async fn check(&self, target: String, guess: String) -> Result<bool> {
        if let Some(verdict) = self.cache.lock().await.get(&guess) {
            return Ok(*verdict);
        }
        let system = "You are the judge in a game of Taboo. Decide whether the \
            guess matches the target word. Minor variations like singular/plural \
            or -ing forms count as correct. \
            Answer with JSON only: {\"is_correct\": true|false}";
        let user = format!("Target word: {target}\nGuess: {guess}");
        let answer: JudgeAnswer = self
            .client
            .chat_json(&self.model, 2_000, system, &user)
            .await?;
        self.cache.lock().await.insert(guess, answer.is_correct);
        Ok(answer.is_correct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_json_handles_bare_and_fenced_answers() {
        let bare: ClueAnswer = parse_json(r#"{"clue": "crunchy snack"}"#).unwrap();
        assert_eq!(bare.clue, "crunchy snack");

        let fenced: ClueAnswer =
            parse_json("```json\n{\"clue\": \"crunchy snack\"}\n```").unwrap();
        assert_eq!(fenced.clue, "crunchy snack");

        let no_tag: ClueAnswer = parse_json("```\n{\"clue\": \"orchard\"}\n```").unwrap();
        assert_eq!(no_tag.clue, "orchard");
    }

    #[test]
    fn parse_json_reports_garbage() {
        let result: Result<ClueAnswer> = parse_json("the clue is: crunchy");
        assert!(result.is_err());
    }

    #[test]
    fn guess_answers_tolerate_missing_rationale() {
        let guess: Guess = parse_json(r#"{"guess": "apple"}"#).unwrap();
        assert_eq!(guess.guess, "apple");
        assert_eq!(guess.rationale, None);
    }

    #[test]
    fn history_lines_are_one_event_per_line() {
        let lines = history_lines(&[Event::clue("crunchy"), Event::clue("orchard")]);
        assert_eq!(lines.lines().count(), 2);
        assert!(lines.lines().all(|l| l.contains(r#""role":"cluer""#)));
    }
}
