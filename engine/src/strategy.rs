//! Decision seams consumed by the role agents.
//!
//! Each trait may be backed by a human input queue, a static heuristic, or a
//! reasoning-service call. Implementations may suspend indefinitely; the
//! owning agent always drives them through its [`crate::tasks::TaskSet`], so
//! they are cancellable without cooperation. Views carry owned snapshots
//! taken at decision time, so a long-running call sees a stable prefix of
//! the log.
//!
//! Two deterministic defaults ship here: [`TabooList`] (word-boundary taboo
//! matching) and [`ExactMatch`] (case-insensitive target comparison).

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::events::Event;

/// What the cluer's strategy sees when asked for the next clue.
#[derive(Debug, Clone)]
pub struct CluerView {
    pub target: String,
    pub taboo_words: Vec<String>,
    pub history: Vec<Event>,
}

/// What a guesser's strategy sees. Deliberately excludes the target.
#[derive(Debug, Clone)]
pub struct GuesserView {
    pub player_id: String,
    pub history: Vec<Event>,
}

/// A guess with an optional rationale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guess {
    pub guess: String,
    #[serde(default)]
    pub rationale: Option<String>,
}

impl Guess {
    pub fn new(guess: impl Into<String>) -> Self {
        Self {
            guess: guess.into(),
            rationale: None,
        }
    }
}

/// Produces clues for the cluer.
#[async_trait]
pub trait ClueSource: Send + Sync {
    async fn next_clue(&self, view: CluerView) -> Result<String>;
}

/// Decides whether a clue violates the taboo list.
///
/// Returns a human-readable reason on violation, `None` when the clue is
/// allowed.
#[async_trait]
pub trait BuzzRule: Send + Sync {
    async fn violates(&self, clue: String, taboo_words: Vec<String>) -> Result<Option<String>>;
}

/// Produces guesses for a guesser.
#[async_trait]
pub trait GuessSource: Send + Sync {
    async fn next_guess(&self, view: GuesserView) -> Result<Guess>;
}

/// Decides whether a guess matches the target.
#[async_trait]
pub trait GuessChecker: Send + Sync {
    async fn check(&self, target: String, guess: String) -> Result<bool>;
}

/// Deterministic buzz rule: case-insensitive word-boundary match of any
/// taboo word in the clue, tolerating simple singular/plural variation.
pub struct TabooList;

#[async_trait]
impl BuzzRule for TabooList {
    async fn violates(&self, clue: String, taboo_words: Vec<String>) -> Result<Option<String>> {
        for word in &taboo_words {
            let word = word.trim();
            if word.is_empty() {
                continue;
            }
            if taboo_pattern(word)?.is_match(&clue) {
                return Ok(Some(format!("clue uses taboo word {word:?}")));
            }
        }
        Ok(None)
    }
}

/// Word-boundary pattern matching `word` and its trivial plural forms.
fn taboo_pattern(word: &str) -> Result<Regex> {
    // "trees" should also catch a clue saying "tree".
    let stem = match word.len() > 3 {
        true => word.strip_suffix('s').unwrap_or(word),
        false => word,
    };
    let pattern = format!(
        r"(?i)\b(?:{}|{})(?:e?s)?\b",
        regex::escape(word),
        regex::escape(stem)
    );
    Ok(Regex::new(&pattern)?)
}

/// Default judge check: trimmed, case-insensitive equality with the target.
pub struct ExactMatch;

#[async_trait]
impl GuessChecker for ExactMatch {
    async fn check(&self, target: String, guess: String) -> Result<bool> {
        Ok(guess.trim().to_lowercase() == target.trim().to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[tokio::test]
    async fn taboo_list_flags_exact_word() {
        let reason = TabooList
            .violates("a juicy fruit".into(), words(&["fruit", "red"]))
            .await
            .unwrap();
        assert!(reason.unwrap().contains("fruit"));
    }

    #[tokio::test]
    async fn taboo_list_flags_plural_variation() {
        let reason = TabooList
            .violates("grows on trees".into(), words(&["tree"]))
            .await
            .unwrap();
        assert!(reason.is_some());

        let reason = TabooList
            .violates("one tree".into(), words(&["trees"]))
            .await
            .unwrap();
        assert!(reason.is_some());
    }

    #[tokio::test]
    async fn taboo_list_ignores_substrings() {
        // "red" inside "hundred" is not a word-boundary match.
        let reason = TabooList
            .violates("a hundred of them".into(), words(&["red"]))
            .await
            .unwrap();
        assert!(reason.is_none());
    }

    #[tokio::test]
    async fn taboo_list_is_case_insensitive() {
        let reason = TabooList
            .violates("Fruit basket".into(), words(&["fruit"]))
            .await
            .unwrap();
        assert!(reason.is_some());
    }

    #[tokio::test]
    async fn exact_match_ignores_case_and_whitespace() {
        assert!(ExactMatch
            .check("apple".into(), "  Apple ".into())
            .await
            .unwrap());
        assert!(!ExactMatch
            .check("apple".into(), "apples".into())
            .await
            .unwrap());
    }
}
