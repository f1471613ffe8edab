//! Event schema for a Taboo round.
//!
//! Events are a closed tagged union discriminated by `role`. They are
//! immutable once appended to the log; an event's content plus its log index
//! fully determine its identity, so there is no separate event id.

use std::fmt;

use serde::{Deserialize, Serialize};

/// All events a round can produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Event {
    /// A clue toward the target word.
    Cluer { clue: String },

    /// The buzzer's ruling on a clue. `allowed = false` means the clue
    /// violated the taboo list and the round is lost.
    Buzzer {
        clue: String,
        allowed: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    /// A guess at the target word.
    Guesser {
        player_id: String,
        guess: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rationale: Option<String>,
    },

    /// The judge's verdict on a guess. `by` names the guesser being judged.
    Judge {
        guess: String,
        is_correct: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        by: Option<String>,
    },

    /// Coordinator or deadline-timer events.
    System {
        event: SystemKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<EndReason>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        winner: Option<String>,
    },
}

/// Kind discriminator for system events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemKind {
    /// The round duration elapsed.
    Timeout,
    /// The terminal marker; nothing is ever appended after it.
    End,
}

/// Why a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Correct,
    Timeout,
    Buzzed,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Correct => write!(f, "correct"),
            Self::Timeout => write!(f, "timeout"),
            Self::Buzzed => write!(f, "buzzed"),
        }
    }
}

impl Event {
    pub fn clue(clue: impl Into<String>) -> Self {
        Self::Cluer { clue: clue.into() }
    }

    /// Build a buzz ruling; the clue is allowed exactly when no violation
    /// reason was found.
    pub fn buzz(clue: impl Into<String>, reason: Option<String>) -> Self {
        Self::Buzzer {
            clue: clue.into(),
            allowed: reason.is_none(),
            reason,
        }
    }

    pub fn guess(
        player_id: impl Into<String>,
        guess: impl Into<String>,
        rationale: Option<String>,
    ) -> Self {
        Self::Guesser {
            player_id: player_id.into(),
            guess: guess.into(),
            rationale,
        }
    }

    pub fn verdict(guess: impl Into<String>, is_correct: bool, by: Option<String>) -> Self {
        Self::Judge {
            guess: guess.into(),
            is_correct,
            by,
        }
    }

    pub fn timeout() -> Self {
        Self::System {
            event: SystemKind::Timeout,
            reason: None,
            winner: None,
        }
    }

    pub fn end(reason: EndReason, winner: Option<String>) -> Self {
        Self::System {
            event: SystemKind::End,
            reason: Some(reason),
            winner,
        }
    }

    /// The serialized `role` tag of this event.
    pub fn role_name(&self) -> &'static str {
        match self {
            Self::Cluer { .. } => "cluer",
            Self::Buzzer { .. } => "buzzer",
            Self::Guesser { .. } => "guesser",
            Self::Judge { .. } => "judge",
            Self::System { .. } => "system",
        }
    }

    /// Reason and winner if this is the terminal end marker.
    pub fn as_end(&self) -> Option<(EndReason, Option<&str>)> {
        match self {
            Self::System {
                event: SystemKind::End,
                reason,
                winner,
            } => Some((
                reason.unwrap_or(EndReason::Timeout),
                winner.as_deref(),
            )),
            _ => None,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(
            self,
            Self::System {
                event: SystemKind::End,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_tag_matches_wire_format() {
        let json = serde_json::to_string(&Event::clue("crunchy snack")).unwrap();
        assert!(json.contains(r#""role":"cluer""#));

        let json = serde_json::to_string(&Event::end(EndReason::Buzzed, None)).unwrap();
        assert!(json.contains(r#""role":"system""#));
        assert!(json.contains(r#""event":"end""#));
        assert!(json.contains(r#""reason":"buzzed""#));
        assert!(!json.contains("winner"));
    }

    #[test]
    fn serde_roundtrip() {
        let event = Event::guess("p1", "apple", Some("sounds fruity".into()));
        let json = serde_json::to_string(&event).unwrap();
        let restored: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, event);
    }

    #[test]
    fn buzz_allowed_tracks_reason() {
        assert!(matches!(
            Event::buzz("hint", None),
            Event::Buzzer { allowed: true, .. }
        ));
        assert!(matches!(
            Event::buzz("fruit", Some("taboo word".into())),
            Event::Buzzer { allowed: false, .. }
        ));
    }

    #[test]
    fn end_accessor() {
        let event = Event::end(EndReason::Correct, Some("p2".into()));
        assert_eq!(event.as_end(), Some((EndReason::Correct, Some("p2"))));
        assert!(event.is_end());
        assert_eq!(Event::timeout().as_end(), None);
    }
}
