//! Transcript rendering: one line per event, nothing else.
//!
//! Pure presentation sink. It observes the round through its own cursor and
//! never publishes, so rendering can lag arbitrarily without slowing play.

use std::sync::Arc;

use taboo_engine::log::EventLog;
use taboo_engine::{Event, SystemKind};

pub fn format_event(event: &Event) -> String {
    match event {
        Event::Cluer { clue } => format!("[cluer] {clue}"),
        Event::Buzzer {
            allowed, reason, ..
        } => {
            let verdict = if *allowed { "ok" } else { "BUZZED" };
            match reason {
                Some(reason) => format!("[buzzer] {verdict} (reason: {reason})"),
                None => format!("[buzzer] {verdict}"),
            }
        }
        Event::Guesser {
            player_id,
            guess,
            rationale,
        } => match rationale {
            Some(rationale) => format!("[guesser {player_id}] {guess} ({rationale})"),
            None => format!("[guesser {player_id}] {guess}"),
        },
        Event::Judge {
            guess,
            is_correct,
            by,
        } => {
            let verdict = if *is_correct { "CORRECT" } else { "INCORRECT" };
            let by = by.as_deref().unwrap_or("unknown");
            format!("[judge] {guess} by {by} -> {verdict}")
        }
        Event::System {
            event: SystemKind::Timeout,
            ..
        } => "[system] timeout".to_string(),
        Event::System {
            event: SystemKind::End,
            reason,
            winner,
        } => {
            let reason = reason
                .map(|r| r.to_string())
                .unwrap_or_else(|| "unknown".into());
            match winner {
                Some(winner) => format!("[system] end: {reason}, winner: {winner}"),
                None => format!("[system] end: {reason}"),
            }
        }
    }
}

/// The whole history as one printable transcript.
pub fn transcript(history: &[Event]) -> String {
    history
        .iter()
        .map(format_event)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print events as they land, stop at the end marker, return the winner.
pub async fn render_stream(log: Arc<EventLog>) -> Option<String> {
    let mut cursor = log.cursor(0);
    loop {
        let event = cursor.next().await;
        println!("{}", format_event(&event));
        if let Some((_, winner)) = event.as_end() {
            return winner.map(String::from);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taboo_engine::EndReason;

    #[test]
    fn format_covers_every_role() {
        assert_eq!(format_event(&Event::clue("crunchy")), "[cluer] crunchy");
        assert_eq!(format_event(&Event::buzz("crunchy", None)), "[buzzer] ok");
        assert_eq!(
            format_event(&Event::buzz("fruit", Some("taboo word".into()))),
            "[buzzer] BUZZED (reason: taboo word)"
        );
        assert_eq!(
            format_event(&Event::guess("p1", "apple", None)),
            "[guesser p1] apple"
        );
        assert_eq!(
            format_event(&Event::verdict("apple", true, Some("p1".into()))),
            "[judge] apple by p1 -> CORRECT"
        );
        assert_eq!(format_event(&Event::timeout()), "[system] timeout");
        assert_eq!(
            format_event(&Event::end(EndReason::Correct, Some("p1".into()))),
            "[system] end: correct, winner: p1"
        );
        assert_eq!(
            format_event(&Event::end(EndReason::Timeout, None)),
            "[system] end: timeout"
        );
    }

    #[test]
    fn transcript_is_one_line_per_event() {
        let text = transcript(&[
            Event::clue("crunchy"),
            Event::guess("p1", "apple", Some("sounds fruity".into())),
        ]);
        assert_eq!(
            text,
            "[cluer] crunchy\n[guesser p1] apple (sounds fruity)"
        );
    }
}
