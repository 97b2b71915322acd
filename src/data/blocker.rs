// ============================================================
// Layer 4 — Turn Blocker
// ============================================================
// People rarely say everything in one message:
//
//   10:00 Bob: oi
//   10:00 Bob: tudo bem?
//   10:02 Me:  tudo e você?
//
// For training, Bob's two messages are ONE stimulus. The blocker
// merges every maximal run of same-author messages into a Turn:
//
//   Turn { Bob, "oi\ntudo bem?", 10:00 }
//   Turn { Me,  "tudo e você?",  10:02 }
//
// A run ends exactly when the author changes. Messages are NOT
// re-sorted by time; source order is the conversation order.
//
// Reference: Rust Book §13 (Iterators)

use crate::domain::message::{RawMessage, Turn};

/// Merge consecutive same-author messages into turns.
pub fn block_turns(messages: Vec<RawMessage>) -> Vec<Turn> {
    let mut turns: Vec<Turn> = Vec::new();

    for msg in messages {
        match turns.last_mut() {
            // Same author as the open turn → extend it
            Some(open) if open.author == msg.author => {
                open.text.push('\n');
                open.text.push_str(&msg.text);
                open.timestamp = msg.timestamp;
            }
            // Author changed (or first message) → start a new turn
            _ => turns.push(Turn::new(msg.author, msg.text, msg.timestamp)),
        }
    }

    turns
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn msg(author: &str, text: &str, h: u32, m: u32) -> RawMessage {
        RawMessage::new(at(h, m), author, text)
    }

    #[test]
    fn test_merges_consecutive_lines_by_same_author() {
        let turns = block_turns(vec![
            msg("Bob", "line1", 10, 0),
            msg("Bob", "line2", 10, 3),
        ]);
        assert_eq!(turns, vec![Turn::new("Bob", "line1\nline2", at(10, 3))]);
    }

    #[test]
    fn test_turn_count_equals_number_of_author_runs() {
        let turns = block_turns(vec![
            msg("Bob", "a", 10, 0),
            msg("Bob", "b", 10, 1),
            msg("Me",  "c", 10, 2),
            msg("Bob", "d", 10, 3),
            msg("Me",  "e", 10, 4),
            msg("Me",  "f", 10, 5),
        ]);
        let authors: Vec<&str> = turns.iter().map(|t| t.author.as_str()).collect();
        assert_eq!(authors, vec!["Bob", "Me", "Bob", "Me"]);
        assert_eq!(turns[3].text, "e\nf");
    }

    #[test]
    fn test_source_order_is_kept_even_if_timestamps_go_backwards() {
        let turns = block_turns(vec![
            msg("Bob", "first",  10, 5),
            msg("Bob", "second", 10, 1),
        ]);
        assert_eq!(turns[0].text, "first\nsecond");
        assert_eq!(turns[0].timestamp, at(10, 1));
    }

    #[test]
    fn test_empty_input_gives_no_turns() {
        assert!(block_turns(Vec::new()).is_empty());
    }
}
