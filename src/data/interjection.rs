// ============================================================
// Layer 4 — Interjection Filter
// ============================================================
// Some chat apps let a participant summon an assistant inline by
// mentioning its numeric account id:
//
//   Me:  @13135550002 what's the capital of Peru?
//   Bob: Lima is the capital of Peru.      ← actually the bot
//
// The export attributes the bot's reply to the counterpart, so
// left alone it would teach "Bob → Me" associations that never
// happened between two people.
//
// Detection (a heuristic, not a verified signal):
//   turn[i]   by primary AND contains the mention pattern
//   turn[i+1] by counterpart
// → drop both, count one interjection, resume at i+2.
//
// The scan is greedy and leftmost: once two turns are consumed
// neither takes part in another match. A mention in the very
// last turn has no lookahead and is kept.
//
// Reference: regex crate documentation

use regex::Regex;

use crate::domain::counters::{DropCounters, DropReason};
use crate::domain::message::Turn;

/// Default mention: '@' followed by ten or more digits
pub const DEFAULT_MENTION_PATTERN: &str = r"@\d{10,}";

pub struct InterjectionFilter {
    mention: Regex,
}

impl InterjectionFilter {
    pub fn new(mention: Regex) -> Self {
        Self { mention }
    }

    /// Remove every (primary-with-mention, counterpart) turn pair.
    pub fn filter(
        &self,
        turns:       Vec<Turn>,
        primary:     &str,
        counterpart: &str,
        counters:    &mut DropCounters,
    ) -> Vec<Turn> {
        let mut kept = Vec::with_capacity(turns.len());
        let mut i    = 0usize;

        while i < turns.len() {
            let current = &turns[i];

            if let Some(next) = turns.get(i + 1) {
                if current.is_by(primary)
                    && self.mention.is_match(&current.text)
                    && next.is_by(counterpart)
                {
                    counters.drop_item(DropReason::Interjection, || {
                        format!("PROMPT:\n{}\n\nREPLY:\n{}", current.text, next.text)
                    });
                    i += 2;
                    continue;
                }
            }

            kept.push(current.clone());
            i += 1;
        }

        kept
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, m, 0)
            .unwrap()
    }

    fn filter() -> InterjectionFilter {
        InterjectionFilter::new(Regex::new(DEFAULT_MENTION_PATTERN).unwrap())
    }

    fn run(turns: Vec<Turn>) -> (Vec<Turn>, DropCounters) {
        let mut c = DropCounters::default();
        let out   = filter().filter(turns, "Me", "Bob", &mut c);
        (out, c)
    }

    #[test]
    fn test_removes_mention_and_following_reply() {
        let (out, c) = run(vec![
            Turn::new("Bob", "hi", at(0)),
            Turn::new("Me",  "@5551234567890 what's up", at(1)),
            Turn::new("Bob", "not much", at(2)),
        ]);
        assert_eq!(out, vec![Turn::new("Bob", "hi", at(0))]);
        assert_eq!(c.interjections, 1);
    }

    #[test]
    fn test_short_mention_is_not_an_interjection() {
        let (out, c) = run(vec![
            Turn::new("Me",  "@123 oi", at(0)),
            Turn::new("Bob", "oi", at(1)),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(c.interjections, 0);
    }

    #[test]
    fn test_mention_in_last_turn_is_kept() {
        let (out, c) = run(vec![
            Turn::new("Bob", "oi", at(0)),
            Turn::new("Me",  "@5551234567890 resume", at(1)),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(c.interjections, 0);
    }

    #[test]
    fn test_counterpart_mention_does_not_trigger() {
        let (out, _) = run(vec![
            Turn::new("Bob", "@5551234567890 oi", at(0)),
            Turn::new("Me",  "oi", at(1)),
        ]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_matches_do_not_overlap() {
        // Me(mention) Bob Me(mention) Bob → two separate interjections
        let (out, c) = run(vec![
            Turn::new("Me",  "@5551234567890 a", at(0)),
            Turn::new("Bob", "bot a", at(1)),
            Turn::new("Me",  "@5551234567890 b", at(2)),
            Turn::new("Bob", "bot b", at(3)),
            Turn::new("Me",  "fim", at(4)),
        ]);
        assert_eq!(out, vec![Turn::new("Me", "fim", at(4))]);
        assert_eq!(c.interjections, 2);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let turns = vec![
            Turn::new("Bob", "oi", at(0)),
            Turn::new("Me",  "@5551234567890 x", at(1)),
            Turn::new("Bob", "bot", at(2)),
            Turn::new("Me",  "@5551234567890 y", at(3)),
        ];
        let (once, _)  = run(turns);
        let (twice, c) = run(once.clone());
        assert_eq!(once, twice);
        assert_eq!(c.interjections, 0);
    }
}
