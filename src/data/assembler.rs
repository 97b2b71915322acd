// ============================================================
// Layer 4 — Pair Assembler
// ============================================================
// Walks the filtered turns and emits (input, output) pairs where
// the counterpart speaks and the primary participant answers.
//
//   turn[i-1]  by anyone but primary   → input
//   turn[i]    by primary              → output
//
// Each candidate must pass three checks, in this order:
//   1. Reply delay  ≤ threshold   (default 5 hours)
//   2. Both texts non-empty after sanitising
//   3. Sanitised input ≤ max_input_chars (default 2000)
//
// A reply hours later is usually a new conversation, not an
// answer, so it would teach a spurious association.
//
// Only the turn IMMEDIATELY before a primary turn is used as its
// input. Earlier counterpart turns in the same silence are never
// paired.
//
// Reference: Rust Book §8 (Vectors)
//            chrono documentation (Duration arithmetic)

use chrono::Duration;

use crate::data::sanitizer::Sanitizer;
use crate::domain::counters::{DropCounters, DropReason};
use crate::domain::message::Turn;
use crate::domain::pair::Pair;

pub struct PairAssembler<'a> {
    primary:         &'a str,
    threshold:       Duration,
    max_input_chars: usize,
    sanitizer:       &'a Sanitizer,
}

impl<'a> PairAssembler<'a> {
    pub fn new(
        primary:         &'a str,
        threshold:       Duration,
        max_input_chars: usize,
        sanitizer:       &'a Sanitizer,
    ) -> Self {
        Self { primary, threshold, max_input_chars, sanitizer }
    }

    /// Build every valid pair from `turns`, tagging each with `category`.
    pub fn assemble(
        &self,
        turns:    &[Turn],
        category: &str,
        counters: &mut DropCounters,
    ) -> Vec<Pair> {
        let mut pairs = Vec::new();

        for window in turns.windows(2) {
            let (prev, curr) = (&window[0], &window[1]);

            if prev.is_by(self.primary) || !curr.is_by(self.primary) {
                continue;
            }
            counters.candidate_pairs += 1;

            // ── Check 1: Reply delay ─────────────────────────────────────────
            let elapsed = curr.timestamp - prev.timestamp;
            if elapsed > self.threshold {
                counters.drop_item(DropReason::LateResponse, || {
                    format!(
                        "ELAPSED: {} min\nINPUT:\n{}\n\nOUTPUT:\n{}",
                        elapsed.num_minutes(),
                        prev.text,
                        curr.text
                    )
                });
                continue;
            }

            // ── Check 2: Content after sanitising ────────────────────────────
            let input  = self.sanitizer.sanitize(&prev.text);
            let output = self.sanitizer.sanitize(&curr.text);
            for s in [&input, &output] {
                counters.notice_lines_removed += s.notice_lines;
                counters.null_lines_removed   += s.null_lines;
                counters.empty_lines_removed  += s.empty_lines;
            }

            if input.is_empty() || output.is_empty() {
                counters.drop_item(DropReason::InvalidContent, || {
                    format!("RAW INPUT:\n{}\n\nRAW OUTPUT:\n{}", prev.text, curr.text)
                });
                continue;
            }

            // ── Check 3: Input length ────────────────────────────────────────
            let input_chars = input.text.chars().count();
            if input_chars > self.max_input_chars {
                counters.drop_item(DropReason::InputTooLong, || {
                    format!("{} chars\nINPUT:\n{}", input_chars, input.text)
                });
                continue;
            }

            counters.pairs_emitted += 1;
            pairs.push(Pair::new(input.text, output.text, category));
        }

        pairs
    }
}
