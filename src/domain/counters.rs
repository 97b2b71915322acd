// ============================================================
// Layer 3 — Drop Counters
// ============================================================
// Every stage of the pipeline throws things away: lines that do
// not parse, messages by a third author, automated interjections,
// late replies, empty turns. Each of those outcomes has a named
// counter here so a run can explain where its data went.
//
// Lifecycle:
//   - BuildUseCase creates one DropCounters per input file
//   - each stage receives it as `&mut DropCounters`
//   - after the file is done it is merged into the run total
//
// There is no global state: two runs never share an instance.
//
// When the discard log is enabled the counters also keep a copy
// of each discarded item so it can be written out for review.
//
// Reference: Rust Book §5 (Structs), §6 (Enums)

use serde::Serialize;
use std::fmt;

/// Why an item was thrown away.
/// Each variant maps to exactly one counter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Line carried a timestamp prefix but no "Author: text" part
    MalformedLine,
    /// Text found before the first message header
    OrphanLine,
    /// Author is neither the primary nor the counterpart
    UnknownAuthor,
    /// Date/time digits did not form a real calendar timestamp
    TimestampParseFailure,
    /// Message body was the literal "null"
    NullMessage,
    /// Primary mentioned an assistant id and the next turn was its reply
    Interjection,
    /// Reply came later than the response-time threshold
    LateResponse,
    /// Input or output became empty after sanitising
    InvalidContent,
    /// Sanitised input exceeded the maximum length
    InputTooLong,
}

impl DropReason {
    /// Every reason, in pipeline order
    pub const ALL: [DropReason; 9] = [
        DropReason::MalformedLine,
        DropReason::OrphanLine,
        DropReason::UnknownAuthor,
        DropReason::TimestampParseFailure,
        DropReason::NullMessage,
        DropReason::Interjection,
        DropReason::LateResponse,
        DropReason::InvalidContent,
        DropReason::InputTooLong,
    ];

    /// Human-readable label used in the discard log and summary
    pub fn label(&self) -> &'static str {
        match self {
            DropReason::MalformedLine         => "malformed line",
            DropReason::OrphanLine            => "text before first message",
            DropReason::UnknownAuthor         => "unknown author",
            DropReason::TimestampParseFailure => "timestamp parse failure",
            DropReason::NullMessage           => "null message",
            DropReason::Interjection          => "automated interjection",
            DropReason::LateResponse          => "response threshold exceeded",
            DropReason::InvalidContent        => "invalid content after sanitising",
            DropReason::InputTooLong          => "input too long",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One discarded item, kept only when the discard log is enabled
#[derive(Debug, Clone, Serialize)]
pub struct DiscardRecord {
    pub reason:  DropReason,
    /// Source file the item came from (empty until the file is known)
    pub file:    String,
    pub content: String,
}

/// Per-run accumulator of pipeline outcomes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DropCounters {
    // ── Files ────────────────────────────────────────────────
    pub files_processed: usize,
    pub files_skipped:   usize,

    // ── Parser ───────────────────────────────────────────────
    pub lines_read:               usize,
    pub messages_parsed:          usize,
    pub malformed_lines:          usize,
    pub orphan_lines:             usize,
    pub unknown_author:           usize,
    pub timestamp_parse_failures: usize,
    pub null_messages:            usize,

    // ── Blocker / interjection filter ────────────────────────
    pub turns_built:   usize,
    pub interjections: usize,

    // ── Pair assembler ───────────────────────────────────────
    pub candidate_pairs: usize,
    pub late_response:   usize,
    pub invalid_content: usize,
    pub input_too_long:  usize,
    pub pairs_emitted:   usize,

    // ── Sanitiser (line level) ───────────────────────────────
    pub notice_lines_removed: usize,
    pub null_lines_removed:   usize,
    pub empty_lines_removed:  usize,

    #[serde(skip)]
    keep_discards: bool,
    #[serde(skip)]
    discards: Vec<DiscardRecord>,
}

impl DropCounters {
    /// Counters that also retain a copy of every discarded item
    pub fn with_discards() -> Self {
        Self { keep_discards: true, ..Self::default() }
    }

    /// Count one drop. `content` is only evaluated when discards
    /// are being kept, so callers can pass an allocating closure.
    pub fn drop_item<F>(&mut self, reason: DropReason, content: F)
    where
        F: FnOnce() -> String,
    {
        *self.slot(reason) += 1;

        if self.keep_discards {
            self.discards.push(DiscardRecord {
                reason,
                file: String::new(),
                content: content(),
            });
        }
    }

    /// Read the counter for a drop reason
    pub fn count(&self, reason: DropReason) -> usize {
        match reason {
            DropReason::MalformedLine         => self.malformed_lines,
            DropReason::OrphanLine            => self.orphan_lines,
            DropReason::UnknownAuthor         => self.unknown_author,
            DropReason::TimestampParseFailure => self.timestamp_parse_failures,
            DropReason::NullMessage           => self.null_messages,
            DropReason::Interjection          => self.interjections,
            DropReason::LateResponse          => self.late_response,
            DropReason::InvalidContent        => self.invalid_content,
            DropReason::InputTooLong          => self.input_too_long,
        }
    }

    fn slot(&mut self, reason: DropReason) -> &mut usize {
        match reason {
            DropReason::MalformedLine         => &mut self.malformed_lines,
            DropReason::OrphanLine            => &mut self.orphan_lines,
            DropReason::UnknownAuthor         => &mut self.unknown_author,
            DropReason::TimestampParseFailure => &mut self.timestamp_parse_failures,
            DropReason::NullMessage           => &mut self.null_messages,
            DropReason::Interjection          => &mut self.interjections,
            DropReason::LateResponse          => &mut self.late_response,
            DropReason::InvalidContent        => &mut self.invalid_content,
            DropReason::InputTooLong          => &mut self.input_too_long,
        }
    }

    /// Discarded items recorded so far
    pub fn discards(&self) -> &[DiscardRecord] {
        &self.discards
    }

    /// Stamp every discard recorded since the last call with `file`
    pub fn tag_discards(&mut self, file: &str) {
        for record in self.discards.iter_mut().filter(|r| r.file.is_empty()) {
            record.file = file.to_string();
        }
    }

    /// Total number of messages and pairs dropped for any reason
    pub fn total_dropped(&self) -> usize {
        DropReason::ALL.iter().map(|r| self.count(*r)).sum()
    }

    /// Fold another accumulator into this one.
    /// Used to reduce per-file counters into the run total.
    pub fn merge(&mut self, other: DropCounters) {
        self.files_processed          += other.files_processed;
        self.files_skipped            += other.files_skipped;
        self.lines_read               += other.lines_read;
        self.messages_parsed          += other.messages_parsed;
        self.malformed_lines          += other.malformed_lines;
        self.orphan_lines             += other.orphan_lines;
        self.unknown_author           += other.unknown_author;
        self.timestamp_parse_failures += other.timestamp_parse_failures;
        self.null_messages            += other.null_messages;
        self.turns_built              += other.turns_built;
        self.interjections            += other.interjections;
        self.candidate_pairs          += other.candidate_pairs;
        self.late_response            += other.late_response;
        self.invalid_content          += other.invalid_content;
        self.input_too_long           += other.input_too_long;
        self.pairs_emitted            += other.pairs_emitted;
        self.notice_lines_removed     += other.notice_lines_removed;
        self.null_lines_removed       += other.null_lines_removed;
        self.empty_lines_removed      += other.empty_lines_removed;
        self.discards.extend(other.discards);
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_item_increments_matching_counter() {
        let mut c = DropCounters::default();
        c.drop_item(DropReason::LateResponse, String::new);
        c.drop_item(DropReason::LateResponse, String::new);
        c.drop_item(DropReason::UnknownAuthor, String::new);

        assert_eq!(c.late_response, 2);
        assert_eq!(c.unknown_author, 1);
        assert_eq!(c.total_dropped(), 3);
    }

    #[test]
    fn test_discards_only_kept_when_enabled() {
        let mut plain = DropCounters::default();
        plain.drop_item(DropReason::NullMessage, || "null".to_string());
        assert!(plain.discards().is_empty());

        let mut kept = DropCounters::with_discards();
        kept.drop_item(DropReason::NullMessage, || "null".to_string());
        assert_eq!(kept.discards().len(), 1);
        assert_eq!(kept.discards()[0].content, "null");
    }

    #[test]
    fn test_merge_sums_every_field() {
        let mut total = DropCounters::default();
        let mut a     = DropCounters::default();
        a.files_processed = 1;
        a.pairs_emitted   = 4;
        a.interjections   = 1;
        let mut b = DropCounters::default();
        b.files_processed = 1;
        b.pairs_emitted   = 2;

        total.merge(a);
        total.merge(b);

        assert_eq!(total.files_processed, 2);
        assert_eq!(total.pairs_emitted, 6);
        assert_eq!(total.interjections, 1);
    }

    #[test]
    fn test_tag_discards_only_touches_untagged() {
        let mut c = DropCounters::with_discards();
        c.drop_item(DropReason::InputTooLong, || "x".to_string());
        c.tag_discards("Amigo/Amigo1.txt");
        c.drop_item(DropReason::InputTooLong, || "y".to_string());
        c.tag_discards("Amigo/Amigo2.txt");

        assert_eq!(c.discards()[0].file, "Amigo/Amigo1.txt");
        assert_eq!(c.discards()[1].file, "Amigo/Amigo2.txt");
    }
}
