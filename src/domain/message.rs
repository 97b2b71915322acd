// ============================================================
// Layer 3 — Message and Turn Domain Types
// ============================================================
// A chat export is a flat list of timestamped lines. Two shapes
// of that data flow through the pipeline:
//
//   RawMessage — one "DD/MM/YYYY, HH:MM - Author: text" entry,
//                including any continuation lines that followed it
//   Turn       — one or more consecutive RawMessages by the same
//                author, merged into a single logical utterance
//
// Both are plain data. Stages consume a Vec of one and return a
// Vec of the next, so no stage ever mutates an earlier result.
//
// Reference: Rust Book §5 (Structs)

use chrono::NaiveDateTime;

/// One message exactly as it appeared in the export.
/// The text is NOT sanitised yet; that happens per pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    pub timestamp: NaiveDateTime,
    pub author:    String,
    pub text:      String,
}

impl RawMessage {
    pub fn new(
        timestamp: NaiveDateTime,
        author:    impl Into<String>,
        text:      impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            author: author.into(),
            text:   text.into(),
        }
    }
}

/// A run of same-author messages merged into one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub author: String,

    /// Texts of every contributing message joined with '\n',
    /// in source order
    pub text: String,

    /// Timestamp of the LAST contributing message, the moment
    /// the author finished speaking
    pub timestamp: NaiveDateTime,
}

impl Turn {
    pub fn new(
        author:    impl Into<String>,
        text:      impl Into<String>,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            author: author.into(),
            text:   text.into(),
            timestamp,
        }
    }

    /// Returns true if this turn was spoken by `label`
    pub fn is_by(&self, label: &str) -> bool {
        self.author == label
    }
}
