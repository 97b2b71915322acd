// ============================================================
// Layer 4 — Content Sanitizer
// ============================================================
// Cleans the raw text of a turn before it becomes training data.
//
// Why clean per line?
//   A turn is several messages joined with '\n'. One of them may
//   be a "missed call" notice while the next is a real sentence,
//   so each line is judged on its own and survivors are rejoined.
//
// Per-line steps (applied in order):
//   1. Drop system notices (exact, case-insensitive) and
//      attachment lines ("IMG-001.jpg (arquivo anexado)")
//   2. Drop the literal "null" payload
//   3. Strip inline placeholders ("<Mídia oculta>", edit markers)
//   4. Strip URLs (anything shaped like scheme://...)
//   5. Strip emoji glyphs
//   6. Trim; drop the line if nothing is left
//
// Steps 3-5 close the gap each removal leaves to a single space.
// Whitespace the author typed elsewhere in the line is kept.
//
// A turn whose every line is dropped sanitises to "" and the pair
// assembler treats it as invalid.
//
// Reference: Rust Book §8 (Strings in Rust)
//            regex crate documentation (Unicode properties)

use anyhow::Result;
use regex::{Regex, RegexBuilder};

use crate::domain::error::PipelineError;

/// Notices the exporter writes in place of real messages
pub const DEFAULT_SYSTEM_NOTICES: &[&str] = &[
    "As mensagens e ligações são protegidas com a criptografia de ponta a ponta.",
    "Ligação de vídeo perdida",
    "Ligação de voz perdida",
    "Mensagem apagada",
    "Você apagou esta mensagem",
    "Você mudou para as mensagens temporárias.",
    "Messages and calls are end-to-end encrypted. No one outside of this chat, not even WhatsApp, can read or listen to them.",
    "Missed video call",
    "Missed voice call",
    "This message was deleted",
    "You deleted this message",
];

/// A line ending in one of these is an attachment stub
pub const DEFAULT_ATTACHMENT_SUFFIXES: &[&str] = &["(arquivo anexado)", "(file attached)"];

/// Markers removed from inside a line, keeping the text around them
pub const DEFAULT_INLINE_PLACEHOLDERS: &[&str] = &[
    "<Mídia oculta>",
    "<Media omitted>",
    "<Mensagem editada>",
    "<This message was edited>",
];

/// What happened to the lines of one sanitised turn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sanitized {
    /// Surviving lines joined with '\n' ("" if none survived)
    pub text: String,

    pub notice_lines: usize,
    pub null_lines:   usize,
    pub empty_lines:  usize,
}

impl Sanitized {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

pub struct Sanitizer {
    /// Denylist, stored lowercased for case-insensitive comparison
    notices:     Vec<String>,
    attachments: Vec<String>,
    /// None when no placeholders are configured
    placeholders: Option<Regex>,
    url:          Regex,
    emoji:        Regex,
}

impl Sanitizer {
    /// Build a sanitizer from the configured lists.
    /// Fails only if the placeholder list produces an invalid regex.
    pub fn new(
        notices:      &[String],
        attachments:  &[String],
        placeholders: &[String],
    ) -> Result<Self> {
        let placeholders = if placeholders.is_empty() {
            None
        } else {
            let pattern = placeholders
                .iter()
                .map(|p| regex::escape(p))
                .collect::<Vec<_>>()
                .join("|");
            let re = RegexBuilder::new(&pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| PipelineError::InvalidPattern {
                    name: "placeholder",
                    pattern: pattern.clone(),
                    source,
                })?;
            Some(re)
        };

        Ok(Self {
            notices:     notices.iter().map(|n| n.trim().to_lowercase()).collect(),
            attachments: attachments.iter().map(|a| a.trim().to_lowercase()).collect(),
            placeholders,
            url:   Regex::new(r"[A-Za-z][A-Za-z0-9+.\-]*://\S+")?,
            emoji: Regex::new(
                r"[\p{Extended_Pictographic}\p{Emoji_Modifier}\u{200D}\u{FE0F}\u{20E3}\u{1F1E6}-\u{1F1FF}]",
            )?,
        })
    }

    /// Sanitizer with the built-in notice and placeholder lists
    #[cfg(test)]
    pub fn with_defaults() -> Result<Self> {
        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self::new(
            &owned(DEFAULT_SYSTEM_NOTICES),
            &owned(DEFAULT_ATTACHMENT_SUFFIXES),
            &owned(DEFAULT_INLINE_PLACEHOLDERS),
        )
    }

    /// Clean a turn's raw text line by line.
    pub fn sanitize(&self, text: &str) -> Sanitized {
        let mut out  = Sanitized::default();
        let mut kept = Vec::new();

        for line in text.lines() {
            let trimmed = line.trim();
            let lowered = trimmed.to_lowercase();

            // ── Step 1: System notices and attachment stubs ──────────────────
            if self.notices.iter().any(|n| *n == lowered)
                || self.attachments.iter().any(|a| lowered.ends_with(a.as_str()))
            {
                out.notice_lines += 1;
                continue;
            }

            // ── Step 2: Literal null payload ─────────────────────────────────
            if lowered == "null" {
                out.null_lines += 1;
                continue;
            }

            // ── Steps 3-5: Strip placeholders, links and emoji ───────────────
            let mut cleaned = match &self.placeholders {
                Some(re) => strip_matches(re, trimmed),
                None     => trimmed.to_string(),
            };
            cleaned = strip_matches(&self.url, &cleaned);
            cleaned = strip_matches(&self.emoji, &cleaned);

            // ── Step 6: Trim, keep non-empty lines ───────────────────────────
            let cleaned = cleaned.trim();
            if cleaned.is_empty() {
                out.empty_lines += 1;
            } else {
                kept.push(cleaned.to_string());
            }
        }

        out.text = kept.join("\n");
        out
    }
}

/// Remove every match of `re` from `line`. Whitespace on either
/// side of a removal shrinks to one space; the rest of the line
/// is left as written.
fn strip_matches(re: &Regex, line: &str) -> String {
    let mut out  = String::with_capacity(line.len());
    let mut last = 0;

    for m in re.find_iter(line) {
        // A match may begin inside whitespace already skipped
        let start = m.start().max(last);
        let end   = m.end().max(last);
        out.push_str(&line[last..start]);
        let kept_len = out.trim_end().len();
        let gap_before = kept_len < out.len();
        out.truncate(kept_len);

        let rest = &line[end..];
        let rest_trim = rest.trim_start();
        let gap_after = rest_trim.len() < rest.len();
        last = end + (rest.len() - rest_trim.len());

        if (gap_before || gap_after) && !out.is_empty() {
            out.push(' ');
        }
    }

    out.push_str(&line[last..]);
    out
}
