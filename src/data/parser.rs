// ============================================================
// Layer 4 — Message Parser
// ============================================================
// Turns the text of one chat export into RawMessages.
//
// Export format (comma after the date is optional):
//
//   12/03/2024, 09:15 - Amigo1: bom dia
//   12/03/2024, 09:16 - MeuNome: bom dia!
//   segunda linha da mesma mensagem
//   12/03/2024, 09:20 - Você mudou para as mensagens temporárias.
//
// Two patterns drive the scan:
//   HEADER  — "DD/MM/YYYY,? HH:MM - " at the start of a line.
//             Any header ends the message before it.
//   MESSAGE — a header followed by "Author: text".
//             Header lines without an author are system lines.
//
// Lines that are not headers continue the current message.
//
// The parser judges STRUCTURE only. The single content check it
// makes is the literal "null" body, which the export writes for
// messages whose payload could not be exported.
//
// Reference: regex crate documentation (captures, multi-line)
//            chrono documentation (NaiveDateTime::parse_from_str)

use anyhow::Result;
use chrono::NaiveDateTime;
use regex::Regex;

use crate::domain::counters::{DropCounters, DropReason};
use crate::domain::message::RawMessage;

/// Date/time format after the optional comma has been removed
const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

pub struct MessageParser {
    header:  Regex,
    message: Regex,
}

/// A message still collecting continuation lines
struct Pending {
    timestamp: NaiveDateTime,
    author:    String,
    lines:     Vec<String>,
}

impl MessageParser {
    pub fn new() -> Result<Self> {
        let header  = Regex::new(r"^\d{2}/\d{2}/\d{4},? \d{2}:\d{2} - ")?;
        let message = Regex::new(r"^(\d{2}/\d{2}/\d{4}),? (\d{2}:\d{2}) - ([^:]+): (.*)$")?;
        Ok(Self { header, message })
    }

    /// Parse one export.
    ///
    /// Only messages authored by `primary` or `counterpart` are
    /// returned, in source order. Everything else is counted in
    /// `counters` and dropped.
    pub fn parse(
        &self,
        content:     &str,
        primary:     &str,
        counterpart: &str,
        counters:    &mut DropCounters,
    ) -> Vec<RawMessage> {
        let mut messages = Vec::new();

        // `current` is None both before the first header and while
        // skipping continuation lines of a dropped message.
        let mut current: Option<Pending> = None;
        let mut seen_header = false;

        for raw_line in content.lines() {
            counters.lines_read += 1;
            let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

            // ── Continuation line ─────────────────────────────────────────────
            if !self.header.is_match(line) {
                if let Some(pending) = current.as_mut() {
                    pending.lines.push(line.to_string());
                } else if !seen_header && !line.trim().is_empty() {
                    counters.drop_item(DropReason::OrphanLine, || line.to_string());
                }
                continue;
            }

            // ── Header line: close the previous message first ─────────────────
            seen_header = true;
            if let Some(pending) = current.take() {
                self.finish(pending, &mut messages, counters);
            }

            let Some(caps) = self.message.captures(line) else {
                counters.drop_item(DropReason::MalformedLine, || line.to_string());
                continue;
            };

            let author = caps[3].trim();
            if author != primary && author != counterpart {
                counters.drop_item(DropReason::UnknownAuthor, || line.to_string());
                continue;
            }

            let stamp = format!("{} {}", &caps[1], &caps[2]);
            let timestamp = match NaiveDateTime::parse_from_str(&stamp, TIMESTAMP_FORMAT) {
                Ok(ts) => ts,
                Err(e) => {
                    tracing::trace!("Unparsable timestamp '{}': {}", stamp, e);
                    counters.drop_item(DropReason::TimestampParseFailure, || line.to_string());
                    continue;
                }
            };

            current = Some(Pending {
                timestamp,
                author: author.to_string(),
                lines:  vec![caps[4].to_string()],
            });
        }

        if let Some(pending) = current.take() {
            self.finish(pending, &mut messages, counters);
        }

        messages
    }

    /// Turn a completed pending message into a RawMessage,
    /// unless its whole body is the "null" export artefact.
    fn finish(
        &self,
        pending:  Pending,
        messages: &mut Vec<RawMessage>,
        counters: &mut DropCounters,
    ) {
        let text = pending.lines.join("\n");

        if text.trim().eq_ignore_ascii_case("null") {
            counters.drop_item(DropReason::NullMessage, || {
                format!("{}: {}", pending.author, text)
            });
            return;
        }

        counters.messages_parsed += 1;
        messages.push(RawMessage::new(pending.timestamp, pending.author, text));
    }
}
