// ============================================================
// Layer 6 — Diagnostics Report
// ============================================================
// Explains where a run's data went. Two forms:
//
//   summary()     — human-readable text printed after `build`
//   write_json()  — every counter as JSON, for scripts
//
// Example summary:
//
//   --- Pipeline summary ---
//   Files processed:         12
//   Files skipped:            0
//   Pairs emitted:         3481
//
//   Parser
//     lines read ...
//
// The text layout is not a contract; the JSON field names are
// the DropCounters field names.
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{fmt::Write as _, fs, path::Path};

use crate::application::build_use_case::PipelineConfig;
use crate::domain::counters::DropCounters;

/// Write all counters to `path` as pretty JSON.
pub fn write_json(path: &Path, counters: &DropCounters) -> Result<()> {
    let json = serde_json::to_string_pretty(counters)?;
    fs::write(path, json)
        .with_context(|| format!("Cannot write report to '{}'", path.display()))?;
    tracing::debug!("Saved run report to '{}'", path.display());
    Ok(())
}

/// Render the human-readable summary of a run.
pub fn summary(c: &DropCounters, cfg: &PipelineConfig) -> String {
    let mut s = String::new();

    // writeln! into a String cannot fail
    let _ = writeln!(s, "--- Pipeline summary ---");
    if c.files_processed == 0 {
        let _ = writeln!(s, "No conversation files were processed; the dataset is empty.");
    }
    let _ = writeln!(s, "Files processed:       {:>6}", c.files_processed);
    let _ = writeln!(s, "Files skipped:         {:>6}", c.files_skipped);
    let _ = writeln!(s, "Pairs emitted:         {:>6}", c.pairs_emitted);
    let _ = writeln!(s, "Items dropped:         {:>6}", c.total_dropped());

    let _ = writeln!(s, "\nParser");
    row(&mut s, "lines read", c.lines_read);
    row(&mut s, "messages parsed", c.messages_parsed);
    row(&mut s, "malformed lines", c.malformed_lines);
    row(&mut s, "text before first message", c.orphan_lines);
    row(&mut s, "unknown author", c.unknown_author);
    row(&mut s, "timestamp parse failures", c.timestamp_parse_failures);
    row(&mut s, "null messages", c.null_messages);

    let _ = writeln!(s, "\nTurns");
    row(&mut s, "turns built", c.turns_built);
    row(&mut s, "automated interjections", c.interjections);

    let _ = writeln!(s, "\nPairs");
    row(&mut s, "candidate pairs", c.candidate_pairs);
    row(
        &mut s,
        &format!("reply later than {}h", cfg.threshold_hours),
        c.late_response,
    );
    row(&mut s, "invalid after sanitising", c.invalid_content);
    row(
        &mut s,
        &format!("input over {} chars", cfg.max_input_chars),
        c.input_too_long,
    );

    let _ = writeln!(s, "\nSanitiser (lines)");
    row(&mut s, "system notices removed", c.notice_lines_removed);
    row(&mut s, "null lines removed", c.null_lines_removed);
    row(&mut s, "empty lines removed", c.empty_lines_removed);

    s
}

fn row(s: &mut String, label: &str, value: usize) {
    let _ = writeln!(s, "  {:<28}{:>8}", label, value);
}
