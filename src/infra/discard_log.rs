// ============================================================
// Layer 6 — Discard Log
// ============================================================
// Writes every discarded item to a plain-text file so the
// filtering heuristics can be reviewed by eye:
//
//   --- REASON: automated interjection (Amigo/Amigo1.txt) ---
//   PROMPT:
//   @13135550002 previsão do tempo
//
//   REPLY:
//   Hoje faz sol.
//   --------------------
//
// Discarding is an expected outcome, not a failure, so nothing
// here is logged above debug level.

use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::domain::counters::DiscardRecord;

pub fn write(path: &Path, records: &[DiscardRecord]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Cannot create discard log '{}'", path.display()))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "--- Discard log: {} items ---\n", records.len())?;
    for record in records {
        writeln!(out, "--- REASON: {} ({}) ---", record.reason, record.file)?;
        writeln!(out, "{}", record.content)?;
        writeln!(out, "{}\n", "-".repeat(20))?;
    }
    out.flush()?;

    tracing::debug!("Wrote {} discarded items to '{}'", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::counters::{DropCounters, DropReason};

    #[test]
    fn test_writes_reason_file_and_content() {
        let mut c = DropCounters::with_discards();
        c.drop_item(DropReason::LateResponse, || "INPUT:\noi".to_string());
        c.tag_discards("Amigo/Amigo1.txt");

        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("discarded.txt");
        write(&path, c.discards()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("--- Discard log: 1 items ---"));
        assert!(text.contains("--- REASON: response threshold exceeded (Amigo/Amigo1.txt) ---"));
        assert!(text.contains("INPUT:\noi"));
    }
}
