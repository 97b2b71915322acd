// ============================================================
// Layer 6 — Dataset Writer
// ============================================================
// Writes pairs as newline-delimited JSON, one object per line:
//
//   {"input":"oi","output":"e aí","categoria":"Amigo"}
//
// This file is the public contract of the pipeline. Fine-tuning
// and instruction-formatting tools read it line by line, so
// each record must be a single line (serde_json escapes any
// '\n' inside the strings) and non-ASCII text is written as-is.
//
// The file is truncated on create: a dataset is always the
// output of exactly one run.
//
// Reference: Rust Book §12 (I/O and File Handling)
//            serde_json documentation (to_writer)

use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

pub struct DatasetWriter {
    path:   PathBuf,
    writer: BufWriter<File>,
}

impl DatasetWriter {
    /// Create (or truncate) the dataset file, creating parent dirs.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
        }

        let file = File::create(&path)
            .with_context(|| format!("Cannot create dataset file '{}'", path.display()))?;

        Ok(Self { path, writer: BufWriter::new(file) })
    }

    /// Write one record per line and flush.
    /// Returns the number of records written.
    pub fn write_all<T: Serialize>(mut self, records: &[T]) -> Result<usize> {
        for record in records {
            serde_json::to_writer(&mut self.writer, record)
                .context("Failed to serialise dataset record")?;
            self.writer.write_all(b"\n")?;
        }

        self.writer
            .flush()
            .with_context(|| format!("Cannot write '{}'", self.path.display()))?;

        tracing::debug!("Wrote {} records to '{}'", records.len(), self.path.display());
        Ok(records.len())
    }
}
