// ============================================================
// Layer 2 — InstructUseCase
// ============================================================
// Converts the pair dataset into chat-format training records.
//
// Input line (dataset):
//   {"input":"bora?","output":"bora!","categoria":"Amigo"}
//
// Template file (system prompt), with a {categoria} placeholder:
//   Você está conversando com alguém da categoria {categoria}.
//
// Output line (one JSON array per line):
//   [{"role":"system","content":"Você está ... categoria Amigo."},
//    {"role":"user","content":"bora?"},
//    {"role":"assistant","content":"bora!"}]
//
// Records with an empty input or output are skipped; lines that
// are not valid JSON are warned about and skipped. A missing
// dataset or template stops the run.
//
// Reference: serde documentation (default values)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::infra::dataset_writer::DatasetWriter;

/// Category used when a dataset line has none
const UNKNOWN_CATEGORY: &str = "desconhecido";

/// Placeholder replaced by each record's category
const CATEGORY_PLACEHOLDER: &str = "{categoria}";

#[derive(Debug, Clone)]
pub struct InstructConfig {
    pub dataset:  PathBuf,
    pub template: PathBuf,
    pub output:   PathBuf,
}

/// A dataset line, tolerant of missing fields
#[derive(Debug, Deserialize)]
struct DatasetRecord {
    #[serde(default)]
    input:     String,
    #[serde(default)]
    output:    String,
    categoria: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role:    String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self { role: role.to_string(), content: content.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructReport {
    pub written:    usize,
    /// Records with an empty input or output
    pub incomplete: usize,
    pub malformed:  usize,
}

pub struct InstructUseCase {
    config: InstructConfig,
}

impl InstructUseCase {
    pub fn new(config: InstructConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<InstructReport> {
        let cfg = &self.config;

        let template = fs::read_to_string(&cfg.template)
            .with_context(|| format!("Cannot read template '{}'", cfg.template.display()))?;
        let dataset = fs::read_to_string(&cfg.dataset)
            .with_context(|| format!("Cannot read dataset '{}'", cfg.dataset.display()))?;

        let mut report        = InstructReport::default();
        let mut conversations = Vec::new();

        for (n, line) in dataset.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let record: DatasetRecord = match serde_json::from_str(line) {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!("Skipping malformed line {}: {}", n + 1, e);
                    report.malformed += 1;
                    continue;
                }
            };

            if record.input.is_empty() || record.output.is_empty() {
                report.incomplete += 1;
                continue;
            }

            conversations.push(format_record(&template, record));
        }

        report.written = DatasetWriter::create(&cfg.output)?.write_all(&conversations)?;
        tracing::info!(
            "Wrote {} instruction examples to '{}'",
            report.written,
            cfg.output.display()
        );
        Ok(report)
    }
}

fn format_record(template: &str, record: DatasetRecord) -> Vec<ChatMessage> {
    let category = record.categoria.as_deref().unwrap_or(UNKNOWN_CATEGORY);
    vec![
        ChatMessage::new("system", template.replace(CATEGORY_PLACEHOLDER, category)),
        ChatMessage::new("user", record.input),
        ChatMessage::new("assistant", record.output),
    ]
}
