// ============================================================
// Layer 2 — BuildUseCase
// ============================================================
// Turns a tree of anonymised chat exports into the dataset file.
//
// For every conversation, one at a time:
//
//   Step 1: Read the file              (Layer 4 - loader)
//   Step 2: Parse messages             (Layer 4 - parser)
//   Step 3: Merge into turns           (Layer 4 - blocker)
//   Step 4: Remove interjections       (Layer 4 - interjection)
//   Step 5: Assemble + sanitise pairs  (Layer 4 - assembler)
//   Step 6: Merge the file's counters into the run total
//
// Then, once for the whole run:
//
//   Step 7: Write the dataset JSONL    (Layer 6 - dataset_writer)
//   Step 8: Write optional report / discard log
//
// A file that cannot be read is skipped; it never stops the run.
// A missing input directory stops the run before anything is written.
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::Result;
use chrono::Duration;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    anonymizer::DEFAULT_PRIMARY_LABEL,
    assembler::PairAssembler,
    blocker::block_turns,
    interjection::{InterjectionFilter, DEFAULT_MENTION_PATTERN},
    loader::ConversationLoader,
    parser::MessageParser,
    sanitizer::{
        Sanitizer, DEFAULT_ATTACHMENT_SUFFIXES, DEFAULT_INLINE_PLACEHOLDERS,
        DEFAULT_SYSTEM_NOTICES,
    },
};
use crate::domain::{
    conversation::ConversationFile,
    counters::DropCounters,
    error::PipelineError,
    pair::Pair,
    traits::ConversationSource,
};
use crate::infra::{dataset_writer::DatasetWriter, discard_log, report};

// ─── Pipeline Configuration ──────────────────────────────────────────────────
// Every knob of the pipeline. Serialisable so a run can be
// reproduced from a JSON file; missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Author label of the persona being modelled
    pub primary_label:       String,
    /// Replies slower than this are not paired
    pub threshold_hours:     f64,
    /// Longest sanitised input kept, in characters
    pub max_input_chars:     usize,
    pub system_notices:      Vec<String>,
    pub attachment_suffixes: Vec<String>,
    pub inline_placeholders: Vec<String>,
    /// Regex marking a turn that addresses an automated assistant
    pub mention_pattern:     String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let owned = |list: &[&str]| -> Vec<String> { list.iter().map(|s| s.to_string()).collect() };
        Self {
            primary_label:       DEFAULT_PRIMARY_LABEL.to_string(),
            threshold_hours:     5.0,
            max_input_chars:     2000,
            system_notices:      owned(DEFAULT_SYSTEM_NOTICES),
            attachment_suffixes: owned(DEFAULT_ATTACHMENT_SUFFIXES),
            inline_placeholders: owned(DEFAULT_INLINE_PLACEHOLDERS),
            mention_pattern:     DEFAULT_MENTION_PATTERN.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Response threshold as a chrono Duration (second precision).
    /// NaN, infinite, negative and out-of-range hours are rejected.
    pub fn threshold(&self) -> Result<Duration, PipelineError> {
        let hours = self.threshold_hours;
        if !hours.is_finite() || hours < 0.0 {
            return Err(PipelineError::InvalidThreshold(hours));
        }
        // `as i64` saturates, so anything too large lands on i64::MAX
        // and is refused by try_seconds below.
        let secs = (hours * 3600.0).round() as i64;
        Duration::try_seconds(secs).ok_or(PipelineError::InvalidThreshold(hours))
    }
}

/// Where a build run reads from and writes to
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub input_dir:   PathBuf,
    pub output:      PathBuf,
    /// Counters as JSON, if requested
    pub report:      Option<PathBuf>,
    /// Every discarded item with its reason, if requested
    pub discard_log: Option<PathBuf>,
    pub pipeline:    PipelineConfig,
}

/// Result of a completed build run
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub pairs:    Vec<Pair>,
    pub counters: DropCounters,
    /// Human-readable diagnostics summary
    pub summary:  String,
}

// ─── Pipeline ────────────────────────────────────────────────────────────────
// The compiled stages, built once per run and reused for every file.
pub struct Pipeline {
    config:       PipelineConfig,
    threshold:    Duration,
    parser:       MessageParser,
    interjection: InterjectionFilter,
    sanitizer:    Sanitizer,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let mention = Regex::new(&config.mention_pattern).map_err(|source| {
            PipelineError::InvalidPattern {
                name:    "mention",
                pattern: config.mention_pattern.clone(),
                source,
            }
        })?;
        let threshold = config.threshold()?;
        let sanitizer = Sanitizer::new(
            &config.system_notices,
            &config.attachment_suffixes,
            &config.inline_placeholders,
        )?;

        Ok(Self {
            parser: MessageParser::new()?,
            threshold,
            interjection: InterjectionFilter::new(mention),
            sanitizer,
            config,
        })
    }

    /// Run Steps 2-5 over the text of one conversation.
    pub fn process(
        &self,
        content:  &str,
        file:     &ConversationFile,
        counters: &mut DropCounters,
    ) -> Vec<Pair> {
        let primary     = self.config.primary_label.as_str();
        let counterpart = file.counterpart.as_str();

        // ── Step 2: Parse ────────────────────────────────────────────────────
        let messages = self.parser.parse(content, primary, counterpart, counters);

        // ── Step 3: Block ────────────────────────────────────────────────────
        let turns = block_turns(messages);
        counters.turns_built += turns.len();

        // ── Step 4: Interjections ────────────────────────────────────────────
        let turns = self.interjection.filter(turns, primary, counterpart, counters);

        // ── Step 5: Pairs ────────────────────────────────────────────────────
        let assembler = PairAssembler::new(
            primary,
            self.threshold,
            self.config.max_input_chars,
            &self.sanitizer,
        );
        assembler.assemble(&turns, &file.category, counters)
    }

    /// Drive every conversation in `source` through the pipeline.
    pub fn run(
        &self,
        source:        &dyn ConversationSource,
        keep_discards: bool,
    ) -> Result<(Vec<Pair>, DropCounters)> {
        let files = source.discover()?;

        let mut pairs = Vec::new();
        let mut total = DropCounters::default();

        for file in &files {
            let name = file.display_name();

            // ── Step 1: Read ─────────────────────────────────────────────────
            let content = match source.read(file) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!("Skipping '{}': {:#}", name, e);
                    total.files_skipped += 1;
                    continue;
                }
            };

            let mut counters = if keep_discards {
                DropCounters::with_discards()
            } else {
                DropCounters::default()
            };
            counters.files_processed = 1;

            let file_pairs = self.process(&content, file, &mut counters);
            tracing::info!(
                "{}: {} messages, {} turns, {} pairs",
                name,
                counters.messages_parsed,
                counters.turns_built,
                file_pairs.len()
            );

            // ── Step 6: Reduce ───────────────────────────────────────────────
            counters.tag_discards(&name);
            total.merge(counters);
            pairs.extend(file_pairs);
        }

        Ok((pairs, total))
    }
}

// ─── BuildUseCase ─────────────────────────────────────────────────────────────
pub struct BuildUseCase {
    config: BuildConfig,
}

impl BuildUseCase {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Execute the full build end to end
    pub fn execute(&self) -> Result<BuildOutcome> {
        let cfg = &self.config;

        tracing::info!("Building dataset from '{}'", cfg.input_dir.display());
        let pipeline = Pipeline::new(cfg.pipeline.clone())?;
        let loader   = ConversationLoader::new(&cfg.input_dir);

        let (pairs, counters) = pipeline.run(&loader, cfg.discard_log.is_some())?;

        if counters.files_processed == 0 {
            tracing::warn!("No readable conversation files found, writing an empty dataset");
        }

        // ── Step 7: Dataset ──────────────────────────────────────────────────
        let written = DatasetWriter::create(&cfg.output)?.write_all(&pairs)?;
        tracing::info!("Wrote {} pairs to '{}'", written, cfg.output.display());

        // ── Step 8: Diagnostics ──────────────────────────────────────────────
        if let Some(path) = &cfg.report {
            report::write_json(path, &counters)?;
        }
        if let Some(path) = &cfg.discard_log {
            discard_log::write(path, counters.discards())?;
        }

        let summary = report::summary(&counters, &cfg.pipeline);
        Ok(BuildOutcome { pairs, counters, summary })
    }
}
