// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File formats the pipeline reads and writes that don't belong
// to any single stage:
//
//   config_store.rs   — PipelineConfig to and from JSON
//
//   dataset_writer.rs — the JSONL dataset, one pair per line.
//                       Its field names are the contract with
//                       the fine-tuning tools downstream.
//
//   report.rs         — the diagnostics summary printed after a
//                       build, and the counters as JSON
//
//   discard_log.rs    — optional review file listing every item
//                       the pipeline threw away and why
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Pipeline configuration persistence
pub mod config_store;

/// JSONL dataset writer
pub mod dataset_writer;

/// Run summary and JSON counters report
pub mod report;

/// Human-readable log of discarded items
pub mod discard_log;
