// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that define what the
// pipeline works with. No file I/O and no regexes live here.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A chat export discovered on disk
pub mod conversation;

// Parsed messages and merged turns
pub mod message;

// The (input, output, category) training pair
pub mod pair;

// Per-run drop counters and discard records
pub mod counters;

// Typed errors for run-level failures
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
