// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between a raw chat export and a list of pairs.
//
// The pipeline flows in this order:
//
//   raw exports (real names)
//       │
//       ▼
//   Anonymizer          → real names become "MeuNome" / "Amigo1"
//       │
//       ▼
//   ConversationLoader  → finds root/<category>/<file>.txt
//       │
//       ▼
//   MessageParser       → timestamped RawMessages per participant
//       │
//       ▼
//   block_turns         → same-author runs merged into Turns
//       │
//       ▼
//   InterjectionFilter  → automated-assistant exchanges removed
//       │
//       ▼
//   PairAssembler       → (input, output) pairs, using the
//                         Sanitizer on each candidate
//
// Each module is responsible for exactly one step and counts
// what it throws away in the shared DropCounters.
//
// Reference: Rust Book §13 (Iterators and Closures)

/// Rewrites exports with synthetic participant labels
pub mod anonymizer;

/// Discovers and reads conversation files
pub mod loader;

/// Tokenises export text into RawMessages
pub mod parser;

/// Merges consecutive same-author messages into Turns
pub mod blocker;

/// Drops assistant mention + reply turn pairs
pub mod interjection;

/// Cleans turn text and judges validity
pub mod sanitizer;

/// Builds (input, output) pairs under time and length limits
pub mod assembler;
