// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// user-facing goal each.
//
// Rules for this layer:
//   - No parsing or text rules here (that's Layer 4)
//   - No printing here (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Raw exports → anonymised tree
pub mod anonymize_use_case;

// Anonymised tree → pair dataset + diagnostics
pub mod build_use_case;

// Pair dataset → chat-format instruction dataset
pub mod instruct_use_case;
