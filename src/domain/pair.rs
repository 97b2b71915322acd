// ============================================================
// Layer 3 — Pair Domain Type
// ============================================================
// The unit of training data produced by the pipeline:
//   - input:    what the counterpart said
//   - output:   how the primary participant answered
//   - category: the relationship folder the chat came from
//
// The JSON field for the category is "categoria". Fine-tuning
// and instruction-formatting tools read the dataset by these
// exact names, so the rename must never change.
//
// Example line in the dataset file:
//   {"input":"bora almoçar?","output":"bora!","categoria":"Amigo"}
//
// Reference: Rust Book §5 (Structs)
//            serde documentation (field attributes)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    /// Sanitised text of the counterpart's turn
    pub input: String,

    /// Sanitised text of the primary participant's reply
    pub output: String,

    /// Source folder name, e.g. "Amigo" or "Familia"
    #[serde(rename = "categoria")]
    pub category: String,
}

impl Pair {
    pub fn new(
        input:    impl Into<String>,
        output:   impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            input:    input.into(),
            output:   output.into(),
            category: category.into(),
        }
    }
}
