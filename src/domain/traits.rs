// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The build use case only needs two things from storage:
// a list of conversations and the text of each one. Keeping
// that behind a trait lets the pipeline run against the real
// directory tree or an in-memory fixture in tests.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::conversation::ConversationFile;

// ─── ConversationSource ───────────────────────────────────────────────────────
/// Anything that can enumerate chat exports and read them one at a time.
///
/// Implementations:
///   - ConversationLoader → walks root/<category>/<file>.txt
pub trait ConversationSource {
    /// List every conversation, ordered by category then filename.
    /// Fails only when the source as a whole is unusable.
    fn discover(&self) -> Result<Vec<ConversationFile>>;

    /// Read the full text of one conversation.
    /// A failure here skips this file only.
    fn read(&self, file: &ConversationFile) -> Result<String>;
}
