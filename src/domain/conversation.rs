// ============================================================
// Layer 3 — Conversation File Domain Type
// ============================================================
// Describes one chat export discovered on disk.
//
// The input tree is organised as:
//
//   root/
//     Amigo/
//       Amigo1.txt
//       Amigo2.txt
//     Familia/
//       Familia1.txt
//
// so every file carries two pieces of metadata for free:
//   - category:    the folder it lives in
//   - counterpart: the file stem, which after anonymisation is
//                  exactly the label used for the other person
//                  inside the file ("Amigo1: ...")
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationFile {
    /// Folder name, attached to every pair from this file
    pub category: String,

    /// Author label of the non-primary participant
    pub counterpart: String,

    /// Full path to the .txt export
    pub path: PathBuf,
}

impl ConversationFile {
    pub fn new(
        category:    impl Into<String>,
        counterpart: impl Into<String>,
        path:        impl Into<PathBuf>,
    ) -> Self {
        Self {
            category:    category.into(),
            counterpart: counterpart.into(),
            path:        path.into(),
        }
    }

    /// Short "category/file.txt" form used in logs and reports
    pub fn display_name(&self) -> String {
        let file = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        format!("{}/{}", self.category, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_joins_category_and_file() {
        let f = ConversationFile::new("Amigo", "Amigo1", "/data/Amigo/Amigo1.txt");
        assert_eq!(f.display_name(), "Amigo/Amigo1.txt");
    }
}
