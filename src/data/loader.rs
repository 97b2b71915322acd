// ============================================================
// Layer 4 — Conversation Loader
// ============================================================
// Finds chat exports in a category tree and reads them.
//
//   root/
//     Amigo/Amigo1.txt      → category "Amigo", counterpart "Amigo1"
//     Familia/Familia1.txt  → category "Familia", counterpart "Familia1"
//
// Discovery and reading are separate steps so the build use case
// can read, process and release one file before touching the
// next, and so a single unreadable file only skips that file.
//
// Loose files at the root and non-.txt files inside a category
// are ignored with a debug message.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::conversation::ConversationFile;
use crate::domain::error::PipelineError;
use crate::domain::traits::ConversationSource;

/// Loads exports from root/<category>/<file>.txt
pub struct ConversationLoader {
    root: PathBuf,
}

impl ConversationLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ConversationSource for ConversationLoader {
    fn discover(&self) -> Result<Vec<ConversationFile>> {
        // A missing root is fatal: there is nothing to report on
        if !self.root.is_dir() {
            return Err(PipelineError::MissingInputDir(self.root.clone()).into());
        }

        let mut files      = Vec::new();
        let mut categories = 0usize;

        for category_dir in sorted_entries(&self.root)? {
            if !category_dir.is_dir() {
                tracing::debug!("Ignoring loose file '{}'", category_dir.display());
                continue;
            }
            let Some(category) = file_name_of(&category_dir) else {
                tracing::warn!("Skipping folder with non UTF-8 name: {}", category_dir.display());
                continue;
            };
            categories += 1;

            match discover_category(&category_dir, &category) {
                Ok(found) => files.extend(found),
                Err(e)    => tracing::warn!("Skipping category '{}': {:#}", category, e),
            }
        }

        if categories == 0 {
            return Err(PipelineError::EmptyInputDir(self.root.clone()).into());
        }

        tracing::info!(
            "Discovered {} conversation files in {} categories",
            files.len(),
            categories
        );
        Ok(files)
    }

    fn read(&self, file: &ConversationFile) -> Result<String> {
        fs::read_to_string(&file.path)
            .with_context(|| format!("Cannot read '{}'", file.path.display()))
    }
}

/// The .txt exports of one category folder, in path order
fn discover_category(category_dir: &Path, category: &str) -> Result<Vec<ConversationFile>> {
    let mut files = Vec::new();

    for path in sorted_entries(category_dir)? {
        let is_txt = path.extension().and_then(|e| e.to_str()) == Some("txt");
        if !path.is_file() || !is_txt {
            tracing::debug!("Ignoring '{}'", path.display());
            continue;
        }

        let counterpart = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string);

        match counterpart {
            Some(counterpart) => files.push(ConversationFile::new(category, counterpart, path)),
            None => tracing::warn!("Skipping non UTF-8 filename: {}", path.display()),
        }
    }

    Ok(files)
}

/// Directory entries sorted by path for a stable processing order
pub(crate) fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("Cannot read directory '{}'", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}

pub(crate) fn file_name_of(path: &Path) -> Option<String> {
    path.file_name().and_then(|n| n.to_str()).map(str::to_string)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovers_txt_files_per_category_in_order() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("Familia")).unwrap();
        fs::create_dir_all(root.path().join("Amigo")).unwrap();
        fs::write(root.path().join("Amigo/Amigo2.txt"), "").unwrap();
        fs::write(root.path().join("Amigo/Amigo1.txt"), "").unwrap();
        fs::write(root.path().join("Amigo/foto.jpg"), "").unwrap();
        fs::write(root.path().join("Familia/Familia1.txt"), "").unwrap();
        fs::write(root.path().join("solto.txt"), "").unwrap();

        let files = ConversationLoader::new(root.path()).discover().unwrap();
        let names: Vec<(String, String)> = files
            .iter()
            .map(|f| (f.category.clone(), f.counterpart.clone()))
            .collect();

        assert_eq!(
            names,
            vec![
                ("Amigo".to_string(), "Amigo1".to_string()),
                ("Amigo".to_string(), "Amigo2".to_string()),
                ("Familia".to_string(), "Familia1".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let root   = tempfile::tempdir().unwrap();
        let result = ConversationLoader::new(root.path().join("missing")).discover();
        let err    = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::MissingInputDir(_))
        ));
    }

    #[test]
    fn test_root_without_categories_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("solto.txt"), "").unwrap();
        let err = ConversationLoader::new(root.path()).discover().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::EmptyInputDir(_))
        ));
    }

    #[test]
    fn test_missing_category_is_skipped_not_fatal() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("Amigo")).unwrap();
        fs::write(root.path().join("Amigo/Amigo1.txt"), "").unwrap();

        let files = discover_category(&root.path().join("Sumiu"), "Sumiu");
        assert!(files.is_err());

        let files = ConversationLoader::new(root.path()).discover().unwrap();
        assert_eq!(files.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_unlistable_category_does_not_stop_discovery() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("Amigo")).unwrap();
        fs::create_dir_all(root.path().join("Familia")).unwrap();
        fs::write(root.path().join("Amigo/Amigo1.txt"), "").unwrap();
        fs::write(root.path().join("Familia/Familia1.txt"), "").unwrap();

        let locked = root.path().join("Amigo");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        let still_readable = fs::read_dir(&locked).is_ok();

        let files = ConversationLoader::new(root.path()).discover().unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        // Permission bits do not apply to root; nothing to check then
        if still_readable {
            return;
        }
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].category, "Familia");
    }

    #[test]
    fn test_empty_category_is_not_an_error() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("Amigo")).unwrap();
        let files = ConversationLoader::new(root.path()).discover().unwrap();
        assert!(files.is_empty());
    }
}
