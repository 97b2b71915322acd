// ============================================================
// Layer 4 — Anonymizer
// ============================================================
// Replaces real names in chat exports with synthetic labels
// before any other processing happens.
//
// Input tree (raw exports, one folder per category):
//
//   originals/Amigo/Conversa do WhatsApp com Ana.txt
//   originals/Amigo/Conversa do WhatsApp com João.txt
//
// Output tree:
//
//   anon/Amigo/Amigo1.txt     "Ana:"    → "Amigo1:"
//   anon/Amigo/Amigo2.txt     "João:"   → "Amigo2:"
//
// and in every file the primary's real name becomes the fixed
// primary label ("MeuNome:").
//
// The counterpart's name only exists in the export FILENAME,
// so decoding it is an explicit, fallible function rather than
// a best-effort string strip.
//
// Numbering follows lexicographic filename order and only
// advances for files actually written, so re-running over the
// same tree reproduces the same labels.
//
// Reference: Rust Book §9 (Error Handling)
//            regex crate documentation (replace_all, escape)

use anyhow::{Context, Result};
use regex::{Captures, Regex};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::data::loader::{file_name_of, sorted_entries};
use crate::domain::error::{FilenameError, PipelineError};

/// Default filename prefix of an exported chat
pub const DEFAULT_EXPORT_PREFIX: &str = "Conversa do WhatsApp com ";

/// Label that replaces the primary participant's real name
pub const DEFAULT_PRIMARY_LABEL: &str = "MeuNome";

/// Extract the counterpart's display name from an export filename.
///
/// `"Conversa do WhatsApp com Ana Paula.txt"` → `"Ana Paula"`
pub fn decode_counterpart(file_name: &str, prefix: &str) -> Result<String, FilenameError> {
    let stem = file_name
        .strip_suffix(".txt")
        .ok_or_else(|| FilenameError::NotText(file_name.to_string()))?;

    let name = stem
        .strip_prefix(prefix)
        .ok_or_else(|| FilenameError::MissingPrefix {
            file:   file_name.to_string(),
            prefix: prefix.to_string(),
        })?
        .trim();

    if name.is_empty() {
        return Err(FilenameError::EmptyName(file_name.to_string()));
    }
    Ok(name.to_string())
}

/// Replace `name:` with `label:` wherever it appears in author
/// position: at the start of a line, or right after the
/// "DD/MM/YYYY, HH:MM - " prefix.
pub fn replace_author(content: &str, name: &str, label: &str) -> Result<String> {
    let pattern = format!(
        r"(?m)^((?:\d{{2}}/\d{{2}}/\d{{4}},? \d{{2}}:\d{{2}} - )?){}:",
        regex::escape(name)
    );
    let re = Regex::new(&pattern)?;
    // A closure replacer keeps '$' in the label literal
    let replaced = re.replace_all(content, |caps: &Captures| format!("{}{label}:", &caps[1]));
    Ok(replaced.into_owned())
}

#[derive(Debug, Clone)]
pub struct AnonymizerConfig {
    pub source_dir:    PathBuf,
    pub dest_dir:      PathBuf,
    /// Primary participant's name exactly as it appears in the exports
    pub real_name:     String,
    pub primary_label: String,
    pub file_prefix:   String,
}

/// Outcome of one anonymisation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnonymizeReport {
    pub categories:    usize,
    pub files_written: usize,
    pub files_skipped: usize,
}

pub struct Anonymizer {
    config: AnonymizerConfig,
}

impl Anonymizer {
    pub fn new(config: AnonymizerConfig) -> Self {
        Self { config }
    }

    /// Mirror the source tree into the destination with names replaced.
    /// A missing source directory is fatal. A category that cannot be
    /// listed or created, or a file that cannot be rewritten, is
    /// skipped and the run carries on.
    pub fn run(&self) -> Result<AnonymizeReport> {
        let cfg = &self.config;

        if !cfg.source_dir.is_dir() {
            return Err(PipelineError::MissingInputDir(cfg.source_dir.clone()).into());
        }

        let mut report = AnonymizeReport::default();

        for category_dir in sorted_entries(&cfg.source_dir)? {
            if !category_dir.is_dir() {
                continue;
            }
            let Some(category) = file_name_of(&category_dir) else {
                tracing::warn!("Skipping folder with non UTF-8 name: {}", category_dir.display());
                continue;
            };

            let entries = match sorted_entries(&category_dir) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("Skipping category '{}': {:#}", category, e);
                    continue;
                }
            };
            let files: Vec<PathBuf> = entries.into_iter().filter(|p| p.is_file()).collect();

            let dest_category = cfg.dest_dir.join(&category);
            if let Err(e) = fs::create_dir_all(&dest_category) {
                tracing::warn!(
                    "Skipping category '{}': cannot create '{}': {}",
                    category,
                    dest_category.display(),
                    e
                );
                report.files_skipped += files.len();
                continue;
            }

            tracing::info!("Anonymising category '{}'", category);
            report.categories += 1;
            let mut next_index = 1usize;

            for path in files {
                let Some(file_name) = file_name_of(&path) else {
                    report.files_skipped += 1;
                    continue;
                };

                let counterpart = match decode_counterpart(&file_name, &cfg.file_prefix) {
                    Ok(name) => name,
                    Err(e) => {
                        tracing::warn!("Skipping '{}': {}", path.display(), e);
                        report.files_skipped += 1;
                        continue;
                    }
                };

                let label  = format!("{category}{next_index}");
                let target = dest_category.join(format!("{label}.txt"));

                match self.rewrite_file(&path, &target, &counterpart, &label) {
                    Ok(()) => {
                        tracing::info!("  '{}' -> '{}.txt'", file_name, label);
                        report.files_written += 1;
                        next_index += 1;
                    }
                    Err(e) => {
                        tracing::warn!("Skipping '{}': {:#}", path.display(), e);
                        report.files_skipped += 1;
                    }
                }
            }
        }

        Ok(report)
    }

    fn rewrite_file(&self, source: &Path, target: &Path, counterpart: &str, label: &str) -> Result<()> {
        let content = fs::read_to_string(source)
            .with_context(|| format!("Cannot read '{}'", source.display()))?;

        let content = replace_author(&content, counterpart, label)?;
        let content = replace_author(&content, &self.config.real_name, &self.config.primary_label)?;

        fs::write(target, content)
            .with_context(|| format!("Cannot write '{}'", target.display()))?;
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_counterpart() {
        assert_eq!(
            decode_counterpart("Conversa do WhatsApp com Ana Paula.txt", DEFAULT_EXPORT_PREFIX),
            Ok("Ana Paula".to_string())
        );
    }

    #[test]
    fn test_decode_rejects_non_conforming_names() {
        assert!(matches!(
            decode_counterpart("notas.md", DEFAULT_EXPORT_PREFIX),
            Err(FilenameError::NotText(_))
        ));
        assert!(matches!(
            decode_counterpart("chat com Ana.txt", DEFAULT_EXPORT_PREFIX),
            Err(FilenameError::MissingPrefix { .. })
        ));
        assert!(matches!(
            decode_counterpart("Conversa do WhatsApp com .txt", DEFAULT_EXPORT_PREFIX),
            Err(FilenameError::EmptyName(_))
        ));
    }

    #[test]
    fn test_replace_author_only_in_author_position() {
        let content = "01/01/2024, 10:00 - Ana: oi, o Ana: é você?\n\
                       Ana: linha solta\n\
                       01/01/2024, 10:01 - Augusto: oi Ana";
        let out = replace_author(content, "Ana", "Amigo1").unwrap();
        let out = replace_author(&out, "Augusto", "MeuNome").unwrap();

        assert_eq!(
            out,
            "01/01/2024, 10:00 - Amigo1: oi, o Ana: é você?\n\
             Amigo1: linha solta\n\
             01/01/2024, 10:01 - MeuNome: oi Ana"
        );
    }

    #[test]
    fn test_replace_author_escapes_regex_characters() {
        let out = replace_author("01/01/2024 10:00 - Zé (trampo): oi", "Zé (trampo)", "Trabalho1").unwrap();
        assert_eq!(out, "01/01/2024 10:00 - Trabalho1: oi");
    }

    #[test]
    fn test_run_mirrors_tree_with_sequential_labels() {
        let src  = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let amigo = src.path().join("Amigo");
        fs::create_dir_all(&amigo).unwrap();

        fs::write(
            amigo.join("Conversa do WhatsApp com João.txt"),
            "01/01/2024, 10:00 - João: oi\n01/01/2024, 10:01 - Augusto: fala",
        )
        .unwrap();
        fs::write(
            amigo.join("Conversa do WhatsApp com Ana.txt"),
            "01/01/2024, 10:00 - Ana: oi",
        )
        .unwrap();
        fs::write(amigo.join("leia-me.txt"), "ignorar").unwrap();

        let report = Anonymizer::new(AnonymizerConfig {
            source_dir:    src.path().to_path_buf(),
            dest_dir:      dest.path().to_path_buf(),
            real_name:     "Augusto".to_string(),
            primary_label: DEFAULT_PRIMARY_LABEL.to_string(),
            file_prefix:   DEFAULT_EXPORT_PREFIX.to_string(),
        })
        .run()
        .unwrap();

        assert_eq!(report, AnonymizeReport { categories: 1, files_written: 2, files_skipped: 1 });

        // "Ana" sorts before "João", so Ana gets label 1
        let first  = fs::read_to_string(dest.path().join("Amigo/Amigo1.txt")).unwrap();
        let second = fs::read_to_string(dest.path().join("Amigo/Amigo2.txt")).unwrap();
        assert_eq!(first, "01/01/2024, 10:00 - Amigo1: oi");
        assert_eq!(second, "01/01/2024, 10:00 - Amigo2: oi\n01/01/2024, 10:01 - MeuNome: fala");

        // Source tree untouched
        assert!(amigo.join("Conversa do WhatsApp com Ana.txt").exists());
    }

    #[test]
    fn test_replace_author_keeps_dollar_in_label() {
        let out = replace_author("01/01/2024, 10:00 - Ana: oi", "Ana", "R$1").unwrap();
        assert_eq!(out, "01/01/2024, 10:00 - R$1: oi");
    }

    fn config(src: &Path, dest: &Path) -> AnonymizerConfig {
        AnonymizerConfig {
            source_dir:    src.to_path_buf(),
            dest_dir:      dest.to_path_buf(),
            real_name:     "Augusto".to_string(),
            primary_label: DEFAULT_PRIMARY_LABEL.to_string(),
            file_prefix:   DEFAULT_EXPORT_PREFIX.to_string(),
        }
    }

    #[test]
    fn test_unwritable_category_is_skipped_and_run_continues() {
        let src  = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        for category in ["Amigo", "Familia"] {
            fs::create_dir_all(src.path().join(category)).unwrap();
        }
        fs::write(
            src.path().join("Amigo/Conversa do WhatsApp com Ana.txt"),
            "01/01/2024, 10:00 - Ana: oi",
        )
        .unwrap();
        fs::write(
            src.path().join("Familia/Conversa do WhatsApp com Mãe.txt"),
            "01/01/2024, 10:00 - Mãe: oi filho",
        )
        .unwrap();

        // A plain file where the category folder should go
        fs::write(dest.path().join("Amigo"), "").unwrap();

        let report = Anonymizer::new(config(src.path(), dest.path())).run().unwrap();

        assert_eq!(report, AnonymizeReport { categories: 1, files_written: 1, files_skipped: 1 });
        let written = fs::read_to_string(dest.path().join("Familia/Familia1.txt")).unwrap();
        assert_eq!(written, "01/01/2024, 10:00 - Familia1: oi filho");
    }

    #[test]
    fn test_unreadable_file_is_skipped_without_using_a_label() {
        let src  = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let amigo = src.path().join("Amigo");
        fs::create_dir_all(&amigo).unwrap();

        // Not valid UTF-8, so reading it as text fails
        fs::write(amigo.join("Conversa do WhatsApp com Ana.txt"), [0xff, 0xfe, 0x00]).unwrap();
        fs::write(
            amigo.join("Conversa do WhatsApp com João.txt"),
            "01/01/2024, 10:00 - João: oi",
        )
        .unwrap();

        let report = Anonymizer::new(config(src.path(), dest.path())).run().unwrap();

        assert_eq!(report, AnonymizeReport { categories: 1, files_written: 1, files_skipped: 1 });
        let written = fs::read_to_string(dest.path().join("Amigo/Amigo1.txt")).unwrap();
        assert_eq!(written, "01/01/2024, 10:00 - Amigo1: oi");
        assert!(!dest.path().join("Amigo/Amigo2.txt").exists());
    }

    #[test]
    fn test_blocked_target_is_skipped() {
        let src  = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        fs::create_dir_all(src.path().join("Amigo")).unwrap();
        fs::write(
            src.path().join("Amigo/Conversa do WhatsApp com Ana.txt"),
            "01/01/2024, 10:00 - Ana: oi",
        )
        .unwrap();

        // A directory sits where the output file would be written
        fs::create_dir_all(dest.path().join("Amigo/Amigo1.txt")).unwrap();

        let report = Anonymizer::new(config(src.path(), dest.path())).run().unwrap();
        assert_eq!(report, AnonymizeReport { categories: 1, files_written: 0, files_skipped: 1 });
    }

    #[test]
    fn test_run_fails_on_missing_source() {
        let dest   = tempfile::tempdir().unwrap();
        let result = Anonymizer::new(AnonymizerConfig {
            source_dir:    dest.path().join("nope"),
            dest_dir:      dest.path().to_path_buf(),
            real_name:     "Augusto".to_string(),
            primary_label: DEFAULT_PRIMARY_LABEL.to_string(),
            file_prefix:   DEFAULT_EXPORT_PREFIX.to_string(),
        })
        .run();
        assert!(result.is_err());
    }
}
