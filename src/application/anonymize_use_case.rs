// ============================================================
// Layer 2 — AnonymizeUseCase
// ============================================================
// First step of the workflow: copy raw exports into a new tree
// with every real name replaced. The build step only ever sees
// the anonymised tree.

use anyhow::Result;

use crate::data::anonymizer::{AnonymizeReport, Anonymizer, AnonymizerConfig};

pub struct AnonymizeUseCase {
    config: AnonymizerConfig,
}

impl AnonymizeUseCase {
    pub fn new(config: AnonymizerConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<AnonymizeReport> {
        tracing::info!(
            "Anonymising '{}' into '{}'",
            self.config.source_dir.display(),
            self.config.dest_dir.display()
        );

        let report = Anonymizer::new(self.config.clone()).run()?;

        if report.files_written == 0 {
            tracing::warn!("No export files matched the prefix '{}'", self.config.file_prefix);
        }
        Ok(report)
    }
}
