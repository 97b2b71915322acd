// ============================================================
// Layer 6 — Config Store
// ============================================================
// Saves and loads PipelineConfig as JSON.
//
// Why keep the config in a file?
//   The denylist of system notices and the placeholder markers
//   depend on the export language. Keeping them in a file lets
//   a run be repeated exactly, and lets a different locale be
//   supported without rebuilding.
//
// Fields missing from the file take their default values, so a
// config may contain only the settings it changes:
//
//   { "threshold_hours": 3, "primary_label": "Me" }
//
// Reference: Rust Book §9 (Error Handling)
//            serde documentation (#[serde(default)])

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::application::build_use_case::PipelineConfig;

/// Write `cfg` as pretty JSON, creating parent directories.
pub fn save_config(path: &Path, cfg: &PipelineConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(cfg)?;
    fs::write(path, json)
        .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

    tracing::debug!("Saved pipeline config to '{}'", path.display());
    Ok(())
}

/// Load a config written by `save_config` (or by hand).
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read config from '{}'", path.display()))?;

    serde_json::from_str(&json)
        .with_context(|| format!("Invalid pipeline config in '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load_gives_same_config() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg/pipeline.json");
        let cfg  = PipelineConfig {
            primary_label: "Me".to_string(),
            threshold_hours: 2.0,
            ..Default::default()
        };

        save_config(&path, &cfg).unwrap();
        assert_eq!(load_config(&path).unwrap(), cfg);
    }

    #[test]
    fn test_load_reports_bad_json() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid pipeline config"));
    }
}
