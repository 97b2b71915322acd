// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands of the workflow, in the order they
// are normally run:
//
//   anonymize   raw exports → anonymised tree
//   build       anonymised tree → dataset.jsonl + summary
//   instruct    dataset.jsonl → chat-format instruction dataset
//   init-config write the default pipeline config to edit
//
// Pipeline settings for `build` are layered:
//   defaults  <  --config file  <  individual flags
// so the flags below are Options with no clap default.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::build_use_case::PipelineConfig;
use crate::application::instruct_use_case::InstructConfig;
use crate::data::anonymizer::{AnonymizerConfig, DEFAULT_EXPORT_PREFIX, DEFAULT_PRIMARY_LABEL};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replace real names in chat exports with synthetic labels
    Anonymize(AnonymizeArgs),

    /// Build the (input, output) pair dataset from anonymised exports
    Build(BuildArgs),

    /// Wrap a pair dataset in system/user/assistant chat records
    Instruct(InstructArgs),

    /// Write the default pipeline config as JSON
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    /// Folder with one sub-folder of raw exports per category
    #[arg(long, default_value = "conversas_originais")]
    pub source: PathBuf,

    /// Folder the anonymised tree is written to
    #[arg(long, default_value = "conversas_padronizadas")]
    pub dest: PathBuf,

    /// Your name exactly as it appears in the exports
    #[arg(long)]
    pub real_name: String,

    /// Label that replaces your name
    #[arg(long, default_value = DEFAULT_PRIMARY_LABEL)]
    pub primary_label: String,

    /// Export filename prefix before the other person's name
    #[arg(long, default_value = DEFAULT_EXPORT_PREFIX)]
    pub prefix: String,
}

impl From<AnonymizeArgs> for AnonymizerConfig {
    fn from(a: AnonymizeArgs) -> Self {
        AnonymizerConfig {
            source_dir:    a.source,
            dest_dir:      a.dest,
            real_name:     a.real_name,
            primary_label: a.primary_label,
            file_prefix:   a.prefix,
        }
    }
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Anonymised tree: <input>/<category>/<file>.txt
    #[arg(long, default_value = "conversas_padronizadas")]
    pub input: PathBuf,

    /// Dataset file to write (JSON lines)
    #[arg(long, default_value = "dataset_final.jsonl")]
    pub output: PathBuf,

    /// Pipeline config JSON (see `init-config`)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Author label of the persona being modelled [default: MeuNome]
    #[arg(long)]
    pub primary: Option<String>,

    /// Drop replies slower than this many hours [default: 5]
    #[arg(long)]
    pub threshold_hours: Option<f64>,

    /// Drop pairs whose input is longer than this many characters [default: 2000]
    #[arg(long)]
    pub max_input_chars: Option<usize>,

    /// Regex for an assistant mention in the primary's turn [default: @\d{10,}]
    #[arg(long)]
    pub mention_pattern: Option<String>,

    /// Also write every counter as JSON to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Also write every discarded item with its reason to this file
    #[arg(long)]
    pub discard_log: Option<PathBuf>,
}

impl BuildArgs {
    /// Apply the flags that were given on top of `base`.
    pub fn overlay(&self, mut base: PipelineConfig) -> PipelineConfig {
        if let Some(primary) = &self.primary {
            base.primary_label = primary.clone();
        }
        if let Some(hours) = self.threshold_hours {
            base.threshold_hours = hours;
        }
        if let Some(max) = self.max_input_chars {
            base.max_input_chars = max;
        }
        if let Some(pattern) = &self.mention_pattern {
            base.mention_pattern = pattern.clone();
        }
        base
    }
}

#[derive(Args, Debug)]
pub struct InstructArgs {
    /// Pair dataset produced by `build`
    #[arg(long, default_value = "dataset_final.jsonl")]
    pub dataset: PathBuf,

    /// System prompt template; {categoria} is replaced per record
    #[arg(long)]
    pub template: PathBuf,

    /// Instruction dataset to write
    #[arg(long, default_value = "dataset_instruct.jsonl")]
    pub output: PathBuf,
}

impl From<InstructArgs> for InstructConfig {
    fn from(a: InstructArgs) -> Self {
        InstructConfig {
            dataset:  a.dataset,
            template: a.template,
            output:   a.output,
        }
    }
}

#[derive(Args, Debug)]
pub struct InitConfigArgs {
    /// Where to write the config
    #[arg(long, default_value = "pipeline.json")]
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_args() -> BuildArgs {
        BuildArgs {
            input:           PathBuf::from("in"),
            output:          PathBuf::from("out.jsonl"),
            config:          None,
            primary:         None,
            threshold_hours: None,
            max_input_chars: None,
            mention_pattern: None,
            report:          None,
            discard_log:     None,
        }
    }

    #[test]
    fn test_overlay_without_flags_keeps_base() {
        let base = PipelineConfig { threshold_hours: 3.0, ..Default::default() };
        assert_eq!(build_args().overlay(base.clone()), base);
    }

    #[test]
    fn test_overlay_flags_win() {
        let args = BuildArgs {
            primary:         Some("Me".to_string()),
            max_input_chars: Some(500),
            ..build_args()
        };
        let cfg = args.overlay(PipelineConfig { threshold_hours: 3.0, ..Default::default() });
        assert_eq!(cfg.primary_label, "Me");
        assert_eq!(cfg.max_input_chars, 500);
        assert_eq!(cfg.threshold_hours, 3.0);
    }
}
