// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// The entry point for all user interaction. Parses arguments
// with clap, hands off to a Layer 2 use case, and prints the
// outcome. All work is delegated; this layer only routes.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{AnonymizeArgs, BuildArgs, Commands, InitConfigArgs, InstructArgs};

use crate::application::build_use_case::{BuildConfig, PipelineConfig};
use crate::infra::config_store;

#[derive(Parser, Debug)]
#[command(
    name = "dialog-distill",
    version,
    about = "Turn chat exports into categorised input/output training pairs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Anonymize(args)  => run_anonymize(args),
            Commands::Build(args)      => run_build(args),
            Commands::Instruct(args)   => run_instruct(args),
            Commands::InitConfig(args) => run_init_config(args),
        }
    }
}

fn run_anonymize(args: AnonymizeArgs) -> Result<()> {
    use crate::application::anonymize_use_case::AnonymizeUseCase;

    let dest   = args.dest.clone();
    let report = AnonymizeUseCase::new(args.into()).execute()?;

    println!(
        "Anonymised {} files in {} categories ({} skipped) into '{}'.",
        report.files_written,
        report.categories,
        report.files_skipped,
        dest.display()
    );
    Ok(())
}

fn run_build(args: BuildArgs) -> Result<()> {
    use crate::application::build_use_case::BuildUseCase;

    // defaults < config file < flags
    let base = match &args.config {
        Some(path) => config_store::load_config(path)?,
        None       => PipelineConfig::default(),
    };
    let pipeline = args.overlay(base);

    let output  = args.output.clone();
    let outcome = BuildUseCase::new(BuildConfig {
        input_dir:   args.input,
        output:      args.output,
        report:      args.report,
        discard_log: args.discard_log,
        pipeline,
    })
    .execute()?;

    println!("\n{}", outcome.summary);
    println!(
        "Dataset saved to '{}' ({} pairs from {} files).",
        output.display(),
        outcome.pairs.len(),
        outcome.counters.files_processed
    );
    Ok(())
}

fn run_instruct(args: InstructArgs) -> Result<()> {
    use crate::application::instruct_use_case::InstructUseCase;

    let output = args.output.clone();
    let report = InstructUseCase::new(args.into()).execute()?;

    println!(
        "Created {} instruction examples in '{}' ({} incomplete, {} malformed lines skipped).",
        report.written,
        output.display(),
        report.incomplete,
        report.malformed
    );
    Ok(())
}

fn run_init_config(args: InitConfigArgs) -> Result<()> {
    config_store::save_config(&args.path, &PipelineConfig::default())?;
    println!("Default pipeline config written to '{}'.", args.path.display());
    Ok(())
}
