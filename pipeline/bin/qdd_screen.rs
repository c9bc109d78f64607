//! Virtual screening over the molecules in the data directory.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use console::style;

use qdd_pipeline::chemistry::BuiltinH2Provider;
use qdd_pipeline::config::{PipelineConfig, report_ignored};
use qdd_pipeline::logging::init_tracing;
use qdd_pipeline::runners::run_screening;
use qdd_pipeline::{print_header, print_result, print_success};

#[derive(Parser, Debug)]
#[command(name = "qdd-screen")]
#[command(about = "Rank molecules by VQE ground-state energy")]
struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "QDD_CONFIG")]
    config: Option<PathBuf>,

    /// Override the data directory
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("{} {e:#}", style("Error:").red().bold());
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let (mut config, ignored) = PipelineConfig::load_with_overrides(args.config.as_deref())
        .context("loading configuration")?;
    if let Some(dir) = args.data_dir {
        config.paths.data_dir = dir;
    }
    init_tracing(args.verbose, &config.logging);
    report_ignored(&ignored);

    print_header("Phase 2.1: High-Fidelity Virtual Screening");

    let report = run_screening(&BuiltinH2Provider, &config)?;

    if !report.failures.is_empty() {
        println!();
        print_result("Failed molecules", report.failures.len());
        for failure in &report.failures {
            println!("  - {}: {}", failure.molecule.to_uppercase(), failure.error);
        }
    }
    if report.report_path.is_some() {
        println!();
        print_success("Screening complete!");
    }
    Ok(())
}
