//! Predict with the trained hybrid model.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use console::style;

use qdd_pipeline::config::{PipelineConfig, report_ignored};
use qdd_pipeline::logging::init_tracing;
use qdd_pipeline::print_header;
use qdd_pipeline::qml::run_prediction;

#[derive(Parser, Debug)]
#[command(name = "qdd-predict")]
#[command(about = "Evaluate the trained QML model on a sample input")]
struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "QDD_CONFIG")]
    config: Option<PathBuf>,

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
    let (config, ignored) = PipelineConfig::load_with_overrides(args.config.as_deref())
        .context("loading configuration")?;
    init_tracing(args.verbose, &config.logging);
    report_ignored(&ignored);

    print_header("Phase 2.3: Prediction with Trained QML Model");

    // A missing model prints instructions and still exits 0.
    run_prediction(&config)?;
    Ok(())
}
