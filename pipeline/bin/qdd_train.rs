//! Train the hybrid quantum/classical model and save its weights.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use console::style;

use qdd_pipeline::config::{PipelineConfig, report_ignored};
use qdd_pipeline::logging::init_tracing;
use qdd_pipeline::qml::run_training;
use qdd_pipeline::{
    create_progress_bar, print_header, print_result, print_section, print_success,
};

#[derive(Parser, Debug)]
#[command(name = "qdd-train")]
#[command(about = "Train the quantum-enhanced regression model")]
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

    print_header("Phase 2.2: Training Quantum-Enhanced ML Model");

    let qml = &config.qml;
    print_section("Model");
    print_result("Qubits", qml.n_qubits);
    print_result("Entangling layers", qml.n_layers);
    print_result("Samples", qml.n_samples);
    print_result("Batch size", qml.batch_size);
    print_result("Learning rate", qml.learning_rate);

    print_section("Training");
    let pb = create_progress_bar(qml.epochs as u64, "Training...");
    let report = run_training(&config, |_, loss| {
        pb.set_message(format!("loss = {loss:.6}"));
        pb.inc(1);
    })?;
    pb.finish_with_message("Training complete");

    print_section("Results");
    print_result("Final loss", format!("{:.6}", report.final_loss()));
    print_result("Optimizer steps", report.steps);
    print_result(
        "Training time",
        format!("{:.2} seconds", report.elapsed.as_secs_f64()),
    );
    println!();
    print_success(&format!(
        "Training complete. Model saved to {}",
        config.paths.model_path.display()
    ));
    Ok(())
}
