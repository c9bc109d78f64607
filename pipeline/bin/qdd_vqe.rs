//! VQE proof of concept for H₂.
//!
//! Builds the all-singles-doubles ansatz on the built-in Hamiltonian and
//! optimises it with Adam.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use console::style;

use qdd_pipeline::chemistry::{
    BuiltinH2Provider, H2_REFERENCE_ENERGY, HamiltonianProvider, h2_geometry,
};
use qdd_pipeline::config::{PipelineConfig, report_ignored};
use qdd_pipeline::logging::init_tracing;
use qdd_pipeline::runners::VqeRunner;
use qdd_pipeline::{
    create_progress_bar, print_header, print_result, print_section, print_success,
};

#[derive(Parser, Debug)]
#[command(name = "qdd-vqe")]
#[command(about = "Run VQE for the built-in H2 molecule")]
struct Args {
    /// Molecule name (ignored, always uses H2)
    #[arg(short, long, default_value = "h2")]
    molecule: String,

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

    print_header("Phase 1: VQE Proof of Concept for H2");

    let molecule = BuiltinH2Provider.hamiltonian(&args.molecule)?;
    let runner = VqeRunner::for_molecule(&molecule, &config.vqe);

    print_section("Problem Setup");
    print_result("Qubits required for H2 simulation", molecule.n_qubits);
    print_result("Hamiltonian terms", molecule.hamiltonian.num_terms());
    for (symbol, [x, y, z]) in h2_geometry() {
        print_result(
            &format!("Atom {symbol} (bohr)"),
            format!("{x:>8.4} {y:>8.4} {z:>8.4}"),
        );
    }
    print_result("Basis set", &config.vqe.basis_set);
    print_result("Active electrons", config.vqe.active_electrons);
    print_result("Parameters", runner.num_parameters()?);
    print_result("Steps", config.vqe.steps);

    print_section("Running VQE Optimization");
    let pb = create_progress_bar(config.vqe.steps as u64, "Optimizing...");
    let result = runner.run_with_progress(|_, energy| {
        pb.set_message(format!("E = {energy:.8} Ha"));
        pb.inc(1);
    })?;
    pb.finish_with_message("Optimization complete");

    print_section("Results");
    print_result(
        "Optimization finished in",
        format!("{:.2} seconds", result.elapsed.as_secs_f64()),
    );
    print_result(
        "Final ground state energy",
        format!("{:.8} Ha", result.final_energy),
    );
    let error = (result.final_energy - H2_REFERENCE_ENERGY).abs();
    print_result("Exact ground state", format!("{H2_REFERENCE_ENERGY:.8} Ha"));
    print_result("Absolute error", format!("{error:.2e} Ha"));

    println!();
    print_success("VQE complete!");
    Ok(())
}
