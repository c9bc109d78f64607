//! Virtual screening: run VQE for every molecule in the data directory and
//! rank the molecules by ground-state energy.
//!
//! A failure on one molecule is logged and recorded; the batch continues.

use std::cmp::Ordering;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::chemistry::HamiltonianProvider;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::runners::vqe::VqeRunner;
use crate::{print_info, print_section};

/// A successfully screened molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningEntry {
    /// Molecule identifier (file stem).
    pub molecule: String,
    /// Final VQE energy in Hartree.
    pub energy: f64,
    /// Time spent on this molecule.
    pub elapsed: Duration,
}

/// A molecule that could not be screened.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningFailure {
    /// Molecule identifier (file stem).
    pub molecule: String,
    /// Error message.
    pub error: String,
}

/// Outcome of a screening batch.
#[derive(Debug, Clone, Default)]
pub struct ScreeningReport {
    /// Successes, sorted ascending by energy.
    pub ranked: Vec<ScreeningEntry>,
    /// Failures, in processing order.
    pub failures: Vec<ScreeningFailure>,
    /// Where the report was written, if it was.
    pub report_path: Option<PathBuf>,
}

/// Molecule ids of all `*.xyz` files in `data_dir`, sorted by name.
pub fn list_molecules(data_dir: &Path) -> PipelineResult<Vec<String>> {
    if !data_dir.is_dir() {
        return Err(PipelineError::DataDirMissing(data_dir.to_path_buf()));
    }
    let mut molecules = Vec::new();
    for entry in std::fs::read_dir(data_dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "xyz") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                molecules.push(stem.to_string());
            }
        }
    }
    molecules.sort();
    Ok(molecules)
}

/// Sort entries ascending by energy. NaN sorts last.
pub fn rank(mut entries: Vec<ScreeningEntry>) -> Vec<ScreeningEntry> {
    entries.sort_by(|a, b| compare_energy(a.energy, b.energy));
    entries
}

fn compare_energy(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.total_cmp(&b),
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
    }
}

/// Screen every molecule with `provider` and VQE.
pub fn screen_molecules<P>(provider: &P, config: &PipelineConfig) -> PipelineResult<ScreeningReport>
where
    P: HamiltonianProvider + ?Sized,
{
    let molecules = list_molecules(&config.paths.data_dir)?;
    info!(count = molecules.len(), "found molecules to screen");
    print_info(&format!(
        "Found {} molecules to screen: {:?}",
        molecules.len(),
        molecules
    ));

    let mut successes = Vec::new();
    let mut failures = Vec::new();

    for molecule in molecules {
        print_section(&format!("Screening Molecule: {}", molecule.to_uppercase()));
        let start = Instant::now();
        match screen_one(provider, &molecule, config) {
            Ok(energy) => {
                let elapsed = start.elapsed();
                info!(
                    molecule = %molecule,
                    energy,
                    elapsed_s = elapsed.as_secs_f64(),
                    "finished screening"
                );
                successes.push(ScreeningEntry {
                    molecule,
                    energy,
                    elapsed,
                });
            }
            Err(e) => {
                warn!(molecule = %molecule, error = %e, "could not process molecule");
                failures.push(ScreeningFailure {
                    molecule,
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(ScreeningReport {
        ranked: rank(successes),
        failures,
        report_path: None,
    })
}

fn screen_one<P>(provider: &P, molecule: &str, config: &PipelineConfig) -> PipelineResult<f64>
where
    P: HamiltonianProvider + ?Sized,
{
    let hamiltonian = provider.hamiltonian(molecule)?;
    info!(molecule, qubits = hamiltonian.n_qubits, "Hamiltonian created");
    let result = VqeRunner::for_molecule(&hamiltonian, &config.vqe).run()?;
    Ok(result.final_energy)
}

/// Render the report text.
pub fn format_report(report: &ScreeningReport) -> String {
    let mut out = String::new();
    out.push_str("--- Virtual Screening Results ---\n");
    out.push_str("Ranked by ground state energy (lower is more stable):\n\n");
    for (i, entry) in report.ranked.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {:<10} Energy: {:.8} Ha",
            i + 1,
            entry.molecule.to_uppercase(),
            entry.energy
        );
    }
    if !report.failures.is_empty() {
        out.push_str("\nFailed molecules:\n");
        for failure in &report.failures {
            let _ = writeln!(
                out,
                "- {}: {}",
                failure.molecule.to_uppercase(),
                failure.error
            );
        }
    }
    out
}

/// Write the report to `path`, creating parent directories.
pub fn save_report(report: &ScreeningReport, path: &Path) -> PipelineResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, format_report(report))?;
    info!(path = %path.display(), "screening results saved");
    Ok(())
}

/// Screen, print the ranking and save the report.
///
/// With no successful molecule nothing is written.
pub fn run_screening<P>(provider: &P, config: &PipelineConfig) -> PipelineResult<ScreeningReport>
where
    P: HamiltonianProvider + ?Sized,
{
    let mut report = screen_molecules(provider, config)?;

    if report.ranked.is_empty() {
        println!("No molecules were successfully screened.");
        return Ok(report);
    }

    print_section("Final Ranking");
    println!("  {:<12} {}", "Molecule", "Energy (Ha)");
    println!("  {}", "-".repeat(27));
    for entry in &report.ranked {
        println!("  {:<12} {:.8}", entry.molecule.to_uppercase(), entry.energy);
    }

    let path = config.paths.screening_log();
    save_report(&report, &path)?;
    println!();
    print_info(&format!("Screening results saved to {}", path.display()));
    report.report_path = Some(path);
    Ok(report)
}
