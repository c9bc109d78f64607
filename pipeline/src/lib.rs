//! Quantum drug-discovery pipeline.
//!
//! Drivers that compose the circuit IR and the state-vector simulator into
//! three workflows:
//!
//! - **VQE**: ground-state energy of H₂ with an all-singles-doubles ansatz
//!   optimised by Adam ([`runners::VqeRunner`])
//! - **Virtual screening**: VQE over every `*.xyz` file in the data
//!   directory, ranked by energy ([`runners::run_screening`])
//! - **Hybrid QML**: a classical encoder, a strongly entangling quantum layer
//!   and a classical decoder trained to learn `sin(πx₁)·cos(πx₂)`
//!   ([`qml::train_model`], [`qml::run_prediction`])
//!
//! All settings come from one [`config::PipelineConfig`].
//!
//! ```no_run
//! use qdd_pipeline::chemistry::BuiltinH2Provider;
//! use qdd_pipeline::config::PipelineConfig;
//! use qdd_pipeline::runners::run_screening;
//!
//! let config = PipelineConfig::load(None)?;
//! let report = run_screening(&BuiltinH2Provider, &config)?;
//! println!("{} molecules ranked", report.ranked.len());
//! # Ok::<(), qdd_pipeline::error::PipelineError>(())
//! ```

pub mod chemistry;
pub mod circuits;
pub mod config;
pub mod error;
pub mod logging;
pub mod optimizers;
pub mod qml;
pub mod runners;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for the optimisation loops.
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let template = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";
    if let Ok(style) = ProgressStyle::with_template(template) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(message.to_string());
    pb
}

/// Print a banner header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a section title.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}
