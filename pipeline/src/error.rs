//! Error types for the pipeline crate.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Errors produced by the pipeline drivers.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration could not be loaded or failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Circuit construction failed.
    #[error("Circuit error: {0}")]
    Ir(#[from] qdd_ir::IrError),

    /// Simulation failed.
    #[error("Simulation error: {0}")]
    Sim(#[from] qdd_sim::SimError),

    /// The Hamiltonian for a molecule could not be produced.
    #[error("Could not build Hamiltonian for '{molecule}': {reason}")]
    Hamiltonian {
        /// Molecule identifier.
        molecule: String,
        /// Provider-specific reason.
        reason: String,
    },

    /// More electrons than spin orbitals.
    #[error("Invalid active space: {electrons} electrons in {qubits} spin orbitals")]
    InvalidActiveSpace {
        /// Active electrons.
        electrons: usize,
        /// Spin orbitals (qubits).
        qubits: usize,
    },

    /// A parameter vector does not match the circuit template.
    #[error("{template} expects {expected} parameters, got {got}")]
    ParameterMismatch {
        /// Template name.
        template: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// The screening data directory does not exist.
    #[error("Data directory not found: {}", .0.display())]
    DataDirMissing(PathBuf),

    /// A saved model does not fit the configured architecture.
    #[error("Model state does not match the architecture: {0}")]
    ModelShape(String),

    /// I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Array shape failure while rebuilding weights.
    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
