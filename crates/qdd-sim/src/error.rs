//! Error types for the sim crate.

use thiserror::Error;

/// Errors produced by state-vector simulation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Register too large for a dense state vector.
    #[error("Circuit has {num_qubits} qubits but the simulator supports at most {max_qubits}")]
    TooManyQubits {
        /// Qubits requested.
        num_qubits: usize,
        /// Simulator limit.
        max_qubits: usize,
    },

    /// An observable references a qubit that is not in the register.
    #[error("Observable references qubit {qubit} but the state only has {num_qubits} qubits")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: usize,
        /// Number of qubits in the state.
        num_qubits: usize,
    },

    /// The observable has no terms.
    #[error("Hamiltonian is empty; nothing to measure")]
    EmptyHamiltonian,

    /// Simulation produced a non-finite expectation value.
    #[error("Simulation produced a non-finite value: {0}")]
    NonFinite(f64),

    /// Circuit builder returned an error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qdd_ir::IrError),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
