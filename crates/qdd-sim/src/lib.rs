//! State-vector simulation for the quantum drug-discovery pipeline.
//!
//! - [`PauliHamiltonian`]: real-weighted sums of Pauli strings used both as
//!   molecular Hamiltonians and as single-qubit observables
//! - [`Statevector`] / [`StatevectorSimulator`]: dense simulation of
//!   [`qdd_ir::Circuit`]s, including gate inverses and derivatives
//! - [`gradient`]: adjoint-mode differentiation returning an [`Evaluation`]
//!
//! # Example
//!
//! ```rust
//! use qdd_ir::{Circuit, QubitId};
//! use qdd_sim::{PauliHamiltonian, StatevectorSimulator};
//!
//! let mut circuit = Circuit::with_size("ry", 1);
//! circuit.ry(0.5, QubitId(0)).unwrap();
//!
//! let eval = StatevectorSimulator::new()
//!     .value_and_gradient(&circuit, &PauliHamiltonian::z(0))
//!     .unwrap();
//! assert!((eval.value - 0.5f64.cos()).abs() < 1e-12);
//! assert!((eval.gradient[0] + 0.5f64.sin()).abs() < 1e-12);
//! ```

pub mod error;
pub mod gradient;
pub mod hamiltonian;
pub mod statevector;

pub use error::{SimError, SimResult};
pub use gradient::Evaluation;
pub use hamiltonian::{Pauli, PauliHamiltonian, PauliTerm};
pub use statevector::{Statevector, StatevectorSimulator};
