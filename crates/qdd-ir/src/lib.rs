//! Circuit intermediate representation.
//!
//! This crate provides the data structures the pipeline uses to describe
//! quantum circuits before they are handed to the simulator.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`] addresses a wire of the register
//! - **Gates**: [`StandardGate`] for the gate set used by the ansatz and
//!   embedding templates, including the fermionic excitation rotations
//! - **Instructions**: [`Instruction`] combining a gate with its operands
//! - **Circuit**: [`Circuit`] builder with operand validation
//!
//! # Example: Hartree-Fock state plus a double excitation
//!
//! ```rust
//! use qdd_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("h2_ansatz", 4);
//! circuit.basis_state(&[1, 1, 0, 0]).unwrap();
//! circuit
//!     .double_excitation(0.2, [QubitId(0), QubitId(1), QubitId(2), QubitId(3)])
//!     .unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 4);
//! assert_eq!(circuit.num_parameters(), 1);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `H` | 1 | Hadamard gate |
//! | `Rx`, `Ry`, `Rz` | 1 | Rotation gates |
//! | `CX`, `CZ` | 2 | Controlled-NOT and controlled-Z |
//! | `SingleExcitation` | 2 | Givens rotation on the \|01⟩/\|10⟩ subspace |
//! | `DoubleExcitation` | 4 | Givens rotation on the \|0011⟩/\|1100⟩ subspace |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::Instruction;
pub use qubit::QubitId;
