//! VQE ansatz circuits.
//!
//! The all-singles-doubles ansatz prepares the Hartree-Fock state and then
//! applies one Givens rotation per fermionic excitation. It preserves
//! particle number and spin, so the search stays inside the physical
//! sector of the molecule.

use qdd_ir::{Circuit, QubitId};

use crate::chemistry::Excitations;
use crate::error::{PipelineError, PipelineResult};

/// Template for the all-singles-doubles ansatz.
///
/// The parameter vector holds one angle per single excitation, followed by
/// one angle per double excitation. The circuit applies the doubles first.
#[derive(Debug, Clone)]
pub struct AllSinglesDoubles {
    hf_state: Vec<u8>,
    excitations: Excitations,
}

impl AllSinglesDoubles {
    /// Create the template from an HF occupation vector and its excitations.
    pub fn new(hf_state: Vec<u8>, excitations: Excitations) -> Self {
        Self {
            hf_state,
            excitations,
        }
    }

    /// Register size.
    pub fn num_qubits(&self) -> usize {
        self.hf_state.len()
    }

    /// Length of the parameter vector.
    pub fn num_parameters(&self) -> usize {
        self.excitations.num_parameters()
    }

    /// Bind `params` and build the circuit.
    pub fn circuit(&self, params: &[f64]) -> PipelineResult<Circuit> {
        if params.len() != self.num_parameters() {
            return Err(PipelineError::ParameterMismatch {
                template: "AllSinglesDoubles",
                expected: self.num_parameters(),
                got: params.len(),
            });
        }
        let (singles, doubles) = params.split_at(self.excitations.singles.len());

        let mut circuit = Circuit::with_size("all_singles_doubles", self.num_qubits() as u32);
        circuit.basis_state(&self.hf_state)?;

        for (theta, wires) in doubles.iter().zip(&self.excitations.doubles) {
            circuit.double_excitation(*theta, wires.map(QubitId::from))?;
        }
        for (theta, wires) in singles.iter().zip(&self.excitations.singles) {
            circuit.single_excitation(*theta, wires.map(QubitId::from))?;
        }

        Ok(circuit)
    }

    /// Reorder a gradient from circuit order into parameter order.
    pub fn parameter_gradient(&self, circuit_gradient: &[f64]) -> Vec<f64> {
        let (doubles, singles) = circuit_gradient.split_at(self.excitations.doubles.len());
        singles.iter().chain(doubles).copied().collect()
    }
}
