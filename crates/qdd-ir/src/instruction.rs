//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::gate::StandardGate;
use crate::qubit::QubitId;

/// A gate together with the qubits it acts on.
///
/// Operand order matters for the asymmetric gates: `CX` is
/// `[control, target]`, and the excitation gates read their wires left to
/// right when matching basis patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The gate to apply.
    pub gate: StandardGate,
    /// Qubits this instruction operates on.
    pub qubits: Vec<QubitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: StandardGate, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            gate,
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// Get the gate name.
    pub fn name(&self) -> &str {
        self.gate.name()
    }

    /// Whether the gate carries a trainable angle.
    pub fn is_parameterized(&self) -> bool {
        self.gate.is_parameterized()
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.gate)?;
        for (i, q) in self.qubits.iter().enumerate() {
            if i == 0 {
                write!(f, " {q}")?;
            } else {
                write!(f, ", {q}")?;
            }
        }
        Ok(())
    }
}
