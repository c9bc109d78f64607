//! Quantum gate types.

use serde::{Deserialize, Serialize};

/// Standard gates with known semantics.
///
/// Rotation angles are stored as bound `f64` values; the variational loops
/// rebuild their circuits every step, so symbolic parameters are not needed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,

    // Single-qubit rotation gates
    /// Rotation around X axis: `exp(-i θ X / 2)`.
    Rx(f64),
    /// Rotation around Y axis: `exp(-i θ Y / 2)`.
    Ry(f64),
    /// Rotation around Z axis: `exp(-i θ Z / 2)`.
    Rz(f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Z gate.
    CZ,

    // Fermionic excitation gates
    /// Givens rotation mixing |01⟩ and |10⟩ on two wires.
    ///
    /// `|01⟩ → cos(θ/2)|01⟩ + sin(θ/2)|10⟩`, `|10⟩ → cos(θ/2)|10⟩ − sin(θ/2)|01⟩`,
    /// where the left-most bit is the first wire.
    SingleExcitation(f64),
    /// Givens rotation mixing |0011⟩ and |1100⟩ on four wires.
    ///
    /// `|0011⟩ → cos(θ/2)|0011⟩ + sin(θ/2)|1100⟩`, and the orthogonal partner
    /// rotates accordingly. All other basis states are left unchanged.
    DoubleExcitation(f64),
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::SingleExcitation(_) => "single_excitation",
            StandardGate::DoubleExcitation(_) => "double_excitation",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_) => 1,

            StandardGate::CX | StandardGate::CZ | StandardGate::SingleExcitation(_) => 2,

            StandardGate::DoubleExcitation(_) => 4,
        }
    }

    /// The rotation angle, if this gate has one.
    pub fn parameter(&self) -> Option<f64> {
        match self {
            StandardGate::Rx(p)
            | StandardGate::Ry(p)
            | StandardGate::Rz(p)
            | StandardGate::SingleExcitation(p)
            | StandardGate::DoubleExcitation(p) => Some(*p),
            _ => None,
        }
    }

    /// Check if this gate has a trainable parameter.
    #[inline]
    pub fn is_parameterized(&self) -> bool {
        self.parameter().is_some()
    }

    /// Return a copy of this gate with its angle replaced.
    ///
    /// Fixed gates are returned unchanged.
    pub fn with_parameter(&self, theta: f64) -> Self {
        match self {
            StandardGate::Rx(_) => StandardGate::Rx(theta),
            StandardGate::Ry(_) => StandardGate::Ry(theta),
            StandardGate::Rz(_) => StandardGate::Rz(theta),
            StandardGate::SingleExcitation(_) => StandardGate::SingleExcitation(theta),
            StandardGate::DoubleExcitation(_) => StandardGate::DoubleExcitation(theta),
            other => *other,
        }
    }
}

impl std::fmt::Display for StandardGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.parameter() {
            Some(theta) => write!(f, "{}({theta:.4})", self.name()),
            None => write!(f, "{}", self.name()),
        }
    }
}
