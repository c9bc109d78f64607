//! High-level circuit builder API.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::Instruction;
use crate::qubit::QubitId;

/// A quantum circuit.
///
/// Instructions are kept in application order. Every instruction is
/// validated against the register when it is appended, so a constructed
/// circuit never references a qubit it does not own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Size of the qubit register.
    num_qubits: u32,
    /// Instructions in application order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a circuit with a given number of qubits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            instructions: vec![],
        }
    }

    /// Append an instruction after validating its operands.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        let gate_name = instruction.name().to_string();
        let expected = instruction.gate.num_qubits();
        let got = instruction.qubits.len() as u32;
        if expected != got {
            return Err(IrError::QubitCountMismatch {
                gate_name,
                expected,
                got,
            });
        }

        if let Some(theta) = instruction.gate.parameter() {
            if !theta.is_finite() {
                return Err(IrError::NonFiniteParameter {
                    gate_name,
                    value: theta,
                });
            }
        }

        for (i, q) in instruction.qubits.iter().enumerate() {
            if q.0 >= self.num_qubits {
                return Err(IrError::QubitNotFound {
                    qubit: *q,
                    num_qubits: self.num_qubits,
                    gate_name: Some(gate_name),
                });
            }
            if instruction.qubits[..i].contains(q) {
                return Err(IrError::DuplicateQubit {
                    qubit: *q,
                    gate_name: Some(gate_name),
                });
            }
        }

        self.instructions.push(instruction);
        Ok(self)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Y, qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Z, qubit))
    }

    /// Apply RX rotation.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Rx(theta), qubit))
    }

    /// Apply RY rotation.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Ry(theta), qubit))
    }

    /// Apply RZ rotation.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Rz(theta), qubit))
    }

    /// Apply the general rotation `Rot(φ, θ, ω) = RZ(ω) · RY(θ) · RZ(φ)`.
    ///
    /// Emitted as three rotation instructions in the order φ, θ, ω, so the
    /// circuit exposes three trainable parameters.
    pub fn rot(&mut self, phi: f64, theta: f64, omega: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.rz(phi, qubit)?;
        self.ry(theta, qubit)?;
        self.rz(omega, qubit)
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CX, control, target))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CZ, q1, q2))
    }

    /// Apply a single-excitation Givens rotation on `[occupied, virtual]` wires.
    pub fn single_excitation(&mut self, theta: f64, wires: [QubitId; 2]) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::SingleExcitation(theta), wires))
    }

    /// Apply a double-excitation Givens rotation on four wires.
    pub fn double_excitation(&mut self, theta: f64, wires: [QubitId; 4]) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::DoubleExcitation(theta), wires))
    }

    /// Prepare a computational basis state from the all-zero state.
    ///
    /// `bits[q]` is the occupation of qubit `q`; an X gate is emitted for
    /// every set bit.
    pub fn basis_state(&mut self, bits: &[u8]) -> IrResult<&mut Self> {
        if bits.len() != self.num_qubits as usize {
            return Err(IrError::InvalidBasisState(format!(
                "expected {} bits, got {}",
                self.num_qubits,
                bits.len()
            )));
        }
        for (q, &bit) in bits.iter().enumerate() {
            match bit {
                0 => {}
                1 => {
                    self.x(QubitId::from(q))?;
                }
                other => {
                    return Err(IrError::InvalidBasisState(format!(
                        "bit {q} has value {other}, expected 0 or 1"
                    )));
                }
            }
        }
        Ok(self)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn num_ops(&self) -> usize {
        self.instructions.len()
    }

    /// Number of parameterized instructions.
    pub fn num_parameters(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| i.is_parameterized())
            .count()
    }

    /// Angles of the parameterized instructions, in application order.
    pub fn parameters(&self) -> Vec<f64> {
        self.instructions
            .iter()
            .filter_map(|i| i.gate.parameter())
            .collect()
    }

    /// Get the circuit depth.
    ///
    /// Each instruction starts one layer after the latest instruction on any
    /// of its qubits.
    pub fn depth(&self) -> usize {
        let mut layer = vec![0usize; self.num_qubits as usize];
        let mut depth = 0;
        for instr in &self.instructions {
            let level = instr
                .qubits
                .iter()
                .map(|q| layer[q.index()])
                .max()
                .unwrap_or(0)
                + 1;
            for q in &instr.qubits {
                layer[q.index()] = level;
            }
            depth = depth.max(level);
        }
        depth
    }
}

impl std::fmt::Display for Circuit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Circuit '{}' ({} qubits, {} ops, depth {}):",
            self.name,
            self.num_qubits,
            self.num_ops(),
            self.depth()
        )?;
        for instr in &self.instructions {
            writeln!(f, "  {instr}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_circuit_with_size() {
        let circuit = Circuit::with_size("test", 3);
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_ops(), 0);
        assert_eq!(circuit.depth(), 0);
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = Circuit::with_size("test", 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap();

        assert_eq!(circuit.num_ops(), 2);
        assert_eq!(circuit.depth(), 2);
    }

    #[test]
    fn test_parallel_depth() {
        let mut circuit = Circuit::with_size("test", 3);
        circuit.rx(PI / 2.0, QubitId(0)).unwrap();
        circuit.rx(PI / 2.0, QubitId(1)).unwrap();
        circuit.rx(PI / 2.0, QubitId(2)).unwrap();
        assert_eq!(circuit.depth(), 1);

        circuit.cz(QubitId(0), QubitId(2)).unwrap();
        assert_eq!(circuit.depth(), 2);
    }

    #[test]
    fn test_rot_expands_to_three_rotations() {
        let mut circuit = Circuit::with_size("rot", 1);
        circuit.rot(0.1, 0.2, 0.3, QubitId(0)).unwrap();

        let names: Vec<&str> = circuit.instructions().iter().map(Instruction::name).collect();
        assert_eq!(names, vec!["rz", "ry", "rz"]);
        assert_eq!(circuit.parameters(), vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_qubit_out_of_range() {
        let mut circuit = Circuit::with_size("test", 2);
        let err = circuit.x(QubitId(2)).unwrap_err();
        assert!(matches!(err, IrError::QubitNotFound { num_qubits: 2, .. }));
    }

    #[test]
    fn test_duplicate_qubit() {
        let mut circuit = Circuit::with_size("test", 2);
        let err = circuit.cx(QubitId(1), QubitId(1)).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
    }

    #[test]
    fn test_arity_mismatch() {
        let mut circuit = Circuit::with_size("test", 4);
        let err = circuit
            .apply(Instruction::gate(
                StandardGate::DoubleExcitation(0.1),
                [QubitId(0), QubitId(1)],
            ))
            .unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitCountMismatch {
                expected: 4,
                got: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_non_finite_parameter() {
        let mut circuit = Circuit::with_size("test", 1);
        assert!(circuit.ry(f64::NAN, QubitId(0)).is_err());
        assert_eq!(circuit.num_ops(), 0);
    }

    #[test]
    fn test_basis_state() {
        let mut circuit = Circuit::with_size("hf", 4);
        circuit.basis_state(&[1, 1, 0, 0]).unwrap();
        assert_eq!(circuit.num_ops(), 2);
        assert_eq!(circuit.num_parameters(), 0);

        assert!(circuit.basis_state(&[1, 0]).is_err());
        assert!(circuit.basis_state(&[2, 0, 0, 0]).is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut circuit = Circuit::with_size("ser", 2);
        circuit.single_excitation(0.3, [QubitId(0), QubitId(1)]).unwrap();

        let json = serde_json::to_string(&circuit).unwrap();
        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, circuit);
    }
}
