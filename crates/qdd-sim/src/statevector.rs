//! Dense state-vector simulation.
//!
//! Amplitudes are stored in little-endian order: qubit `q` is bit `q` of
//! the basis index. Besides the forward action of every [`StandardGate`],
//! the state supports the inverse and the parameter derivative of each
//! gate, which is what adjoint differentiation needs.

use num_complex::Complex64;
use qdd_ir::{Circuit, Instruction, StandardGate};
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::gradient::{self, Evaluation};
use crate::hamiltonian::PauliHamiltonian;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Row-major 2×2 matrix acting on one qubit.
type Matrix2 = [[Complex64; 2]; 2];

/// A pure quantum state over `num_qubits` qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
}

impl Statevector {
    /// The all-zero state |0…0⟩.
    pub fn zero(num_qubits: usize) -> Self {
        let mut amplitudes = vec![ZERO; 1 << num_qubits];
        amplitudes[0] = ONE;
        Self {
            num_qubits,
            amplitudes,
        }
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Raw amplitudes, indexed by basis state.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Measurement probabilities in the computational basis.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Squared norm ⟨ψ|ψ⟩.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Inner product ⟨self|other⟩.
    pub fn inner(&self, other: &Statevector) -> Complex64 {
        self.amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| a.conj() * b)
            .sum()
    }

    /// Apply an instruction.
    pub fn apply(&mut self, instr: &Instruction) -> SimResult<()> {
        let qubits = self.operands(instr)?;
        self.apply_gate(&instr.gate, &qubits);
        Ok(())
    }

    /// Apply the inverse (adjoint) of an instruction.
    pub fn apply_inverse(&mut self, instr: &Instruction) -> SimResult<()> {
        let qubits = self.operands(instr)?;
        let gate = match instr.gate.parameter() {
            Some(theta) => instr.gate.with_parameter(-theta),
            // X, Y, Z, H, CX and CZ are self-inverse
            None => instr.gate,
        };
        self.apply_gate(&gate, &qubits);
        Ok(())
    }

    /// Replace the state with `dU/dθ |ψ⟩` for the instruction's angle.
    ///
    /// The derivative of a fixed gate is zero, so the state is cleared.
    pub fn apply_derivative(&mut self, instr: &Instruction) -> SimResult<()> {
        let qubits = self.operands(instr)?;
        match instr.gate {
            StandardGate::Rx(theta) | StandardGate::Ry(theta) | StandardGate::Rz(theta) => {
                // d/dθ exp(-iθG/2) = ½ exp(-i(θ+π)G/2)
                let shifted = instr.gate.with_parameter(theta + std::f64::consts::PI);
                self.apply_gate(&shifted, &qubits);
                self.scale(0.5);
            }
            StandardGate::SingleExcitation(theta) => {
                let (lo, hi, mask) = single_excitation_patterns(&qubits);
                self.givens_derivative(theta, lo, hi, mask);
            }
            StandardGate::DoubleExcitation(theta) => {
                let (lo, hi, mask) = double_excitation_patterns(&qubits);
                self.givens_derivative(theta, lo, hi, mask);
            }
            _ => self.amplitudes.fill(ZERO),
        }
        Ok(())
    }

    /// Return `H|ψ⟩`.
    pub fn apply_hamiltonian(&self, hamiltonian: &PauliHamiltonian) -> SimResult<Statevector> {
        self.check_observable(hamiltonian)?;
        let mut out = vec![ZERO; self.amplitudes.len()];
        for term in &hamiltonian.terms {
            for (i, &amp) in self.amplitudes.iter().enumerate() {
                let (j, phase) = term.apply_to_basis(i);
                out[j] += term.coefficient * phase * amp;
            }
        }
        Ok(Statevector {
            num_qubits: self.num_qubits,
            amplitudes: out,
        })
    }

    /// Expectation value ⟨ψ|H|ψ⟩.
    pub fn expectation(&self, hamiltonian: &PauliHamiltonian) -> SimResult<f64> {
        let h_psi = self.apply_hamiltonian(hamiltonian)?;
        Ok(self.inner(&h_psi).re)
    }

    fn operands(&self, instr: &Instruction) -> SimResult<Vec<usize>> {
        instr
            .qubits
            .iter()
            .map(|q| {
                let q = q.index();
                if q < self.num_qubits {
                    Ok(q)
                } else {
                    Err(SimError::QubitOutOfRange {
                        qubit: q,
                        num_qubits: self.num_qubits,
                    })
                }
            })
            .collect()
    }

    fn check_observable(&self, hamiltonian: &PauliHamiltonian) -> SimResult<()> {
        let needed = hamiltonian.num_qubits();
        if needed > self.num_qubits {
            return Err(SimError::QubitOutOfRange {
                qubit: needed - 1,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    fn scale(&mut self, factor: f64) {
        for amp in &mut self.amplitudes {
            *amp *= factor;
        }
    }

    fn apply_gate(&mut self, gate: &StandardGate, qubits: &[usize]) {
        match *gate {
            StandardGate::X => self.apply_single(qubits[0], [[ZERO, ONE], [ONE, ZERO]]),
            StandardGate::Y => self.apply_single(qubits[0], [[ZERO, -I], [I, ZERO]]),
            StandardGate::Z => self.apply_single(qubits[0], [[ONE, ZERO], [ZERO, -ONE]]),
            StandardGate::H => {
                let h = Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
                self.apply_single(qubits[0], [[h, h], [h, -h]]);
            }
            StandardGate::Rx(theta) => {
                let (c, s) = half_angle(theta);
                let c = Complex64::new(c, 0.0);
                let is = Complex64::new(0.0, -s);
                self.apply_single(qubits[0], [[c, is], [is, c]]);
            }
            StandardGate::Ry(theta) => {
                let (c, s) = half_angle(theta);
                let (c, s) = (Complex64::new(c, 0.0), Complex64::new(s, 0.0));
                self.apply_single(qubits[0], [[c, -s], [s, c]]);
            }
            StandardGate::Rz(theta) => {
                let phase0 = Complex64::from_polar(1.0, -theta / 2.0);
                let phase1 = Complex64::from_polar(1.0, theta / 2.0);
                self.apply_single(qubits[0], [[phase0, ZERO], [ZERO, phase1]]);
            }
            StandardGate::CX => {
                let (control, target) = (qubits[0], qubits[1]);
                for i in 0..self.amplitudes.len() {
                    if (i >> control) & 1 == 1 && (i >> target) & 1 == 0 {
                        self.amplitudes.swap(i, i | (1 << target));
                    }
                }
            }
            StandardGate::CZ => {
                let (q0, q1) = (qubits[0], qubits[1]);
                for (i, amp) in self.amplitudes.iter_mut().enumerate() {
                    if (i >> q0) & 1 == 1 && (i >> q1) & 1 == 1 {
                        *amp = -*amp;
                    }
                }
            }
            StandardGate::SingleExcitation(theta) => {
                let (lo, hi, mask) = single_excitation_patterns(qubits);
                self.givens(theta, lo, hi, mask);
            }
            StandardGate::DoubleExcitation(theta) => {
                let (lo, hi, mask) = double_excitation_patterns(qubits);
                self.givens(theta, lo, hi, mask);
            }
        }
    }

    fn apply_single(&mut self, q: usize, m: Matrix2) {
        let bit = 1 << q;
        for i in 0..self.amplitudes.len() {
            if i & bit == 0 {
                let j = i | bit;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0][0] * a + m[0][1] * b;
                self.amplitudes[j] = m[1][0] * a + m[1][1] * b;
            }
        }
    }

    /// Rotate every (lo, hi) amplitude pair selected by `mask`.
    fn givens(&mut self, theta: f64, lo: usize, hi: usize, mask: usize) {
        let (c, s) = half_angle(theta);
        for i in 0..self.amplitudes.len() {
            if i & mask == lo {
                let j = (i & !mask) | hi;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - s * b;
                self.amplitudes[j] = s * a + c * b;
            }
        }
    }

    /// Derivative of [`Self::givens`]: zero outside the rotated subspace.
    fn givens_derivative(&mut self, theta: f64, lo: usize, hi: usize, mask: usize) {
        let (c, s) = half_angle(theta);
        let mut out = vec![ZERO; self.amplitudes.len()];
        for i in 0..self.amplitudes.len() {
            if i & mask == lo {
                let j = (i & !mask) | hi;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                out[i] = 0.5 * (-s * a - c * b);
                out[j] = 0.5 * (c * a - s * b);
            }
        }
        self.amplitudes = out;
    }
}

fn half_angle(theta: f64) -> (f64, f64) {
    let (s, c) = (theta / 2.0).sin_cos();
    (c, s)
}

/// Bit patterns for a single excitation on `[w0, w1]`.
///
/// `lo` has only `w1` set, `hi` has only `w0` set.
fn single_excitation_patterns(qubits: &[usize]) -> (usize, usize, usize) {
    let (w0, w1) = (1 << qubits[0], 1 << qubits[1]);
    (w1, w0, w0 | w1)
}

/// Bit patterns for a double excitation on `[w0, w1, w2, w3]`.
///
/// `lo` has `w2, w3` set, `hi` has `w0, w1` set.
fn double_excitation_patterns(qubits: &[usize]) -> (usize, usize, usize) {
    let bits: Vec<usize> = qubits.iter().map(|q| 1 << q).collect();
    let hi = bits[0] | bits[1];
    let lo = bits[2] | bits[3];
    (lo, hi, lo | hi)
}

/// Dense state-vector simulator with a register-size limit.
#[derive(Debug, Clone)]
pub struct StatevectorSimulator {
    max_qubits: usize,
}

impl Default for StatevectorSimulator {
    fn default() -> Self {
        Self { max_qubits: 20 }
    }
}

impl StatevectorSimulator {
    /// Create a simulator with the default limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the largest register the simulator will allocate.
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Simulate `circuit` from |0…0⟩.
    pub fn run(&self, circuit: &Circuit) -> SimResult<Statevector> {
        let n = circuit.num_qubits();
        if n > self.max_qubits {
            return Err(SimError::TooManyQubits {
                num_qubits: n,
                max_qubits: self.max_qubits,
            });
        }
        let mut state = Statevector::zero(n);
        for instr in circuit.instructions() {
            state.apply(instr)?;
        }
        Ok(state)
    }

    /// Expectation value of `observable` on the circuit output.
    pub fn expectation(&self, circuit: &Circuit, observable: &PauliHamiltonian) -> SimResult<f64> {
        if observable.is_empty() {
            return Err(SimError::EmptyHamiltonian);
        }
        let value = self.run(circuit)?.expectation(observable)?;
        if !value.is_finite() {
            return Err(SimError::NonFinite(value));
        }
        Ok(value)
    }

    /// Expectation value plus its gradient with respect to every
    /// parameterized instruction, in circuit order.
    pub fn value_and_gradient(
        &self,
        circuit: &Circuit,
        observable: &PauliHamiltonian,
    ) -> SimResult<Evaluation> {
        if observable.is_empty() {
            return Err(SimError::EmptyHamiltonian);
        }
        let state = self.run(circuit)?;
        let eval = gradient::adjoint(circuit, state, observable)?;
        if !eval.value.is_finite() {
            return Err(SimError::NonFinite(eval.value));
        }
        debug!(
            circuit = circuit.name(),
            params = eval.gradient.len(),
            value = eval.value,
            "adjoint evaluation"
        );
        Ok(eval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qdd_ir::QubitId;
    use std::f64::consts::PI;

    fn q(i: u32) -> QubitId {
        QubitId(i)
    }

    #[test]
    fn test_zero_state() {
        let state = Statevector::zero(3);
        assert_eq!(state.amplitudes().len(), 8);
        assert_relative_eq!(state.norm_sqr(), 1.0);
        assert_eq!(state.probabilities()[0], 1.0);
    }

    #[test]
    fn test_bell_state() {
        let mut circuit = Circuit::with_size("bell", 2);
        circuit.h(q(0)).unwrap().cx(q(0), q(1)).unwrap();

        let probs = StatevectorSimulator::new().run(&circuit).unwrap().probabilities();
        assert_relative_eq!(probs[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(probs[3], 0.5, epsilon = 1e-12);
        assert_relative_eq!(probs[1] + probs[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_qubit_zero_is_low_bit() {
        let mut circuit = Circuit::with_size("x1", 3);
        circuit.x(q(1)).unwrap();
        let state = StatevectorSimulator::new().run(&circuit).unwrap();
        assert_relative_eq!(state.probabilities()[0b010], 1.0);
    }

    #[test]
    fn test_rotations_expectation() {
        let sim = StatevectorSimulator::new();
        let z0 = PauliHamiltonian::z(0);
        for theta in [0.0, 0.3, PI / 2.0, 2.0] {
            let mut rx = Circuit::with_size("rx", 1);
            rx.rx(theta, q(0)).unwrap();
            assert_relative_eq!(sim.expectation(&rx, &z0).unwrap(), theta.cos(), epsilon = 1e-12);

            let mut ry = Circuit::with_size("ry", 1);
            ry.ry(theta, q(0)).unwrap();
            assert_relative_eq!(sim.expectation(&ry, &z0).unwrap(), theta.cos(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_y_gate_phase() {
        let mut state = Statevector::zero(1);
        state
            .apply(&Instruction::single_qubit_gate(StandardGate::Y, q(0)))
            .unwrap();
        assert_eq!(state.amplitudes()[1], I);
    }

    #[test]
    fn test_single_excitation_moves_occupation() {
        // |10⟩ on wires [0, 1]: qubit 0 occupied
        let mut circuit = Circuit::with_size("se", 2);
        circuit.x(q(0)).unwrap();
        circuit.single_excitation(PI, [q(0), q(1)]).unwrap();

        let state = StatevectorSimulator::new().run(&circuit).unwrap();
        // θ = π fully transfers the particle: |hi⟩ → −|lo⟩
        assert_relative_eq!(state.amplitudes()[0b10].re, -1.0, epsilon = 1e-12);
        assert_relative_eq!(state.norm_sqr(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_double_excitation_subspace() {
        let mut circuit = Circuit::with_size("de", 4);
        circuit.basis_state(&[1, 1, 0, 0]).unwrap();
        circuit
            .double_excitation(0.8, [q(0), q(1), q(2), q(3)])
            .unwrap();

        let probs = StatevectorSimulator::new().run(&circuit).unwrap().probabilities();
        let (c, s) = half_angle(0.8);
        assert_relative_eq!(probs[0b0011], c * c, epsilon = 1e-12);
        assert_relative_eq!(probs[0b1100], s * s, epsilon = 1e-12);
    }

    #[test]
    fn test_inverse_restores_state() {
        let instrs = [
            Instruction::single_qubit_gate(StandardGate::H, q(0)),
            Instruction::single_qubit_gate(StandardGate::Rx(0.4), q(1)),
            Instruction::gate(StandardGate::SingleExcitation(1.1), [q(0), q(1)]),
            Instruction::two_qubit_gate(StandardGate::CX, q(1), q(0)),
            Instruction::single_qubit_gate(StandardGate::Rz(-0.9), q(0)),
        ];
        let mut state = Statevector::zero(2);
        for instr in &instrs {
            state.apply(instr).unwrap();
        }
        for instr in instrs.iter().rev() {
            state.apply_inverse(instr).unwrap();
        }
        assert_relative_eq!(state.amplitudes()[0].re, 1.0, epsilon = 1e-12);
        assert_relative_eq!(state.amplitudes()[0].im, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_observable_too_wide() {
        let state = Statevector::zero(2);
        let err = state.expectation(&PauliHamiltonian::z(3)).unwrap_err();
        assert!(matches!(err, SimError::QubitOutOfRange { qubit: 3, .. }));
    }

    #[test]
    fn test_too_many_qubits() {
        let circuit = Circuit::with_size("big", 8);
        let sim = StatevectorSimulator::new().with_max_qubits(4);
        assert!(matches!(
            sim.run(&circuit),
            Err(SimError::TooManyQubits { num_qubits: 8, max_qubits: 4 })
        ));
    }

    #[test]
    fn test_empty_observable() {
        let circuit = Circuit::with_size("c", 1);
        let empty = PauliHamiltonian::new(vec![]);
        assert!(matches!(
            StatevectorSimulator::new().expectation(&circuit, &empty),
            Err(SimError::EmptyHamiltonian)
        ));
    }
}
