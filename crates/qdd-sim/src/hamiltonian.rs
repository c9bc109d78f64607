//! Pauli Hamiltonian representation.
//!
//! A Hamiltonian is represented as a sum of Pauli strings:
//! H = Σᵢ cᵢ Pᵢ
//! where each Pᵢ is a tensor product of Pauli operators and cᵢ ∈ ℝ.
//!
//! # Example
//!
//! ```rust
//! use qdd_sim::hamiltonian::{PauliHamiltonian, PauliTerm};
//!
//! // H = -1.0·I + 0.5·Z₀ − 0.25·Z₀Z₁
//! let h = PauliHamiltonian::new(vec![
//!     PauliTerm::identity(-1.0),
//!     PauliTerm::z(0.5, 0),
//!     PauliTerm::zz(-0.25, 0, 1),
//! ]);
//! assert_eq!(h.num_qubits(), 2);
//! ```

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// A single Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pauli {
    /// Identity operator.
    I,
    /// Pauli-X operator.
    X,
    /// Pauli-Y operator.
    Y,
    /// Pauli-Z operator.
    Z,
}

impl Pauli {
    /// Get the name of this Pauli operator.
    pub fn name(&self) -> &'static str {
        match self {
            Pauli::I => "I",
            Pauli::X => "X",
            Pauli::Y => "Y",
            Pauli::Z => "Z",
        }
    }
}

impl std::fmt::Display for Pauli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single term in a Pauli Hamiltonian.
///
/// Represents cᵢ * (P₀ ⊗ P₁ ⊗ ... ⊗ Pₙ)
/// where only non-identity Paulis are stored explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliTerm {
    /// The coefficient of this term.
    pub coefficient: f64,
    /// The non-identity Pauli operators, as (qubit_index, pauli).
    /// Empty means identity on all qubits.
    pub operators: Vec<(usize, Pauli)>,
}

impl PauliTerm {
    /// Create a new Pauli term. Identity factors are dropped.
    pub fn new(coefficient: f64, operators: Vec<(usize, Pauli)>) -> Self {
        Self {
            coefficient,
            operators: operators
                .into_iter()
                .filter(|(_, p)| *p != Pauli::I)
                .collect(),
        }
    }

    /// Create an identity term (scalar).
    pub fn identity(coefficient: f64) -> Self {
        Self::new(coefficient, vec![])
    }

    /// Create a single-qubit Z term.
    pub fn z(coefficient: f64, qubit: usize) -> Self {
        Self::new(coefficient, vec![(qubit, Pauli::Z)])
    }

    /// Create a single-qubit X term.
    pub fn x(coefficient: f64, qubit: usize) -> Self {
        Self::new(coefficient, vec![(qubit, Pauli::X)])
    }

    /// Create a ZZ term.
    pub fn zz(coefficient: f64, qubit1: usize, qubit2: usize) -> Self {
        Self::new(coefficient, vec![(qubit1, Pauli::Z), (qubit2, Pauli::Z)])
    }

    /// Create a four-qubit term from a Pauli word, e.g. `"YXXY"` on qubits 0..4.
    pub fn word(coefficient: f64, word: [Pauli; 4]) -> Self {
        Self::new(coefficient, word.into_iter().enumerate().collect())
    }

    /// Check if this is an identity term.
    pub fn is_identity(&self) -> bool {
        self.operators.is_empty()
    }

    /// Get the maximum qubit index.
    pub fn max_qubit(&self) -> Option<usize> {
        self.operators.iter().map(|(q, _)| *q).max()
    }

    /// Apply the Pauli string to a basis state index.
    ///
    /// Returns the image index and the accumulated phase: P|i⟩ = phase·|j⟩.
    #[inline]
    pub fn apply_to_basis(&self, index: usize) -> (usize, Complex64) {
        let mut new_index = index;
        let mut phase = Complex64::new(1.0, 0.0);

        for &(qubit, pauli) in &self.operators {
            let bit = (index >> qubit) & 1;
            match pauli {
                Pauli::I => {}
                Pauli::X => {
                    new_index ^= 1 << qubit;
                }
                Pauli::Y => {
                    new_index ^= 1 << qubit;
                    // Y|0⟩ = i|1⟩, Y|1⟩ = −i|0⟩
                    phase *= if bit == 0 {
                        Complex64::new(0.0, 1.0)
                    } else {
                        Complex64::new(0.0, -1.0)
                    };
                }
                Pauli::Z => {
                    if bit == 1 {
                        phase = -phase;
                    }
                }
            }
        }

        (new_index, phase)
    }
}

impl std::fmt::Display for PauliTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.coefficient >= 0.0 {
            write!(f, "+{:.8} ", self.coefficient)?;
        } else {
            write!(f, "{:.8} ", self.coefficient)?;
        }

        if self.operators.is_empty() {
            write!(f, "I")?;
        } else {
            for (i, (qubit, pauli)) in self.operators.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{pauli}{qubit}")?;
            }
        }
        Ok(())
    }
}

/// A Hamiltonian represented as a sum of Pauli terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliHamiltonian {
    /// The terms in the Hamiltonian.
    pub terms: Vec<PauliTerm>,
}

impl PauliHamiltonian {
    /// Create a new Hamiltonian from a list of terms.
    pub fn new(terms: Vec<PauliTerm>) -> Self {
        Self { terms }
    }

    /// The single-qubit observable Z on `qubit`.
    pub fn z(qubit: usize) -> Self {
        Self::new(vec![PauliTerm::z(1.0, qubit)])
    }

    /// Get the number of terms.
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Check whether the Hamiltonian has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Get the number of qubits needed.
    pub fn num_qubits(&self) -> usize {
        self.terms
            .iter()
            .filter_map(PauliTerm::max_qubit)
            .max()
            .map_or(0, |m| m + 1)
    }

    /// Get the identity coefficient (if any).
    pub fn identity_coefficient(&self) -> f64 {
        self.terms
            .iter()
            .filter(|t| t.is_identity())
            .map(|t| t.coefficient)
            .sum()
    }

    /// Sum of absolute coefficients, an upper bound on the spectral norm.
    pub fn one_norm(&self) -> f64 {
        self.terms.iter().map(|t| t.coefficient.abs()).sum()
    }

    /// Diagonal element ⟨i|H|i⟩ for a computational basis state.
    ///
    /// Only terms made of I and Z contribute.
    pub fn diagonal_element(&self, index: usize) -> f64 {
        self.terms
            .iter()
            .map(|t| {
                let (j, phase) = t.apply_to_basis(index);
                if j == index { t.coefficient * phase.re } else { 0.0 }
            })
            .sum()
    }
}

impl std::fmt::Display for PauliHamiltonian {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Hamiltonian ({} terms, {} qubits):",
            self.num_terms(),
            self.num_qubits()
        )?;
        for term in &self.terms {
            writeln!(f, "  {term}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pauli_term_creation() {
        let term = PauliTerm::zz(-0.5, 0, 1);
        assert_eq!(term.coefficient, -0.5);
        assert_eq!(term.operators.len(), 2);
        assert!(!term.is_identity());
    }

    #[test]
    fn test_identity_factors_dropped() {
        let term = PauliTerm::word(1.0, [Pauli::X, Pauli::I, Pauli::I, Pauli::Y]);
        assert_eq!(term.operators, vec![(0, Pauli::X), (3, Pauli::Y)]);
        assert_eq!(term.max_qubit(), Some(3));
    }

    #[test]
    fn test_apply_to_basis() {
        // Y0 |0⟩ = i|1⟩
        let (j, phase) = PauliTerm::new(1.0, vec![(0, Pauli::Y)]).apply_to_basis(0);
        assert_eq!(j, 1);
        assert_eq!(phase, Complex64::new(0.0, 1.0));

        // Z1 |10⟩ (index 2) = −|10⟩
        let (j, phase) = PauliTerm::z(1.0, 1).apply_to_basis(2);
        assert_eq!(j, 2);
        assert_eq!(phase, Complex64::new(-1.0, 0.0));
    }

    #[test]
    fn test_hamiltonian() {
        let h = PauliHamiltonian::new(vec![
            PauliTerm::identity(-1.0),
            PauliTerm::z(0.5, 0),
            PauliTerm::z(-0.5, 1),
            PauliTerm::zz(-0.25, 0, 1),
        ]);

        assert_eq!(h.num_terms(), 4);
        assert_eq!(h.num_qubits(), 2);
        assert_eq!(h.identity_coefficient(), -1.0);
        assert_eq!(h.one_norm(), 2.25);
    }

    #[test]
    fn test_diagonal_element() {
        let h = PauliHamiltonian::new(vec![
            PauliTerm::identity(-1.0),
            PauliTerm::z(0.5, 0),
            PauliTerm::x(3.0, 1),
        ]);
        // |01⟩ with qubit 0 set: Z0 = −1, X term is off-diagonal
        assert!((h.diagonal_element(1) - (-1.5)).abs() < 1e-12);
    }
}
