//! Hartree-Fock reference states and spin-conserving excitations.
//!
//! Spin orbitals are interleaved: even indices are spin-up, odd indices
//! spin-down. Occupied orbitals are the lowest `electrons` indices.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// Single and double excitations out of the HF reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Excitations {
    /// `[occupied, virtual]` pairs.
    pub singles: Vec<[usize; 2]>,
    /// `[occupied, occupied, virtual, virtual]` quadruples.
    pub doubles: Vec<[usize; 4]>,
}

impl Excitations {
    /// One ansatz parameter per excitation.
    pub fn num_parameters(&self) -> usize {
        self.singles.len() + self.doubles.len()
    }
}

/// Occupation vector of the HF state: `electrons` ones, then zeros.
pub fn hf_state(electrons: usize, qubits: usize) -> PipelineResult<Vec<u8>> {
    check_active_space(electrons, qubits)?;
    Ok((0..qubits).map(|q| u8::from(q < electrons)).collect())
}

/// Excitations that conserve the total spin projection.
pub fn excitations(electrons: usize, qubits: usize) -> PipelineResult<Excitations> {
    check_active_space(electrons, qubits)?;

    // Twice the spin projection, so the arithmetic stays integral.
    let sz = |orbital: usize| if orbital % 2 == 0 { 1i32 } else { -1 };

    let mut singles = Vec::new();
    for r in 0..electrons {
        for p in electrons..qubits {
            if sz(p) == sz(r) {
                singles.push([r, p]);
            }
        }
    }

    let mut doubles = Vec::new();
    for s in 0..electrons {
        for r in s + 1..electrons {
            for q in electrons..qubits {
                for p in q + 1..qubits {
                    if sz(p) + sz(q) == sz(r) + sz(s) {
                        doubles.push([s, r, q, p]);
                    }
                }
            }
        }
    }

    Ok(Excitations { singles, doubles })
}

fn check_active_space(electrons: usize, qubits: usize) -> PipelineResult<()> {
    if electrons > qubits {
        return Err(PipelineError::InvalidActiveSpace { electrons, qubits });
    }
    Ok(())
}
