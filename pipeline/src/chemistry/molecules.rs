//! Molecular Hamiltonians for VQE.
//!
//! The only Hamiltonian shipped with the pipeline is H₂ in the STO-3G
//! basis at its equilibrium bond length, mapped to four qubits with the
//! Jordan-Wigner transformation. Building Hamiltonians from arbitrary
//! geometries is out of scope, so [`BuiltinH2Provider`] answers every
//! request with H₂ and says so.

use qdd_sim::{Pauli, PauliHamiltonian, PauliTerm};

use crate::error::PipelineResult;
use crate::print_info;

/// Atomic symbols of the built-in geometry.
pub const H2_SYMBOLS: [&str; 2] = ["H", "H"];

/// Cartesian coordinates in bohr, atoms on the z axis.
pub const H2_COORDINATES: [f64; 6] = [0.0, 0.0, -0.6614, 0.0, 0.0, 0.6614];

/// The built-in geometry as `(symbol, [x, y, z])` pairs in bohr.
pub fn h2_geometry() -> Vec<(&'static str, [f64; 3])> {
    H2_SYMBOLS
        .iter()
        .zip(H2_COORDINATES.chunks_exact(3))
        .map(|(&symbol, xyz)| (symbol, [xyz[0], xyz[1], xyz[2]]))
        .collect()
}

/// Exact (full CI) ground-state energy of [`h2_hamiltonian`] in Hartree.
pub const H2_REFERENCE_ENERGY: f64 = -1.136_189_454_088;

/// A qubit Hamiltonian together with the molecule it describes.
#[derive(Debug, Clone, PartialEq)]
pub struct MolecularHamiltonian {
    /// Molecule label as requested by the caller.
    pub molecule: String,
    /// The qubit operator.
    pub hamiltonian: PauliHamiltonian,
    /// Register size (spin orbitals).
    pub n_qubits: usize,
}

/// Source of molecular Hamiltonians.
pub trait HamiltonianProvider {
    /// Build the Hamiltonian for `molecule`.
    fn hamiltonian(&self, molecule: &str) -> PipelineResult<MolecularHamiltonian>;
}

/// Provider that always returns the built-in H₂ Hamiltonian.
///
/// The requested molecule name is ignored; a notice is printed on every
/// call.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinH2Provider;

impl HamiltonianProvider for BuiltinH2Provider {
    fn hamiltonian(&self, molecule: &str) -> PipelineResult<MolecularHamiltonian> {
        print_info(&format!(
            "Note: Using built-in H2 Hamiltonian. Input '{molecule}' is ignored."
        ));

        let hamiltonian = h2_hamiltonian();
        Ok(MolecularHamiltonian {
            molecule: molecule.to_string(),
            n_qubits: hamiltonian.num_qubits(),
            hamiltonian,
        })
    }
}

/// H₂ Hamiltonian, STO-3G, bond length 1.3228 bohr.
///
/// 15 terms on 4 qubits: a constant, single Z and ZZ terms, and four
/// exchange terms coupling |1100⟩ with |0011⟩.
/// HF energy: -1.1173 Hartree. Ground state: -1.1362 Hartree.
pub fn h2_hamiltonian() -> PauliHamiltonian {
    use Pauli::{X, Y};

    let exchange = 0.044_750_144_015_351_61;
    PauliHamiltonian::new(vec![
        PauliTerm::identity(-0.042_078_976_477_822_76),
        PauliTerm::z(0.177_712_874_651_399_46, 0),
        PauliTerm::z(0.177_712_874_651_399_4, 1),
        PauliTerm::z(-0.242_742_805_131_404_6, 2),
        PauliTerm::z(-0.242_742_805_131_404_62, 3),
        PauliTerm::zz(0.170_597_383_288_010_52, 0, 1),
        PauliTerm::word(exchange, [Y, X, X, Y]),
        PauliTerm::word(-exchange, [Y, Y, X, X]),
        PauliTerm::word(-exchange, [X, X, Y, Y]),
        PauliTerm::word(exchange, [X, Y, Y, X]),
        PauliTerm::zz(0.122_933_050_561_837_98, 0, 2),
        PauliTerm::zz(0.167_683_194_577_189_6, 0, 3),
        PauliTerm::zz(0.167_683_194_577_189_6, 1, 2),
        PauliTerm::zz(0.122_933_050_561_837_98, 1, 3),
        PauliTerm::zz(0.176_276_408_043_195_91, 2, 3),
    ])
}
