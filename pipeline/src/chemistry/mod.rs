//! Molecular Hamiltonians and fermionic active-space helpers.

pub mod excitations;
pub mod molecules;

pub use excitations::{Excitations, excitations, hf_state};
pub use molecules::{
    BuiltinH2Provider, H2_REFERENCE_ENERGY, HamiltonianProvider, MolecularHamiltonian,
    h2_geometry, h2_hamiltonian,
};
