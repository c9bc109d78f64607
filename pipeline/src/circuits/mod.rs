//! Quantum circuit templates.

pub mod qml;
pub mod vqe;

pub use qml::{angle_embedding, quantum_layer_circuit, strongly_entangling_layers, weight_shape};
pub use vqe::AllSinglesDoubles;
