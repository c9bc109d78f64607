//! Quantum layer circuits for the hybrid model.
//!
//! Architecture:
//! 1. Angle embedding: `Rx(x[i])` on qubit `i`
//! 2. Strongly entangling layers: `Rot(φ, θ, ω)` on every qubit followed by
//!    a CNOT ring whose range grows with the layer index
//!
//! The circuit's trainable angles are the `n_qubits` inputs followed by the
//! flattened `(layers, qubits, 3)` weights, so a circuit-order gradient
//! splits cleanly into input and weight gradients.

use ndarray::{ArrayView1, ArrayView3};
use qdd_ir::{Circuit, QubitId};

use crate::error::{PipelineError, PipelineResult};

/// Weight shape of the strongly entangling layers: `(layers, qubits, 3)`.
pub fn weight_shape(n_layers: usize, n_qubits: usize) -> (usize, usize, usize) {
    (n_layers, n_qubits, 3)
}

/// CNOT range of layer `layer`: `(layer mod (n − 1)) + 1`.
///
/// A single qubit has no entangling range.
pub fn entangler_range(layer: usize, n_qubits: usize) -> Option<usize> {
    (n_qubits > 1).then(|| layer % (n_qubits - 1) + 1)
}

/// Append `Rx(features[i])` on qubit `i`.
pub fn angle_embedding(circuit: &mut Circuit, features: ArrayView1<'_, f64>) -> PipelineResult<()> {
    if features.len() != circuit.num_qubits() {
        return Err(PipelineError::ParameterMismatch {
            template: "AngleEmbedding",
            expected: circuit.num_qubits(),
            got: features.len(),
        });
    }
    for (q, &x) in features.iter().enumerate() {
        circuit.rx(x, QubitId::from(q))?;
    }
    Ok(())
}

/// Append the strongly entangling layers for `weights[(layer, qubit, k)]`.
pub fn strongly_entangling_layers(
    circuit: &mut Circuit,
    weights: ArrayView3<'_, f64>,
) -> PipelineResult<()> {
    let n = circuit.num_qubits();
    let (n_layers, wires, k) = weights.dim();
    if wires != n || k != 3 {
        return Err(PipelineError::ParameterMismatch {
            template: "StronglyEntanglingLayers",
            expected: n_layers * n * 3,
            got: weights.len(),
        });
    }

    for layer in 0..n_layers {
        for q in 0..n {
            let w = weights.slice(ndarray::s![layer, q, ..]);
            circuit.rot(w[0], w[1], w[2], QubitId::from(q))?;
        }
        if let Some(r) = entangler_range(layer, n) {
            for q in 0..n {
                circuit.cx(QubitId::from(q), QubitId::from((q + r) % n))?;
            }
        }
    }
    Ok(())
}

/// Build the complete quantum layer circuit for one input row.
pub fn quantum_layer_circuit(
    inputs: ArrayView1<'_, f64>,
    weights: ArrayView3<'_, f64>,
) -> PipelineResult<Circuit> {
    let mut circuit = Circuit::with_size("quantum_layer", inputs.len() as u32);
    angle_embedding(&mut circuit, inputs)?;
    strongly_entangling_layers(&mut circuit, weights)?;
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array3};

    #[test]
    fn test_weight_shape() {
        assert_eq!(weight_shape(6, 4), (6, 4, 3));
    }

    #[test]
    fn test_entangler_ranges() {
        let ranges: Vec<_> = (0..6).map(|l| entangler_range(l, 4).unwrap()).collect();
        assert_eq!(ranges, vec![1, 2, 3, 1, 2, 3]);
        assert_eq!(entangler_range(0, 1), None);
    }

    #[test]
    fn test_quantum_layer_parameter_count() {
        let inputs = Array1::from(vec![0.1, 0.2, 0.3, 0.4]);
        let weights = Array3::from_elem(weight_shape(6, 4), 0.5);
        let circuit = quantum_layer_circuit(inputs.view(), weights.view()).unwrap();

        assert_eq!(circuit.num_qubits(), 4);
        assert_eq!(circuit.num_parameters(), 4 + 6 * 4 * 3);
        // one CNOT per qubit per layer
        let cnots = circuit
            .instructions()
            .iter()
            .filter(|i| i.name() == "cx")
            .count();
        assert_eq!(cnots, 24);
        assert_eq!(&circuit.parameters()[..4], &[0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_weights_flatten_in_row_major_order() {
        let weights = Array3::from_shape_fn((2, 2, 3), |(l, q, k)| (l * 6 + q * 3 + k) as f64);
        let inputs = Array1::zeros(2);
        let circuit = quantum_layer_circuit(inputs.view(), weights.view()).unwrap();
        let expected: Vec<f64> = weights.iter().copied().collect();
        assert_eq!(&circuit.parameters()[2..], expected.as_slice());
    }

    #[test]
    fn test_shape_mismatch() {
        let inputs = Array1::zeros(3);
        let weights = Array3::zeros((1, 4, 3));
        assert!(quantum_layer_circuit(inputs.view(), weights.view()).is_err());
    }
}
