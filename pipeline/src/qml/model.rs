//! Hybrid quantum/classical regression model.
//!
//! ```text
//! x (2) ─ Linear(2→8) ─ ReLU ─ Linear(8→n) ─ quantum layer ─ Linear(1→1) ─ ŷ
//! ```
//!
//! The quantum layer embeds its `n` inputs as RX angles, applies strongly
//! entangling layers and returns ⟨Z₀⟩. Its gradients with respect to both
//! inputs and weights come from one adjoint pass per sample.

use std::f64::consts::TAU;
use std::path::Path;

use ndarray::{Array1, Array2, Array3, ArrayView1, ArrayView2, Axis};
use qdd_sim::{PauliHamiltonian, StatevectorSimulator};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::circuits::{quantum_layer_circuit, weight_shape};
use crate::error::{PipelineError, PipelineResult};
use crate::qml::layers::{Linear, LinearGrads, relu, relu_backward};

/// Width of the hidden encoder layer.
pub const HIDDEN_WIDTH: usize = 8;

/// Number of input features.
pub const INPUT_FEATURES: usize = 2;

/// The model's trainable state, serialized as the "state dict".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridQmlModel {
    /// Qubits in the quantum layer.
    pub n_qubits: usize,
    /// Strongly entangling layers.
    pub n_layers: usize,
    /// `Linear(2 → 8)`.
    pub encoder_in: Linear,
    /// `Linear(8 → n_qubits)`.
    pub encoder_out: Linear,
    /// Quantum weights, shape `(n_layers, n_qubits, 3)`.
    pub quantum_weights: Array3<f64>,
    /// `Linear(1 → 1)`.
    pub decoder: Linear,
}

/// Intermediate values of a forward pass, kept for back-propagation.
#[derive(Debug, Clone)]
pub struct ForwardCache {
    input: Array2<f64>,
    hidden_pre: Array2<f64>,
    hidden: Array2<f64>,
    quantum_in: Array2<f64>,
    quantum_out: Array2<f64>,
    /// Circuit-order gradient of ⟨Z₀⟩ per sample.
    quantum_grads: Vec<Vec<f64>>,
    /// Model output, shape `(batch,)`.
    pub output: Array1<f64>,
}

/// Gradients of every trainable tensor.
#[derive(Debug, Clone)]
pub struct ModelGradients {
    /// Encoder input layer.
    pub encoder_in: LinearGrads,
    /// Encoder output layer.
    pub encoder_out: LinearGrads,
    /// Quantum weights.
    pub quantum_weights: Array3<f64>,
    /// Decoder.
    pub decoder: LinearGrads,
}

impl ModelGradients {
    /// Flatten in the order of [`HybridQmlModel::parameters`].
    pub fn flatten(&self) -> Vec<f64> {
        let mut out = Vec::new();
        self.encoder_in.flatten_into(&mut out);
        self.encoder_out.flatten_into(&mut out);
        out.extend(self.quantum_weights.iter());
        self.decoder.flatten_into(&mut out);
        out
    }
}

impl HybridQmlModel {
    /// Randomly initialized model.
    pub fn new<R: Rng + ?Sized>(n_qubits: usize, n_layers: usize, rng: &mut R) -> Self {
        let encoder_in = Linear::init(INPUT_FEATURES, HIDDEN_WIDTH, rng);
        let encoder_out = Linear::init(HIDDEN_WIDTH, n_qubits, rng);
        let quantum_weights =
            Array3::from_shape_simple_fn(weight_shape(n_layers, n_qubits), || rng.gen_range(0.0..TAU));
        let decoder = Linear::init(1, 1, rng);
        Self {
            n_qubits,
            n_layers,
            encoder_in,
            encoder_out,
            quantum_weights,
            decoder,
        }
    }

    /// Total trainable scalars.
    pub fn num_parameters(&self) -> usize {
        self.encoder_in.num_parameters()
            + self.encoder_out.num_parameters()
            + self.quantum_weights.len()
            + self.decoder.num_parameters()
    }

    /// All trainable scalars as one flat vector.
    pub fn parameters(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.num_parameters());
        self.encoder_in.flatten_into(&mut out);
        self.encoder_out.flatten_into(&mut out);
        out.extend(self.quantum_weights.iter());
        self.decoder.flatten_into(&mut out);
        out
    }

    /// Overwrite all trainable scalars from a flat vector.
    pub fn set_parameters(&mut self, values: &[f64]) -> PipelineResult<()> {
        if values.len() != self.num_parameters() {
            return Err(PipelineError::ParameterMismatch {
                template: "HybridQmlModel",
                expected: self.num_parameters(),
                got: values.len(),
            });
        }
        let rest = self.encoder_in.assign_from(values);
        let rest = self.encoder_out.assign_from(rest);
        let (quantum, rest) = rest.split_at(self.quantum_weights.len());
        self.quantum_weights
            .iter_mut()
            .zip(quantum)
            .for_each(|(p, v)| *p = *v);
        self.decoder.assign_from(rest);
        Ok(())
    }

    /// ⟨Z₀⟩ of the quantum layer for one input row.
    pub fn quantum_expectation(&self, inputs: ArrayView1<'_, f64>) -> PipelineResult<f64> {
        let circuit = quantum_layer_circuit(inputs, self.quantum_weights.view())?;
        Ok(StatevectorSimulator::new().expectation(&circuit, &PauliHamiltonian::z(0))?)
    }

    /// Predict a batch of rows, shape `(batch, 2)`.
    pub fn predict(&self, x: ArrayView2<'_, f64>) -> PipelineResult<Array1<f64>> {
        self.check_input(x)?;
        let hidden = relu(&self.encoder_in.forward(x));
        let quantum_in = self.encoder_out.forward(hidden.view());
        let quantum_out = quantum_in
            .rows()
            .into_iter()
            .map(|row| self.quantum_expectation(row))
            .collect::<PipelineResult<Vec<f64>>>()?;
        let quantum_out = Array2::from_shape_vec((quantum_out.len(), 1), quantum_out)?;
        Ok(self.decoder.forward(quantum_out.view()).column(0).to_owned())
    }

    /// Forward pass that also records the quantum gradients.
    pub fn forward(&self, x: ArrayView2<'_, f64>) -> PipelineResult<ForwardCache> {
        self.check_input(x)?;
        let simulator = StatevectorSimulator::new();
        let observable = PauliHamiltonian::z(0);

        let hidden_pre = self.encoder_in.forward(x);
        let hidden = relu(&hidden_pre);
        let quantum_in = self.encoder_out.forward(hidden.view());

        let mut quantum_out = Array2::zeros((x.nrows(), 1));
        let mut quantum_grads = Vec::with_capacity(x.nrows());
        for (b, row) in quantum_in.rows().into_iter().enumerate() {
            let circuit = quantum_layer_circuit(row, self.quantum_weights.view())?;
            let eval = simulator.value_and_gradient(&circuit, &observable)?;
            quantum_out[[b, 0]] = eval.value;
            quantum_grads.push(eval.gradient);
        }

        let output = self.decoder.forward(quantum_out.view()).column(0).to_owned();
        Ok(ForwardCache {
            input: x.to_owned(),
            hidden_pre,
            hidden,
            quantum_in,
            quantum_out,
            quantum_grads,
            output,
        })
    }

    /// Back-propagate `grad_output` (dL/dŷ, shape `(batch,)`).
    pub fn backward(&self, cache: &ForwardCache, grad_output: ArrayView1<'_, f64>) -> ModelGradients {
        let grad_out = grad_output.insert_axis(Axis(1));
        let (grad_q, decoder) = self.decoder.backward(cache.quantum_out.view(), grad_out);

        let n = self.n_qubits;
        let mut grad_quantum_in = Array2::zeros(cache.quantum_in.raw_dim());
        let mut quantum_weights = Array3::zeros(self.quantum_weights.raw_dim());
        for (b, circuit_grad) in cache.quantum_grads.iter().enumerate() {
            let upstream = grad_q[[b, 0]];
            let (inputs, weights) = circuit_grad.split_at(n);
            for (i, g) in inputs.iter().enumerate() {
                grad_quantum_in[[b, i]] = upstream * g;
            }
            quantum_weights
                .iter_mut()
                .zip(weights)
                .for_each(|(acc, g)| *acc += upstream * g);
        }

        let (grad_hidden, encoder_out) = self
            .encoder_out
            .backward(cache.hidden.view(), grad_quantum_in.view());
        let grad_hidden_pre = relu_backward(&cache.hidden_pre, &grad_hidden);
        let (_, encoder_in) = self
            .encoder_in
            .backward(cache.input.view(), grad_hidden_pre.view());

        ModelGradients {
            encoder_in,
            encoder_out,
            quantum_weights,
            decoder,
        }
    }

    /// Write the state dict as JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> PipelineResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!(path = %path.display(), params = self.num_parameters(), "model saved");
        Ok(())
    }

    /// Read a state dict written by [`Self::save`] and check its shapes.
    pub fn load(path: &Path) -> PipelineResult<Self> {
        let model: Self = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        model.validate()?;
        debug!(path = %path.display(), "model loaded");
        Ok(model)
    }

    /// Check that every tensor matches the declared architecture.
    pub fn validate(&self) -> PipelineResult<()> {
        let expect = |what: &str, got: (usize, usize), want: (usize, usize)| {
            if got == want {
                Ok(())
            } else {
                Err(PipelineError::ModelShape(format!(
                    "{what} has shape {got:?}, expected {want:?}"
                )))
            }
        };
        expect("encoder_in", self.encoder_in.weight.dim(), (HIDDEN_WIDTH, INPUT_FEATURES))?;
        expect("encoder_out", self.encoder_out.weight.dim(), (self.n_qubits, HIDDEN_WIDTH))?;
        expect("decoder", self.decoder.weight.dim(), (1, 1))?;
        for (what, layer) in [
            ("encoder_in bias", &self.encoder_in),
            ("encoder_out bias", &self.encoder_out),
            ("decoder bias", &self.decoder),
        ] {
            expect(what, (layer.bias.len(), 1), (layer.out_features(), 1))?;
        }
        if self.quantum_weights.dim() != weight_shape(self.n_layers, self.n_qubits) {
            return Err(PipelineError::ModelShape(format!(
                "quantum_weights has shape {:?}, expected {:?}",
                self.quantum_weights.dim(),
                weight_shape(self.n_layers, self.n_qubits)
            )));
        }
        Ok(())
    }

    fn check_input(&self, x: ArrayView2<'_, f64>) -> PipelineResult<()> {
        if x.ncols() != INPUT_FEATURES {
            return Err(PipelineError::ModelShape(format!(
                "input has {} features, expected {INPUT_FEATURES}",
                x.ncols()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn small_model() -> HybridQmlModel {
        let mut rng = StdRng::seed_from_u64(5);
        HybridQmlModel::new(3, 2, &mut rng)
    }

    fn mse(model: &HybridQmlModel, x: &Array2<f64>, y: &Array1<f64>) -> f64 {
        let pred = model.predict(x.view()).unwrap();
        (&pred - y).mapv(|d| d * d).mean().unwrap()
    }

    #[test]
    fn test_parameter_count() {
        let mut rng = StdRng::seed_from_u64(0);
        let model = HybridQmlModel::new(4, 6, &mut rng);
        // 2·8+8 + 8·4+4 + 6·4·3 + 1+1
        assert_eq!(model.num_parameters(), 24 + 36 + 72 + 2);
        assert_eq!(model.parameters().len(), model.num_parameters());
        assert!(model.quantum_weights.iter().all(|w| (0.0..TAU).contains(w)));
    }

    #[test]
    fn test_set_parameters_roundtrip() {
        let model = small_model();
        let mut other = HybridQmlModel::new(3, 2, &mut StdRng::seed_from_u64(99));
        other.set_parameters(&model.parameters()).unwrap();
        assert_eq!(other, model);
        assert!(other.set_parameters(&[0.0; 3]).is_err());
    }

    #[test]
    fn test_forward_matches_predict() {
        let model = small_model();
        let x = array![[0.5, -0.2], [-0.9, 0.3]];
        let cache = model.forward(x.view()).unwrap();
        let pred = model.predict(x.view()).unwrap();
        for (a, b) in cache.output.iter().zip(pred.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_backward_matches_finite_differences() {
        let model = small_model();
        let x = array![[0.5, -0.2], [-0.9, 0.3], [0.1, 0.8]];
        let y = array![0.3, -0.4, 0.1];

        let cache = model.forward(x.view()).unwrap();
        let grad_out = (&cache.output - &y).mapv(|d| 2.0 * d / 3.0);
        let analytic = model.backward(&cache, grad_out.view()).flatten();

        let params = model.parameters();
        let h = 1e-6;
        for k in 0..params.len() {
            let mut plus = model.clone();
            let mut minus = model.clone();
            let mut p = params.clone();
            p[k] += h;
            plus.set_parameters(&p).unwrap();
            p[k] -= 2.0 * h;
            minus.set_parameters(&p).unwrap();
            let fd = (mse(&plus, &x, &y) - mse(&minus, &x, &y)) / (2.0 * h);
            assert_relative_eq!(analytic[k], fd, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_wrong_input_width() {
        let model = small_model();
        assert!(model.predict(array![[1.0, 2.0, 3.0]].view()).is_err());
    }

    #[test]
    fn test_save_load_is_bit_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("model.json");
        let x = array![[0.5, -0.2], [-0.73, 0.91], [0.123_456_789, -0.987_654_321]];
        for seed in 0..20 {
            let model = HybridQmlModel::new(4, 6, &mut StdRng::seed_from_u64(seed));
            model.save(&path).unwrap();
            let loaded = HybridQmlModel::load(&path).unwrap();

            let saved_bits: Vec<u64> = model.parameters().iter().map(|p| p.to_bits()).collect();
            let loaded_bits: Vec<u64> = loaded.parameters().iter().map(|p| p.to_bits()).collect();
            assert_eq!(saved_bits, loaded_bits, "seed {seed}");

            let before = model.predict(x.view()).unwrap();
            let after = loaded.predict(x.view()).unwrap();
            for (a, b) in before.iter().zip(after.iter()) {
                assert_eq!(a.to_bits(), b.to_bits(), "seed {seed}");
            }
        }
    }

    #[test]
    fn test_validate_rejects_bad_shape() {
        let mut model = small_model();
        model.quantum_weights = Array3::zeros((1, 1, 3));
        assert!(matches!(model.validate(), Err(PipelineError::ModelShape(_))));
    }
}
