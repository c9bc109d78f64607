//! Classical layers of the hybrid model.

use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fully connected layer `y = x·Wᵀ + b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Linear {
    /// Weight matrix, shape `(out, in)`.
    pub weight: Array2<f64>,
    /// Bias vector, shape `(out,)`.
    pub bias: Array1<f64>,
}

/// Gradients of a [`Linear`] layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGrads {
    /// dL/dW, shape `(out, in)`.
    pub weight: Array2<f64>,
    /// dL/db, shape `(out,)`.
    pub bias: Array1<f64>,
}

impl Linear {
    /// Uniform initialization in `(-1/√in, 1/√in)` for weights and bias.
    pub fn init<R: Rng + ?Sized>(in_features: usize, out_features: usize, rng: &mut R) -> Self {
        let bound = 1.0 / (in_features as f64).sqrt();
        let weight =
            Array2::from_shape_simple_fn((out_features, in_features), || rng.gen_range(-bound..bound));
        let bias = Array1::from_shape_simple_fn(out_features, || rng.gen_range(-bound..bound));
        Self { weight, bias }
    }

    /// Input width.
    pub fn in_features(&self) -> usize {
        self.weight.ncols()
    }

    /// Output width.
    pub fn out_features(&self) -> usize {
        self.weight.nrows()
    }

    /// Number of trainable scalars.
    pub fn num_parameters(&self) -> usize {
        self.weight.len() + self.bias.len()
    }

    /// Apply to a batch of rows.
    pub fn forward(&self, x: ArrayView2<'_, f64>) -> Array2<f64> {
        x.dot(&self.weight.t()) + &self.bias
    }

    /// Back-propagate `grad_out` (shape `(batch, out)`) given the layer input.
    ///
    /// Returns the gradient with respect to the input and the parameter
    /// gradients.
    pub fn backward(
        &self,
        x: ArrayView2<'_, f64>,
        grad_out: ArrayView2<'_, f64>,
    ) -> (Array2<f64>, LinearGrads) {
        let grad_x = grad_out.dot(&self.weight);
        let grads = LinearGrads {
            weight: grad_out.t().dot(&x),
            bias: grad_out.sum_axis(Axis(0)),
        };
        (grad_x, grads)
    }

    /// Append weights then bias to `out`, both row-major.
    pub fn flatten_into(&self, out: &mut Vec<f64>) {
        out.extend(self.weight.iter());
        out.extend(self.bias.iter());
    }

    /// Overwrite weights then bias from the front of `values`.
    ///
    /// Returns the remaining slice.
    pub fn assign_from<'a>(&mut self, values: &'a [f64]) -> &'a [f64] {
        let (w, rest) = values.split_at(self.weight.len());
        let (b, rest) = rest.split_at(self.bias.len());
        self.weight.iter_mut().zip(w).for_each(|(p, v)| *p = *v);
        self.bias.iter_mut().zip(b).for_each(|(p, v)| *p = *v);
        rest
    }
}

impl LinearGrads {
    /// Append in the same order as [`Linear::flatten_into`].
    pub fn flatten_into(&self, out: &mut Vec<f64>) {
        out.extend(self.weight.iter());
        out.extend(self.bias.iter());
    }
}

/// Element-wise `max(x, 0)`.
pub fn relu(x: &Array2<f64>) -> Array2<f64> {
    x.mapv(|v| v.max(0.0))
}

/// Gradient of [`relu`] given its pre-activation input.
pub fn relu_backward(pre_activation: &Array2<f64>, grad_out: &Array2<f64>) -> Array2<f64> {
    let mut grad = grad_out.clone();
    grad.zip_mut_with(pre_activation, |g, &x| {
        if x <= 0.0 {
            *g = 0.0;
        }
    });
    grad
}
