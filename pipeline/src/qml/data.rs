//! Synthetic regression data.

use std::f64::consts::PI;

use ndarray::{Array1, Array2};
use rand::Rng;

/// The function the hybrid model learns: `sin(π·x₁)·cos(π·x₂)`.
pub fn target(x1: f64, x2: f64) -> f64 {
    (PI * x1).sin() * (PI * x2).cos()
}

/// `n_samples` rows with features uniform in `[-1, 1)` and their targets.
pub fn generate_synthetic_data<R: Rng + ?Sized>(
    n_samples: usize,
    rng: &mut R,
) -> (Array2<f64>, Array1<f64>) {
    let x = Array2::from_shape_simple_fn((n_samples, 2), || rng.gen_range(-1.0..1.0));
    let y = x.rows().into_iter().map(|row| target(row[0], row[1])).collect();
    (x, y)
}
