//! Gradient-based optimizers for the variational loops.

pub mod adam;

pub use adam::Adam;

/// An optimizer that updates a flat parameter vector from its gradient.
pub trait Optimizer {
    /// Apply one update in place. `grads` has the same length as `params`.
    fn step(&mut self, params: &mut [f64], grads: &[f64]);

    /// Number of updates applied so far.
    fn iterations(&self) -> usize;
}
