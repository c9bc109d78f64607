//! Adam (adaptive moment estimation) optimizer.
//!
//! Moment buffers are allocated lazily on the first step, so one instance
//! serves any parameter vector length, but that length must not change
//! afterwards.

use super::Optimizer;

/// Adam optimizer configuration and state.
#[derive(Debug, Clone)]
pub struct Adam {
    /// Step size.
    pub learning_rate: f64,
    /// Decay rate of the first moment.
    pub beta1: f64,
    /// Decay rate of the second moment.
    pub beta2: f64,
    /// Denominator offset.
    pub epsilon: f64,
    m: Vec<f64>,
    v: Vec<f64>,
    t: usize,
}

impl Default for Adam {
    fn default() -> Self {
        Self {
            learning_rate: 0.001,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            m: Vec::new(),
            v: Vec::new(),
            t: 0,
        }
    }
}

impl Adam {
    /// Create an Adam optimizer with the given step size.
    pub fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            ..Self::default()
        }
    }

    /// Set the moment decay rates.
    pub fn with_betas(mut self, beta1: f64, beta2: f64) -> Self {
        self.beta1 = beta1;
        self.beta2 = beta2;
        self
    }

    /// Set the denominator offset.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: &mut [f64], grads: &[f64]) {
        debug_assert_eq!(params.len(), grads.len());
        if self.m.len() != params.len() {
            self.m = vec![0.0; params.len()];
            self.v = vec![0.0; params.len()];
        }
        self.t += 1;

        let t = self.t as i32;
        let bias1 = 1.0 - self.beta1.powi(t);
        let bias2 = 1.0 - self.beta2.powi(t);

        for (((p, &g), m), v) in params
            .iter_mut()
            .zip(grads)
            .zip(&mut self.m)
            .zip(&mut self.v)
        {
            *m = self.beta1 * *m + (1.0 - self.beta1) * g;
            *v = self.beta2 * *v + (1.0 - self.beta2) * g * g;
            let m_hat = *m / bias1;
            let v_hat = *v / bias2;
            *p -= self.learning_rate * m_hat / (v_hat.sqrt() + self.epsilon);
        }
    }

    fn iterations(&self) -> usize {
        self.t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_step_moves_by_learning_rate() {
        // bias-corrected first step is lr * sign(g)
        let mut adam = Adam::new(0.1);
        let mut params = vec![1.0, -2.0];
        adam.step(&mut params, &[4.0, -0.5]);
        assert_relative_eq!(params[0], 0.9, epsilon = 1e-6);
        assert_relative_eq!(params[1], -1.9, epsilon = 1e-6);
        assert_eq!(adam.iterations(), 1);
    }

    #[test]
    fn test_minimizes_quadratic() {
        let mut adam = Adam::new(0.1).with_betas(0.9, 0.99);
        let mut x = vec![3.0, -4.0];
        for _ in 0..500 {
            let grads: Vec<f64> = x.iter().map(|xi| 2.0 * (xi - 1.0)).collect();
            adam.step(&mut x, &grads);
        }
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-2);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-2);
    }

    #[test]
    fn test_zero_gradient_is_fixed_point() {
        let mut adam = Adam::new(0.5).with_epsilon(1e-8);
        let mut params = vec![0.25];
        adam.step(&mut params, &[0.0]);
        assert_eq!(params, vec![0.25]);
    }
}
