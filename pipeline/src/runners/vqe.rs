//! VQE (Variational Quantum Eigensolver) runner.
//!
//! VQE is a hybrid classical-quantum algorithm for finding ground state
//! energies of molecules. Each step evaluates the energy and its gradient
//! in one adjoint pass, records the energy, then lets Adam update the
//! excitation angles.

use std::f64::consts::TAU;
use std::time::{Duration, Instant};

use qdd_sim::{PauliHamiltonian, StatevectorSimulator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::chemistry::{MolecularHamiltonian, excitations, hf_state};
use crate::circuits::AllSinglesDoubles;
use crate::config::VqeConfig;
use crate::error::PipelineResult;
use crate::optimizers::{Adam, Optimizer};

/// Result of a VQE run.
#[derive(Debug, Clone)]
pub struct VqeResult {
    /// Energy before each update, one entry per step.
    pub energy_history: Vec<f64>,
    /// Last recorded energy.
    pub final_energy: f64,
    /// Parameters after the last update.
    pub optimal_params: Vec<f64>,
    /// Wall-clock time of the optimisation loop.
    pub elapsed: Duration,
}

/// VQE runner configuration.
#[derive(Debug, Clone)]
pub struct VqeRunner {
    /// The Hamiltonian to minimize.
    pub hamiltonian: PauliHamiltonian,
    /// Number of qubits.
    pub n_qubits: usize,
    /// Active electrons for the HF reference.
    pub electrons: usize,
    /// Optimisation steps.
    pub steps: usize,
    /// Adam step size.
    pub learning_rate: f64,
    /// Seed for the initial angles.
    pub seed: u64,
    /// Log the energy every this many steps.
    pub log_every: usize,
    simulator: StatevectorSimulator,
}

impl VqeRunner {
    /// Create a runner with default settings.
    pub fn new(hamiltonian: PauliHamiltonian) -> Self {
        let n_qubits = hamiltonian.num_qubits();
        Self::from_config(hamiltonian, n_qubits, &VqeConfig::default())
    }

    /// Create a runner from configuration.
    pub fn from_config(hamiltonian: PauliHamiltonian, n_qubits: usize, config: &VqeConfig) -> Self {
        Self {
            hamiltonian,
            n_qubits,
            electrons: config.active_electrons,
            steps: config.steps,
            learning_rate: config.learning_rate,
            seed: config.seed,
            log_every: config.log_every.max(1),
            simulator: StatevectorSimulator::new(),
        }
    }

    /// Create a runner for a provider result.
    pub fn for_molecule(molecule: &MolecularHamiltonian, config: &VqeConfig) -> Self {
        Self::from_config(molecule.hamiltonian.clone(), molecule.n_qubits, config)
    }

    /// Set the number of steps.
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of active electrons.
    pub fn with_electrons(mut self, electrons: usize) -> Self {
        self.electrons = electrons;
        self
    }

    /// Build the ansatz template for this problem.
    pub fn ansatz(&self) -> PipelineResult<AllSinglesDoubles> {
        Ok(AllSinglesDoubles::new(
            hf_state(self.electrons, self.n_qubits)?,
            excitations(self.electrons, self.n_qubits)?,
        ))
    }

    /// Number of ansatz parameters.
    pub fn num_parameters(&self) -> PipelineResult<usize> {
        Ok(self.ansatz()?.num_parameters())
    }

    /// Energy of the ansatz at `params`.
    pub fn energy(&self, params: &[f64]) -> PipelineResult<f64> {
        let circuit = self.ansatz()?.circuit(params)?;
        Ok(self.simulator.expectation(&circuit, &self.hamiltonian)?)
    }

    /// Run VQE from seeded uniform angles in `[0, 2π)`.
    pub fn run(&self) -> PipelineResult<VqeResult> {
        self.run_with_progress(|_, _| {})
    }

    /// Like [`Self::run`], calling `on_step(step, energy)` after every step.
    pub fn run_with_progress<F>(&self, on_step: F) -> PipelineResult<VqeResult>
    where
        F: FnMut(usize, f64),
    {
        let n_params = self.num_parameters()?;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let initial = (0..n_params).map(|_| rng.gen_range(0.0..TAU)).collect();
        self.run_with_params(initial, on_step)
    }

    /// Run VQE from explicit initial parameters.
    pub fn run_with_params<F>(&self, initial_params: Vec<f64>, mut on_step: F) -> PipelineResult<VqeResult>
    where
        F: FnMut(usize, f64),
    {
        let ansatz = self.ansatz()?;
        let mut params = initial_params;
        let mut optimizer = Adam::new(self.learning_rate).with_betas(0.9, 0.99);
        let mut energy_history = Vec::with_capacity(self.steps);

        info!(
            qubits = self.n_qubits,
            electrons = self.electrons,
            params = params.len(),
            steps = self.steps,
            "starting VQE optimization"
        );
        let start = Instant::now();

        for step in 0..self.steps {
            let circuit = ansatz.circuit(&params)?;
            let eval = self
                .simulator
                .value_and_gradient(&circuit, &self.hamiltonian)?;
            let grads = ansatz.parameter_gradient(&eval.gradient);

            energy_history.push(eval.value);
            optimizer.step(&mut params, &grads);

            if step % self.log_every == 0 {
                info!("Step {step:3}: Energy = {:.8} Ha", eval.value);
            } else {
                debug!(step, energy = eval.value, "VQE step");
            }
            on_step(step, eval.value);
        }

        let elapsed = start.elapsed();
        let final_energy = energy_history.last().copied().unwrap_or(f64::NAN);
        info!(
            elapsed_s = elapsed.as_secs_f64(),
            "final ground state energy: {final_energy:.8} Ha"
        );

        Ok(VqeResult {
            energy_history,
            final_energy,
            optimal_params: params,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::{H2_REFERENCE_ENERGY, h2_hamiltonian};
    use approx::assert_relative_eq;

    #[test]
    fn test_vqe_runner_creation() {
        let runner = VqeRunner::new(h2_hamiltonian());
        assert_eq!(runner.n_qubits, 4);
        assert_eq!(runner.steps, 50);
        assert_eq!(runner.num_parameters().unwrap(), 3);
    }

    #[test]
    fn test_hf_point_energy() {
        let runner = VqeRunner::new(h2_hamiltonian());
        let e = runner.energy(&[0.0, 0.0, 0.0]).unwrap();
        assert_relative_eq!(e, -1.117_349, epsilon = 1e-5);
    }

    #[test]
    fn test_history_length_and_final_energy() {
        let result = VqeRunner::new(h2_hamiltonian())
            .with_steps(7)
            .run()
            .unwrap();
        assert_eq!(result.energy_history.len(), 7);
        assert_eq!(result.final_energy, *result.energy_history.last().unwrap());
        assert_eq!(result.optimal_params.len(), 3);
    }

    #[test]
    fn test_zero_steps_yields_nan() {
        let result = VqeRunner::new(h2_hamiltonian())
            .with_steps(0)
            .run()
            .unwrap();
        assert!(result.energy_history.is_empty());
        assert!(result.final_energy.is_nan());
    }

    #[test]
    fn test_converges_from_hf_point() {
        let runner = VqeRunner::new(h2_hamiltonian()).with_steps(150);
        let result = runner.run_with_params(vec![0.0, 0.0, 0.1], |_, _| {}).unwrap();
        assert!(result.final_energy < -1.1173);
        assert_relative_eq!(result.final_energy, H2_REFERENCE_ENERGY, epsilon = 1e-3);
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let a = VqeRunner::new(h2_hamiltonian()).with_steps(5).run().unwrap();
        let b = VqeRunner::new(h2_hamiltonian()).with_steps(5).run().unwrap();
        assert_eq!(a.energy_history, b.energy_history);
    }

    #[test]
    fn test_too_many_electrons() {
        let runner = VqeRunner::new(h2_hamiltonian()).with_electrons(6);
        assert!(runner.run().is_err());
    }
}
