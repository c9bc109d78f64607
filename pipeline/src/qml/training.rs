//! Mini-batch training of the hybrid model.

use std::time::{Duration, Instant};

use ndarray::{Array1, Array2, Axis};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::config::{PipelineConfig, QmlConfig};
use crate::error::PipelineResult;
use crate::optimizers::{Adam, Optimizer};
use crate::qml::data::generate_synthetic_data;
use crate::qml::model::HybridQmlModel;

/// Outcome of a training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// Mean batch loss of every epoch.
    pub epoch_losses: Vec<f64>,
    /// Number of optimizer steps taken.
    pub steps: usize,
    /// Wall-clock training time.
    pub elapsed: Duration,
}

impl TrainingReport {
    /// Loss of the last epoch, NaN if no epoch ran.
    pub fn final_loss(&self) -> f64 {
        self.epoch_losses.last().copied().unwrap_or(f64::NAN)
    }
}

/// Mean squared error and its gradient with respect to the predictions.
pub fn mse_loss(predictions: &Array1<f64>, targets: &Array1<f64>) -> (f64, Array1<f64>) {
    let diff = predictions - targets;
    let n = diff.len().max(1) as f64;
    let loss = diff.mapv(|d| d * d).sum() / n;
    let grad = diff.mapv(|d| 2.0 * d / n);
    (loss, grad)
}

/// Train a freshly initialized model on synthetic data.
///
/// Data, weights and shuffling all draw from one RNG seeded with
/// `config.seed`, so the loss trajectory is reproducible.
pub fn train_model(config: &QmlConfig) -> PipelineResult<(HybridQmlModel, TrainingReport)> {
    train_model_with_progress(config, |_, _| {})
}

/// Like [`train_model`], calling `on_epoch(epoch, loss)` after each epoch.
pub fn train_model_with_progress<F>(
    config: &QmlConfig,
    mut on_epoch: F,
) -> PipelineResult<(HybridQmlModel, TrainingReport)>
where
    F: FnMut(usize, f64),
{
    let mut rng = StdRng::seed_from_u64(config.seed);
    let (x, y) = generate_synthetic_data(config.n_samples, &mut rng);
    let mut model = HybridQmlModel::new(config.n_qubits, config.n_layers, &mut rng);

    let mut optimizer = Adam::new(config.learning_rate).with_betas(0.9, 0.999);
    let mut params = model.parameters();
    let batch_size = config.batch_size.max(1);
    let log_every = config.log_every.max(1);

    info!(
        samples = config.n_samples,
        params = params.len(),
        epochs = config.epochs,
        "starting training"
    );
    let start = Instant::now();
    let mut indices: Vec<usize> = (0..x.nrows()).collect();
    let mut epoch_losses = Vec::with_capacity(config.epochs);

    for epoch in 0..config.epochs {
        indices.shuffle(&mut rng);
        let mut running_loss = 0.0;
        let mut batches = 0;

        for batch in indices.chunks(batch_size) {
            let bx: Array2<f64> = x.select(Axis(0), batch);
            let by: Array1<f64> = y.select(Axis(0), batch);

            let cache = model.forward(bx.view())?;
            let (loss, grad_out) = mse_loss(&cache.output, &by);
            let grads = model.backward(&cache, grad_out.view()).flatten();

            optimizer.step(&mut params, &grads);
            model.set_parameters(&params)?;

            running_loss += loss;
            batches += 1;
        }

        let avg_loss = running_loss / batches.max(1) as f64;
        epoch_losses.push(avg_loss);
        if (epoch + 1) % log_every == 0 {
            info!("Epoch [{}/{}], Loss: {avg_loss:.6}", epoch + 1, config.epochs);
        } else {
            debug!(epoch = epoch + 1, loss = avg_loss, "epoch finished");
        }
        on_epoch(epoch, avg_loss);
    }

    let report = TrainingReport {
        epoch_losses,
        steps: optimizer.iterations(),
        elapsed: start.elapsed(),
    };
    Ok((model, report))
}

/// Train with `config.qml` and save the state dict to `config.paths.model_path`.
///
/// Any previous model file is overwritten.
pub fn run_training<F>(config: &PipelineConfig, on_epoch: F) -> PipelineResult<TrainingReport>
where
    F: FnMut(usize, f64),
{
    let (model, report) = train_model_with_progress(&config.qml, on_epoch)?;
    model.save(&config.paths.model_path)?;
    Ok(report)
}
