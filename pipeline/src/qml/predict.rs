//! Prediction with a saved hybrid model.

use std::path::{Path, PathBuf};

use ndarray::Array2;
use tracing::info;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::qml::data::target;
use crate::qml::model::HybridQmlModel;
use crate::{print_result, print_success};

/// The sample evaluated by [`run_prediction`].
pub const PREDICTION_SAMPLE: [f64; 2] = [0.5, -0.2];

/// Command printed when no model has been saved yet.
pub const TRAIN_COMMAND: &str = "cargo run --release --bin qdd-train";

/// A single prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Input features.
    pub input: [f64; 2],
    /// Value of the target function at `input`.
    pub expected: f64,
    /// Model output.
    pub predicted: f64,
}

/// Result of a prediction request.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    /// No state dict at the configured path.
    ModelMissing {
        /// Path that was checked.
        path: PathBuf,
    },
    /// The model ran.
    Predicted(Prediction),
}

/// Evaluate `model` on one input.
pub fn predict_sample(model: &HybridQmlModel, input: [f64; 2]) -> PipelineResult<Prediction> {
    let x = Array2::from_shape_vec((1, 2), input.to_vec())?;
    let predicted = model
        .predict(x.view())?
        .first()
        .copied()
        .ok_or_else(|| PipelineError::ModelShape("empty prediction".to_string()))?;
    Ok(Prediction {
        input,
        expected: target(input[0], input[1]),
        predicted,
    })
}

/// Load the model at `model_path` and evaluate `input`.
///
/// A missing file is not an error; it yields [`PredictionOutcome::ModelMissing`].
pub fn predict_from_file(model_path: &Path, input: [f64; 2]) -> PipelineResult<PredictionOutcome> {
    if !model_path.exists() {
        return Ok(PredictionOutcome::ModelMissing {
            path: model_path.to_path_buf(),
        });
    }
    let model = HybridQmlModel::load(model_path)?;
    info!(path = %model_path.display(), "trained model loaded");
    Ok(PredictionOutcome::Predicted(predict_sample(&model, input)?))
}

/// Predict [`PREDICTION_SAMPLE`] and print the outcome.
pub fn run_prediction(config: &PipelineConfig) -> PipelineResult<PredictionOutcome> {
    let outcome = predict_from_file(&config.paths.model_path, PREDICTION_SAMPLE)?;
    match &outcome {
        PredictionOutcome::ModelMissing { .. } => {
            println!("Error: Model file not found. Please train the model first by running:");
            println!("{TRAIN_COMMAND}");
        }
        PredictionOutcome::Predicted(p) => {
            print_success("Trained QML model loaded successfully.");
            println!();
            print_result("Input data", format!("{:?}", p.input));
            print_result("Expected output", format!("{:.4}", p.expected));
            print_result("Model prediction", format!("{:.4}", p.predicted));
        }
    }
    Ok(outcome)
}
