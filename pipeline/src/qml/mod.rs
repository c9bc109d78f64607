//! Hybrid quantum/classical regression.

pub mod data;
pub mod layers;
pub mod model;
pub mod predict;
pub mod training;

pub use data::{generate_synthetic_data, target};
pub use model::HybridQmlModel;
pub use predict::{
    PREDICTION_SAMPLE, Prediction, PredictionOutcome, predict_from_file, predict_sample,
    run_prediction,
};
pub use training::{
    TrainingReport, mse_loss, run_training, train_model, train_model_with_progress,
};
