//! Orchestration of the VQE and screening workflows.

pub mod screening;
pub mod vqe;

pub use screening::{
    ScreeningEntry, ScreeningFailure, ScreeningReport, format_report, list_molecules, rank,
    run_screening, save_report, screen_molecules,
};
pub use vqe::{VqeResult, VqeRunner};
