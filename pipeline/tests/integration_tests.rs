//! End-to-end tests for the screening, training and prediction workflows.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use proptest::prelude::*;
use tempfile::TempDir;

use qdd_pipeline::chemistry::{
    BuiltinH2Provider, H2_REFERENCE_ENERGY, HamiltonianProvider, MolecularHamiltonian,
};
use qdd_pipeline::config::{PipelineConfig, QmlConfig, VqeConfig};
use qdd_pipeline::error::{PipelineError, PipelineResult};
use qdd_pipeline::qml::{
    HybridQmlModel, PREDICTION_SAMPLE, PredictionOutcome, predict_from_file, predict_sample,
    run_training, train_model,
};
use qdd_pipeline::runners::{
    ScreeningEntry, VqeRunner, list_molecules, rank, run_screening, screen_molecules,
};

/// Fails for every molecule named in `failing`, otherwise returns H₂.
struct FailingProvider {
    failing: Vec<String>,
}

impl HamiltonianProvider for FailingProvider {
    fn hamiltonian(&self, molecule: &str) -> PipelineResult<MolecularHamiltonian> {
        if self.failing.iter().any(|f| f == molecule) {
            return Err(PipelineError::Hamiltonian {
                molecule: molecule.to_string(),
                reason: "no integrals available".to_string(),
            });
        }
        BuiltinH2Provider.hamiltonian(molecule)
    }
}

fn write_molecules(dir: &Path, names: &[&str]) {
    fs::create_dir_all(dir).unwrap();
    for name in names {
        fs::write(dir.join(format!("{name}.xyz")), "2\n\nH 0 0 0\nH 0 0 0.74\n").unwrap();
    }
}

fn test_config(root: &Path) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.paths.data_dir = root.join("data");
    config.paths.results_dir = root.join("results");
    config.paths.model_path = root.join("results").join("model.json");
    config.vqe = VqeConfig {
        steps: 5,
        ..VqeConfig::default()
    };
    config.qml = QmlConfig {
        n_qubits: 2,
        n_layers: 1,
        epochs: 2,
        batch_size: 5,
        n_samples: 10,
        ..QmlConfig::default()
    };
    config
}

#[test]
fn test_vqe_h2_reaches_reference() {
    let molecule = BuiltinH2Provider.hamiltonian("h2").unwrap();
    let config = VqeConfig {
        steps: 150,
        ..VqeConfig::default()
    };
    let result = VqeRunner::for_molecule(&molecule, &config)
        .run_with_params(vec![0.0, 0.0, 0.1], |_, _| {})
        .unwrap();
    assert_eq!(result.energy_history.len(), 150);
    assert!(result.final_energy < result.energy_history[0]);
    assert_relative_eq!(result.final_energy, H2_REFERENCE_ENERGY, epsilon = 1e-3);
}

#[test]
fn test_screening_with_failure() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());
    write_molecules(&config.paths.data_dir, &["h2", "lih"]);
    fs::write(config.paths.data_dir.join("notes.txt"), "ignored").unwrap();

    let provider = FailingProvider {
        failing: vec!["lih".to_string()],
    };
    let report = run_screening(&provider, &config).unwrap();

    assert_eq!(report.ranked.len(), 1);
    assert_eq!(report.ranked[0].molecule, "h2");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].molecule, "lih");

    let path = report.report_path.expect("report written");
    assert_eq!(path, config.paths.screening_log());
    let text = fs::read_to_string(path).unwrap();
    assert!(text.starts_with("--- Virtual Screening Results ---"));
    assert!(text.contains("1. H2"));
    assert!(text.contains("- LIH:"));
}

#[test]
fn test_builtin_provider_ranks_identical_energies() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());
    write_molecules(&config.paths.data_dir, &["caffeine", "aspirin"]);

    let report = screen_molecules(&BuiltinH2Provider, &config).unwrap();
    assert_eq!(report.ranked.len(), 2);
    assert!(report.failures.is_empty());
    assert_eq!(report.ranked[0].energy, report.ranked[1].energy);
}

#[test]
fn test_empty_data_dir_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());
    fs::create_dir_all(&config.paths.data_dir).unwrap();

    let report = run_screening(&BuiltinH2Provider, &config).unwrap();
    assert!(report.ranked.is_empty());
    assert!(report.report_path.is_none());
    assert!(!config.paths.screening_log().exists());
}

#[test]
fn test_missing_data_dir_is_error() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());
    let err = run_screening(&BuiltinH2Provider, &config).unwrap_err();
    assert!(matches!(err, PipelineError::DataDirMissing(_)));
}

#[test]
fn test_list_molecules_sorted() {
    let tmp = TempDir::new().unwrap();
    write_molecules(tmp.path(), &["lih", "beh2", "h2"]);
    let names = list_molecules(tmp.path()).unwrap();
    assert_eq!(names, vec!["beh2", "h2", "lih"]);
}

#[test]
fn test_training_is_reproducible() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());
    let (_, a) = train_model(&config.qml).unwrap();
    let (_, b) = train_model(&config.qml).unwrap();
    assert_eq!(a.epoch_losses, b.epoch_losses);
    assert!(a.epoch_losses.iter().all(|l| l.is_finite()));
}

#[test]
fn test_train_save_load_predict() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());

    let mut epochs = 0;
    let report = run_training(&config, |_, _| epochs += 1).unwrap();
    assert_eq!(epochs, 2);
    assert_eq!(report.epoch_losses.len(), 2);
    assert!(config.paths.model_path.exists());

    let loaded = HybridQmlModel::load(&config.paths.model_path).unwrap();
    assert_eq!(loaded.n_qubits, 2);
    assert_eq!(loaded.n_layers, 1);

    // Same seed, so this is the model that was written.
    let (trained, _) = train_model(&config.qml).unwrap();
    assert_eq!(loaded, trained);

    let direct = predict_sample(&trained, PREDICTION_SAMPLE).unwrap();
    match predict_from_file(&config.paths.model_path, PREDICTION_SAMPLE).unwrap() {
        PredictionOutcome::Predicted(p) => {
            assert_eq!(p.predicted.to_bits(), direct.predicted.to_bits());
            assert_relative_eq!(p.expected, direct.expected);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn test_predict_without_model() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());
    let outcome = predict_from_file(&config.paths.model_path, PREDICTION_SAMPLE).unwrap();
    assert_eq!(
        outcome,
        PredictionOutcome::ModelMissing {
            path: config.paths.model_path.clone()
        }
    );
}

#[test]
fn test_corrupt_model_is_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("model.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(predict_from_file(&path, PREDICTION_SAMPLE).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_rank_sorted_and_complete(energies in prop::collection::vec(-10.0f64..10.0, 0..12)) {
        let entries: Vec<ScreeningEntry> = energies
            .iter()
            .enumerate()
            .map(|(i, &energy)| ScreeningEntry {
                molecule: format!("m{i}"),
                energy,
                elapsed: std::time::Duration::ZERO,
            })
            .collect();
        let ranked = rank(entries);
        prop_assert_eq!(ranked.len(), energies.len());
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].energy <= pair[1].energy);
        }
    }

    #[test]
    fn prop_ranked_count_matches_successes(
        names in prop::collection::btree_set("[a-z]{1,6}", 0..6),
        mask in prop::collection::vec(any::<bool>(), 6),
    ) {
        let tmp = TempDir::new().unwrap();
        let mut config = test_config(tmp.path());
        config.vqe.steps = 1;

        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        write_molecules(&config.paths.data_dir, &names);
        let failing: BTreeSet<String> = names
            .iter()
            .zip(&mask)
            .filter(|(_, fail)| **fail)
            .map(|(name, _)| name.to_string())
            .collect();

        let provider = FailingProvider {
            failing: failing.iter().cloned().collect(),
        };
        let report = screen_molecules(&provider, &config).unwrap();

        prop_assert_eq!(report.ranked.len(), names.len() - failing.len());
        prop_assert_eq!(report.failures.len(), failing.len());
        for entry in &report.ranked {
            prop_assert!(!failing.contains(&entry.molecule));
        }
        let failed: BTreeSet<String> =
            report.failures.iter().map(|f| f.molecule.clone()).collect();
        prop_assert_eq!(failed, failing);
    }
}
