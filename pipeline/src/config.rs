//! Pipeline configuration.
//!
//! Supports loading configuration from:
//! 1. Built-in defaults
//! 2. A YAML file
//! 3. Environment variables with the `QDD_` prefix
//!
//! Later sources override earlier ones. The merged configuration is
//! validated before it is handed to any driver.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Complete pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PipelineConfig {
    /// Input and output locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// VQE settings.
    #[serde(default)]
    pub vqe: VqeConfig,

    /// Hybrid model settings.
    #[serde(default)]
    pub qml: QmlConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Filesystem locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory scanned for `*.xyz` molecule files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory for reports.
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// Hybrid model state dict.
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
}

impl PathsConfig {
    /// Path of the screening report.
    pub fn screening_log(&self) -> PathBuf {
        self.results_dir.join("screening_results.log")
    }
}

/// VQE settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VqeConfig {
    /// Optimisation steps.
    #[serde(default = "default_vqe_steps")]
    pub steps: usize,

    /// Adam step size.
    #[serde(default = "default_vqe_learning_rate")]
    pub learning_rate: f64,

    /// Basis set label, reported only.
    #[serde(default = "default_basis_set")]
    pub basis_set: String,

    /// Active electrons used for the HF state and excitations.
    #[serde(default = "default_active_electrons")]
    pub active_electrons: usize,

    /// Active spatial orbitals, reported only.
    #[serde(default = "default_active_orbitals")]
    pub active_orbitals: usize,

    /// Seed for the initial parameters.
    #[serde(default = "default_vqe_seed")]
    pub seed: u64,

    /// Log the energy every this many steps.
    #[serde(default = "default_log_every")]
    pub log_every: usize,
}

/// Hybrid model settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QmlConfig {
    /// Qubits in the quantum layer.
    #[serde(default = "default_qml_qubits")]
    pub n_qubits: usize,

    /// Strongly entangling layers.
    #[serde(default = "default_qml_layers")]
    pub n_layers: usize,

    /// Training epochs.
    #[serde(default = "default_qml_epochs")]
    pub epochs: usize,

    /// Adam learning rate.
    #[serde(default = "default_qml_learning_rate")]
    pub learning_rate: f64,

    /// Mini-batch size.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Synthetic training samples.
    #[serde(default = "default_samples")]
    pub n_samples: usize,

    /// Seed for data, weights and shuffling.
    #[serde(default = "default_qml_seed")]
    pub seed: u64,

    /// Log the average loss every this many epochs.
    #[serde(default = "default_log_every")]
    pub log_every: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level when no `-v` flag is given: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format; only "console" is supported
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_model_path() -> PathBuf {
    PathBuf::from("results").join("qml_model.json")
}

fn default_vqe_steps() -> usize {
    50
}

fn default_vqe_learning_rate() -> f64 {
    0.1
}

fn default_basis_set() -> String {
    "sto-3g".to_string()
}

fn default_active_electrons() -> usize {
    2
}

fn default_active_orbitals() -> usize {
    2
}

fn default_vqe_seed() -> u64 {
    42
}

fn default_log_every() -> usize {
    5
}

fn default_qml_qubits() -> usize {
    4
}

fn default_qml_layers() -> usize {
    6
}

fn default_qml_epochs() -> usize {
    30
}

fn default_qml_learning_rate() -> f64 {
    0.05
}

fn default_batch_size() -> usize {
    10
}

fn default_samples() -> usize {
    100
}

fn default_qml_seed() -> u64 {
    1234
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "console".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            results_dir: default_results_dir(),
            model_path: default_model_path(),
        }
    }
}

impl Default for VqeConfig {
    fn default() -> Self {
        Self {
            steps: default_vqe_steps(),
            learning_rate: default_vqe_learning_rate(),
            basis_set: default_basis_set(),
            active_electrons: default_active_electrons(),
            active_orbitals: default_active_orbitals(),
            seed: default_vqe_seed(),
            log_every: default_log_every(),
        }
    }
}

impl Default for QmlConfig {
    fn default() -> Self {
        Self {
            n_qubits: default_qml_qubits(),
            n_layers: default_qml_layers(),
            epochs: default_qml_epochs(),
            learning_rate: default_qml_learning_rate(),
            batch_size: default_batch_size(),
            n_samples: default_samples(),
            seed: default_qml_seed(),
            log_every: default_log_every(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a YAML file. Missing fields take defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml_ng::from_str(contents)?)
    }

    /// Load configuration with the following precedence:
    /// 1. Defaults, or the YAML file if one is given
    /// 2. Environment variable overrides
    ///
    /// The result is validated. Ignored overrides are logged immediately, so
    /// binaries that install their subscriber afterwards should call
    /// [`Self::load_with_overrides`] instead.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let (config, ignored) = Self::load_with_overrides(config_file)?;
        report_ignored(&ignored);
        Ok(config)
    }

    /// Like [`Self::load`], returning the environment overrides that failed
    /// to parse instead of logging them.
    pub fn load_with_overrides(
        config_file: Option<&Path>,
    ) -> Result<(Self, Vec<IgnoredOverride>), ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let (config, ignored) = config.merge_env();
        config.validate()?;
        Ok((config, ignored))
    }

    /// Merge process environment variables into this configuration.
    pub fn merge_env(self) -> (Self, Vec<IgnoredOverride>) {
        self.merge_env_from(|key| std::env::var(key).ok())
    }

    /// Merge overrides from an arbitrary variable lookup.
    ///
    /// Only variables that are present override the current values.
    /// Values that fail to parse leave the current value in place and are
    /// returned alongside the merged configuration.
    pub fn merge_env_from<F>(mut self, lookup: F) -> (Self, Vec<IgnoredOverride>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut ignored = Vec::new();

        // Paths
        if let Some(v) = lookup("QDD_DATA_DIR") {
            self.paths.data_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("QDD_RESULTS_DIR") {
            self.paths.results_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("QDD_MODEL_PATH") {
            self.paths.model_path = PathBuf::from(v);
        }

        // VQE
        override_parsed(&lookup, "QDD_VQE_STEPS", &mut self.vqe.steps, &mut ignored);
        override_parsed(&lookup, "QDD_VQE_LR", &mut self.vqe.learning_rate, &mut ignored);
        override_parsed(
            &lookup,
            "QDD_VQE_ACTIVE_ELECTRONS",
            &mut self.vqe.active_electrons,
            &mut ignored,
        );
        override_parsed(&lookup, "QDD_VQE_SEED", &mut self.vqe.seed, &mut ignored);

        // QML
        override_parsed(&lookup, "QDD_QML_QUBITS", &mut self.qml.n_qubits, &mut ignored);
        override_parsed(&lookup, "QDD_QML_LAYERS", &mut self.qml.n_layers, &mut ignored);
        override_parsed(&lookup, "QDD_QML_EPOCHS", &mut self.qml.epochs, &mut ignored);
        override_parsed(&lookup, "QDD_QML_LR", &mut self.qml.learning_rate, &mut ignored);
        override_parsed(&lookup, "QDD_QML_BATCH_SIZE", &mut self.qml.batch_size, &mut ignored);
        override_parsed(&lookup, "QDD_QML_SAMPLES", &mut self.qml.n_samples, &mut ignored);
        override_parsed(&lookup, "QDD_QML_SEED", &mut self.qml.seed, &mut ignored);

        // Logging
        if let Some(v) = lookup("QDD_LOG_LEVEL") {
            self.logging.level = v;
        }

        (self, ignored)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("vqe.steps", self.vqe.steps),
            ("vqe.log_every", self.vqe.log_every),
            ("qml.n_qubits", self.qml.n_qubits),
            ("qml.n_layers", self.qml.n_layers),
            ("qml.epochs", self.qml.epochs),
            ("qml.batch_size", self.qml.batch_size),
            ("qml.n_samples", self.qml.n_samples),
            ("qml.log_every", self.qml.log_every),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(ConfigError::Validation(format!(
                    "{name} must be greater than 0"
                )));
            }
        }

        for (name, lr) in [
            ("vqe.learning_rate", self.vqe.learning_rate),
            ("qml.learning_rate", self.qml.learning_rate),
        ] {
            if !(lr.is_finite() && lr > 0.0) {
                return Err(ConfigError::Validation(format!(
                    "{name} must be a positive number, got {lr}"
                )));
            }
        }

        if self.vqe.active_electrons > 2 * self.vqe.active_orbitals {
            return Err(ConfigError::Validation(format!(
                "{} active electrons do not fit in {} orbitals",
                self.vqe.active_electrons, self.vqe.active_orbitals
            )));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::Validation(format!(
                    "Invalid log level: {other}"
                )));
            }
        }

        if self.logging.format != "console" {
            return Err(ConfigError::Validation(format!(
                "Unsupported log format: {}",
                self.logging.format
            )));
        }

        Ok(())
    }
}

/// An environment override whose value could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredOverride {
    /// Variable name.
    pub key: String,
    /// Raw value as found in the environment.
    pub value: String,
}

impl std::fmt::Display for IgnoredOverride {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={:?}", self.key, self.value)
    }
}

/// Log every ignored override at `warn`.
pub fn report_ignored(ignored: &[IgnoredOverride]) {
    for o in ignored {
        warn!(key = %o.key, value = %o.value, "ignoring unparsable environment override");
    }
}

fn override_parsed<F, T>(lookup: &F, key: &str, slot: &mut T, ignored: &mut Vec<IgnoredOverride>)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(raw) = lookup(key) {
        match raw.parse() {
            Ok(value) => *slot = value,
            Err(_) => ignored.push(IgnoredOverride {
                key: key.to_string(),
                value: raw,
            }),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}
