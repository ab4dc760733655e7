use std::fs;
use std::path::{Path, PathBuf};

use orc_core::errors::{ErrorInfo, OrcError};
use orc_graph::{CurvatureParams, TransportParams, WalkParams, DEFAULT_LOGISTIC_CLIP, DEFAULT_MASS_TOLERANCE};
use orc_transport::SolverOptions;
use serde::{Deserialize, Serialize};

/// YAML-configurable parameters governing a surgery run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurgeryConfig {
    /// Number of reweighting iterations after the baseline pass.
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Share of the remaining hyperedges removed per pruning round.
    #[serde(default = "default_prune_fraction")]
    pub prune_fraction: f64,
    /// Pruning happens on iterations divisible by this period.
    #[serde(default = "default_prune_every")]
    pub prune_every: usize,
    /// Lazy random-walk parameters.
    #[serde(default)]
    pub walk: WalkParams,
    /// Largest accepted difference between transported total masses.
    #[serde(default = "default_mass_tolerance")]
    pub mass_tolerance: f64,
    /// Symmetric clip applied to the logistic input.
    #[serde(default = "default_logistic_clip")]
    pub logistic_clip: f64,
    /// Transport backend knobs.
    #[serde(default)]
    pub solver: SolverOptions,
    /// Artifact layout.
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_iterations() -> usize {
    5
}

fn default_prune_fraction() -> f64 {
    0.08
}

fn default_prune_every() -> usize {
    2
}

fn default_mass_tolerance() -> f64 {
    DEFAULT_MASS_TOLERANCE
}

fn default_logistic_clip() -> f64 {
    DEFAULT_LOGISTIC_CLIP
}

impl Default for SurgeryConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            prune_fraction: default_prune_fraction(),
            prune_every: default_prune_every(),
            walk: WalkParams::default(),
            mass_tolerance: default_mass_tolerance(),
            logistic_clip: default_logistic_clip(),
            solver: SolverOptions::default(),
            output: OutputConfig::default(),
        }
    }
}

impl SurgeryConfig {
    /// Parses a configuration from YAML text; omitted fields take defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, OrcError> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|err| OrcError::Config(ErrorInfo::new("config-parse", err.to_string())))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, OrcError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            OrcError::Config(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        Self::from_yaml_str(&contents).map_err(|err| err.with_context("path", path.display()))
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), OrcError> {
        if !(0.0..=1.0).contains(&self.prune_fraction) {
            return Err(invalid("prune_fraction", self.prune_fraction, "must lie in [0, 1]"));
        }
        if self.prune_every == 0 {
            return Err(invalid("prune_every", self.prune_every, "must be at least 1"));
        }
        if self.logistic_clip.is_nan() || self.logistic_clip <= 0.0 {
            return Err(invalid("logistic_clip", self.logistic_clip, "must be positive"));
        }
        if self.mass_tolerance.is_nan() || self.mass_tolerance < 0.0 {
            return Err(invalid("mass_tolerance", self.mass_tolerance, "must be non-negative"));
        }
        self.walk.validate()
    }

    /// Walk and transport parameters for curvature aggregation.
    pub fn curvature_params(&self) -> CurvatureParams {
        CurvatureParams {
            walk: self.walk,
            transport: TransportParams {
                mass_tolerance: self.mass_tolerance,
            },
        }
    }

    /// Whether iteration `k` ends with a pruning round.
    pub fn prunes_at(&self, iteration: usize) -> bool {
        iteration >= 1 && self.prune_every > 0 && iteration % self.prune_every == 0
    }
}

fn invalid(field: &str, value: impl ToString, requirement: &str) -> OrcError {
    OrcError::Config(
        ErrorInfo::new("invalid-config", format!("`{field}` {requirement}"))
            .with_context("field", field)
            .with_context("value", value),
    )
}

/// Output directory layout.
///
/// Templates substitute `{iteration}` and `{round}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root directory for run artefacts. Created if it does not exist.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    /// Distance matrix filename template.
    #[serde(default = "default_distance_matrix_file")]
    pub distance_matrix_file: String,
    /// Weight table filename template for the baseline pass.
    #[serde(default = "default_baseline_weights_file")]
    pub baseline_weights_file: String,
    /// Weight table filename template for iterations `1..=K`.
    #[serde(default = "default_weights_file")]
    pub weights_file: String,
    /// Statistics report filename template, indexed by pruning round.
    #[serde(default = "default_stats_file")]
    pub stats_file: String,
    /// Manifest filename relative to `directory`.
    #[serde(default = "default_manifest_file")]
    pub manifest_file: PathBuf,
    /// Final snapshot filename relative to `directory`.
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: PathBuf,
    /// Whether distance matrices are written each iteration.
    #[serde(default = "default_true")]
    pub write_distance_matrices: bool,
    /// Whether the final hypergraph is written as a JSON snapshot.
    #[serde(default)]
    pub write_snapshot: bool,
    /// Whether a run manifest is written.
    #[serde(default = "default_true")]
    pub write_manifest: bool,
}

fn default_directory() -> PathBuf {
    PathBuf::from("outputfiles")
}

fn default_distance_matrix_file() -> String {
    "distance_matrix_normalized_weights_{iteration}.csv".to_string()
}

fn default_baseline_weights_file() -> String {
    "orc_weights_iteration_{iteration}.csv".to_string()
}

fn default_weights_file() -> String {
    "normalized_weights_iteration_{iteration}.csv".to_string()
}

fn default_stats_file() -> String {
    "surgery_stats_{round}.txt".to_string()
}

fn default_manifest_file() -> PathBuf {
    PathBuf::from("manifest.json")
}

fn default_snapshot_file() -> PathBuf {
    PathBuf::from("final_hypergraph.json")
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            distance_matrix_file: default_distance_matrix_file(),
            baseline_weights_file: default_baseline_weights_file(),
            weights_file: default_weights_file(),
            stats_file: default_stats_file(),
            manifest_file: default_manifest_file(),
            snapshot_file: default_snapshot_file(),
            write_distance_matrices: true,
            write_snapshot: false,
            write_manifest: true,
        }
    }
}

impl OutputConfig {
    /// Distance matrix path for iteration `k`.
    pub fn distance_matrix_path(&self, iteration: usize) -> PathBuf {
        self.directory.join(render(&self.distance_matrix_file, iteration, 0))
    }

    /// Weight table path for iteration `k`; the baseline uses its own template.
    pub fn weights_path(&self, iteration: usize) -> PathBuf {
        let template = if iteration == 0 {
            &self.baseline_weights_file
        } else {
            &self.weights_file
        };
        self.directory.join(render(template, iteration, 0))
    }

    /// Statistics report path for a pruning round.
    pub fn stats_path(&self, iteration: usize, round: usize) -> PathBuf {
        self.directory.join(render(&self.stats_file, iteration, round))
    }

    /// Manifest path.
    pub fn manifest_path(&self) -> PathBuf {
        self.directory.join(&self.manifest_file)
    }

    /// Snapshot path.
    pub fn snapshot_path(&self) -> PathBuf {
        self.directory.join(&self.snapshot_file)
    }
}

fn render(template: &str, iteration: usize, round: usize) -> String {
    template
        .replace("{iteration}", &iteration.to_string())
        .replace("{round}", &round.to_string())
}
