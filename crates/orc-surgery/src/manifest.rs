use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use orc_core::errors::{ErrorInfo, OrcError};
use orc_core::provenance::{RunProvenance, SchemaVersion};
use orc_graph::{graph_to_json, Hypergraph};
use serde::{Deserialize, Serialize};

use crate::artifacts::{ensure_parent, wrap_io};
use crate::config::SurgeryConfig;
use crate::controller::{PruneRound, SurgeryReport};

/// Structured manifest describing a completed surgery run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    /// Schema of this manifest.
    pub schema_version: SchemaVersion,
    /// Configuration used for the run.
    pub config: SurgeryConfig,
    /// Input and graph hashes plus timestamp and tool versions.
    pub provenance: RunProvenance,
    /// Hyperedges removed per pruning round.
    pub rounds: Vec<PruneRound>,
    /// Files written during the run, in write order.
    pub artifacts: Vec<PathBuf>,
}

impl RunManifest {
    /// Builds a manifest from a finished report, stamped with the current time.
    pub fn from_report(config: &SurgeryConfig, report: &SurgeryReport, input_hash: Option<String>) -> Self {
        let mut tool_versions = BTreeMap::new();
        tool_versions.insert(
            env!("CARGO_PKG_NAME").to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        );
        Self {
            schema_version: SchemaVersion::default(),
            config: config.clone(),
            provenance: RunProvenance {
                input_hash,
                initial_graph_hash: report.initial_hash.clone(),
                final_graph_hash: report.final_hash.clone(),
                created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                tool_versions,
            },
            rounds: report.rounds.clone(),
            artifacts: report.artifacts.clone(),
        }
    }

    /// Writes the manifest to a JSON file.
    pub fn write(&self, path: &Path) -> Result<(), OrcError> {
        ensure_parent(path)?;
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            OrcError::Serde(
                ErrorInfo::new("manifest-serialize", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        fs::write(path, json).map_err(|err| wrap_io("manifest-write", path, err))
    }

    /// Loads a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, OrcError> {
        let contents =
            fs::read_to_string(path).map_err(|err| wrap_io("manifest-read", path, err))?;
        serde_json::from_str(&contents).map_err(|err| {
            OrcError::Serde(
                ErrorInfo::new("manifest-parse", err.to_string())
                    .with_context("path", path.display()),
            )
        })
    }
}

/// Writes a JSON snapshot of the hypergraph, histories included.
pub fn write_snapshot(graph: &Hypergraph, path: &Path) -> Result<(), OrcError> {
    ensure_parent(path)?;
    let json = graph_to_json(graph)?;
    fs::write(path, json).map_err(|err| wrap_io("snapshot-write", path, err))
}
