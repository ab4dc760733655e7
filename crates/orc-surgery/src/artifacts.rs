use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use orc_core::errors::{ErrorInfo, OrcError};
use orc_core::HyperedgeId;
use orc_graph::{HypergraphStats, WeightUpdate};
use serde::{Deserialize, Serialize};

use crate::config::OutputConfig;

/// One row of the per-iteration weight table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRow {
    /// Hyperedge the row describes.
    #[serde(rename = "Hyperedge ID")]
    pub hyperedge: HyperedgeId,
    /// Curvature computed this iteration; empty when undefined.
    #[serde(rename = "ORC")]
    pub orc: Option<f64>,
    /// Weight after the update.
    #[serde(rename = "Weight")]
    pub weight: f64,
}

impl From<WeightUpdate> for WeightRow {
    fn from(update: WeightUpdate) -> Self {
        Self {
            hyperedge: update.hyperedge,
            orc: update.curvature,
            weight: update.weight,
        }
    }
}

const WEIGHT_HEADER: [&str; 3] = ["Hyperedge ID", "ORC", "Weight"];

/// Destination for the per-iteration artefacts of a surgery run.
///
/// Writers return the path they wrote to, or `None` for sinks that keep
/// artefacts in memory.
pub trait ArtifactSink {
    /// Stores the distance matrix of iteration `k` as headerless rows.
    fn write_distance_matrix(
        &mut self,
        iteration: usize,
        rows: &[Vec<f64>],
    ) -> Result<Option<PathBuf>, OrcError>;

    /// Appends rows to the weight table of iteration `k`.
    fn append_weight_rows(
        &mut self,
        iteration: usize,
        rows: &[WeightRow],
    ) -> Result<Option<PathBuf>, OrcError>;

    /// Reads back every row of the weight table of iteration `k`.
    fn read_weight_rows(&self, iteration: usize) -> Result<Vec<WeightRow>, OrcError>;

    /// Stores the statistics report written after pruning round `round`.
    fn write_stats(
        &mut self,
        iteration: usize,
        round: usize,
        stats: &HypergraphStats,
    ) -> Result<Option<PathBuf>, OrcError>;
}

impl<T: ArtifactSink + ?Sized> ArtifactSink for &mut T {
    fn write_distance_matrix(
        &mut self,
        iteration: usize,
        rows: &[Vec<f64>],
    ) -> Result<Option<PathBuf>, OrcError> {
        (**self).write_distance_matrix(iteration, rows)
    }

    fn append_weight_rows(
        &mut self,
        iteration: usize,
        rows: &[WeightRow],
    ) -> Result<Option<PathBuf>, OrcError> {
        (**self).append_weight_rows(iteration, rows)
    }

    fn read_weight_rows(&self, iteration: usize) -> Result<Vec<WeightRow>, OrcError> {
        (**self).read_weight_rows(iteration)
    }

    fn write_stats(
        &mut self,
        iteration: usize,
        round: usize,
        stats: &HypergraphStats,
    ) -> Result<Option<PathBuf>, OrcError> {
        (**self).write_stats(iteration, round, stats)
    }
}

/// In-memory sink used by tests and embedding applications.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// Distance matrices keyed by iteration.
    pub matrices: BTreeMap<usize, Vec<Vec<f64>>>,
    /// Weight tables keyed by iteration.
    pub weights: BTreeMap<usize, Vec<WeightRow>>,
    /// Rendered statistics reports keyed by pruning round.
    pub stats: BTreeMap<usize, String>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArtifactSink for MemorySink {
    fn write_distance_matrix(
        &mut self,
        iteration: usize,
        rows: &[Vec<f64>],
    ) -> Result<Option<PathBuf>, OrcError> {
        self.matrices.insert(iteration, rows.to_vec());
        Ok(None)
    }

    fn append_weight_rows(
        &mut self,
        iteration: usize,
        rows: &[WeightRow],
    ) -> Result<Option<PathBuf>, OrcError> {
        self.weights
            .entry(iteration)
            .or_default()
            .extend(rows.iter().cloned());
        Ok(None)
    }

    fn read_weight_rows(&self, iteration: usize) -> Result<Vec<WeightRow>, OrcError> {
        Ok(self.weights.get(&iteration).cloned().unwrap_or_default())
    }

    fn write_stats(
        &mut self,
        _iteration: usize,
        round: usize,
        stats: &HypergraphStats,
    ) -> Result<Option<PathBuf>, OrcError> {
        self.stats.insert(round, stats.render());
        Ok(None)
    }
}

/// Filesystem sink laying files out according to an [`OutputConfig`].
#[derive(Debug, Clone)]
pub struct CsvArtifactSink {
    layout: OutputConfig,
}

impl CsvArtifactSink {
    /// Creates a sink writing below `layout.directory`.
    pub fn new(layout: OutputConfig) -> Self {
        Self { layout }
    }

    /// Layout used to name files.
    pub fn layout(&self) -> &OutputConfig {
        &self.layout
    }
}

impl ArtifactSink for CsvArtifactSink {
    fn write_distance_matrix(
        &mut self,
        iteration: usize,
        rows: &[Vec<f64>],
    ) -> Result<Option<PathBuf>, OrcError> {
        let path = self.layout.distance_matrix_path(iteration);
        ensure_parent(&path)?;
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .map_err(|err| wrap_csv("matrix-open", &path, err))?;
        for row in rows {
            writer
                .serialize(row)
                .map_err(|err| wrap_csv("matrix-write-row", &path, err))?;
        }
        writer
            .flush()
            .map_err(|err| wrap_io("matrix-flush", &path, err))?;
        Ok(Some(path))
    }

    fn append_weight_rows(
        &mut self,
        iteration: usize,
        rows: &[WeightRow],
    ) -> Result<Option<PathBuf>, OrcError> {
        let path = self.layout.weights_path(iteration);
        ensure_parent(&path)?;
        let needs_header = fs::metadata(&path).map(|meta| meta.len() == 0).unwrap_or(true);
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .map_err(|err| wrap_io("weights-open", &path, err))?;
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));
        if needs_header {
            writer
                .write_record(WEIGHT_HEADER)
                .map_err(|err| wrap_csv("weights-write-header", &path, err))?;
        }
        for row in rows {
            writer
                .serialize(row)
                .map_err(|err| wrap_csv("weights-write-row", &path, err))?;
        }
        writer
            .flush()
            .map_err(|err| wrap_io("weights-flush", &path, err))?;
        Ok(Some(path))
    }

    fn read_weight_rows(&self, iteration: usize) -> Result<Vec<WeightRow>, OrcError> {
        let path = self.layout.weights_path(iteration);
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(&path)
            .map_err(|err| wrap_csv("weights-read", &path, err))?;
        reader
            .deserialize()
            .collect::<Result<Vec<WeightRow>, _>>()
            .map_err(|err| wrap_csv("weights-record", &path, err))
    }

    fn write_stats(
        &mut self,
        iteration: usize,
        round: usize,
        stats: &HypergraphStats,
    ) -> Result<Option<PathBuf>, OrcError> {
        let path = self.layout.stats_path(iteration, round);
        ensure_parent(&path)?;
        fs::write(&path, stats.render()).map_err(|err| wrap_io("stats-write", &path, err))?;
        Ok(Some(path))
    }
}

pub(crate) fn ensure_parent(path: &Path) -> Result<(), OrcError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| wrap_io("artifact-mkdir", parent, err))?;
    }
    Ok(())
}

fn wrap_csv(code: &str, path: &Path, err: csv::Error) -> OrcError {
    OrcError::Artifact(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display()),
    )
}

pub(crate) fn wrap_io(code: &str, path: &Path, err: std::io::Error) -> OrcError {
    OrcError::Artifact(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display()),
    )
}
