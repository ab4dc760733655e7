#![deny(missing_docs)]
#![doc = "Core identifiers, error surface and transport contracts shared by the ORC surgery crates."]

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod provenance;
pub mod rng;
pub mod transport;

pub use errors::{ErrorInfo, OrcError};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::RngHandle;
pub use transport::{TransportPlan, TransportProblem, TransportSolver};

/// Opaque identifier for a node (an author in co-authorship data).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Creates a new identifier from its textual representation.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the textual representation of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifier for a hyperedge (a paper connecting its authors).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HyperedgeId(String);

impl HyperedgeId {
    /// Creates a new identifier from its textual representation.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the textual representation of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HyperedgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HyperedgeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for HyperedgeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
