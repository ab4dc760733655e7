use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use orc_core::errors::{ErrorInfo, OrcError};
use orc_core::{HyperedgeId, NodeId};
use serde::{Deserialize, Serialize};

/// Weight assigned to every hyperedge on insertion.
pub const INITIAL_WEIGHT: f64 = 1.0;

/// Member list and per-iteration histories owned by a hyperedge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HyperedgeRecord {
    members: Vec<NodeId>,
    weights: Vec<f64>,
    curvatures: Vec<f64>,
}

impl HyperedgeRecord {
    fn new(members: Vec<NodeId>) -> Self {
        Self {
            members,
            weights: vec![INITIAL_WEIGHT],
            curvatures: Vec::new(),
        }
    }

    pub(crate) fn restore(members: Vec<NodeId>, weights: Vec<f64>, curvatures: Vec<f64>) -> Self {
        let weights = if weights.is_empty() {
            vec![INITIAL_WEIGHT]
        } else {
            weights
        };
        Self {
            members,
            weights,
            curvatures,
        }
    }

    /// Member nodes in insertion order.
    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    /// Weight history; index 0 is the initial weight, the last entry is current.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Curvature history, one entry per iteration with a defined curvature.
    pub fn curvatures(&self) -> &[f64] {
        &self.curvatures
    }

    /// Latest weight.
    pub fn current_weight(&self) -> f64 {
        self.weights.last().copied().unwrap_or(INITIAL_WEIGHT)
    }

    /// Latest curvature, if any iteration produced one.
    pub fn current_curvature(&self) -> Option<f64> {
        self.curvatures.last().copied()
    }

    /// Whether `node` is a member.
    pub fn contains(&self, node: &NodeId) -> bool {
        self.members.contains(node)
    }
}

#[derive(Debug, Clone, Default)]
struct NodeRecord {
    hyperedges: BTreeSet<HyperedgeId>,
}

/// Result of [`Hypergraph::add_hyperedge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeInsert {
    /// The hyperedge was stored with a fresh weight history.
    Inserted,
    /// A hyperedge with this id already exists; nothing changed.
    Conflict,
}

/// Hyperedge popped by [`Hypergraph::remove_hyperedge`].
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedHyperedge {
    /// Identifier of the removed hyperedge.
    pub id: HyperedgeId,
    /// Members and histories at the time of removal.
    pub record: HyperedgeRecord,
    /// Former members that no longer belong to any hyperedge and were dropped.
    pub orphaned: Vec<NodeId>,
}

/// Undirected hypergraph owning nodes, hyperedges and their histories.
///
/// Nodes iterate in identifier order, hyperedges in insertion order. Every
/// member of a stored hyperedge is a stored node.
#[derive(Debug, Clone, Default)]
pub struct Hypergraph {
    nodes: BTreeMap<NodeId, NodeRecord>,
    hyperedges: IndexMap<HyperedgeId, HyperedgeRecord>,
}

impl Hypergraph {
    /// Creates an empty hypergraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of stored hyperedges.
    pub fn hyperedge_count(&self) -> usize {
        self.hyperedges.len()
    }

    /// Whether the node set is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over node identifiers in store order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &NodeId> + '_ {
        self.nodes.keys()
    }

    /// Iterates over hyperedges in insertion order.
    pub fn hyperedges(&self) -> impl ExactSizeIterator<Item = (&HyperedgeId, &HyperedgeRecord)> + '_ {
        self.hyperedges.iter()
    }

    /// Hyperedge identifiers in insertion order.
    pub fn hyperedge_ids(&self) -> Vec<HyperedgeId> {
        self.hyperedges.keys().cloned().collect()
    }

    /// Whether `node` is stored.
    pub fn contains_node(&self, node: &NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    /// Whether a hyperedge with this id is stored.
    pub fn contains_hyperedge(&self, id: &HyperedgeId) -> bool {
        self.hyperedges.contains_key(id)
    }

    /// Adds an isolated node. Returns `false` if it was already present.
    pub fn add_node(&mut self, node: impl Into<NodeId>) -> bool {
        let node = node.into();
        if self.nodes.contains_key(&node) {
            return false;
        }
        self.nodes.insert(node, NodeRecord::default());
        true
    }

    /// Adds a hyperedge, inserting any member nodes not seen before.
    ///
    /// Re-adding an existing id keeps the original and reports a conflict.
    pub fn add_hyperedge(&mut self, id: impl Into<HyperedgeId>, members: Vec<NodeId>) -> EdgeInsert {
        let id = id.into();
        if let Some(existing) = self.hyperedges.get(&id) {
            tracing::warn!(
                hyperedge = %id,
                existing = ?existing.members(),
                attempted = ?members,
                "hyperedge already exists; keeping the original"
            );
            return EdgeInsert::Conflict;
        }
        for member in &members {
            self.nodes
                .entry(member.clone())
                .or_default()
                .hyperedges
                .insert(id.clone());
        }
        self.hyperedges.insert(id, HyperedgeRecord::new(members));
        EdgeInsert::Inserted
    }

    /// Removes a hyperedge and drops members left without any hyperedge.
    ///
    /// Unknown ids are a logged no-op.
    pub fn remove_hyperedge(&mut self, id: &HyperedgeId) -> Option<RemovedHyperedge> {
        let Some(record) = self.hyperedges.shift_remove(id) else {
            tracing::warn!(hyperedge = %id, "attempted to remove an unknown hyperedge");
            return None;
        };
        let mut orphaned = Vec::new();
        for member in record.members() {
            let Some(node) = self.nodes.get_mut(member) else {
                continue;
            };
            node.hyperedges.remove(id);
            if node.hyperedges.is_empty() {
                self.nodes.remove(member);
                orphaned.push(member.clone());
            }
        }
        Some(RemovedHyperedge {
            id: id.clone(),
            record,
            orphaned,
        })
    }

    /// Returns the stored record for a hyperedge.
    pub fn hyperedge(&self, id: &HyperedgeId) -> Result<&HyperedgeRecord, OrcError> {
        self.hyperedges
            .get(id)
            .ok_or_else(|| unknown_hyperedge(id))
    }

    /// Member list of a hyperedge.
    pub fn members(&self, id: &HyperedgeId) -> Result<&[NodeId], OrcError> {
        Ok(self.hyperedge(id)?.members())
    }

    /// Number of hyperedges containing `node`.
    pub fn degree(&self, node: &NodeId) -> Result<usize, OrcError> {
        Ok(self.node(node)?.hyperedges.len())
    }

    /// Nodes sharing at least one hyperedge with `node`, excluding `node`.
    ///
    /// Absent nodes have no neighbours.
    pub fn neighbours(&self, node: &NodeId) -> BTreeSet<NodeId> {
        let mut neighbours = BTreeSet::new();
        let Some(record) = self.nodes.get(node) else {
            return neighbours;
        };
        for id in &record.hyperedges {
            if let Some(edge) = self.hyperedges.get(id) {
                neighbours.extend(edge.members().iter().cloned());
            }
        }
        neighbours.remove(node);
        neighbours
    }

    /// Hyperedges containing at least one of the queried nodes, in insertion order.
    ///
    /// Nested collections can be flattened by the caller (`iter().flatten()`).
    /// Unknown nodes are logged and otherwise ignored.
    pub fn hyperedges_containing<'a, I>(&self, nodes: I) -> Vec<HyperedgeId>
    where
        I: IntoIterator<Item = &'a NodeId>,
    {
        let query: BTreeSet<&NodeId> = nodes.into_iter().collect();
        let unknown: Vec<&NodeId> = query
            .iter()
            .copied()
            .filter(|node| !self.nodes.contains_key(*node))
            .collect();
        if !unknown.is_empty() {
            tracing::warn!(?unknown, "some queried nodes are not in the hypergraph");
        }
        self.hyperedges
            .iter()
            .filter(|(_, record)| record.members().iter().any(|member| query.contains(member)))
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Number of hyperedges containing both `a` and `b`.
    pub fn shared_hyperedges(&self, a: &NodeId, b: &NodeId) -> usize {
        match (self.nodes.get(a), self.nodes.get(b)) {
            (Some(left), Some(right)) => left.hyperedges.intersection(&right.hyperedges).count(),
            _ => 0,
        }
    }

    /// Ids of the hyperedges containing `node`.
    pub fn incident_hyperedges(&self, node: &NodeId) -> Result<Vec<HyperedgeId>, OrcError> {
        Ok(self.node(node)?.hyperedges.iter().cloned().collect())
    }

    /// Latest weight of a hyperedge.
    pub fn current_weight(&self, id: &HyperedgeId) -> Result<f64, OrcError> {
        Ok(self.hyperedge(id)?.current_weight())
    }

    /// Appends a weight to the hyperedge's history.
    pub fn record_weight(&mut self, id: &HyperedgeId, weight: f64) -> Result<(), OrcError> {
        self.hyperedge_mut(id)?.weights.push(weight);
        Ok(())
    }

    /// Appends a curvature value to the hyperedge's history.
    pub fn record_curvature(&mut self, id: &HyperedgeId, curvature: f64) -> Result<(), OrcError> {
        self.hyperedge_mut(id)?.curvatures.push(curvature);
        Ok(())
    }

    pub(crate) fn insert_restored(&mut self, id: HyperedgeId, record: HyperedgeRecord) -> EdgeInsert {
        if self.hyperedges.contains_key(&id) {
            return EdgeInsert::Conflict;
        }
        for member in record.members() {
            self.nodes
                .entry(member.clone())
                .or_default()
                .hyperedges
                .insert(id.clone());
        }
        self.hyperedges.insert(id, record);
        EdgeInsert::Inserted
    }

    fn node(&self, node: &NodeId) -> Result<&NodeRecord, OrcError> {
        self.nodes.get(node).ok_or_else(|| unknown_node(node))
    }

    fn hyperedge_mut(&mut self, id: &HyperedgeId) -> Result<&mut HyperedgeRecord, OrcError> {
        self.hyperedges
            .get_mut(id)
            .ok_or_else(|| unknown_hyperedge(id))
    }
}

pub(crate) fn unknown_node(node: &NodeId) -> OrcError {
    OrcError::Structural(
        ErrorInfo::new("unknown-node", "node does not exist").with_context("node", node),
    )
}

fn unknown_hyperedge(id: &HyperedgeId) -> OrcError {
    OrcError::Structural(
        ErrorInfo::new("unknown-hyperedge", "hyperedge does not exist").with_context("hyperedge", id),
    )
}
