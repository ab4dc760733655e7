use std::collections::{BTreeMap, BTreeSet, VecDeque};

use nalgebra::DMatrix;
use orc_core::NodeId;

use crate::hypergraph::Hypergraph;

/// Hop limit used by [`bounded_hop_distance`] when callers have no preference.
pub const DEFAULT_HOP_LIMIT: usize = 3;

/// Dense all-pairs shortest-path distances keyed by node.
///
/// Unreachable pairs hold `f64::INFINITY` internally and read back as `None`;
/// the `0` sentinel only appears in [`DistanceMatrix::to_sentinel_rows`].
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    nodes: Vec<NodeId>,
    index: BTreeMap<NodeId, usize>,
    values: DMatrix<f64>,
}

impl DistanceMatrix {
    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the matrix covers no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Indexed nodes in row order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Row index of `node`.
    pub fn index_of(&self, node: &NodeId) -> Option<usize> {
        self.index.get(node).copied()
    }

    /// Shortest distance between two row indices, `None` when unreachable.
    pub fn distance_at(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.len() || j >= self.len() {
            return None;
        }
        let value = self.values[(i, j)];
        value.is_finite().then_some(value)
    }

    /// Shortest distance between two nodes, `None` when unreachable or unindexed.
    pub fn distance(&self, a: &NodeId, b: &NodeId) -> Option<f64> {
        self.distance_at(self.index_of(a)?, self.index_of(b)?)
    }

    /// Whether `b` can be reached from `a`.
    pub fn is_reachable(&self, a: &NodeId, b: &NodeId) -> bool {
        self.distance(a, b).is_some()
    }

    /// Whether `(i, j)` and `(j, i)` agree everywhere within `tolerance`.
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        let n = self.len();
        (0..n).all(|i| {
            (i + 1..n).all(|j| {
                let (a, b) = (self.values[(i, j)], self.values[(j, i)]);
                (a.is_infinite() && b.is_infinite()) || (a - b).abs() <= tolerance
            })
        })
    }

    /// Rows with unreachable entries replaced by `0`, the tabular export format.
    pub fn to_sentinel_rows(&self) -> Vec<Vec<f64>> {
        self.values
            .row_iter()
            .map(|row| {
                row.iter()
                    .map(|value| if value.is_finite() { *value } else { 0.0 })
                    .collect()
            })
            .collect()
    }
}

/// Floyd-Warshall over the pairwise expansion of every hyperedge.
///
/// Each unordered member pair becomes an edge weighted by the hyperedge's
/// current weight; parallel edges keep the minimum. Runs in `O(n^3)`.
pub fn all_pairs_shortest_paths(graph: &Hypergraph) -> DistanceMatrix {
    let nodes: Vec<NodeId> = graph.nodes().cloned().collect();
    let index: BTreeMap<NodeId, usize> = nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.clone(), idx))
        .collect();
    let n = nodes.len();
    let mut dist = DMatrix::from_element(n, n, f64::INFINITY);
    for i in 0..n {
        dist[(i, i)] = 0.0;
    }

    for (_, record) in graph.hyperedges() {
        let weight = record.current_weight();
        let members: Vec<usize> = record
            .members()
            .iter()
            .filter_map(|member| index.get(member).copied())
            .collect();
        for (pos, &i) in members.iter().enumerate() {
            for &j in &members[pos + 1..] {
                if i != j && weight < dist[(i, j)] {
                    dist[(i, j)] = weight;
                    dist[(j, i)] = weight;
                }
            }
        }
    }

    for k in 0..n {
        for i in 0..n {
            let via_k = dist[(i, k)];
            if via_k.is_infinite() {
                continue;
            }
            for j in 0..n {
                let candidate = via_k + dist[(k, j)];
                if candidate < dist[(i, j)] {
                    dist[(i, j)] = candidate;
                    dist[(j, i)] = candidate;
                }
            }
        }
    }

    DistanceMatrix {
        nodes,
        index,
        values: dist,
    }
}

/// Breadth-limited hop count between two nodes.
///
/// Returns `Some(0)` for identical nodes and `None` when either node is
/// absent or `end` lies further than `max_hops` hyperedges away.
pub fn bounded_hop_distance(
    graph: &Hypergraph,
    start: &NodeId,
    end: &NodeId,
    max_hops: usize,
) -> Option<usize> {
    if !graph.contains_node(start) || !graph.contains_node(end) {
        return None;
    }
    if start == end {
        return Some(0);
    }
    let mut visited: BTreeSet<NodeId> = BTreeSet::from([start.clone()]);
    let mut queue = VecDeque::from([(start.clone(), 0usize)]);
    while let Some((current, hops)) = queue.pop_front() {
        if hops >= max_hops {
            continue;
        }
        for neighbour in graph.neighbours(&current) {
            if &neighbour == end {
                return Some(hops + 1);
            }
            if visited.insert(neighbour.clone()) {
                queue.push_back((neighbour, hops + 1));
            }
        }
    }
    None
}
