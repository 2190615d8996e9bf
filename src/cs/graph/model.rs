//! # Mutable undirected graph
//!
//! Nodes carry an external label (a positive integer, as read from a graph
//! file) and live in a dense arena of *slots*. All queries and mutations work
//! on slots; labels are only used at the boundary.
//!
//! Removing a node hands back a [`RemovedNode`] holding exactly the incident
//! edges that were taken out. Restoring replays that record, so a
//! remove/restore pair leaves the edge set unchanged. Records must be
//! restored in reverse order of removal.
//!
//! ```
//! use covers::cs::graph::Graph;
//!
//! let mut graph = Graph::from_edges(&[(1, 2), (2, 3)]).unwrap();
//! let middle = graph.slot(2).unwrap();
//! let removed = graph.remove_node(middle);
//! assert_eq!(graph.edge_count(), 0);
//! graph.restore_node(removed);
//! assert_eq!(graph.edge_count(), 2);
//! ```

use crate::error::{Error, Result};
use bitvec::prelude::*;
use std::collections::HashMap;

/// Undirected simple graph with O(1) degree queries and exact node restoration.
///
/// `Clone` is a deep copy; solvers clone the input once and mutate their copy.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    labels: Vec<usize>,
    slots: HashMap<usize, usize>,
    adjacency: Vec<Vec<usize>>,
    present: BitVec,
    node_count: usize,
    edge_count: usize,
}

/// The edges removed together with a node, as needed to put them back.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a removed node can only be restored from its record"]
pub struct RemovedNode {
    node: usize,
    neighbors: Vec<usize>,
}

impl RemovedNode {
    pub fn node(&self) -> usize {
        self.node
    }

    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    /// Number of edges that left the graph with this node.
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from labelled edges. Duplicate edges are stored once.
    pub fn from_edges(edges: &[(usize, usize)]) -> Result<Self> {
        let mut graph = Self::new();
        for &(u, v) in edges {
            graph.add_edge(u, v)?;
        }
        Ok(graph)
    }

    /// Adds a node by label and returns its slot. Adding a known label is a no-op.
    pub fn add_node(&mut self, label: usize) -> Result<usize> {
        if label == 0 {
            return Err(Error::InvalidInput(
                "node labels must be positive".to_string(),
            ));
        }
        if let Some(&slot) = self.slots.get(&label) {
            return Ok(slot);
        }
        let slot = self.labels.len();
        self.labels.push(label);
        self.slots.insert(label, slot);
        self.adjacency.push(Vec::new());
        self.present.push(true);
        self.node_count += 1;
        Ok(slot)
    }

    /// Adds an undirected edge between two labels, creating missing nodes.
    ///
    /// Returns `Ok(false)` when the edge already exists.
    pub fn add_edge(&mut self, from: usize, to: usize) -> Result<bool> {
        if from == to {
            return Err(Error::InvalidInput(format!("self-loop on node {from}")));
        }
        let u = self.add_node(from)?;
        let v = self.add_node(to)?;
        if self.has_edge(u, v) {
            return Ok(false);
        }
        self.adjacency[u].push(v);
        self.adjacency[v].push(u);
        self.edge_count += 1;
        Ok(true)
    }

    /// Number of slots ever allocated, present or not.
    pub fn capacity(&self) -> usize {
        self.labels.len()
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// True when no node is left.
    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    pub fn contains(&self, v: usize) -> bool {
        v < self.present.len() && self.present[v]
    }

    pub fn label(&self, v: usize) -> usize {
        self.labels[v]
    }

    pub fn slot(&self, label: usize) -> Option<usize> {
        self.slots.get(&label).copied()
    }

    /// Current degree; zero for removed nodes.
    pub fn degree(&self, v: usize) -> usize {
        self.adjacency[v].len()
    }

    pub fn neighbors(&self, v: usize) -> &[usize] {
        &self.adjacency[v]
    }

    /// Present slots in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.present.iter_ones()
    }

    /// Present edges as `(u, v)` slot pairs with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes().flat_map(move |u| {
            self.adjacency[u]
                .iter()
                .filter(move |&&v| u < v)
                .map(move |&v| (u, v))
        })
    }

    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        let (short, other) = if self.adjacency[u].len() <= self.adjacency[v].len() {
            (u, v)
        } else {
            (v, u)
        };
        self.adjacency[short].contains(&other)
    }

    /// Present node of maximum positive degree, first in slot order on ties.
    pub fn max_degree_node(&self) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize)> = None;
        for v in self.nodes() {
            let degree = self.degree(v);
            if degree > 0 && best.map_or(true, |(_, d)| degree > d) {
                best = Some((v, degree));
            }
        }
        best
    }

    /// Present node of minimum degree (isolated nodes included).
    pub fn min_degree_node(&self) -> Option<usize> {
        self.nodes().min_by_key(|&v| self.degree(v))
    }

    /// Removes a present node and its incident edges.
    pub fn remove_node(&mut self, v: usize) -> RemovedNode {
        debug_assert!(self.contains(v), "removing absent slot {v}");
        let neighbors = std::mem::take(&mut self.adjacency[v]);
        for &u in &neighbors {
            let list = &mut self.adjacency[u];
            if let Some(pos) = list.iter().position(|&w| w == v) {
                list.swap_remove(pos);
            }
        }
        self.present.set(v, false);
        self.node_count -= 1;
        self.edge_count -= neighbors.len();
        RemovedNode { node: v, neighbors }
    }

    /// Puts a removed node back with exactly the edges it left with.
    pub fn restore_node(&mut self, removed: RemovedNode) {
        let RemovedNode { node, neighbors } = removed;
        debug_assert!(!self.contains(node), "restoring present slot {node}");
        for &u in &neighbors {
            debug_assert!(self.contains(u), "restoring {node} next to absent {u}");
            self.adjacency[u].push(node);
        }
        self.edge_count += neighbors.len();
        self.adjacency[node] = neighbors;
        self.present.set(node, true);
        self.node_count += 1;
    }

    /// Removes every listed node that is still present, in order.
    pub fn remove_nodes<I>(&mut self, nodes: I) -> Vec<RemovedNode>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut removed = Vec::new();
        for v in nodes {
            if self.contains(v) {
                removed.push(self.remove_node(v));
            }
        }
        removed
    }

    /// Undoes [`Graph::remove_nodes`].
    pub fn restore_nodes(&mut self, removed: Vec<RemovedNode>) {
        for record in removed.into_iter().rev() {
            self.restore_node(record);
        }
    }

    /// Maps slots to labels, sorted ascending.
    pub fn labels_of<I>(&self, slots: I) -> Vec<usize>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut labels: Vec<usize> = slots.into_iter().map(|v| self.labels[v]).collect();
        labels.sort_unstable();
        labels
    }

    /// Labels of every present node, sorted ascending.
    pub fn node_labels(&self) -> Vec<usize> {
        self.labels_of(self.nodes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn edge_set(graph: &Graph) -> BTreeSet<(usize, usize)> {
        graph
            .edges()
            .map(|(u, v)| {
                let (a, b) = (graph.label(u), graph.label(v));
                (a.min(b), a.max(b))
            })
            .collect()
    }

    #[test]
    fn test_duplicate_edges_stored_once() {
        let graph = Graph::from_edges(&[(1, 2), (2, 1), (2, 3)]).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.degree(graph.slot(2).unwrap()), 2);
    }

    #[test]
    fn test_rejects_self_loop_and_zero_label() {
        let mut graph = Graph::new();
        assert!(matches!(graph.add_edge(4, 4), Err(Error::InvalidInput(_))));
        assert!(matches!(graph.add_node(0), Err(Error::InvalidInput(_))));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_sparse_labels() {
        let graph = Graph::from_edges(&[(10, 500), (500, 7)]).unwrap();
        assert_eq!(graph.node_labels(), vec![7, 10, 500]);
        assert_eq!(graph.slot(3), None);
    }

    #[test]
    fn test_remove_restore_is_exact() {
        let mut graph =
            Graph::from_edges(&[(1, 2), (1, 3), (1, 4), (2, 3), (3, 4), (4, 5)]).unwrap();
        let before = edge_set(&graph);

        let hub = graph.slot(1).unwrap();
        let removed = graph.remove_node(hub);
        assert_eq!(removed.degree(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.node_count(), 4);
        assert!(!graph.contains(hub));
        assert_eq!(graph.degree(hub), 0);

        graph.restore_node(removed);
        assert_eq!(edge_set(&graph), before);
        assert_eq!(graph.edge_count(), 6);
        assert_eq!(graph.node_count(), 5);
    }

    #[test]
    fn test_nested_restore_in_reverse_order() {
        let mut graph = Graph::from_edges(&[(1, 2), (2, 3), (3, 1), (3, 4)]).unwrap();
        let before = edge_set(&graph);
        let outer = graph.remove_node(graph.slot(3).unwrap());
        let inner = graph.remove_nodes([graph.slot(1).unwrap(), graph.slot(2).unwrap()]);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.node_count(), 1);
        graph.restore_nodes(inner);
        graph.restore_node(outer);
        assert_eq!(edge_set(&graph), before);
        for (u, v) in graph.edges() {
            assert!(graph.has_edge(v, u));
        }
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Graph::from_edges(&[(1, 2), (2, 3)]).unwrap();
        let mut copy = original.clone();
        let _ = copy.remove_node(copy.slot(2).unwrap());
        assert_eq!(copy.edge_count(), 0);
        assert_eq!(original.edge_count(), 2);
    }

    #[test]
    fn test_degree_extremes() {
        let graph = Graph::from_edges(&[(1, 2), (1, 3), (1, 4), (5, 6)]).unwrap();
        let (hub, degree) = graph.max_degree_node().unwrap();
        assert_eq!(graph.label(hub), 1);
        assert_eq!(degree, 3);
        assert_eq!(graph.degree(graph.min_degree_node().unwrap()), 1);

        let mut isolated = Graph::new();
        isolated.add_node(9).unwrap();
        assert_eq!(isolated.max_degree_node(), None);
        assert_eq!(isolated.min_degree_node(), Some(0));
    }
}
