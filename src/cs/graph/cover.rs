use crate::cs::graph::Graph;
use bitvec::prelude::*;
use std::collections::HashMap;

/// Validates candidate covers against a fixed reference graph.
///
/// The checker snapshots the edge list when built, so later mutation of a
/// working copy cannot change what "covered" means.
#[derive(Debug, Clone)]
pub struct CoverChecker {
    edges: Vec<(usize, usize)>,
    labels: Vec<usize>,
    slots: HashMap<usize, usize>,
    capacity: usize,
}

impl CoverChecker {
    pub fn new(graph: &Graph) -> Self {
        let labels: Vec<usize> = (0..graph.capacity()).map(|v| graph.label(v)).collect();
        let slots = labels.iter().enumerate().map(|(v, &l)| (l, v)).collect();
        Self {
            edges: graph.edges().collect(),
            labels,
            slots,
            capacity: graph.capacity(),
        }
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True when every reference edge has an endpoint among the given slots.
    pub fn is_cover_slots<I>(&self, slots: I) -> bool
    where
        I: IntoIterator<Item = usize>,
    {
        let members = self.membership(slots);
        self.edges.iter().all(|&(u, v)| members[u] || members[v])
    }

    /// True when every reference edge has an endpoint among the given labels.
    ///
    /// Labels unknown to the reference graph are ignored.
    pub fn is_cover(&self, labels: &[usize]) -> bool {
        self.uncovered_edges(labels).is_empty()
    }

    /// Reference edges, as label pairs, with neither endpoint in `labels`.
    pub fn uncovered_edges(&self, labels: &[usize]) -> Vec<(usize, usize)> {
        let slots = labels.iter().filter_map(|label| self.slots.get(label).copied());
        let members = self.membership(slots);
        self.edges
            .iter()
            .filter(|&&(u, v)| !members[u] && !members[v])
            .map(|&(u, v)| (self.labels[u], self.labels[v]))
            .collect()
    }

    fn membership<I>(&self, slots: I) -> BitVec
    where
        I: IntoIterator<Item = usize>,
    {
        let mut members = bitvec![0; self.capacity];
        for v in slots {
            if v < self.capacity {
                members.set(v, true);
            }
        }
        members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_covers() {
        let graph = Graph::from_edges(&[(1, 2), (2, 3), (1, 3)]).unwrap();
        let checker = CoverChecker::new(&graph);
        assert!(checker.is_cover(&[1, 2]));
        assert!(checker.is_cover(&[1, 2, 3]));
        assert!(!checker.is_cover(&[3]));
        assert_eq!(checker.uncovered_edges(&[3]), vec![(1, 2)]);
    }

    #[test]
    fn test_edgeless_graph_accepts_empty_cover() {
        let mut graph = Graph::new();
        graph.add_node(1).unwrap();
        graph.add_node(2).unwrap();
        let checker = CoverChecker::new(&graph);
        assert!(checker.is_cover(&[]));
        assert_eq!(checker.edge_count(), 0);
    }

    #[test]
    fn test_checker_ignores_later_mutation() {
        let mut graph = Graph::from_edges(&[(1, 2), (2, 3)]).unwrap();
        let checker = CoverChecker::new(&graph);
        let removed = graph.remove_node(graph.slot(2).unwrap());
        assert_eq!(graph.edge_count(), 0);
        assert!(checker.is_cover(&[1, 3]));
        assert!(!checker.is_cover(&[1]));
        assert!(checker.is_cover_slots([removed.node()]));
    }
}
