use crate::cs::graph::Graph;
use crate::cs::solver::{Clock, CoverSolver, Solution, SolveStatus, Trace};
use bitvec::prelude::*;
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use std::time::Duration;

/// Where the annealing walk starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InitialState {
    /// No node covered; every edge starts violated.
    Empty,
    /// Every node covered; the start is the trivial cover.
    Full,
    /// A random `keep_ratio` share of the nodes starts covered.
    Random { keep_ratio: f64 },
}

/// Configuration specific to simulated annealing over vertex covers.
#[derive(Debug, Clone)]
pub struct AnnealingConfig {
    /// Starting point of the walk
    pub initial_state: InitialState,
    /// Initial temperature contributed by each edge
    pub temperature_per_edge: f64,
    /// Initial temperature independent of the graph size
    pub temperature_offset: f64,
    /// Temperature reduction factor per batch of moves
    pub cooling_rate: f64,
    /// The walk stops once the temperature falls below this floor
    pub min_temperature: f64,
    /// Number of moves at each temperature
    pub moves_per_temperature: usize,
    /// Cost of one uncovered edge, in units of cover nodes.
    ///
    /// The default of 10 is a fixed weight and does not grow with the node
    /// count. Single flips still reach feasibility with it: covering a
    /// violated edge always lowers the cost by more than the node it adds.
    pub uncovered_penalty: u64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_state: InitialState::Empty,
            temperature_per_edge: 200.0,
            temperature_offset: 1000.0,
            cooling_rate: 0.99,
            min_temperature: 1e-3,
            moves_per_temperature: 150,
            uncovered_penalty: 10,
        }
    }
}

impl AnnealingConfig {
    /// `T0 = edges * temperature_per_edge + temperature_offset`.
    pub fn initial_temperature(&self, edges: usize) -> f64 {
        edges as f64 * self.temperature_per_edge + self.temperature_offset
    }
}

/// Single-node-flip simulated annealing.
#[derive(Debug, Clone)]
pub struct SimulatedAnnealing {
    seed: u64,
    config: AnnealingConfig,
}

impl SimulatedAnnealing {
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, AnnealingConfig::default())
    }

    pub fn with_config(seed: u64, config: AnnealingConfig) -> Self {
        Self { seed, config }
    }

    pub fn config(&self) -> &AnnealingConfig {
        &self.config
    }
}

impl CoverSolver for SimulatedAnnealing {
    fn name(&self) -> &'static str {
        "LS1"
    }

    fn solve(&self, graph: &Graph, cutoff: Duration) -> Solution {
        anneal(graph, self.seed, cutoff, &self.config)
    }
}

/// Runs simulated annealing with the default configuration.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use covers::cs::graph::Graph;
/// use covers::cs::optimization::simulated_annealing;
///
/// let graph = Graph::from_edges(&[(1, 2), (1, 3), (1, 4)]).unwrap();
/// let solution = simulated_annealing::solve(&graph, 7, Duration::from_secs(10));
/// assert_eq!(solution.cover, vec![1]);
/// ```
pub fn solve(graph: &Graph, seed: u64, cutoff: Duration) -> Solution {
    SimulatedAnnealing::new(seed).solve(graph, cutoff)
}

/// Minimizes `penalty * uncovered_edges + covered_nodes` by flipping one
/// random node per move.
///
/// Improving moves are always taken; a worsening move of `delta` is taken
/// with probability `exp(-delta / T)`, and rejected moves are undone by
/// flipping the node back. `T` starts at [`AnnealingConfig::initial_temperature`]
/// and is multiplied by the cooling rate after every batch of moves. The walk
/// ends when `T` drops below the floor or the cutoff passes, and is never cut
/// short by finding a cover.
pub fn anneal(graph: &Graph, seed: u64, cutoff: Duration, config: &AnnealingConfig) -> Solution {
    let clock = Clock::start(cutoff);
    let nodes: Vec<usize> = graph.nodes().collect();
    if nodes.is_empty() {
        return Solution {
            cover: Vec::new(),
            trace: Trace::new(),
            status: SolveStatus::Completed,
        };
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = AnnealingState::new(graph, &nodes, config.initial_state, &mut rng);
    let mut cost = state.cost(config.uncovered_penalty);

    // Until something better turns up, the incumbent is the trivial cover.
    let mut best_cost = nodes.len() as u64;
    let mut best_cover = nodes.clone();
    let mut trace = Trace::new();
    if state.is_feasible() && cost < best_cost {
        best_cost = cost;
        best_cover = state.cover();
        trace.record(clock.elapsed_secs(), state.cover_size);
    }

    let mut temperature = config.initial_temperature(graph.edge_count());
    let mut status = SolveStatus::Completed;
    while temperature >= config.min_temperature {
        if clock.expired() {
            status = SolveStatus::CutoffReached;
            break;
        }
        for _ in 0..config.moves_per_temperature {
            let v = nodes[rng.gen_range(0..nodes.len())];
            state.flip(graph, v);
            let candidate = state.cost(config.uncovered_penalty);

            let accept = candidate <= cost || {
                let delta = (candidate - cost) as f64;
                rng.gen::<f64>() < (-delta / temperature).exp()
            };
            if accept {
                cost = candidate;
            } else {
                state.flip(graph, v);
            }

            if state.is_feasible() && cost < best_cost {
                best_cost = cost;
                best_cover = state.cover();
                trace.record(clock.elapsed_secs(), state.cover_size);
                debug!(
                    "annealing: cover of {} at T={:.4} ({:.3}s)",
                    best_cost,
                    temperature,
                    clock.elapsed_secs()
                );
            }
        }
        temperature *= config.cooling_rate;
    }

    info!(
        "annealing: best cover {} in {:.3}s, final T={:.4}",
        best_cover.len(),
        clock.elapsed_secs(),
        temperature
    );

    Solution {
        cover: graph.labels_of(best_cover),
        trace,
        status,
    }
}

/// Covered nodes plus every violated edge, stored in both orientations.
///
/// Invariant: `uncovered` is empty iff `covered` is a vertex cover.
#[derive(Debug, Clone)]
struct AnnealingState {
    covered: BitVec,
    cover_size: usize,
    uncovered: HashSet<(usize, usize)>,
}

impl AnnealingState {
    fn new<R: Rng>(graph: &Graph, nodes: &[usize], initial: InitialState, rng: &mut R) -> Self {
        let mut covered = bitvec![0; graph.capacity()];
        match initial {
            InitialState::Empty => {}
            InitialState::Full => {
                for &v in nodes {
                    covered.set(v, true);
                }
            }
            InitialState::Random { keep_ratio } => {
                let count = (keep_ratio.clamp(0.0, 1.0) * nodes.len() as f64) as usize;
                for &v in nodes.choose_multiple(rng, count) {
                    covered.set(v, true);
                }
            }
        }

        let mut uncovered = HashSet::new();
        for (u, v) in graph.edges() {
            if !covered[u] && !covered[v] {
                uncovered.insert((u, v));
                uncovered.insert((v, u));
            }
        }

        Self {
            cover_size: covered.count_ones(),
            covered,
            uncovered,
        }
    }

    /// Moves `v` across the partition and updates the violated edges around it.
    fn flip(&mut self, graph: &Graph, v: usize) {
        if self.covered[v] {
            for &u in graph.neighbors(v) {
                if !self.covered[u] {
                    self.uncovered.insert((v, u));
                    self.uncovered.insert((u, v));
                }
            }
            self.covered.set(v, false);
            self.cover_size -= 1;
        } else {
            for &u in graph.neighbors(v) {
                if !self.covered[u] {
                    self.uncovered.remove(&(v, u));
                    self.uncovered.remove(&(u, v));
                }
            }
            self.covered.set(v, true);
            self.cover_size += 1;
        }
    }

    fn uncovered_edges(&self) -> usize {
        self.uncovered.len() / 2
    }

    fn cost(&self, penalty: u64) -> u64 {
        penalty * self.uncovered_edges() as u64 + self.cover_size as u64
    }

    fn is_feasible(&self) -> bool {
        self.uncovered.is_empty()
    }

    fn cover(&self) -> Vec<usize> {
        self.covered.iter_ones().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::graph::CoverChecker;
    use approx::assert_relative_eq;

    fn sample_graph() -> Graph {
        let edges: Vec<(usize, usize)> = (1..=20)
            .flat_map(|i| [(i, i % 20 + 1), (i, (i + 4) % 20 + 1)])
            .collect();
        Graph::from_edges(&edges).unwrap()
    }

    fn true_uncovered(graph: &Graph, state: &AnnealingState) -> usize {
        graph
            .edges()
            .filter(|&(u, v)| !state.covered[u] && !state.covered[v])
            .count()
    }

    #[test]
    fn test_flip_bookkeeping_matches_edges() {
        let graph = sample_graph();
        let nodes: Vec<usize> = graph.nodes().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut state = AnnealingState::new(&graph, &nodes, InitialState::Empty, &mut rng);
        assert_eq!(state.uncovered_edges(), graph.edge_count());

        for _ in 0..500 {
            let v = nodes[rng.gen_range(0..nodes.len())];
            state.flip(&graph, v);
            assert_eq!(state.uncovered_edges(), true_uncovered(&graph, &state));
            assert_eq!(state.cover_size, state.covered.count_ones());
            assert_eq!(
                state.is_feasible(),
                CoverChecker::new(&graph).is_cover_slots(state.cover())
            );
        }
    }

    #[test]
    fn test_flip_twice_restores_state() {
        let graph = sample_graph();
        let nodes: Vec<usize> = graph.nodes().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut state = AnnealingState::new(
            &graph,
            &nodes,
            InitialState::Random { keep_ratio: 0.3 },
            &mut rng,
        );
        let before = state.clone();
        state.flip(&graph, nodes[5]);
        state.flip(&graph, nodes[5]);
        assert_eq!(state.covered, before.covered);
        assert_eq!(state.uncovered, before.uncovered);
        assert_eq!(state.cover_size, before.cover_size);
    }

    #[test]
    fn test_initial_states() {
        let graph = sample_graph();
        let nodes: Vec<usize> = graph.nodes().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let full = AnnealingState::new(&graph, &nodes, InitialState::Full, &mut rng);
        assert!(full.is_feasible());
        assert_eq!(full.cover_size, 20);

        let random = AnnealingState::new(
            &graph,
            &nodes,
            InitialState::Random { keep_ratio: 0.3 },
            &mut rng,
        );
        assert_eq!(random.cover_size, 6);
        assert_eq!(random.uncovered_edges(), true_uncovered(&graph, &random));
    }

    #[test]
    fn test_initial_temperature() {
        let config = AnnealingConfig::default();
        assert_relative_eq!(config.initial_temperature(0), 1000.0);
        assert_relative_eq!(config.initial_temperature(3), 1600.0);
    }

    #[test]
    fn test_default_penalty_outweighs_a_node() {
        let graph = sample_graph();
        let nodes: Vec<usize> = graph.nodes().collect();
        let penalty = AnnealingConfig::default().uncovered_penalty;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut state = AnnealingState::new(&graph, &nodes, InitialState::Empty, &mut rng);
        for &v in &nodes {
            let before = state.cost(penalty);
            let uncovered_before = state.uncovered_edges();
            state.flip(&graph, v);
            if state.uncovered_edges() < uncovered_before {
                assert!(state.cost(penalty) < before);
            }
            state.flip(&graph, v);
        }

        // The fixed weight still drives a large sparse graph to a small cover.
        let path: Vec<(usize, usize)> = (1..500).map(|i| (i, i + 1)).collect();
        let graph = Graph::from_edges(&path).unwrap();
        let solution = solve(&graph, 4, Duration::from_secs(60));
        assert!(CoverChecker::new(&graph).is_cover(&solution.cover));
        assert!(solution.cover.len() < 400);
    }

    #[test]
    fn test_star_reduces_to_center() {
        let graph = Graph::from_edges(&[(1, 2), (1, 3), (1, 4)]).unwrap();
        let solution = solve(&graph, 1, Duration::from_secs(30));
        assert_eq!(solution.cover, vec![1]);
        assert!(solution.trace.is_monotone());
    }

    #[test]
    fn test_feasible_from_every_start() {
        let graph = sample_graph();
        let checker = CoverChecker::new(&graph);
        for initial_state in [
            InitialState::Empty,
            InitialState::Full,
            InitialState::Random { keep_ratio: 0.5 },
        ] {
            let config = AnnealingConfig {
                initial_state,
                ..AnnealingConfig::default()
            };
            let solution = SimulatedAnnealing::with_config(9, config)
                .solve(&graph, Duration::from_secs(30));
            assert!(checker.is_cover(&solution.cover));
            assert!(solution.trace.is_monotone());
            if let Some(last) = solution.trace.last() {
                assert_eq!(last.quality, solution.cover.len());
            }
        }
    }

    #[test]
    fn test_zero_cutoff_returns_trivial_cover() {
        let graph = sample_graph();
        let solution = solve(&graph, 5, Duration::ZERO);
        assert_eq!(solution.cover.len(), graph.node_count());
        assert!(solution.trace.is_empty());
        assert_eq!(solution.status, SolveStatus::CutoffReached);
    }

    #[test]
    fn test_edgeless_graph() {
        let mut graph = Graph::new();
        graph.add_node(1).unwrap();
        graph.add_node(2).unwrap();
        let solution = solve(&graph, 5, Duration::from_secs(10));
        assert!(solution.cover.is_empty());
        assert_eq!(solution.trace.qualities(), vec![0]);
    }
}
