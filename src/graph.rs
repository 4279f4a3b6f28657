use crate::{
    page_rank::{iterated::IteratedPageRank, Config, PageRank},
    Result,
};
use std::{collections::HashMap, hash::Hash};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Node {
    weight: f64,
    outbound: f64,
}

/// A directed graph whose edges carry accumulated weights.
///
/// Nodes are created implicitly the first time an edge refers to them.
/// Linking an existing edge again adds to its weight.
#[derive(Debug, Clone)]
pub struct Graph<K> {
    nodes: HashMap<K, Node, ahash::RandomState>,
    edges: HashMap<K, HashMap<K, f64, ahash::RandomState>, ahash::RandomState>,
}

impl<K> Default for Graph<K> {
    fn default() -> Self {
        Self {
            nodes: HashMap::default(),
            edges: HashMap::default(),
        }
    }
}

impl<K: Eq + Hash + Clone> Graph<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `weight` to the edge `source -> target`, creating the edge and
    /// either endpoint if they do not exist yet.
    ///
    /// Weights are not validated.
    pub fn link(&mut self, source: K, target: K, weight: f64) {
        self.nodes.entry(target.clone()).or_default();
        self.nodes.entry(source.clone()).or_default().outbound += weight;
        *self
            .edges
            .entry(source)
            .or_default()
            .entry(target)
            .or_insert(0.0) += weight;
    }

    /// Drops every node and edge.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(|sinks| sinks.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: &K) -> bool {
        self.nodes.contains_key(node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &K> + '_ {
        self.nodes.keys()
    }

    /// Every stored edge as `(source, target, weight)`, in no particular order.
    pub fn edges(&self) -> impl Iterator<Item = (&K, &K, f64)> + '_ {
        self.edges
            .iter()
            .flat_map(|(u, sinks)| sinks.iter().map(move |(v, w)| (u, v, *w)))
    }

    pub fn out_edges<'a>(&'a self, source: &K) -> impl Iterator<Item = (&'a K, f64)> + 'a {
        self.edges
            .get(source)
            .into_iter()
            .flat_map(|sinks| sinks.iter().map(|(v, w)| (v, *w)))
    }

    pub fn edge_weight(&self, source: &K, target: &K) -> Option<f64> {
        self.edges.get(source)?.get(target).copied()
    }

    /// Sum of the weights linked out of `node`.
    pub fn outbound(&self, node: &K) -> Option<f64> {
        self.nodes.get(node).map(|n| n.outbound)
    }

    /// Rank left on `node` by the latest ranking run, 0 if it never ran.
    pub fn rank_of(&self, node: &K) -> Option<f64> {
        self.nodes.get(node).map(|n| n.weight)
    }

    /// Runs PageRank until convergence and reports every node's rank to
    /// `sink`, once per node and in no particular order.
    ///
    /// `alpha` is the damping factor, usually 0.85. `epsilon` is the
    /// convergence threshold on the L1 change of one iteration.
    pub fn rank<F>(&mut self, alpha: f64, epsilon: f64, sink: F) -> Result<()>
    where
        F: FnMut(&K, f64),
    {
        self.rank_with(&Config::new(alpha, epsilon), sink)
    }

    pub fn rank_with<F>(&mut self, config: &Config, mut sink: F) -> Result<()>
    where
        F: FnMut(&K, f64),
    {
        self.ranks(config)?;
        for (id, node) in self.nodes.iter() {
            sink(id, node.weight);
        }
        Ok(())
    }

    /// Same as [`Graph::rank_with`], but hands back the ranks as a map.
    ///
    /// Stored edge weights are left untouched, so ranking can be repeated
    /// with other parameters or after further linking.
    pub fn ranks(&mut self, config: &Config) -> Result<HashMap<K, f64, ahash::RandomState>> {
        let page_rank = IteratedPageRank::new(self, config)?.calc()?.page_rank;
        for (id, node) in self.nodes.iter_mut() {
            node.weight = page_rank.get(id).copied().unwrap_or_default();
        }
        Ok(page_rank)
    }
}

impl<K: Eq + Hash + Clone> Extend<(K, K, f64)> for Graph<K> {
    fn extend<I: IntoIterator<Item = (K, K, f64)>>(&mut self, iter: I) {
        for (source, target, weight) in iter {
            self.link(source, target, weight);
        }
    }
}

impl<K: Eq + Hash + Clone> FromIterator<(K, K, f64)> for Graph<K> {
    fn from_iter<I: IntoIterator<Item = (K, K, f64)>>(iter: I) -> Self {
        let mut g = Self::new();
        g.extend(iter);
        g
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn link_creates_both_endpoints() {
        let mut g = Graph::new();
        g.link("a", "b", 1.0);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert!(g.contains(&"a"));
        assert!(g.contains(&"b"));
        assert_eq!(g.outbound(&"a"), Some(1.0));
        assert_eq!(g.outbound(&"b"), Some(0.0));
        assert_eq!(g.rank_of(&"a"), Some(0.0));
        assert_eq!(g.out_edges(&"b").count(), 0);
    }

    #[test]
    fn repeated_link_accumulates() {
        let mut g = Graph::new();
        g.link("a", "b", 1.5);
        g.link("a", "b", 2.0);
        g.link("a", "c", 0.5);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.edge_weight(&"a", &"b"), Some(3.5));
        assert_eq!(g.edge_weight(&"a", &"c"), Some(0.5));
        assert_eq!(g.edge_weight(&"b", &"a"), None);
        assert_eq!(g.outbound(&"a"), Some(4.0));
    }

    #[test]
    fn self_loop_is_an_ordinary_edge() {
        let mut g = Graph::new();
        g.link(7, 7, 2.0);
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.edge_weight(&7, &7), Some(2.0));
        assert_eq!(g.outbound(&7), Some(2.0));
    }

    #[test]
    fn reset_clears_everything() {
        let mut g: Graph<_> = [("a", "b", 1.0), ("b", "c", 1.0)].into_iter().collect();
        assert_eq!(g.node_count(), 3);
        g.reset();
        assert!(g.is_empty());
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.edges().count(), 0);
        assert_eq!(g.rank(0.85, 1e-6, |_, _| {}), Err(Error::EmptyGraph));
    }

    #[test]
    fn empty_graph_never_calls_sink() {
        let mut g = Graph::<u32>::new();
        let mut calls = 0;
        let res = g.rank(0.85, 1e-6, |_, _| calls += 1);
        assert_eq!(res, Err(Error::EmptyGraph));
        assert_eq!(calls, 0);
    }

    #[test]
    fn invalid_config_leaves_nodes_alone() {
        let mut g = Graph::new();
        g.link("a", "b", 1.0);
        assert_eq!(
            g.rank(1.0, 1e-6, |_, _| {}),
            Err(Error::InvalidDamping(1.0))
        );
        assert_eq!(g.rank(0.85, 0.0, |_, _| {}), Err(Error::InvalidEpsilon(0.0)));
        assert_eq!(g.rank_of(&"a"), Some(0.0));
    }

    #[test]
    fn sink_sees_every_node_once() {
        let mut g = Graph::new();
        g.extend([(1, 2, 1.0), (2, 3, 1.0), (3, 1, 1.0), (4, 1, 2.0)]);
        let mut seen = HashMap::new();
        g.rank(0.85, 1e-9, |id, rank| {
            assert!(rank > 0.0 && rank < 1.0, "{id}: {rank}");
            *seen.entry(*id).or_insert(0) += 1;
        })
        .unwrap();
        assert_eq!(seen.len(), 4);
        assert!(seen.values().all(|c| *c == 1));
    }

    #[test]
    fn ranking_keeps_edge_weights() {
        let mut g = Graph::new();
        g.link("a", "b", 3.0);
        g.link("a", "c", 1.0);
        g.rank(0.85, 1e-6, |_, _| {}).unwrap();
        assert_eq!(g.edge_weight(&"a", &"b"), Some(3.0));
        assert_eq!(g.edge_weight(&"a", &"c"), Some(1.0));
        assert_eq!(g.outbound(&"a"), Some(4.0));
    }

    #[test]
    fn rank_of_matches_sink() {
        let mut g = Graph::new();
        g.extend([("a", "b", 1.0), ("b", "c", 2.0), ("c", "a", 1.0), ("c", "b", 1.0)]);
        let mut reported = HashMap::new();
        g.rank(0.85, 1e-9, |id, rank| {
            reported.insert(*id, rank);
        })
        .unwrap();
        for (id, rank) in reported.iter() {
            assert_eq!(g.rank_of(id), Some(*rank));
        }
    }

    #[test]
    fn ranking_twice_is_stable() {
        let mut g = Graph::new();
        g.extend([("a", "b", 2.0), ("a", "c", 1.0), ("b", "c", 1.0), ("c", "a", 5.0)]);
        let cfg = Config::new(0.85, 1e-10);
        let first = g.ranks(&cfg).unwrap();
        let second = g.ranks(&cfg).unwrap();
        for (id, rank) in first.iter() {
            assert!((rank - second[id]).abs() < 1e-8, "{id}: {rank} vs {}", second[id]);
        }
    }

    #[test]
    fn linking_after_ranking_matches_fresh_graph() {
        let cfg = Config::new(0.85, 1e-10);
        let mut g = Graph::new();
        g.extend([(0, 1, 1.0), (1, 2, 1.0)]);
        g.ranks(&cfg).unwrap();
        g.extend([(2, 0, 1.0), (0, 2, 3.0)]);
        let trial = g.ranks(&cfg).unwrap();

        let mut fresh: Graph<_> = [(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0), (0, 2, 3.0)]
            .into_iter()
            .collect();
        let oracle = fresh.ranks(&cfg).unwrap();
        for (id, rank) in oracle.iter() {
            assert!((rank - trial[id]).abs() < 1e-8, "{id}: {rank} vs {}", trial[id]);
        }
    }
}
