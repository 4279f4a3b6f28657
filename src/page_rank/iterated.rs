use super::*;
use crate::{graph::Graph, norm_1};
use std::{collections::HashMap, hash::Hash};

/// Power iteration over a borrowed graph.
///
/// Transition probabilities are derived once, in [`IteratedPageRank::new`],
/// from the graph's accumulated edge weights. The graph itself is never
/// written to.
pub struct IteratedPageRank<'a, K> {
    graph: &'a Graph<K>,
    damping: f64,
    epsilon: f64,
    transitions: Vec<(&'a K, Vec<(&'a K, f64)>)>,
    dangling: Vec<&'a K>,
}

#[derive(Debug, Clone)]
pub struct Result<K> {
    pub page_rank: HashMap<K, f64, ahash::RandomState>,
    /// Per-node change of the last iteration.
    pub delta: HashMap<K, f64, ahash::RandomState>,
    pub iterations: usize,
}

impl<'a, K: Eq + Hash + Clone> IteratedPageRank<'a, K> {
    pub fn new(g: &'a Graph<K>, config: &Config) -> crate::Result<Self> {
        if g.is_empty() {
            return Err(Error::EmptyGraph);
        }
        config.validate()?;
        let damping = config.damping;
        let epsilon = config.epsilon;

        let mut dangling = vec![];
        let mut transitions = vec![];
        for u in g.nodes() {
            let outbound = g.outbound(u).unwrap_or_default();
            if outbound == 0.0 {
                dangling.push(u);
            }
            // Only positive totals are normalized; anything else passes
            // through unscaled.
            let norm = if outbound > 0.0 { outbound } else { 1.0 };
            let sinks: Vec<_> = g.out_edges(u).map(|(v, w)| (v, w / norm)).collect();
            if !sinks.is_empty() {
                transitions.push((u, sinks));
            }
        }
        log::debug!(
            "page rank over {} nodes, {} edges, {} dangling; damping={damping}, epsilon={epsilon}",
            g.node_count(),
            g.edge_count(),
            dangling.len(),
        );
        Ok(Self {
            graph: g,
            damping,
            epsilon,
            transitions,
            dangling,
        })
    }
}

impl<K: Eq + Hash + Clone> PageRank<K> for IteratedPageRank<'_, K> {
    type Result = self::Result<K>;

    fn calc(&self) -> crate::Result<Self::Result> {
        let damping = self.damping;
        let epsilon = self.epsilon;
        let n = self.graph.node_count();
        if n == 0 {
            return Err(Error::EmptyGraph);
        }
        let inverse = 1.0 / (n as f64);

        let mut p: HashMap<&K, f64, ahash::RandomState> =
            self.graph.nodes().map(|v| (v, inverse)).collect();
        let mut r = HashMap::with_capacity_and_hasher(n, ahash::RandomState::new());
        let mut delta = HashMap::with_capacity_and_hasher(n, ahash::RandomState::new());
        let mut iterations = 0;
        loop {
            iterations += 1;

            // Mass sitting on dangling nodes would otherwise vanish.
            let leak: f64 = damping
                * self
                    .dangling
                    .iter()
                    .map(|v| p.get(v).copied().unwrap_or_default())
                    .sum::<f64>();

            r.clear();
            for v in self.graph.nodes() {
                r.insert(v, 0.0);
            }
            for (u, sinks) in self.transitions.iter() {
                let from = damping * p.get(u).copied().unwrap_or_default();
                for (v, w) in sinks.iter() {
                    if let Some(to) = r.get_mut(v) {
                        *to += from * w;
                    }
                }
            }
            let uniform = (1.0 - damping) * inverse + leak * inverse;
            for to in r.values_mut() {
                *to += uniform;
            }

            delta.clear();
            for (v, b) in r.iter() {
                let a = p.get(v).copied().unwrap_or_default();
                delta.insert(*v, b - a);
            }
            let norm_delta = norm_1(&delta);
            log::trace!("iteration {iterations}: delta={norm_delta}");

            std::mem::swap(&mut p, &mut r);
            if norm_delta <= epsilon {
                break;
            }
        }
        log::debug!("page rank converged after {iterations} iterations");

        Ok(Self::Result {
            page_rank: p.into_iter().map(|(v, w)| (v.clone(), w)).collect(),
            delta: delta.into_iter().map(|(v, d)| (v.clone(), d)).collect(),
            iterations,
        })
    }
}

impl<K: Eq + Hash> PageRankResult<K> for self::Result<K> {
    fn page_rank(&self) -> &HashMap<K, f64, ahash::RandomState> {
        &self.page_rank
    }

    fn debug<'a>(&'a self, graph: &'a Graph<K>) -> impl std::fmt::Debug + 'a
    where
        K: Eq + Hash + Clone + std::fmt::Debug,
    {
        ResultDebug {
            graph,
            result: self,
        }
    }
}

pub struct ResultDebug<'a, K> {
    graph: &'a Graph<K>,
    result: &'a self::Result<K>,
}

impl<K> std::fmt::Debug for ResultDebug<'_, K>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for v in self.graph.nodes() {
            let p = self.result.page_rank.get(v);
            let d = self.result.delta.get(v);
            writeln!(f, "{v:?}: {p:?}, {d:?}")?;
        }
        Ok(())
    }
}
