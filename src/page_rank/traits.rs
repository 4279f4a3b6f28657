use crate::{graph::Graph, Result};
use std::{collections::HashMap, hash::Hash};

pub trait PageRank<K> {
    type Result: PageRankResult<K>;

    fn calc(&self) -> Result<Self::Result>;
}

pub trait PageRankResult<K> {
    fn page_rank(&self) -> &HashMap<K, f64, ahash::RandomState>;

    fn debug<'a>(&'a self, graph: &'a Graph<K>) -> impl std::fmt::Debug + 'a
    where
        K: Eq + Hash + Clone + std::fmt::Debug;
}
