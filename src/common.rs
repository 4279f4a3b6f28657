use std::{collections::HashMap, hash::Hash};

pub fn norm_1<K: Eq + Hash>(v: &HashMap<K, f64, ahash::RandomState>) -> f64 {
    v.values().map(|x| x.abs()).sum()
}

/// L1 distance between two rank vectors over the same key set.
pub fn distance_1<K: Eq + Hash>(
    a: &HashMap<K, f64, ahash::RandomState>,
    b: &HashMap<K, f64, ahash::RandomState>,
) -> f64 {
    a.iter()
        .map(|(k, x)| (x - b.get(k).copied().unwrap_or(0.0)).abs())
        .sum()
}
