//! Weighted PageRank over directed graphs keyed by arbitrary hashable
//! identifiers.
//!
//! ```
//! use weighted_pagerank::Graph;
//!
//! let mut graph = Graph::new();
//! graph.link("a", "b", 1.0);
//! graph.link("b", "a", 1.0);
//! graph.link("b", "c", 2.0);
//!
//! let mut total = 0.0;
//! graph
//!     .rank(0.85, 1e-6, |_id, rank| total += rank)
//!     .unwrap();
//! assert!((total - 1.0).abs() < 1e-5);
//! ```

pub mod graph;
pub use self::graph::Graph;
pub mod page_rank;
pub use self::page_rank::Config;
mod common;
pub use self::common::*;
mod error;
pub use self::error::{Error, Result};
