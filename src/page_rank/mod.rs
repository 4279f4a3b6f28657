//! Power-iteration PageRank over a [`Graph`](crate::graph::Graph).

pub mod iterated;
pub mod traits;
pub use self::traits::*;

use crate::Error;

/// Parameters of a ranking run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Probability of following an outgoing edge instead of teleporting.
    pub damping: f64,
    /// Iteration stops once the L1 change of one pass is at or below this.
    pub epsilon: f64,
}

impl Config {
    pub const DEFAULT_DAMPING: f64 = 0.85;
    pub const DEFAULT_EPSILON: f64 = 1e-6;

    pub fn new(damping: f64, epsilon: f64) -> Self {
        Self { damping, epsilon }
    }

    pub fn validate(&self) -> crate::Result<()> {
        let damping = self.damping;
        if !(damping > 0.0 && damping < 1.0) {
            return Err(Error::InvalidDamping(damping));
        }
        let epsilon = self.epsilon;
        if !(epsilon > 0.0 && epsilon.is_finite()) {
            return Err(Error::InvalidEpsilon(epsilon));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DAMPING, Self::DEFAULT_EPSILON)
    }
}
