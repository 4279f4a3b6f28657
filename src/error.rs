use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a ranking run refuses to start.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Error {
    #[error("cannot rank an empty graph")]
    EmptyGraph,
    #[error("damping factor must lie strictly between 0 and 1: {0}")]
    InvalidDamping(f64),
    #[error("convergence threshold must be positive and finite: {0}")]
    InvalidEpsilon(f64),
}
