//! Error types for micromodel-synthesis.

use micromodel_lattice::{LatticeError, NetworkError};
use thiserror::Error;

/// Result type for synthesis operations.
pub type Result<T> = std::result::Result<T, SynthesisError>;

/// Errors that stop synthesis.
///
/// Every configuration variant is raised by
/// [`SynthesisConfig::validate`](crate::SynthesisConfig::validate) before
/// the first pore is created.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthesisError {
    /// Lattice dimensions are unusable.
    #[error("invalid lattice: {0}")]
    Lattice(#[from] LatticeError),

    /// A candidate array has no values to draw from.
    #[error("candidate set `{0}` is empty")]
    EmptyCandidateSet(&'static str),

    /// A candidate value is out of its domain.
    #[error("candidate set `{set}` holds invalid value {value}")]
    InvalidCandidate { set: &'static str, value: f64 },

    /// Probability weights do not describe a distribution over the values.
    #[error("weights for `{set}` are invalid: {reason}")]
    InvalidDistribution { set: &'static str, reason: String },

    /// A lower bound exceeds its upper bound.
    #[error("bounds for `{0}` have min > max")]
    ContradictoryBounds(&'static str),

    /// Channel width outside `1..=columns`.
    #[error("centre channel width {width} must be in 1..={columns}")]
    InvalidChannelWidth { width: usize, columns: usize },

    /// Jitter amplitude is negative or not finite.
    #[error("pore random shift must be finite and non-negative, got {0}")]
    InvalidShift(f64),

    /// Target mean coordination is negative or not finite.
    #[error("average coordination must be finite and non-negative, got {0}")]
    InvalidAverageCoordination(f64),

    /// A neighbor search radius is not a finite positive distance.
    #[error("neighbor radius `{name}` must be finite and positive, got {radius}")]
    InvalidRadius { name: &'static str, radius: f64 },

    /// A network invariant broke during synthesis.
    #[error("network invariant violated: {0}")]
    Network(#[from] NetworkError),
}

impl SynthesisError {
    /// Whether the error comes from the caller's configuration rather than
    /// from synthesis itself.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::Network(_))
    }
}
