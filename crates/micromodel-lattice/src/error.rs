//! Error types for micromodel-lattice.

use thiserror::Error;

use crate::PoreId;

/// Errors raised while building a lattice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LatticeError {
    /// Fewer than two pores along an axis leaves the scale factor
    /// `n / (n - 1)` undefined.
    #[error("lattice needs at least 2 pores per axis, got {columns}x{rows}")]
    InvalidDimension { columns: usize, rows: usize },

    /// Pore ids are `u32`; the lattice would need more.
    #[error("a {columns}x{rows} lattice has more pores than fit in a u32 id")]
    TooManyPores { columns: usize, rows: usize },
}

/// Errors raised by pore network mutations and consistency checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The id was never allocated or its pore has been trimmed.
    #[error("pore {0} does not exist")]
    MissingPore(PoreId),

    /// A throat must join two distinct pores.
    #[error("self-loop throat on pore {0}")]
    SelfLoop(PoreId),

    /// A throat references a pore that is no longer live.
    #[error("throat {a}-{b} references a trimmed pore")]
    DanglingThroat { a: PoreId, b: PoreId },

    /// Adjacency and throat set disagree.
    #[error("adjacency of pore {pore} disagrees with the throat set")]
    AdjacencyMismatch { pore: PoreId },

    /// A pore exceeds the coordination bound.
    #[error("pore {pore} has coordination {coordination}, limit is {limit}")]
    CoordinationExceeded {
        pore: PoreId,
        coordination: usize,
        limit: usize,
    },
}
