//! Micromodel Pore Lattice
//!
//! Planar pore-network data model for microfluidic micromodel synthesis.
//!
//! # Lattice
//!
//! Networks start from a body-centred lattice: a regular grid of corner
//! pores plus one body pore per grid cell, each body joined to its four
//! corners. See [`BodyCenteredLattice`] for the id layout and physical
//! frame.
//!
//! # Network
//!
//! [`PoreNetwork`] is an arena of pores addressed by stable [`PoreId`]s and
//! a set of throats keyed by canonical pore pairs:
//! - trimming tombstones a pore instead of renumbering,
//! - parallel throats cannot be represented,
//! - no pore may exceed [`MAX_COORDINATION`] throats once synthesis is done.
//!
//! # Neighbor Queries
//!
//! [`NeighborIndex`] answers "which pores lie within r spacings" on lattice
//! sites, which stay fixed while physical positions are jittered.

mod arrays;
mod error;
mod lattice;
mod neighbors;
mod network;
mod site;

pub use arrays::NetworkArrays;
pub use error::{LatticeError, NetworkError};
pub use lattice::{BodyCenteredLattice, Sites, DEFAULT_PORE_DIAMETER};
pub use neighbors::{Neighbor, NeighborIndex};
pub use network::{Pore, PoreId, PoreNetwork, Throat, ThroatKey, ThroatLabel};
pub use site::{LatticeSite, Position, SiteKind};

/// Hard upper bound on realized coordination.
pub const MAX_COORDINATION: usize = 8;

/// Pores within the repair radius on an interior site: 4 bodies and 4
/// axis corners around a corner, 4 corners and 4 bodies around a body.
pub const LATTICE_NEIGHBORHOOD: usize = 8;

// A pore can never be asked for more partners than its neighborhood holds.
const _: () = assert!(LATTICE_NEIGHBORHOOD <= MAX_COORDINATION);
