//! Micromodel Network Synthesis
//!
//! Turns a body-centred lattice into a randomized pore network whose
//! coordination numbers follow a sampled distribution.
//!
//! # Pipeline
//!
//! 1. Sample a diameter and a target coordination for every pore
//! 2. Repair coordination with local throat edits
//! 3. Optionally carve a guaranteed bottom-to-top centre channel
//! 4. Trim, thin toward a mean coordination, jitter, size the throats
//!
//! Repair is local: a pore only negotiates with lattice neighbors inside a
//! small radius, and pores are settled once in ascending id order. Targets
//! that cannot be met are reported, never fatal.
//!
//! # Determinism
//!
//! One seeded generator drives every stage. The same configuration always
//! yields the same network, down to jitter and throat diameters.
//!
//! # Coordination Bound
//!
//! No pore keeps more than [`MAX_COORDINATION`] throats:
//! - targets are capped at 8 during repair,
//! - the bound is enforced again after the channel is carved,
//! - channel throats are never the ones removed.

mod channel;
mod config;
mod distribution;
mod error;
mod pipeline;
mod postprocess;
mod repair;
mod report;
mod sampler;

pub use channel::CenterChannel;
pub use config::{
    Bounds, Candidates, NeighborRadii, SynthesisConfig, DEFAULT_PORE_RANDOM_SHIFT,
    WEIGHT_SUM_TOLERANCE,
};
pub use distribution::{percent_probability, probability_density};
pub use error::{Result, SynthesisError};
pub use pipeline::{generate_network, GeneratedNetwork, Synthesizer};
pub use postprocess::{CoordinationReducer, SpanningTreeReducer};
pub use repair::{enforce_coordination_bound, CoordinationRepair};
pub use report::{RepairStage, SynthesisReport, SynthesisStats, SynthesisWarning};
pub use sampler::Sampler;

pub use micromodel_lattice::MAX_COORDINATION;
