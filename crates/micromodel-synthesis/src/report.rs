//! Non-fatal synthesis outcomes.
//!
//! A stage that cannot find a qualifying partner does nothing and records a
//! [`SynthesisWarning`]. The finished network is still valid; the report
//! says where it falls short of what was asked.

use std::fmt;

use micromodel_lattice::{PoreId, PoreNetwork};
use tracing::warn;

/// Which repair step gave up on a pore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepairStage {
    /// The ascending-id sweep.
    LocalPass,
    /// Reconnecting pores left without throats.
    ZeroFixup,
    /// Shedding throats above the maximum sampled target.
    OverMaxFixup,
}

impl fmt::Display for RepairStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LocalPass => "local pass",
            Self::ZeroFixup => "zero-coordination fix-up",
            Self::OverMaxFixup => "over-maximum fix-up",
        };
        f.write_str(name)
    }
}

/// A target that synthesis could not meet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisWarning {
    /// A pore ended a repair step away from its goal.
    RepairIncomplete {
        pore: PoreId,
        realized: usize,
        target: usize,
        stage: RepairStage,
    },
    /// The centre channel walk stopped before reaching the top row.
    ChannelIncomplete { length: usize, expected: usize },
}

impl fmt::Display for SynthesisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RepairIncomplete {
                pore,
                realized,
                target,
                stage,
            } => write!(f, "{stage}: pore {pore} has coordination {realized}, wanted {target}"),
            Self::ChannelIncomplete { length, expected } => {
                write!(f, "centre channel has {length} pores, expected {expected}")
            }
        }
    }
}

/// Counters collected while synthesizing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SynthesisStats {
    /// Throats added by the repair stages.
    pub throats_added: usize,
    /// Throats removed by the repair stages and the coordination bound.
    pub throats_removed: usize,
    /// Pores tombstoned by the lone-pore trim.
    pub pores_trimmed: usize,
    /// Throats removed by average-coordination reduction.
    pub throats_reduced: usize,
    /// Pores on the centre channel path.
    pub channel_length: usize,
    /// Live pores in the finished network.
    pub pores: usize,
    /// Throats in the finished network.
    pub throats: usize,
    /// Mean coordination of the finished network.
    pub mean_coordination: f64,
}

/// Warnings and counters for one synthesis run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SynthesisReport {
    pub warnings: Vec<SynthesisWarning>,
    pub stats: SynthesisStats,
}

impl SynthesisReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and log it.
    pub fn warn(&mut self, warning: SynthesisWarning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Whether every target was met.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Warnings raised by one repair stage.
    pub fn repair_warnings(&self, stage: RepairStage) -> impl Iterator<Item = &SynthesisWarning> + '_ {
        self.warnings.iter().filter(move |w| {
            matches!(w, SynthesisWarning::RepairIncomplete { stage: s, .. } if *s == stage)
        })
    }

    /// Fill the final-network counters.
    pub(crate) fn record_network(&mut self, network: &PoreNetwork) {
        self.stats.pores = network.live_pore_count();
        self.stats.throats = network.throat_count();
        self.stats.mean_coordination = network.mean_coordination();
    }
}
