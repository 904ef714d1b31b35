//! Synthesis configuration.
//!
//! A [`SynthesisConfig`] carries everything one `generate_network` call
//! needs: lattice size, candidate property arrays with optional weights,
//! clamping bounds, post-processing switches and the seed. It
//! deserializes from JSON with every field optional.

use serde::{Deserialize, Serialize};

use crate::distribution::probability_density;
use crate::{Result, SynthesisError};

/// Allowed deviation of a weight vector's sum from 1.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Default jitter amplitude in lattice units.
pub const DEFAULT_PORE_RANDOM_SHIFT: f64 = 0.2;

/// Values to draw from, optionally with a probability per value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidates<T> {
    pub values: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
}

impl<T> Candidates<T> {
    /// Uniformly weighted candidates.
    pub fn uniform(values: Vec<T>) -> Self {
        Self { values, weights: None }
    }

    /// Candidates with one probability per value.
    pub fn weighted(values: Vec<T>, weights: Vec<f64>) -> Self {
        Self {
            values,
            weights: Some(weights),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check that there is something to draw and that the weights, if any,
    /// form a distribution over the values.
    pub fn validate(&self, set: &'static str) -> Result<()> {
        if self.values.is_empty() {
            return Err(SynthesisError::EmptyCandidateSet(set));
        }
        let Some(weights) = &self.weights else {
            return Ok(());
        };

        let invalid = |reason: String| SynthesisError::InvalidDistribution { set, reason };
        if weights.len() != self.values.len() {
            return Err(invalid(format!(
                "{} weights for {} values",
                weights.len(),
                self.values.len()
            )));
        }
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(invalid(format!("weight {w} is not a finite non-negative number")));
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(invalid(format!("weights sum to {sum}, expected 1")));
        }
        Ok(())
    }
}

impl Candidates<f64> {
    /// Candidates weighted by their histogram probability mass, the way
    /// measured diameter distributions are usually supplied.
    pub fn from_histogram(values: Vec<f64>) -> Self {
        let weights = probability_density(&values);
        Self::weighted(values, weights)
    }

    /// [`validate`](Self::validate), plus every value must be a positive
    /// finite diameter.
    pub fn validate_diameters(&self, set: &'static str) -> Result<()> {
        self.validate(set)?;
        match self.values.iter().find(|v| !v.is_finite() || **v <= 0.0) {
            Some(&value) => Err(SynthesisError::InvalidCandidate { set, value }),
            None => Ok(()),
        }
    }
}

/// Optional inclusive clamping range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    #[serde(default)]
    pub min: Option<T>,
    #[serde(default)]
    pub max: Option<T>,
}

impl<T> Default for Bounds<T> {
    fn default() -> Self {
        Self { min: None, max: None }
    }
}

impl<T: Copy + PartialOrd> Bounds<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Clamp `value` into the range. A missing side leaves that side open.
    pub fn clamp(&self, value: T) -> T {
        let mut value = value;
        if let Some(min) = self.min {
            if value < min {
                value = min;
            }
        }
        if let Some(max) = self.max {
            if value > max {
                value = max;
            }
        }
        value
    }

    pub fn contains(&self, value: T) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }

    pub fn validate(&self, set: &'static str) -> Result<()> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min > max => Err(SynthesisError::ContradictoryBounds(set)),
            _ => Ok(()),
        }
    }
}

/// Neighbor search radii in lattice spacings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeighborRadii {
    /// Local repair pass: axis corners, bodies, axis bodies.
    pub repair: f64,
    /// Zero-coordination fix-up: additionally diagonal corners.
    pub fixup: f64,
    /// Centre channel walk: only corner/body half-diagonals.
    pub channel: f64,
}

impl Default for NeighborRadii {
    fn default() -> Self {
        Self {
            repair: 1.4,
            fixup: 1.5,
            channel: 1.0,
        }
    }
}

impl NeighborRadii {
    /// Every radius must be a finite positive distance.
    pub fn validate(&self) -> Result<()> {
        for (name, radius) in [
            ("repair", self.repair),
            ("fixup", self.fixup),
            ("channel", self.channel),
        ] {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(SynthesisError::InvalidRadius { name, radius });
            }
        }
        Ok(())
    }
}

/// Configuration for one network synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Pores along x (`n1`).
    pub columns: usize,
    /// Pores along y (`n2`).
    pub rows: usize,
    pub pore_diameters: Candidates<f64>,
    /// `None` generates a pores-only network.
    pub throat_diameters: Option<Candidates<f64>>,
    pub coordination: Candidates<u32>,
    pub pore_diameter_bounds: Bounds<f64>,
    pub throat_diameter_bounds: Bounds<f64>,
    pub coordination_bounds: Bounds<u32>,
    /// Mean coordination to reduce to after repair.
    pub average_coordination: Option<f64>,
    /// Jitter amplitude applied to both axes.
    pub pore_random_shift: f64,
    /// Keep pores left without any throat.
    pub keep_lone_pores: bool,
    /// Width in columns of the guaranteed bottom-to-top channel.
    pub center_channel: Option<usize>,
    pub radii: NeighborRadii,
    /// Seed for the single random stream used by every stage.
    pub seed: u64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            columns: 10,
            rows: 10,
            pore_diameters: Candidates::uniform(vec![1.0]),
            throat_diameters: Some(Candidates::uniform(vec![0.5])),
            coordination: Candidates::uniform(vec![2, 3, 4]),
            pore_diameter_bounds: Bounds::default(),
            throat_diameter_bounds: Bounds::default(),
            coordination_bounds: Bounds::default(),
            average_coordination: None,
            pore_random_shift: DEFAULT_PORE_RANDOM_SHIFT,
            keep_lone_pores: true,
            center_channel: None,
            radii: NeighborRadii::default(),
            seed: 42,
        }
    }
}

impl SynthesisConfig {
    /// Configuration with the given lattice size and candidate arrays and
    /// defaults for everything else.
    pub fn new(
        columns: usize,
        rows: usize,
        pore_diameters: Candidates<f64>,
        throat_diameters: Candidates<f64>,
        coordination: Candidates<u32>,
    ) -> Self {
        Self {
            columns,
            rows,
            pore_diameters,
            throat_diameters: Some(throat_diameters),
            coordination,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_center_channel(mut self, width: usize) -> Self {
        self.center_channel = Some(width);
        self
    }

    #[must_use]
    pub fn with_average_coordination(mut self, z: f64) -> Self {
        self.average_coordination = Some(z);
        self
    }

    #[must_use]
    pub fn with_pore_random_shift(mut self, shift: f64) -> Self {
        self.pore_random_shift = shift;
        self
    }

    #[must_use]
    pub fn with_lone_pores(mut self, keep: bool) -> Self {
        self.keep_lone_pores = keep;
        self
    }

    #[must_use]
    pub fn with_pore_diameter_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.pore_diameter_bounds = Bounds::new(min, max);
        self
    }

    #[must_use]
    pub fn with_throat_diameter_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.throat_diameter_bounds = Bounds::new(min, max);
        self
    }

    #[must_use]
    pub fn with_coordination_bounds(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.coordination_bounds = Bounds::new(min, max);
        self
    }

    #[must_use]
    pub fn without_throats(mut self) -> Self {
        self.throat_diameters = None;
        self
    }

    /// Reject anything that would make synthesis undefined. Runs before any
    /// pore is created, so a failed call leaves nothing half-built.
    pub fn validate(&self) -> Result<()> {
        micromodel_lattice::BodyCenteredLattice::new(self.columns, self.rows)?;

        self.pore_diameters.validate_diameters("pore_diameters")?;
        if let Some(throats) = &self.throat_diameters {
            throats.validate_diameters("throat_diameters")?;
        }
        self.coordination.validate("coordination")?;

        self.pore_diameter_bounds.validate("pore_diameter_bounds")?;
        self.throat_diameter_bounds.validate("throat_diameter_bounds")?;
        self.coordination_bounds.validate("coordination_bounds")?;
        self.radii.validate()?;

        if let Some(width) = self.center_channel {
            if width == 0 || width > self.columns {
                return Err(SynthesisError::InvalidChannelWidth {
                    width,
                    columns: self.columns,
                });
            }
        }
        if !self.pore_random_shift.is_finite() || self.pore_random_shift < 0.0 {
            return Err(SynthesisError::InvalidShift(self.pore_random_shift));
        }
        if let Some(z) = self.average_coordination {
            if !z.is_finite() || z < 0.0 {
                return Err(SynthesisError::InvalidAverageCoordination(z));
            }
        }
        Ok(())
    }
}
