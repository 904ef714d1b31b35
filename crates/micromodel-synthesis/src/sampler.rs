//! Property sampling.
//!
//! Draws with replacement from a candidate array, weighted when the
//! candidates carry weights and uniform otherwise. Pores are visited in id
//! order so a seed fixes every assignment.

use micromodel_lattice::PoreNetwork;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use tracing::debug;

use crate::config::{Bounds, Candidates};
use crate::{Result, SynthesisConfig, SynthesisError};

/// Draws values from a validated candidate array.
#[derive(Debug, Clone)]
pub struct Sampler<'a, T> {
    values: &'a [T],
    weights: Option<WeightedIndex<f64>>,
}

impl<'a, T: Copy> Sampler<'a, T> {
    pub fn new(candidates: &'a Candidates<T>, set: &'static str) -> Result<Self> {
        candidates.validate(set)?;
        let weights = match &candidates.weights {
            Some(w) => Some(WeightedIndex::new(w).map_err(|e| SynthesisError::InvalidDistribution {
                set,
                reason: e.to_string(),
            })?),
            None => None,
        };
        Ok(Self {
            values: &candidates.values,
            weights,
        })
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        let index = match &self.weights {
            Some(weights) => weights.sample(rng),
            None => rng.gen_range(0..self.values.len()),
        };
        self.values[index]
    }
}

/// Assign every live pore a diameter, then every live pore a target
/// coordination, clamping each to its bounds.
pub fn sample_pore_properties<R: Rng + ?Sized>(
    network: &mut PoreNetwork,
    config: &SynthesisConfig,
    rng: &mut R,
) -> Result<()> {
    let diameters = Sampler::new(&config.pore_diameters, "pore_diameters")?;
    for (_, pore) in network.pores_mut() {
        pore.diameter = config.pore_diameter_bounds.clamp(diameters.draw(rng));
    }

    let targets = Sampler::new(&config.coordination, "coordination")?;
    for (id, pore) in network.pores_mut() {
        pore.target_coordination = config.coordination_bounds.clamp(targets.draw(rng));
        debug!(pore = %id, diameter = pore.diameter, target = pore.target_coordination, "sampled pore");
    }
    Ok(())
}

/// Assign every throat a diameter, in key order.
pub fn sample_throat_diameters<R: Rng + ?Sized>(
    network: &mut PoreNetwork,
    candidates: &Candidates<f64>,
    bounds: &Bounds<f64>,
    rng: &mut R,
) -> Result<()> {
    let diameters = Sampler::new(candidates, "throat_diameters")?;
    for throat in network.throats_mut() {
        throat.diameter = Some(bounds.clamp(diameters.draw(rng)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use micromodel_lattice::BodyCenteredLattice;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn uniform_draws_stay_in_candidates() {
        let candidates = Candidates::uniform(vec![2u32, 3, 5]);
        let sampler = Sampler::new(&candidates, "coordination").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..200 {
            assert!(candidates.values.contains(&sampler.draw(&mut rng)));
        }
    }

    #[test]
    fn zero_weight_values_are_never_drawn() {
        let candidates = Candidates::weighted(vec![1.0, 2.0, 3.0], vec![0.0, 1.0, 0.0]);
        let sampler = Sampler::new(&candidates, "pore_diameters").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert!((0..100).all(|_| sampler.draw(&mut rng) == 2.0));
    }

    #[test]
    fn sampler_rejects_empty_candidates() {
        let candidates: Candidates<f64> = Candidates::uniform(vec![]);
        assert_eq!(
            Sampler::new(&candidates, "pore_diameters").err(),
            Some(SynthesisError::EmptyCandidateSet("pore_diameters"))
        );
    }

    #[test]
    fn pore_properties_respect_bounds() {
        let mut network = BodyCenteredLattice::new(5, 5).unwrap().build();
        let config = SynthesisConfig {
            pore_diameters: Candidates::uniform(vec![0.5, 1.0, 4.0]),
            coordination: Candidates::uniform(vec![1, 4, 7]),
            ..SynthesisConfig::default()
        }
        .with_pore_diameter_bounds(Some(0.8), Some(2.0))
        .with_coordination_bounds(Some(2), Some(6));

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        sample_pore_properties(&mut network, &config, &mut rng).unwrap();

        for (_, pore) in network.pores() {
            assert!((0.8..=2.0).contains(&pore.diameter));
            assert!((2..=6).contains(&pore.target_coordination));
        }
    }

    #[test]
    fn same_seed_same_properties() {
        let lattice = BodyCenteredLattice::new(4, 6).unwrap();
        let config = SynthesisConfig {
            pore_diameters: Candidates::uniform(vec![0.5, 1.0, 1.5, 2.0]),
            ..SynthesisConfig::default()
        };

        let run = || {
            let mut network = lattice.build();
            let mut rng = ChaCha8Rng::seed_from_u64(99);
            sample_pore_properties(&mut network, &config, &mut rng).unwrap();
            network
                .pores()
                .map(|(_, p)| (p.diameter, p.target_coordination))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn every_throat_gets_a_diameter() {
        let mut network = BodyCenteredLattice::new(3, 3).unwrap().build();
        let candidates = Candidates::uniform(vec![0.1, 0.9]);
        let bounds = Bounds::new(Some(0.2), None);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        sample_throat_diameters(&mut network, &candidates, &bounds, &mut rng).unwrap();

        for throat in network.throats() {
            let d = throat.diameter.unwrap();
            assert!(d == 0.2 || d == 0.9);
        }
    }
}
