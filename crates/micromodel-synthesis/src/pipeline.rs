//! The synthesis pipeline.
//!
//! Stage order is fixed and every random draw comes from one generator
//! seeded from [`SynthesisConfig::seed`]:
//!
//! 1. validate the configuration,
//! 2. build the lattice,
//! 3. sample pore diameters, then target coordinations,
//! 4. repair coordination,
//! 5. connect the centre channel,
//! 6. re-apply the coordination bound and check the network,
//! 7. trim lone pores,
//! 8. reduce toward the average coordination,
//! 9. jitter positions,
//! 10. sample throat diameters and clamp.

use micromodel_lattice::{BodyCenteredLattice, NeighborIndex, NetworkArrays, PoreId, PoreNetwork};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::channel::CenterChannel;
use crate::postprocess::{
    clamp_diameters, jitter_positions, trim_lone_pores, CoordinationReducer, SpanningTreeReducer,
};
use crate::repair::{enforce_coordination_bound, CoordinationRepair};
use crate::report::SynthesisReport;
use crate::sampler::{sample_pore_properties, sample_throat_diameters};
use crate::{Result, SynthesisConfig};

/// A finished network with its channel path and report.
#[derive(Debug, Clone)]
pub struct GeneratedNetwork {
    network: PoreNetwork,
    channel: Option<Vec<PoreId>>,
    report: SynthesisReport,
}

impl GeneratedNetwork {
    pub fn network(&self) -> &PoreNetwork {
        &self.network
    }

    /// Centre channel pores from bottom to top, if one was requested.
    pub fn channel(&self) -> Option<&[PoreId]> {
        self.channel.as_deref()
    }

    pub fn report(&self) -> &SynthesisReport {
        &self.report
    }

    /// Dense array view, ready for export.
    pub fn arrays(&self) -> NetworkArrays {
        NetworkArrays::from_network(&self.network, self.channel())
    }

    pub fn into_parts(self) -> (PoreNetwork, Option<Vec<PoreId>>, SynthesisReport) {
        (self.network, self.channel, self.report)
    }
}

/// Runs the pipeline for one configuration.
#[derive(Debug)]
pub struct Synthesizer {
    config: SynthesisConfig,
    reducer: Box<dyn CoordinationReducer>,
}

impl Synthesizer {
    pub fn new(config: SynthesisConfig) -> Self {
        Self {
            config,
            reducer: Box::new(SpanningTreeReducer),
        }
    }

    /// Replace the average-coordination reduction policy.
    #[must_use]
    pub fn with_reducer(mut self, reducer: Box<dyn CoordinationReducer>) -> Self {
        self.reducer = reducer;
        self
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    pub fn generate(&self) -> Result<GeneratedNetwork> {
        let config = &self.config;
        config.validate()?;

        let lattice = BodyCenteredLattice::new(config.columns, config.rows)?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut report = SynthesisReport::new();

        let mut network = lattice.build();
        info!(
            columns = config.columns,
            rows = config.rows,
            seed = config.seed,
            pores = network.live_pore_count(),
            throats = network.throat_count(),
            "lattice built"
        );
        sample_pore_properties(&mut network, config, &mut rng)?;

        let Some(throat_diameters) = &config.throat_diameters else {
            network.clear_throats();
            info!("no throat diameters given, returning pores only");
            report.record_network(&network);
            return Ok(GeneratedNetwork {
                network,
                channel: None,
                report,
            });
        };

        let index = NeighborIndex::build(&network);
        CoordinationRepair::new(&index, config.radii).run(&mut network, &mut rng, &mut report)?;

        let mut channel = match config.center_channel {
            Some(width) => Some(CenterChannel::new(lattice, width)?.connect(
                &mut network,
                &index,
                config.radii.channel,
                &mut rng,
                &mut report,
            )?),
            None => None,
        };

        report.stats.throats_removed += enforce_coordination_bound(&mut network);
        network.validate()?;

        if !config.keep_lone_pores {
            report.stats.pores_trimmed = trim_lone_pores(&mut network, channel.as_mut());
        }

        if let Some(z) = config.average_coordination {
            let removed = self.reducer.reduce(&mut network, z, &mut rng);
            report.stats.throats_reduced = removed;
            info!(average = z, removed, mean = network.mean_coordination(), "coordination reduced");
        }

        jitter_positions(&mut network, config.pore_random_shift, &mut rng);
        sample_throat_diameters(
            &mut network,
            throat_diameters,
            &config.throat_diameter_bounds,
            &mut rng,
        )?;
        clamp_diameters(
            &mut network,
            &config.pore_diameter_bounds,
            &config.throat_diameter_bounds,
        );

        network.validate()?;
        report.record_network(&network);
        info!(
            pores = report.stats.pores,
            throats = report.stats.throats,
            mean_coordination = report.stats.mean_coordination,
            warnings = report.warnings.len(),
            "network synthesized"
        );

        Ok(GeneratedNetwork {
            network,
            channel,
            report,
        })
    }
}

/// Synthesize a network with the default reduction policy.
pub fn generate_network(config: &SynthesisConfig) -> Result<GeneratedNetwork> {
    Synthesizer::new(config.clone()).generate()
}
