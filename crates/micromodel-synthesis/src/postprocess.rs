//! Post-processing stages run after repair and channel construction.

use std::collections::BTreeSet;

use micromodel_lattice::{PoreId, PoreNetwork, ThroatKey, ThroatLabel};
use petgraph::unionfind::UnionFind;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use tracing::{debug, info};

use crate::config::Bounds;

/// Policy for thinning a network toward a target mean coordination.
///
/// Implementations must leave [`ThroatLabel::Channel`] throats in place and
/// return the number of throats they removed.
pub trait CoordinationReducer: std::fmt::Debug {
    fn reduce(&self, network: &mut PoreNetwork, target: f64, rng: &mut dyn RngCore) -> usize;
}

/// Keeps a random spanning forest and removes a random selection of the
/// remaining throats.
///
/// The number removed is `⌊throats − pores · z / 2⌋`, so the mean
/// coordination lands on `z` unless the forest and the channel already
/// need more throats than that.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanningTreeReducer;

impl CoordinationReducer for SpanningTreeReducer {
    fn reduce(&self, network: &mut PoreNetwork, target: f64, rng: &mut dyn RngCore) -> usize {
        let keep = network.live_pore_count() as f64 * target / 2.0;
        let excess = (network.throat_count() as f64 - keep).floor();
        if excess <= 0.0 {
            return 0;
        }
        let excess = excess as usize;

        // Channel throats join the forest first since they stay anyway.
        let mut weighted: Vec<(bool, f64, ThroatKey)> = network
            .throats()
            .map(|t| (t.label != ThroatLabel::Channel, rng.gen::<f64>(), t.key))
            .collect();
        weighted.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| a.1.total_cmp(&b.1))
                .then_with(|| a.2.cmp(&b.2))
        });

        let mut forest = UnionFind::<usize>::new(network.capacity());
        let mut spanning = BTreeSet::new();
        let mut removable = Vec::new();
        for (movable, _, key) in weighted {
            if forest.union(key.low().index(), key.high().index()) {
                spanning.insert(key);
            } else if movable {
                removable.push(key);
            }
        }
        removable.sort();
        removable.shuffle(rng);

        let mut removed = 0;
        for key in removable.into_iter().take(excess) {
            if network.remove_throat(key).is_some() {
                removed += 1;
            }
        }
        debug!(spanning = spanning.len(), removed, "spanning forest kept");
        removed
    }
}

/// Tombstone every pore without a throat and drop it from the channel
/// path. Returns the number trimmed.
pub fn trim_lone_pores(network: &mut PoreNetwork, channel: Option<&mut Vec<PoreId>>) -> usize {
    let lone = network.lone_pores();
    for &id in &lone {
        network.remove_pore(id);
    }
    if let Some(path) = channel {
        path.retain(|&id| network.is_live(id));
    }
    if !lone.is_empty() {
        info!(trimmed = lone.len(), "lone pores trimmed");
    }
    lone.len()
}

/// Shift every pore by independent uniform noise in `[−shift, shift]` on
/// each axis. Site positions are left as they are.
pub fn jitter_positions<R: Rng + ?Sized>(network: &mut PoreNetwork, shift: f64, rng: &mut R) {
    if shift == 0.0 {
        return;
    }
    for (_, pore) in network.pores_mut() {
        pore.position.x += rng.gen_range(-shift..=shift);
        pore.position.y += rng.gen_range(-shift..=shift);
    }
}

/// Clamp pore and assigned throat diameters into their bounds.
pub fn clamp_diameters(network: &mut PoreNetwork, pores: &Bounds<f64>, throats: &Bounds<f64>) {
    if !pores.is_unbounded() {
        for (_, pore) in network.pores_mut() {
            pore.diameter = pores.clamp(pore.diameter);
        }
    }
    if !throats.is_unbounded() {
        for throat in network.throats_mut() {
            throat.diameter = throat.diameter.map(|d| throats.clamp(d));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use micromodel_lattice::{BodyCenteredLattice, NeighborIndex, Position};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn dense_network(columns: usize, rows: usize) -> PoreNetwork {
        let mut network = BodyCenteredLattice::new(columns, rows).unwrap().build();
        let index = NeighborIndex::build(&network);
        for id in network.pore_ids() {
            for n in index.within(id, 1.4) {
                network.connect(id, n.pore, ThroatLabel::Repair).unwrap();
            }
        }
        network
    }

    fn components(network: &PoreNetwork) -> usize {
        let mut forest = UnionFind::<usize>::new(network.capacity());
        for t in network.throats() {
            forest.union(t.key.low().index(), t.key.high().index());
        }
        let roots: BTreeSet<usize> = network.pores().map(|(id, _)| forest.find(id.index())).collect();
        roots.len()
    }

    #[test]
    fn reduction_hits_target_mean() {
        let mut network = dense_network(8, 8);
        assert!(network.mean_coordination() > 5.0);
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let removed = SpanningTreeReducer.reduce(&mut network, 3.0, &mut rng);

        assert!(removed > 0);
        let expected = (network.live_pore_count() as f64 * 3.0 / 2.0).ceil() as usize;
        assert_eq!(network.throat_count(), expected);
        assert_eq!(components(&network), 1);
    }

    #[test]
    fn reduction_keeps_spanning_forest_even_below_tree_size() {
        let mut network = dense_network(5, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        SpanningTreeReducer.reduce(&mut network, 0.5, &mut rng);

        assert_eq!(components(&network), 1);
        assert_eq!(network.throat_count(), network.live_pore_count() - 1);
    }

    #[test]
    fn reduction_is_noop_when_already_sparse() {
        let mut network = BodyCenteredLattice::new(4, 4).unwrap().build();
        let before = network.throat_count();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(SpanningTreeReducer.reduce(&mut network, 8.0, &mut rng), 0);
        assert_eq!(network.throat_count(), before);
    }

    #[test]
    fn reduction_spares_channel_throats() {
        let mut network = dense_network(5, 5);
        for throat in network.throats_mut().step_by(3) {
            throat.label = ThroatLabel::Channel;
        }
        let channel: Vec<ThroatKey> = network
            .throats()
            .filter(|t| t.label == ThroatLabel::Channel)
            .map(|t| t.key)
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(6);

        SpanningTreeReducer.reduce(&mut network, 1.0, &mut rng);

        assert!(channel.iter().all(|&key| network.throat(key).is_some()));
    }

    #[test]
    fn trim_drops_lone_pores_and_channel_entries() {
        let lattice = BodyCenteredLattice::new(3, 3).unwrap();
        let mut network = lattice.build();
        let lonely = lattice.corner_id(0, 0);
        network.disconnect(lonely, lattice.body_id(0, 0));
        let mut path = vec![lonely, lattice.body_id(0, 0)];

        let trimmed = trim_lone_pores(&mut network, Some(&mut path));

        assert_eq!(trimmed, 1);
        assert!(!network.is_live(lonely));
        assert_eq!(path, vec![lattice.body_id(0, 0)]);
        assert!(network.lone_pores().is_empty());
    }

    #[test]
    fn jitter_stays_within_shift() {
        let lattice = BodyCenteredLattice::new(4, 4).unwrap();
        let mut network = lattice.build();
        let before: Vec<Position> = network.pores().map(|(_, p)| p.position).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(12);

        jitter_positions(&mut network, 0.2, &mut rng);

        for ((_, pore), original) in network.pores().zip(&before) {
            assert!((pore.position.x - original.x).abs() <= 0.2);
            assert!((pore.position.y - original.y).abs() <= 0.2);
            assert_eq!(lattice.position(pore.site), *original);
        }
    }

    #[test]
    fn zero_shift_leaves_positions() {
        let mut network = BodyCenteredLattice::new(3, 3).unwrap().build();
        let before: Vec<Position> = network.pores().map(|(_, p)| p.position).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        jitter_positions(&mut network, 0.0, &mut rng);
        let after: Vec<Position> = network.pores().map(|(_, p)| p.position).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn clamp_touches_only_assigned_throats() {
        let mut network = BodyCenteredLattice::new(3, 3).unwrap().build();
        let first = network.throats().next().unwrap().key;
        network.throat_mut(first).unwrap().diameter = Some(5.0);

        clamp_diameters(&mut network, &Bounds::new(None, Some(0.5)), &Bounds::new(Some(0.1), Some(1.0)));

        assert_eq!(network.throat(first).unwrap().diameter, Some(1.0));
        assert!(network.throats().filter(|t| t.key != first).all(|t| t.diameter.is_none()));
        assert!(network.pores().all(|(_, p)| p.diameter == 0.5));
    }
}
