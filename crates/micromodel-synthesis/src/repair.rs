//! Coordination repair.
//!
//! Moves every pore's realized coordination toward its sampled target with
//! local edits only:
//!
//! 1. **Local pass**: pores with a target of zero are disconnected first.
//!    Then pores in ascending id order shed throats to, or gain throats
//!    from, pores that have not been visited yet and want throats. A
//!    visited pore is never touched again by this pass.
//! 2. **Zero fix-up**: pores left with no throat (and a non-zero target)
//!    are joined to their nearest eligible neighbor.
//! 3. **Over-maximum fix-up**: pores above the largest sampled target shed
//!    throats to well-connected neighbors, so no pore is isolated by it.
//! 4. **Coordination bound**: nothing may keep more than
//!    [`MAX_COORDINATION`] throats.
//!
//! A step that finds no qualifying partner leaves the pore as it is and
//! records a [`RepairStage`] warning.

use micromodel_lattice::{
    NeighborIndex, PoreId, PoreNetwork, ThroatKey, ThroatLabel, MAX_COORDINATION,
};
use rand::Rng;
use tracing::{debug, info};

use crate::config::NeighborRadii;
use crate::report::{RepairStage, SynthesisReport, SynthesisWarning};
use crate::Result;

/// Runs the repair steps against one network.
#[derive(Debug, Clone, Copy)]
pub struct CoordinationRepair<'a> {
    index: &'a NeighborIndex,
    radii: NeighborRadii,
}

impl<'a> CoordinationRepair<'a> {
    pub fn new(index: &'a NeighborIndex, radii: NeighborRadii) -> Self {
        Self { index, radii }
    }

    /// All four steps in order.
    pub fn run<R: Rng + ?Sized>(
        &self,
        network: &mut PoreNetwork,
        rng: &mut R,
        report: &mut SynthesisReport,
    ) -> Result<()> {
        self.local_pass(network, rng, report)?;
        self.zero_fixup(network, report)?;
        self.over_max_fixup(network, report);
        report.stats.throats_removed += enforce_coordination_bound(network);
        info!(
            throats = network.throat_count(),
            mean_coordination = network.mean_coordination(),
            "coordination repaired"
        );
        Ok(())
    }

    /// Ascending-id sweep toward `min(target, MAX_COORDINATION)`.
    pub fn local_pass<R: Rng + ?Sized>(
        &self,
        network: &mut PoreNetwork,
        rng: &mut R,
        report: &mut SynthesisReport,
    ) -> Result<()> {
        let mut visited = vec![false; network.capacity()];
        report.stats.throats_removed += disconnect_zero_targets(network);

        for id in network.pore_ids() {
            let Some(pore) = network.pore(id) else {
                continue;
            };
            let goal = (pore.target_coordination as usize).min(MAX_COORDINATION);
            let realized = network.coordination(id);

            if realized > goal {
                let mut pool: Vec<ThroatKey> = network
                    .incident_throats(id)
                    .into_iter()
                    .filter(|key| !visited[key.other(id).index()])
                    .collect();
                let mut excess = realized - goal;
                while excess > 0 && !pool.is_empty() {
                    let key = pool.swap_remove(rng.gen_range(0..pool.len()));
                    if network.remove_throat(key).is_some() {
                        report.stats.throats_removed += 1;
                        excess -= 1;
                    }
                }
            } else if realized < goal {
                let mut pool: Vec<PoreId> = self
                    .index
                    .within(id, self.radii.repair)
                    .into_iter()
                    .map(|n| n.pore)
                    .filter(|&other| {
                        network
                            .pore(other)
                            .is_some_and(|p| p.target_coordination > 0)
                            && !visited[other.index()]
                            && !network.are_connected(id, other)
                            && network.coordination(other) < MAX_COORDINATION
                    })
                    .collect();
                let mut missing = goal - realized;
                while missing > 0 && !pool.is_empty() {
                    let other = pool.swap_remove(rng.gen_range(0..pool.len()));
                    if network.connect(id, other, ThroatLabel::Repair)? {
                        report.stats.throats_added += 1;
                        missing -= 1;
                    }
                }
            }

            let realized = network.coordination(id);
            debug!(pore = %id, realized, goal, "local pass");
            if realized != goal {
                report.warn(SynthesisWarning::RepairIncomplete {
                    pore: id,
                    realized,
                    target: goal,
                    stage: RepairStage::LocalPass,
                });
            }
            visited[id.index()] = true;
        }
        Ok(())
    }

    /// Join every isolated pore with a non-zero target to its nearest
    /// neighbor that has room, preferring neighbors still below the largest
    /// sampled target.
    pub fn zero_fixup(&self, network: &mut PoreNetwork, report: &mut SynthesisReport) -> Result<()> {
        let cap = max_target(network).min(MAX_COORDINATION);

        for id in network.pore_ids() {
            let target = match network.pore(id) {
                Some(pore) if network.coordination(id) == 0 && pore.target_coordination > 0 => {
                    pore.target_coordination as usize
                }
                _ => continue,
            };

            let near = self.index.within(id, self.radii.fixup);
            let wants_throats = |other: PoreId| {
                network
                    .pore(other)
                    .is_some_and(|p| p.target_coordination > 0)
            };
            let choice = near
                .iter()
                .find(|n| wants_throats(n.pore) && network.coordination(n.pore) < cap)
                .or_else(|| {
                    near.iter().find(|n| {
                        wants_throats(n.pore) && network.coordination(n.pore) < MAX_COORDINATION
                    })
                })
                .map(|n| n.pore);

            match choice {
                Some(other) => {
                    debug!(pore = %id, partner = %other, "reconnected isolated pore");
                    if network.connect(id, other, ThroatLabel::Repair)? {
                        report.stats.throats_added += 1;
                    }
                }
                None => report.warn(SynthesisWarning::RepairIncomplete {
                    pore: id,
                    realized: 0,
                    target,
                    stage: RepairStage::ZeroFixup,
                }),
            }
        }
        Ok(())
    }

    /// Trim pores above the largest sampled target. Only neighbors whose
    /// coordination exceeds `max(smallest target, 1)` lose a throat,
    /// busiest first.
    pub fn over_max_fixup(&self, network: &mut PoreNetwork, report: &mut SynthesisReport) {
        let ceiling = max_target(network);
        let floor = min_target(network).max(1);

        for id in network.pore_ids() {
            let realized = network.coordination(id);
            if realized <= ceiling {
                continue;
            }
            let mut excess = realized - ceiling;

            let mut partners: Vec<PoreId> = network
                .neighbors(id)
                .filter(|&n| network.coordination(n) > floor)
                .collect();
            partners.sort_by(|a, b| {
                network
                    .coordination(*b)
                    .cmp(&network.coordination(*a))
                    .then_with(|| a.cmp(b))
            });

            for other in partners {
                if excess == 0 {
                    break;
                }
                if network.coordination(other) <= floor {
                    continue;
                }
                if network.disconnect(id, other).is_some() {
                    report.stats.throats_removed += 1;
                    excess -= 1;
                }
            }

            if excess > 0 {
                report.warn(SynthesisWarning::RepairIncomplete {
                    pore: id,
                    realized: network.coordination(id),
                    target: ceiling,
                    stage: RepairStage::OverMaxFixup,
                });
            }
        }
    }
}

/// Drop non-channel throats from every pore above [`MAX_COORDINATION`],
/// busiest neighbor first (lowest id on ties). Returns the number removed.
pub fn enforce_coordination_bound(network: &mut PoreNetwork) -> usize {
    let mut removed = 0;

    for id in network.pore_ids() {
        while network.coordination(id) > MAX_COORDINATION {
            let victim = network
                .neighbors(id)
                .filter(|&other| {
                    ThroatKey::new(id, other)
                        .and_then(|key| network.throat(key))
                        .is_some_and(|t| t.label != ThroatLabel::Channel)
                })
                .max_by(|a, b| {
                    network
                        .coordination(*a)
                        .cmp(&network.coordination(*b))
                        .then_with(|| b.cmp(a))
                });

            // A pore holds at most two channel throats.
            let Some(other) = victim else {
                break;
            };
            network.disconnect(id, other);
            removed += 1;
        }
    }
    removed
}

/// Drop every non-channel throat touching a pore whose target is zero.
fn disconnect_zero_targets(network: &mut PoreNetwork) -> usize {
    let doomed: Vec<ThroatKey> = network
        .throats()
        .filter(|t| t.label != ThroatLabel::Channel)
        .filter(|t| {
            [t.key.low(), t.key.high()].into_iter().any(|end| {
                network
                    .pore(end)
                    .is_some_and(|p| p.target_coordination == 0)
            })
        })
        .map(|t| t.key)
        .collect();

    doomed
        .into_iter()
        .filter(|&key| network.remove_throat(key).is_some())
        .count()
}

fn max_target(network: &PoreNetwork) -> usize {
    network
        .pores()
        .map(|(_, p)| p.target_coordination as usize)
        .max()
        .unwrap_or(0)
}

fn min_target(network: &PoreNetwork) -> usize {
    network
        .pores()
        .map(|(_, p)| p.target_coordination as usize)
        .min()
        .unwrap_or(0)
}
