//! Centre channel.
//!
//! Guarantees one bottom-to-top path through a band of `width` columns in
//! the middle of the lattice. The walk alternates corner and body pores,
//! always stepping to a strictly higher site, so a complete channel holds
//! `2 · rows − 1` pores and ends in the top corner row.

use std::ops::Range;

use micromodel_lattice::{
    BodyCenteredLattice, LatticeSite, NeighborIndex, PoreId, PoreNetwork, SiteKind, ThroatKey,
    ThroatLabel,
};
use rand::Rng;
use tracing::{debug, info};

use crate::report::{SynthesisReport, SynthesisWarning};
use crate::{Result, SynthesisError};

/// The band of columns a centre channel may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CenterChannel {
    lattice: BodyCenteredLattice,
    columns: (u32, u32),
}

impl CenterChannel {
    /// Centre a band of `width` columns, starting at
    /// `⌊(columns − width) / 2⌋`.
    pub fn new(lattice: BodyCenteredLattice, width: usize) -> Result<Self> {
        let columns = lattice.columns() as usize;
        if width == 0 || width > columns {
            return Err(SynthesisError::InvalidChannelWidth { width, columns });
        }
        let first = ((columns - width) / 2) as u32;
        Ok(Self {
            lattice,
            columns: (first, first + width as u32),
        })
    }

    /// Corner columns in the band.
    pub fn column_range(&self) -> Range<u32> {
        self.columns.0..self.columns.1
    }

    /// Pores on a complete channel.
    pub fn expected_length(&self) -> usize {
        2 * self.lattice.rows() as usize - 1
    }

    /// Whether a site lies in the band. Body columns past the last cell do
    /// not exist and never match.
    pub fn contains(&self, site: &LatticeSite) -> bool {
        let in_band = self.column_range().contains(&site.column);
        match site.kind {
            SiteKind::Corner => in_band,
            SiteKind::Body => in_band && site.column + 1 < self.lattice.columns(),
        }
    }

    /// Walk from a random bottom corner of the band toward the top row,
    /// connecting each step with a [`ThroatLabel::Channel`] throat.
    ///
    /// An existing throat on the path is relabelled so later stages leave
    /// it alone. Returns the path in walk order.
    pub fn connect<R: Rng + ?Sized>(
        &self,
        network: &mut PoreNetwork,
        index: &NeighborIndex,
        radius: f64,
        rng: &mut R,
        report: &mut SynthesisReport,
    ) -> Result<Vec<PoreId>> {
        let starts: Vec<PoreId> = self
            .column_range()
            .map(|column| self.lattice.corner_id(column, 0))
            .filter(|&id| network.is_live(id))
            .collect();
        let expected = self.expected_length();

        let mut path = Vec::with_capacity(expected);
        if !starts.is_empty() {
            path.push(starts[rng.gen_range(0..starts.len())]);
        }

        while let Some(&current) = path.last() {
            if path.len() >= expected {
                break;
            }
            let Some(height) = network.pore(current).map(|p| p.site.height()) else {
                break;
            };
            let steps: Vec<PoreId> = index
                .within(current, radius)
                .into_iter()
                .filter_map(|n| {
                    let pore = network.pore(n.pore)?;
                    (self.contains(&pore.site) && pore.site.height() > height).then_some(n.pore)
                })
                .collect();
            if steps.is_empty() {
                break;
            }

            let next = steps[rng.gen_range(0..steps.len())];
            if !network.connect(current, next, ThroatLabel::Channel)? {
                if let Some(throat) = ThroatKey::new(current, next).and_then(|key| network.throat_mut(key)) {
                    throat.label = ThroatLabel::Channel;
                }
            }
            debug!(from = %current, to = %next, "channel step");
            path.push(next);
        }

        report.stats.channel_length = path.len();
        if path.len() < expected {
            report.warn(SynthesisWarning::ChannelIncomplete {
                length: path.len(),
                expected,
            });
        } else {
            info!(length = path.len(), columns = ?self.column_range(), "centre channel connected");
        }
        Ok(path)
    }
}
