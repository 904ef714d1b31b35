//! Radius queries over lattice sites.
//!
//! The index stores each pore's *site* position in lattice units, not its
//! physical position. Scaling and jitter move physical positions only, so
//! an index built right after lattice construction answers the same
//! queries for the whole life of the network.
//!
//! Distances that matter on the body-centred lattice (in spacings):
//!
//! | pair | distance |
//! |---|---|
//! | corner to body | 0.707 |
//! | corner to corner, axis | 1.0 |
//! | body to body, axis | 1.0 |
//! | corner to corner, diagonal | 1.414 |

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::{PoreId, PoreNetwork, Position};

#[derive(Debug, Clone)]
struct SiteEntry {
    point: [f64; 2],
    pore: PoreId,
}

impl RTreeObject for SiteEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for SiteEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// A pore found by a radius query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub pore: PoreId,
    /// Distance in lattice spacings.
    pub distance: f64,
}

/// Spatial index over the sites of a network's pores.
#[derive(Debug)]
pub struct NeighborIndex {
    tree: RTree<SiteEntry>,
    points: Vec<Option<[f64; 2]>>,
}

impl NeighborIndex {
    /// Index the sites of every live pore.
    pub fn build(network: &PoreNetwork) -> Self {
        let mut points = vec![None; network.capacity()];
        let entries: Vec<SiteEntry> = network
            .pores()
            .map(|(pore, p)| {
                let point = p.site.point().to_array();
                points[pore.index()] = Some(point);
                SiteEntry { point, pore }
            })
            .collect();

        Self {
            tree: RTree::bulk_load(entries),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Site position of an indexed pore.
    pub fn point(&self, pore: PoreId) -> Option<Position> {
        self.points
            .get(pore.index())
            .copied()
            .flatten()
            .map(|[x, y]| Position::new(x, y))
    }

    /// Pores strictly closer than `radius` spacings to `pore`, excluding
    /// `pore` itself, ordered by distance then id.
    ///
    /// Returns an empty list for a pore that was never indexed.
    pub fn within(&self, pore: PoreId, radius: f64) -> Vec<Neighbor> {
        let Some(center) = self.points.get(pore.index()).copied().flatten() else {
            return Vec::new();
        };
        let limit = radius * radius;

        let mut found: Vec<Neighbor> = self
            .tree
            .locate_within_distance(center, limit)
            .filter(|entry| entry.pore != pore)
            .filter_map(|entry| {
                let d2 = entry.distance_2(&center);
                (d2 < limit).then(|| Neighbor {
                    pore: entry.pore,
                    distance: d2.sqrt(),
                })
            })
            .collect();

        found.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.pore.cmp(&b.pore))
        });
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BodyCenteredLattice;

    fn index_3x3() -> (BodyCenteredLattice, PoreNetwork, NeighborIndex) {
        let lattice = BodyCenteredLattice::new(3, 3).unwrap();
        let network = lattice.build();
        let index = NeighborIndex::build(&network);
        (lattice, network, index)
    }

    #[test]
    fn indexes_every_pore() {
        let (lattice, _, index) = index_3x3();
        assert_eq!(index.len(), lattice.pore_count());
        assert!(!index.is_empty());
    }

    #[test]
    fn center_corner_sees_eight_within_repair_radius() {
        let (lattice, _, index) = index_3x3();
        let center = lattice.corner_id(1, 1);

        let near = index.within(center, 1.4);
        // 4 bodies at 0.707, then 4 axis corners at 1.0
        assert_eq!(near.len(), 8);
        assert!(near[..4].iter().all(|n| (n.distance - 0.5f64.sqrt()).abs() < 1e-12));
        assert!(near[4..].iter().all(|n| (n.distance - 1.0).abs() < 1e-12));
        assert!(near.iter().all(|n| n.pore != center));
    }

    #[test]
    fn radius_is_strict() {
        let (lattice, _, index) = index_3x3();
        let center = lattice.corner_id(1, 1);

        // axis corners at exactly 1.0 are excluded
        let near = index.within(center, 1.0);
        assert_eq!(near.len(), 4);

        // diagonal corners at 1.414 appear at 1.5
        let wide = index.within(center, 1.5);
        assert_eq!(wide.len(), 12);
    }

    #[test]
    fn ties_are_ordered_by_id() {
        let (lattice, _, index) = index_3x3();
        let near = index.within(lattice.corner_id(1, 1), 1.4);
        for pair in near.windows(2) {
            if pair[0].distance == pair[1].distance {
                assert!(pair[0].pore < pair[1].pore);
            }
        }
    }

    #[test]
    fn unindexed_pore_has_no_neighbors() {
        let (_, _, index) = index_3x3();
        assert!(index.within(PoreId(999), 10.0).is_empty());
        assert!(index.point(PoreId(999)).is_none());
    }
}
