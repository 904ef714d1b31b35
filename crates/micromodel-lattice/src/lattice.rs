//! Body-centred planar lattice.
//!
//! The lattice is the projection of a two-layer body-centred cubic cell
//! with its top corner layer trimmed:
//!
//! - `columns × rows` corner sites at integer coordinates,
//! - `(columns − 1) × (rows − 1)` body sites at cell centres,
//! - every body site joined to its four surrounding corners.
//!
//! # Id layout
//!
//! Corners come first, column-major, then bodies in the same order:
//!
//! ```text
//! corner(i, j) = i · rows + j
//! body(i, j)   = columns · rows + i · (rows − 1) + j
//! ```
//!
//! # Physical frame
//!
//! Sites are scaled by `n / (n − 1)` per axis and centred, so corner pores
//! span exactly `[−n/2, n/2]` and touch the domain edge after `n − 1`
//! steps.

use crate::{LatticeError, LatticeSite, Pore, PoreId, PoreNetwork, Position, SiteKind, ThroatLabel};

/// Diameter given to every pore before properties are sampled.
pub const DEFAULT_PORE_DIAMETER: f64 = 1.0;

/// Dimensions of a body-centred lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyCenteredLattice {
    columns: u32,
    rows: u32,
}

impl BodyCenteredLattice {
    /// Create a lattice with `columns` pores along x and `rows` along y.
    pub fn new(columns: usize, rows: usize) -> Result<Self, LatticeError> {
        if columns < 2 || rows < 2 || u32::try_from(columns).is_err() || u32::try_from(rows).is_err() {
            return Err(LatticeError::InvalidDimension { columns, rows });
        }
        let (c, r) = (columns as u128, rows as u128);
        if 2 * c * r - c - r + 1 > u32::MAX as u128 {
            return Err(LatticeError::TooManyPores { columns, rows });
        }
        Ok(Self {
            columns: columns as u32,
            rows: rows as u32,
        })
    }

    #[inline]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    #[inline]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of corner sites.
    #[inline]
    pub const fn corner_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Number of body sites.
    #[inline]
    pub const fn body_count(&self) -> usize {
        (self.columns as usize - 1) * (self.rows as usize - 1)
    }

    /// Total pores: `2·n1·n2 − n1 − n2 + 1`.
    #[inline]
    pub const fn pore_count(&self) -> usize {
        self.corner_count() + self.body_count()
    }

    /// Id of the corner pore at `(column, row)`.
    #[inline]
    pub const fn corner_id(&self, column: u32, row: u32) -> PoreId {
        PoreId(column * self.rows + row)
    }

    /// Id of the body pore in cell `(column, row)`.
    #[inline]
    pub const fn body_id(&self, column: u32, row: u32) -> PoreId {
        PoreId(self.columns * self.rows + column * (self.rows - 1) + row)
    }

    /// Id of the pore at `site`, if the site lies inside the lattice.
    pub fn id_of(&self, site: LatticeSite) -> Option<PoreId> {
        match site.kind {
            SiteKind::Corner if site.column < self.columns && site.row < self.rows => {
                Some(self.corner_id(site.column, site.row))
            }
            SiteKind::Body if site.column + 1 < self.columns && site.row + 1 < self.rows => {
                Some(self.body_id(site.column, site.row))
            }
            _ => None,
        }
    }

    /// Scale factors `(n1 / (n1 − 1), n2 / (n2 − 1))` from lattice units to
    /// the physical frame.
    pub fn scale(&self) -> (f64, f64) {
        let c = self.columns as f64;
        let r = self.rows as f64;
        (c / (c - 1.0), r / (r - 1.0))
    }

    /// Physical position of a site.
    pub fn position(&self, site: LatticeSite) -> Position {
        let (sx, sy) = self.scale();
        let point = site.point();
        Position::new(
            point.x * sx - self.columns as f64 / 2.0,
            point.y * sy - self.rows as f64 / 2.0,
        )
    }

    /// All sites in id order.
    pub fn sites(&self) -> Sites {
        Sites {
            lattice: *self,
            current: 0,
        }
    }

    /// Build the initial network: every site as a pore, bodies joined to
    /// their corners.
    pub fn build(&self) -> PoreNetwork {
        let mut network = PoreNetwork::new();
        for site in self.sites() {
            network.add_pore(Pore {
                position: self.position(site),
                site,
                diameter: DEFAULT_PORE_DIAMETER,
                target_coordination: 0,
            });
        }

        for i in 0..self.columns - 1 {
            for j in 0..self.rows - 1 {
                let body = self.body_id(i, j);
                for (ci, cj) in [(i, j), (i + 1, j), (i, j + 1), (i + 1, j + 1)] {
                    // Both ends were just added and are distinct.
                    let _ = network.connect(body, self.corner_id(ci, cj), ThroatLabel::Lattice);
                }
            }
        }

        network
    }
}

/// Iterator over lattice sites in id order.
pub struct Sites {
    lattice: BodyCenteredLattice,
    current: usize,
}

impl Iterator for Sites {
    type Item = LatticeSite;

    fn next(&mut self) -> Option<Self::Item> {
        let lattice = &self.lattice;
        let index = self.current;
        if index >= lattice.pore_count() {
            return None;
        }
        self.current += 1;

        let rows = lattice.rows as usize;
        let site = if index < lattice.corner_count() {
            LatticeSite::corner((index / rows) as u32, (index % rows) as u32)
        } else {
            let offset = index - lattice.corner_count();
            LatticeSite::body((offset / (rows - 1)) as u32, (offset % (rows - 1)) as u32)
        };
        Some(site)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.lattice.pore_count().saturating_sub(self.current);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Sites {}
