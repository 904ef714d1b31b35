//! Lattice sites and planar positions.
//!
//! A pore lives at two places at once: its *site* in the regular lattice
//! (integer column/row plus corner-or-body kind, spacing 1) and its physical
//! *position* after scaling, centring and jitter. Connectivity decisions are
//! made on sites; renderers read positions.

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Which sub-lattice a site belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SiteKind {
    /// Grid vertex at integer coordinates.
    Corner,
    /// Cell centre, offset by half a spacing on both axes.
    Body,
}

/// A site in the body-centred lattice.
///
/// `column` runs along x, `row` along y. Corner sites sit at
/// `(column, row)`, body sites at `(column + 0.5, row + 0.5)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatticeSite {
    pub column: u32,
    pub row: u32,
    pub kind: SiteKind,
}

impl LatticeSite {
    pub const fn corner(column: u32, row: u32) -> Self {
        Self {
            column,
            row,
            kind: SiteKind::Corner,
        }
    }

    pub const fn body(column: u32, row: u32) -> Self {
        Self {
            column,
            row,
            kind: SiteKind::Body,
        }
    }

    /// Half-spacing offset of this site's sub-lattice.
    const fn offset(&self) -> f64 {
        match self.kind {
            SiteKind::Corner => 0.0,
            SiteKind::Body => 0.5,
        }
    }

    /// Position in lattice units (spacing 1, corner (0, 0) at the origin).
    pub fn point(&self) -> Position {
        let offset = self.offset();
        Position::new(self.column as f64 + offset, self.row as f64 + offset)
    }

    /// Height along the row axis in lattice units.
    ///
    /// Body sites sit half a row above the corner row with the same index,
    /// which is what makes a bottom-to-top walk alternate between the two
    /// sub-lattices.
    pub fn height(&self) -> f64 {
        self.row as f64 + self.offset()
    }
}

impl std::fmt::Display for LatticeSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.kind {
            SiteKind::Corner => 'c',
            SiteKind::Body => 'b',
        };
        write!(f, "{}[{}, {}]", tag, self.column, self.row)
    }
}
