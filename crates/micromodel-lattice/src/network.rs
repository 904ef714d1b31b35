//! Pore network arena.
//!
//! Pores are addressed by [`PoreId`]s handed out at lattice construction.
//! Trimming a pore tombstones its slot, so ids held elsewhere (the centre
//! channel path, a caller's selection) never start pointing at a different
//! pore. Throats are keyed by their canonical pore pair, which makes a
//! parallel throat unrepresentable.

use std::collections::{BTreeMap, BTreeSet};

use crate::{LatticeSite, NetworkError, Position, MAX_COORDINATION};

/// Stable pore identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoreId(pub u32);

impl PoreId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Slot index in the arena.
    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for PoreId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for PoreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A void in the pore network.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pore {
    /// Physical position (scaled, centred, possibly jittered).
    pub position: Position,
    /// Regular-lattice site the pore was created at.
    pub site: LatticeSite,
    /// Pore body diameter.
    pub diameter: f64,
    /// Coordination the repair stage aims for.
    pub target_coordination: u32,
}

/// Unordered pore pair in canonical `(low, high)` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThroatKey {
    low: PoreId,
    high: PoreId,
}

impl ThroatKey {
    /// Canonical key for the pair, or `None` for a self-loop.
    pub fn new(a: PoreId, b: PoreId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub const fn low(&self) -> PoreId {
        self.low
    }

    pub const fn high(&self) -> PoreId {
        self.high
    }

    /// The endpoint that is not `pore`.
    pub fn other(&self, pore: PoreId) -> PoreId {
        if pore == self.low {
            self.high
        } else {
            self.low
        }
    }

    pub fn contains(&self, pore: PoreId) -> bool {
        self.low == pore || self.high == pore
    }
}

/// Which stage created a throat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ThroatLabel {
    /// Part of the initial body-to-corner lattice.
    Lattice,
    /// Added while repairing coordination.
    Repair,
    /// Part of the centre channel; never removed afterwards.
    Channel,
}

/// A channel between two pores.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Throat {
    pub key: ThroatKey,
    /// `None` until diameters are assigned; renderers skip unset throats.
    pub diameter: Option<f64>,
    pub label: ThroatLabel,
}

/// The pore network: pore arena, throat set and adjacency.
#[derive(Debug, Clone, Default)]
pub struct PoreNetwork {
    pores: Vec<Option<Pore>>,
    throats: BTreeMap<ThroatKey, Throat>,
    adjacency: Vec<BTreeSet<PoreId>>,
}

impl PoreNetwork {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pore and return its id.
    ///
    /// Ids are `u32`; [`BodyCenteredLattice::new`](crate::BodyCenteredLattice::new)
    /// rejects lattices that would need more.
    pub fn add_pore(&mut self, pore: Pore) -> PoreId {
        debug_assert!(self.pores.len() < u32::MAX as usize, "pore id space exhausted");
        let id = PoreId(self.pores.len() as u32);
        self.pores.push(Some(pore));
        self.adjacency.push(BTreeSet::new());
        id
    }

    /// Number of ids ever allocated, trimmed ones included.
    pub fn capacity(&self) -> usize {
        self.pores.len()
    }

    /// Number of pores that have not been trimmed.
    pub fn live_pore_count(&self) -> usize {
        self.pores.iter().filter(|p| p.is_some()).count()
    }

    pub fn throat_count(&self) -> usize {
        self.throats.len()
    }

    pub fn is_live(&self, id: PoreId) -> bool {
        matches!(self.pores.get(id.index()), Some(Some(_)))
    }

    pub fn pore(&self, id: PoreId) -> Option<&Pore> {
        self.pores.get(id.index()).and_then(Option::as_ref)
    }

    pub fn pore_mut(&mut self, id: PoreId) -> Option<&mut Pore> {
        self.pores.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Live pores in id order.
    pub fn pores(&self) -> impl Iterator<Item = (PoreId, &Pore)> + '_ {
        self.pores
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.as_ref().map(|p| (PoreId(i as u32), p)))
    }

    /// Live pore ids in ascending order.
    pub fn pore_ids(&self) -> Vec<PoreId> {
        self.pores().map(|(id, _)| id).collect()
    }

    pub fn pores_mut(&mut self) -> impl Iterator<Item = (PoreId, &mut Pore)> + '_ {
        self.pores
            .iter_mut()
            .enumerate()
            .filter_map(|(i, p)| p.as_mut().map(|p| (PoreId(i as u32), p)))
    }

    /// Throats in key order.
    pub fn throats(&self) -> impl Iterator<Item = &Throat> + '_ {
        self.throats.values()
    }

    pub fn throats_mut(&mut self) -> impl Iterator<Item = &mut Throat> + '_ {
        self.throats.values_mut()
    }

    pub fn throat(&self, key: ThroatKey) -> Option<&Throat> {
        self.throats.get(&key)
    }

    pub fn throat_mut(&mut self, key: ThroatKey) -> Option<&mut Throat> {
        self.throats.get_mut(&key)
    }

    pub fn are_connected(&self, a: PoreId, b: PoreId) -> bool {
        ThroatKey::new(a, b).is_some_and(|key| self.throats.contains_key(&key))
    }

    /// Realized coordination (incident throat count). Zero for trimmed pores.
    pub fn coordination(&self, id: PoreId) -> usize {
        self.adjacency.get(id.index()).map_or(0, BTreeSet::len)
    }

    /// Connected pores in ascending id order.
    pub fn neighbors(&self, id: PoreId) -> impl Iterator<Item = PoreId> + '_ {
        self.adjacency.get(id.index()).into_iter().flatten().copied()
    }

    /// Keys of the throats incident to `id`, in ascending neighbor order.
    pub fn incident_throats(&self, id: PoreId) -> Vec<ThroatKey> {
        self.neighbors(id)
            .filter_map(|other| ThroatKey::new(id, other))
            .collect()
    }

    /// Realized coordination of every live pore, in id order.
    pub fn coordination_numbers(&self) -> Vec<usize> {
        self.pores().map(|(id, _)| self.coordination(id)).collect()
    }

    /// Mean coordination over live pores (`2 * throats / pores`).
    pub fn mean_coordination(&self) -> f64 {
        let pores = self.live_pore_count();
        if pores == 0 {
            return 0.0;
        }
        2.0 * self.throats.len() as f64 / pores as f64
    }

    /// Live pores without any throat.
    pub fn lone_pores(&self) -> Vec<PoreId> {
        self.pores()
            .map(|(id, _)| id)
            .filter(|&id| self.coordination(id) == 0)
            .collect()
    }

    /// Connect two live pores.
    ///
    /// Returns `Ok(false)` if they are already connected; the existing
    /// throat keeps its label.
    pub fn connect(&mut self, a: PoreId, b: PoreId, label: ThroatLabel) -> Result<bool, NetworkError> {
        let key = ThroatKey::new(a, b).ok_or(NetworkError::SelfLoop(a))?;
        for id in [a, b] {
            if !self.is_live(id) {
                return Err(NetworkError::MissingPore(id));
            }
        }
        if self.throats.contains_key(&key) {
            return Ok(false);
        }
        self.throats.insert(
            key,
            Throat {
                key,
                diameter: None,
                label,
            },
        );
        self.adjacency[a.index()].insert(b);
        self.adjacency[b.index()].insert(a);
        Ok(true)
    }

    /// Remove the throat between two pores, returning it if it existed.
    pub fn disconnect(&mut self, a: PoreId, b: PoreId) -> Option<Throat> {
        let key = ThroatKey::new(a, b)?;
        self.remove_throat(key)
    }

    pub fn remove_throat(&mut self, key: ThroatKey) -> Option<Throat> {
        let throat = self.throats.remove(&key)?;
        if let Some(set) = self.adjacency.get_mut(key.low().index()) {
            set.remove(&key.high());
        }
        if let Some(set) = self.adjacency.get_mut(key.high().index()) {
            set.remove(&key.low());
        }
        Some(throat)
    }

    /// Remove every throat, keeping the pores.
    pub fn clear_throats(&mut self) {
        self.throats.clear();
        for set in &mut self.adjacency {
            set.clear();
        }
    }

    /// Tombstone a pore, dropping any throat that still references it.
    pub fn remove_pore(&mut self, id: PoreId) -> Option<Pore> {
        let pore = self.pores.get_mut(id.index())?.take()?;
        for key in self.incident_throats(id) {
            self.remove_throat(key);
        }
        Some(pore)
    }

    /// Check the structural invariants: every throat joins two live,
    /// distinct pores, adjacency mirrors the throat set, and no pore
    /// exceeds [`MAX_COORDINATION`].
    pub fn validate(&self) -> Result<(), NetworkError> {
        for key in self.throats.keys() {
            if !self.is_live(key.low()) || !self.is_live(key.high()) {
                return Err(NetworkError::DanglingThroat {
                    a: key.low(),
                    b: key.high(),
                });
            }
        }

        let mut degree_sum = 0;
        for (index, set) in self.adjacency.iter().enumerate() {
            let pore = PoreId(index as u32);
            if set.iter().any(|&other| !self.are_connected(pore, other)) {
                return Err(NetworkError::AdjacencyMismatch { pore });
            }
            if set.len() > MAX_COORDINATION {
                return Err(NetworkError::CoordinationExceeded {
                    pore,
                    coordination: set.len(),
                    limit: MAX_COORDINATION,
                });
            }
            degree_sum += set.len();
        }

        if degree_sum != 2 * self.throats.len() {
            // Some throat is missing from an endpoint's adjacency.
            let pore = self
                .throats
                .keys()
                .find(|k| !self.adjacency[k.low().index()].contains(&k.high()))
                .map_or(PoreId(0), ThroatKey::low);
            return Err(NetworkError::AdjacencyMismatch { pore });
        }

        Ok(())
    }
}
