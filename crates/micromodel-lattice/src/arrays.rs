//! Dense array view of a finished network.
//!
//! Exporters want contiguous arrays indexed from zero. This view compacts
//! live pores in id order, rewrites throat endpoints and channel entries
//! to the compact indices, and owns its data so it can be serialized or
//! sent elsewhere without borrowing the network.

use std::collections::HashMap;

use crate::{PoreId, PoreNetwork, ThroatLabel};

/// Pore and throat data as parallel arrays.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkArrays {
    pub pore_coords: Vec<[f64; 2]>,
    pub pore_diameters: Vec<f64>,
    /// Arena id each compact pore index came from.
    pub pore_ids: Vec<PoreId>,
    pub throat_conns: Vec<[usize; 2]>,
    pub throat_diameters: Vec<Option<f64>>,
    pub throat_labels: Vec<ThroatLabel>,
    /// Centre channel path in compact indices.
    pub channel: Option<Vec<usize>>,
}

impl NetworkArrays {
    /// Compact `network`. Channel entries that refer to trimmed pores are
    /// dropped.
    pub fn from_network(network: &PoreNetwork, channel: Option<&[PoreId]>) -> Self {
        let mut arrays = Self::default();
        let mut compact: HashMap<PoreId, usize> = HashMap::with_capacity(network.capacity());

        for (id, pore) in network.pores() {
            compact.insert(id, arrays.pore_ids.len());
            arrays.pore_ids.push(id);
            arrays.pore_coords.push(pore.position.to_array());
            arrays.pore_diameters.push(pore.diameter);
        }

        for throat in network.throats() {
            // Throats only ever join live pores.
            let (Some(&a), Some(&b)) = (compact.get(&throat.key.low()), compact.get(&throat.key.high())) else {
                continue;
            };
            arrays.throat_conns.push([a, b]);
            arrays.throat_diameters.push(throat.diameter);
            arrays.throat_labels.push(throat.label);
        }

        arrays.channel = channel.map(|path| path.iter().filter_map(|id| compact.get(id).copied()).collect());
        arrays
    }

    pub fn pore_count(&self) -> usize {
        self.pore_coords.len()
    }

    pub fn throat_count(&self) -> usize {
        self.throat_conns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BodyCenteredLattice;

    #[test]
    fn arrays_mirror_untrimmed_network() {
        let network = BodyCenteredLattice::new(3, 2).unwrap().build();
        let arrays = NetworkArrays::from_network(&network, None);

        assert_eq!(arrays.pore_count(), network.live_pore_count());
        assert_eq!(arrays.throat_count(), network.throat_count());
        assert_eq!(arrays.pore_diameters.len(), arrays.pore_count());
        assert!(arrays.throat_diameters.iter().all(Option::is_none));
        assert!(arrays.channel.is_none());
        for (index, id) in arrays.pore_ids.iter().enumerate() {
            assert_eq!(id.index(), index);
        }
    }

    #[test]
    fn trimming_compacts_and_remaps() {
        let lattice = BodyCenteredLattice::new(3, 3).unwrap();
        let mut network = lattice.build();
        let trimmed = lattice.corner_id(0, 0);
        network.remove_pore(trimmed);

        let path = [trimmed, lattice.body_id(0, 0), lattice.corner_id(1, 1)];
        let arrays = NetworkArrays::from_network(&network, Some(&path));

        assert_eq!(arrays.pore_count(), lattice.pore_count() - 1);
        assert!(!arrays.pore_ids.contains(&trimmed));
        assert!(arrays
            .throat_conns
            .iter()
            .all(|&[a, b]| a < arrays.pore_count() && b < arrays.pore_count() && a != b));

        // Ids shift down by one past the trimmed slot.
        let body = lattice.body_id(0, 0).index() - 1;
        let corner = lattice.corner_id(1, 1).index() - 1;
        assert_eq!(arrays.channel, Some(vec![body, corner]));
    }
}
