//! Which stations take which cargo.
//!
//! Station acceptance is decided outside the engine (by the map, by
//! players, by scripts). The engine only asks through [`StationAcceptance`].

use crate::id::{CargoTypeId, StationId};
use std::collections::BTreeSet;

/// Answers whether a station is flagged as accepting a cargo type.
pub trait StationAcceptance {
    fn accepts(&self, station: StationId, cargo: CargoTypeId) -> bool;
}

impl<F> StationAcceptance for F
where
    F: Fn(StationId, CargoTypeId) -> bool,
{
    fn accepts(&self, station: StationId, cargo: CargoTypeId) -> bool {
        self(station, cargo)
    }
}

/// Explicit set of `(station, cargo)` pairs that are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptanceTable {
    pairs: BTreeSet<(StationId, CargoTypeId)>,
}

impl AcceptanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, station: StationId, cargo: CargoTypeId) {
        self.pairs.insert((station, cargo));
    }

    pub fn refuse(&mut self, station: StationId, cargo: CargoTypeId) {
        self.pairs.remove(&(station, cargo));
    }

    /// Cargo types accepted by one station, in id order.
    pub fn accepted_by(&self, station: StationId) -> impl Iterator<Item = CargoTypeId> + '_ {
        self.pairs
            .range((station, CargoTypeId(0))..=(station, CargoTypeId(u32::MAX)))
            .map(|(_, cargo)| *cargo)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl StationAcceptance for AcceptanceTable {
    fn accepts(&self, station: StationId, cargo: CargoTypeId) -> bool {
        self.pairs.contains(&(station, cargo))
    }
}
