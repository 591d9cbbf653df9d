//! Stations and their cargo loads.
//!
//! A load is an amount of one cargo type from one origin waiting at a
//! station. Cargo arriving with a `(cargo, origin)` pair the station already
//! holds is merged into that load; anything else takes a new load, up to
//! [`MAX_CARGO_LOADS`] per station.

use crate::error::{EntityRef, SimError, StoreKind, check_amount};
use crate::fixed::{Fixed64, Position};
use crate::id::{CargoTypeId, LoadOrigin, StationId};
use serde::{Deserialize, Serialize};

/// Maximum number of stations in a world.
pub const MAX_STATIONS: usize = 128;

/// Maximum number of distinct loads held by one station.
pub const MAX_CARGO_LOADS: usize = 32;

/// A distinct load of cargo in a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationLoad {
    pub cargo: CargoTypeId,
    pub origin: LoadOrigin,
    /// Amount in Cargo Units.
    pub amount: Fixed64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    position: Position,
    loads: Vec<StationLoad>,
}

impl Station {
    fn new(position: Position) -> Self {
        Self {
            position,
            loads: Vec::with_capacity(MAX_CARGO_LOADS),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Loads in arrival order.
    pub fn loads(&self) -> &[StationLoad] {
        &self.loads
    }

    pub fn load(&self, cargo: CargoTypeId, origin: LoadOrigin) -> Option<&StationLoad> {
        self.loads
            .iter()
            .find(|l| l.cargo == cargo && l.origin == origin)
    }

    /// Total amount of `cargo` waiting here, summed over every origin.
    pub fn cargo_amount(&self, cargo: CargoTypeId) -> Fixed64 {
        self.loads
            .iter()
            .filter(|l| l.cargo == cargo)
            .fold(Fixed64::ZERO, |acc, l| acc.saturating_add(l.amount))
    }

    /// Whether cargo with this `(cargo, origin)` pair would be accepted.
    pub fn has_room_for(&self, cargo: CargoTypeId, origin: LoadOrigin) -> bool {
        self.loads.len() < MAX_CARGO_LOADS || self.load(cargo, origin).is_some()
    }
}

/// Fixed-capacity arena of stations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationStore {
    stations: Vec<Station>,
    capacity: usize,
}

impl Default for StationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StationStore {
    pub fn new() -> Self {
        Self::with_capacity(MAX_STATIONS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(MAX_STATIONS);
        Self {
            stations: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn spawn(&mut self, position: Position) -> Result<StationId, SimError> {
        if self.stations.len() >= self.capacity {
            return Err(SimError::StoreFull {
                kind: StoreKind::Stations,
                capacity: self.capacity,
            }
            .reported());
        }
        let id = StationId(self.stations.len() as u32);
        self.stations.push(Station::new(position));
        tracing::debug!(station = %id, "station spawned");
        Ok(id)
    }

    pub fn contains(&self, id: StationId) -> bool {
        id.index() < self.stations.len()
    }

    pub fn get(&self, id: StationId) -> Option<&Station> {
        self.stations.get(id.index())
    }

    pub(crate) fn require(&self, id: StationId) -> Result<&Station, SimError> {
        self.get(id)
            .ok_or_else(|| SimError::BadIndex(EntityRef::Station(id)).reported())
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = (StationId, &Station)> {
        self.stations
            .iter()
            .enumerate()
            .map(|(i, s)| (StationId(i as u32), s))
    }

    /// Add cargo to a station, merging with the load of the same cargo and
    /// origin. `None` for `origin` means the station itself.
    ///
    /// When every load is taken and none matches, the call is rejected with
    /// `LoadsFull` and the station is left unchanged. A merge that would
    /// overflow the load is rejected with `Overflow`, also without change.
    pub fn add_cargo(
        &mut self,
        id: StationId,
        cargo: CargoTypeId,
        origin: Option<LoadOrigin>,
        amount: Fixed64,
    ) -> Result<(), SimError> {
        self.require(id)?;
        check_amount(amount)?;
        let origin = origin.unwrap_or(LoadOrigin::Station(id));

        let station = &mut self.stations[id.index()];
        if let Some(load) = station
            .loads
            .iter_mut()
            .find(|l| l.cargo == cargo && l.origin == origin)
        {
            load.amount = load
                .amount
                .checked_add(amount)
                .ok_or_else(|| SimError::Overflow(EntityRef::Station(id)).reported())?;
        } else if station.loads.len() < MAX_CARGO_LOADS {
            station.loads.push(StationLoad {
                cargo,
                origin,
                amount,
            });
        } else {
            return Err(SimError::LoadsFull { station: id, cargo }.reported());
        }

        tracing::trace!(station = %id, cargo = %cargo, ?origin, %amount, "cargo added");
        Ok(())
    }

    /// Total amount of `cargo` at a station, summed over every origin.
    pub fn cargo_amount(&self, id: StationId, cargo: CargoTypeId) -> Result<Fixed64, SimError> {
        Ok(self.require(id)?.cargo_amount(cargo))
    }

    /// Remove up to `amount` of `cargo` from a station, oldest loads first.
    /// Emptied loads are dropped. Returns the amount actually removed.
    pub fn take_cargo(
        &mut self,
        id: StationId,
        cargo: CargoTypeId,
        amount: Fixed64,
    ) -> Result<Fixed64, SimError> {
        self.require(id)?;
        check_amount(amount)?;

        let station = &mut self.stations[id.index()];
        let mut remaining = amount;
        for load in station.loads.iter_mut().filter(|l| l.cargo == cargo) {
            if remaining == Fixed64::ZERO {
                break;
            }
            let taken = load.amount.min(remaining);
            load.amount -= taken;
            remaining -= taken;
        }
        station
            .loads
            .retain(|l| l.cargo != cargo || l.amount > Fixed64::ZERO);

        Ok(amount - remaining)
    }
}
