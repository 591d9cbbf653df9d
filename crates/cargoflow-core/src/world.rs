//! The simulation context: one catalog, the stores that reference it, and
//! the station acceptance flags.
//!
//! # Period cycle
//!
//! The host decides when a period elapses. A typical driver loop:
//!
//! 1. During the period, forward unload events with [`World::unload_at_station`]
//!    (or [`World::accept_cargo`] when the slot is already resolved).
//! 2. When the period elapses, call [`World::run_period`]. Every live
//!    industry gets exactly one production check, in id order.
//! 3. Read `produced` / `transported` for reporting, then call
//!    [`World::begin_period`] to clear them.

use crate::acceptance::AcceptanceTable;
use crate::catalog::{IndustryCatalog, IndustryType};
use crate::distribution;
use crate::error::SimError;
use crate::fixed::{Fixed64, Position};
use crate::id::{CargoTypeId, IndustryId, IndustryTypeId, LoadOrigin, StationId};
use crate::industry::IndustryStore;
use crate::production::{self, ProductionReport, SupplyOutputs};
use crate::station::StationStore;
use std::sync::Arc;

/// Everything one period run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodReport {
    /// Index of the period that just ended, starting at 0.
    pub period: u64,
    pub reports: Vec<ProductionReport>,
    pub failures: Vec<(IndustryId, SimError)>,
}

impl PeriodReport {
    /// Industries that made any production this period.
    pub fn producing(&self) -> impl Iterator<Item = &ProductionReport> {
        self.reports.iter().filter(|r| r.units > Fixed64::ZERO)
    }
}

#[derive(Debug, Clone)]
pub struct World {
    catalog: Arc<IndustryCatalog>,
    pub industries: IndustryStore,
    pub stations: StationStore,
    pub acceptance: AcceptanceTable,
    period: u64,
}

impl World {
    pub fn new(catalog: Arc<IndustryCatalog>) -> Self {
        Self {
            catalog,
            industries: IndustryStore::new(),
            stations: StationStore::new(),
            acceptance: AcceptanceTable::new(),
            period: 0,
        }
    }

    pub fn catalog(&self) -> &IndustryCatalog {
        &self.catalog
    }

    /// Index of the current period.
    pub fn period(&self) -> u64 {
        self.period
    }

    /// The type definition of a live industry.
    pub fn industry_type(&self, id: IndustryId) -> Result<&IndustryType, SimError> {
        let type_id = self.industries.require(id)?.type_id();
        self.catalog
            .get(type_id)
            .ok_or_else(|| SimError::BadType(type_id).reported())
    }

    // -- Spawning --

    pub fn spawn_industry(
        &mut self,
        type_id: IndustryTypeId,
        position: Position,
    ) -> Result<IndustryId, SimError> {
        self.industries.spawn(&self.catalog, type_id, position)
    }

    /// Place a station that accepts the given cargo types.
    pub fn spawn_station(
        &mut self,
        position: Position,
        accepts: &[CargoTypeId],
    ) -> Result<StationId, SimError> {
        let id = self.stations.spawn(position)?;
        for cargo in accepts {
            self.acceptance.accept(id, *cargo);
        }
        Ok(id)
    }

    // -- Industry entry points --

    pub fn accept_cargo(
        &mut self,
        industry: IndustryId,
        slot: usize,
        amount: Fixed64,
    ) -> Result<(), SimError> {
        self.industries
            .accept_cargo(&self.catalog, industry, slot, amount)
    }

    pub fn unload_at_station(
        &mut self,
        station: StationId,
        cargo: CargoTypeId,
        amount: Fixed64,
    ) -> Result<Fixed64, SimError> {
        distribution::unload_at_station(
            &self.catalog,
            &mut self.industries,
            &self.stations,
            station,
            cargo,
            amount,
        )
    }

    pub fn is_boosted(&self, industry: IndustryId) -> Result<bool, SimError> {
        let industry_type = self.industry_type(industry)?;
        let instance = self.industries.require(industry)?;
        Ok(production::is_boosted(instance, industry_type))
    }

    pub fn check_production(&mut self, industry: IndustryId) -> Result<ProductionReport, SimError> {
        production::check_production(
            &self.catalog,
            &mut self.industries,
            &mut self.stations,
            &self.acceptance,
            industry,
        )
    }

    pub fn make_production(
        &mut self,
        industry: IndustryId,
        units: Fixed64,
    ) -> Result<SupplyOutputs, SimError> {
        production::make_production(
            &self.catalog,
            &mut self.industries,
            &mut self.stations,
            &self.acceptance,
            industry,
            units,
        )
    }

    // -- Station entry points --

    pub fn station_add_cargo(
        &mut self,
        station: StationId,
        cargo: CargoTypeId,
        origin: Option<LoadOrigin>,
        amount: Fixed64,
    ) -> Result<(), SimError> {
        self.stations.add_cargo(station, cargo, origin, amount)
    }

    pub fn station_cargo_amount(
        &self,
        station: StationId,
        cargo: CargoTypeId,
    ) -> Result<Fixed64, SimError> {
        self.stations.cargo_amount(station, cargo)
    }

    pub fn station_take_cargo(
        &mut self,
        station: StationId,
        cargo: CargoTypeId,
        amount: Fixed64,
    ) -> Result<Fixed64, SimError> {
        self.stations.take_cargo(station, cargo, amount)
    }

    // -- Period driver --

    /// Run one production check for every live industry, in id order, and
    /// close the period. Failures are collected, not fatal.
    pub fn run_period(&mut self) -> PeriodReport {
        let mut report = PeriodReport {
            period: self.period,
            ..PeriodReport::default()
        };
        let ids: Vec<IndustryId> = self.industries.ids().collect();
        for id in ids {
            match self.check_production(id) {
                Ok(r) => report.reports.push(r),
                Err(e) => report.failures.push((id, e)),
            }
        }
        tracing::info!(
            period = self.period,
            industries = report.reports.len(),
            producing = report.producing().count(),
            failures = report.failures.len(),
            "period closed"
        );
        self.period += 1;
        report
    }

    /// Clear per-period statistics. Call after reporting has read them.
    pub fn begin_period(&mut self) {
        self.industries.reset_period_stats();
    }
}
