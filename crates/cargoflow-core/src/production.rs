use crate::acceptance::StationAcceptance;
use crate::catalog::{IndustryCatalog, IndustryType, MAX_INDUSTRY_SLOTS, SupplyPolicy};
use crate::distribution::disperse;
use crate::error::{SimError, check_amount};
use crate::fixed::Fixed64;
use crate::id::{CargoTypeId, IndustryId};
use crate::industry::{Industry, IndustryStore, SlotValues};
use crate::station::StationStore;
use smallvec::SmallVec;

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// What one supply slot generated during a production run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupplyOutput {
    pub slot: usize,
    pub cargo: CargoTypeId,
    /// Cargo Units generated (`units × supply weight`).
    pub generated: Fixed64,
    /// Cargo Units that reached a station.
    pub delivered: Fixed64,
    /// Stations the cargo was split over.
    pub stations: usize,
}

pub type SupplyOutputs = SmallVec<[SupplyOutput; MAX_INDUSTRY_SLOTS]>;

/// The outcome of one period's production check for an industry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionReport {
    pub industry: IndustryId,
    /// Production Units made this period. Zero means nothing happened.
    pub units: Fixed64,
    pub boosted: bool,
    /// Material Units drained, per accept slot.
    pub consumed: SlotValues,
    pub outputs: SupplyOutputs,
}

// ---------------------------------------------------------------------------
// Production plan
// ---------------------------------------------------------------------------

/// Production Units due this period and the material they cost.
struct Plan {
    units: Fixed64,
    boosted: bool,
    drain: SlotValues,
}

impl Plan {
    fn idle(boosted: bool) -> Self {
        Self {
            units: Fixed64::ZERO,
            boosted,
            drain: [Fixed64::ZERO; MAX_INDUSTRY_SLOTS],
        }
    }
}

/// Whether the industry is boosted in its current state.
///
/// Boost: accumulated material at or above the threshold. Convert: every
/// accept slot holds material. Assemble industries are never boosted.
pub fn is_boosted(industry: &Industry, industry_type: &IndustryType) -> bool {
    match industry_type.policy {
        SupplyPolicy::Boost {
            boost_threshold, ..
        } => industry.material_total() >= boost_threshold,
        SupplyPolicy::Assemble => false,
        SupplyPolicy::Convert { .. } => all_slots_stocked(industry, industry_type),
    }
}

fn all_slots_stocked(industry: &Industry, industry_type: &IndustryType) -> bool {
    let n = industry_type.accepts.len();
    n > 0
        && industry
            .materials()
            .get(..n)
            .is_some_and(|slots| slots.iter().all(|m| *m > Fixed64::ZERO))
}

fn plan(industry: &Industry, industry_type: &IndustryType) -> Plan {
    let n = industry_type.accepts.len().min(MAX_INDUSTRY_SLOTS);
    let material = &industry.materials()[..n];

    match industry_type.policy {
        // Base production is free; the boost is a threshold check, so
        // nothing is drained.
        SupplyPolicy::Boost {
            base_production,
            boost_multiplier,
            ..
        } => {
            let boosted = is_boosted(industry, industry_type);
            let units = if boosted {
                base_production.saturating_mul(boost_multiplier)
            } else {
                base_production
            };
            Plan {
                units,
                ..Plan::idle(boosted)
            }
        }

        // Limited by the scarcest slot; every slot pays the same amount.
        SupplyPolicy::Assemble => {
            let Some(units) = material.iter().copied().min() else {
                return Plan::idle(false);
            };
            if units <= Fixed64::ZERO {
                return Plan::idle(false);
            }
            let mut drain = [Fixed64::ZERO; MAX_INDUSTRY_SLOTS];
            drain[..n].fill(units);
            Plan {
                units,
                boosted: false,
                drain,
            }
        }

        // Everything present is converted and every stocked slot empties.
        SupplyPolicy::Convert { boost_multiplier } => {
            let boosted = all_slots_stocked(industry, industry_type);
            let mut drain = [Fixed64::ZERO; MAX_INDUSTRY_SLOTS];
            drain[..n].copy_from_slice(material);
            let sum = material
                .iter()
                .fold(Fixed64::ZERO, |acc, m| acc.saturating_add(*m));
            let units = if boosted {
                sum.saturating_mul(boost_multiplier)
            } else {
                sum
            };
            Plan {
                units,
                boosted,
                drain,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

fn resolve<'c>(
    catalog: &'c IndustryCatalog,
    industries: &IndustryStore,
    id: IndustryId,
) -> Result<&'c IndustryType, SimError> {
    let type_id = industries.require(id)?.type_id();
    catalog
        .get(type_id)
        .ok_or_else(|| SimError::BadType(type_id).reported())
}

/// Convert accumulated material into production for one industry. Call once
/// per industry per elapsed period.
///
/// Production is dispersed to stations before the consumed material is
/// drained. When no production is due nothing changes, including the
/// period statistics.
pub fn check_production<A>(
    catalog: &IndustryCatalog,
    industries: &mut IndustryStore,
    stations: &mut StationStore,
    acceptance: &A,
    id: IndustryId,
) -> Result<ProductionReport, SimError>
where
    A: StationAcceptance + ?Sized,
{
    let industry_type = resolve(catalog, industries, id)?;
    let industry = industries.require(id)?;
    let plan = plan(industry, industry_type);

    let mut report = ProductionReport {
        industry: id,
        units: plan.units,
        boosted: plan.boosted,
        consumed: [Fixed64::ZERO; MAX_INDUSTRY_SLOTS],
        outputs: SupplyOutputs::new(),
    };
    if plan.units <= Fixed64::ZERO {
        tracing::debug!(industry = %id, policy = industry_type.policy.name(), "no production due");
        return Ok(report);
    }

    report.outputs = make_production(catalog, industries, stations, acceptance, id, plan.units)?;
    if let Some(industry) = industries.get_mut(id) {
        industry.drain(&plan.drain);
    }
    report.consumed = plan.drain;

    tracing::debug!(
        industry = %id,
        policy = industry_type.policy.name(),
        units = %plan.units,
        boosted = plan.boosted,
        "production made"
    );
    Ok(report)
}

/// Turn `units` Production Units into supplied cargo and disperse it.
///
/// Each supply slot with a positive weight independently receives
/// `units × weight` Cargo Units; the production is not split between slots.
pub fn make_production<A>(
    catalog: &IndustryCatalog,
    industries: &mut IndustryStore,
    stations: &mut StationStore,
    acceptance: &A,
    id: IndustryId,
    units: Fixed64,
) -> Result<SupplyOutputs, SimError>
where
    A: StationAcceptance + ?Sized,
{
    let industry_type = resolve(catalog, industries, id)?;
    check_amount(units)?;
    let from = industries.require(id)?.position();

    let mut outputs = SupplyOutputs::new();
    for (slot, supply) in industry_type.supplies.iter().enumerate() {
        if supply.weight <= Fixed64::ZERO {
            continue;
        }
        let generated = units.saturating_mul(supply.weight);
        let dispersal = disperse(
            stations,
            acceptance,
            id,
            from,
            industry_type.reach,
            supply.cargo,
            generated,
        );
        if let Some(industry) = industries.get_mut(id) {
            industry.record_output(slot, generated, dispersal.delivered);
        }
        outputs.push(SupplyOutput {
            slot,
            cargo: supply.cargo,
            generated,
            delivered: dispersal.delivered,
            stations: dispersal.eligible,
        });
    }
    Ok(outputs)
}
