//! Errors returned by the simulation entry points.
//!
//! Every variant is a validation failure detected before any state is
//! touched: a call that returns `Err` had no effect. Errors are logged once
//! where they are detected and then handed back to the caller, who decides
//! whether to retry on a later tick.

use crate::fixed::Fixed64;
use crate::id::{CargoTypeId, IndustryId, IndustryTypeId, StationId};

/// A reference to a live instance in one of the stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Industry(IndustryId),
    Station(StationId),
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityRef::Industry(id) => write!(f, "industry {id}"),
            EntityRef::Station(id) => write!(f, "station {id}"),
        }
    }
}

/// Which arena a capacity error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    Industries,
    Stations,
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKind::Industries => f.write_str("industry"),
            StoreKind::Stations => f.write_str("station"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    #[error("bad index: {0} is not live")]
    BadIndex(EntityRef),
    #[error("bad industry type: {0} is not in the catalog")]
    BadType(IndustryTypeId),
    #[error("bad accept slot {slot} for industry type {industry_type}")]
    BadAccept {
        industry_type: IndustryTypeId,
        slot: usize,
    },
    #[error("negative amount: {0}")]
    BadAmount(Fixed64),
    #[error("station {station} has no free load for cargo {cargo}")]
    LoadsFull {
        station: StationId,
        cargo: CargoTypeId,
    },
    #[error("{kind} store is full ({capacity} live)")]
    StoreFull { kind: StoreKind, capacity: usize },
    #[error("quantity at {0} would exceed the fixed-point range")]
    Overflow(EntityRef),
}

impl SimError {
    /// Log the error at its point of detection and hand it back.
    pub(crate) fn reported(self) -> Self {
        tracing::warn!(error = %self, "simulation call rejected");
        self
    }
}

/// Reject negative quantities.
pub(crate) fn check_amount(amount: Fixed64) -> Result<(), SimError> {
    if amount < Fixed64::ZERO {
        return Err(SimError::BadAmount(amount).reported());
    }
    Ok(())
}
