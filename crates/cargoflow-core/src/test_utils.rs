//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::catalog::{CatalogBuilder, IndustryCatalog, IndustryType, SupplyPolicy};
use crate::fixed::{Fixed64, Position};
use crate::id::{CargoTypeId, IndustryTypeId};
use crate::world::World;
use std::sync::Arc;

// ===========================================================================
// Fixed-point helper
// ===========================================================================

pub fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

pub fn at(x: f64, y: f64) -> Position {
    Position::from_f64(x, y)
}

// ===========================================================================
// Cargo types, in registration order of `chain_catalog`
// ===========================================================================

pub fn coal() -> CargoTypeId {
    CargoTypeId(0)
}
pub fn iron_ore() -> CargoTypeId {
    CargoTypeId(1)
}
pub fn steel() -> CargoTypeId {
    CargoTypeId(2)
}
pub fn wood() -> CargoTypeId {
    CargoTypeId(3)
}
pub fn goods() -> CargoTypeId {
    CargoTypeId(4)
}
pub fn fertilizer() -> CargoTypeId {
    CargoTypeId(5)
}
pub fn grain() -> CargoTypeId {
    CargoTypeId(6)
}

// ===========================================================================
// Industry types, in registration order of `chain_catalog`
// ===========================================================================

/// Boost: 10 coal per period, doubled at 50 fertilizer.
pub fn coal_mine() -> IndustryTypeId {
    IndustryTypeId(0)
}
/// Boost with no accepts and a multiplier of 1: a flat 8 iron ore per period.
pub fn iron_mine() -> IndustryTypeId {
    IndustryTypeId(1)
}
/// Assemble: coal + iron ore into steel.
pub fn steel_mill() -> IndustryTypeId {
    IndustryTypeId(2)
}
/// Convert: steel and wood into goods, tripled when both are stocked.
pub fn factory() -> IndustryTypeId {
    IndustryTypeId(3)
}
/// Boost: 12 grain per period, doubled at 30 fertilizer.
pub fn farm() -> IndustryTypeId {
    IndustryTypeId(4)
}

/// A small production chain covering every supply policy.
pub fn chain_catalog() -> IndustryCatalog {
    let mut b = CatalogBuilder::new();
    let coal = b.register_cargo("coal");
    let iron_ore = b.register_cargo("iron_ore");
    let steel = b.register_cargo("steel");
    let wood = b.register_cargo("wood");
    let goods = b.register_cargo("goods");
    let fertilizer = b.register_cargo("fertilizer");
    let grain = b.register_cargo("grain");

    b.register_industry_type(
        IndustryType::new(
            "coal_mine",
            SupplyPolicy::Boost {
                base_production: fixed(10.0),
                boost_multiplier: fixed(2.0),
                boost_threshold: fixed(50.0),
            },
        )
        .with_reach(fixed(8.0))
        .accepting(fertilizer, fixed(1.0))
        .supplying(coal, fixed(1.0)),
    );
    b.register_industry_type(
        IndustryType::new(
            "iron_mine",
            SupplyPolicy::Boost {
                base_production: fixed(8.0),
                boost_multiplier: fixed(1.0),
                boost_threshold: fixed(0.0),
            },
        )
        .with_reach(fixed(8.0))
        .supplying(iron_ore, fixed(1.0)),
    );
    b.register_industry_type(
        IndustryType::new("steel_mill", SupplyPolicy::Assemble)
            .with_reach(fixed(8.0))
            .accepting(coal, fixed(1.0))
            .accepting(iron_ore, fixed(1.0))
            .supplying(steel, fixed(1.0)),
    );
    b.register_industry_type(
        IndustryType::new(
            "factory",
            SupplyPolicy::Convert {
                boost_multiplier: fixed(3.0),
            },
        )
        .with_reach(fixed(8.0))
        .accepting(steel, fixed(1.0))
        .accepting(wood, fixed(0.5))
        .supplying(goods, fixed(1.0)),
    );
    b.register_industry_type(
        IndustryType::new(
            "farm",
            SupplyPolicy::Boost {
                base_production: fixed(12.0),
                boost_multiplier: fixed(2.0),
                boost_threshold: fixed(30.0),
            },
        )
        .with_reach(fixed(8.0))
        .accepting(fertilizer, fixed(1.0))
        .supplying(grain, fixed(1.0)),
    );

    match b.build() {
        Ok(catalog) => catalog,
        Err(e) => panic!("chain catalog is invalid: {e}"),
    }
}

/// An empty world over [`chain_catalog`].
pub fn chain_world() -> World {
    World::new(Arc::new(chain_catalog()))
}
