//! Cargoflow Core -- industry production, accumulation and distribution.
//!
//! Industries take in cargo through their accept slots, accumulate it as
//! material, and once per period turn it into produced cargo according to
//! their type's supply policy. Produced cargo is split evenly across the
//! accepting stations within the industry's reach.
//!
//! # Period Cycle
//!
//! 1. **Accumulate** -- Cargo unloaded at stations (or handed in directly)
//!    lands in industry accept slots, scaled by the slot weight.
//! 2. **Produce** -- Each industry runs one production check. The supply
//!    policy decides how many Production Units it makes and what it drains.
//! 3. **Distribute** -- Every supply slot generates `units × weight` Cargo
//!    Units, dispersed over accepting stations in reach.
//! 4. **Report** -- Per-slot `produced` and `transported` statistics are read
//!    and then reset for the next period.
//!
//! ```rust,ignore
//! let mut world = World::new(Arc::new(catalog));
//! let mill = world.spawn_industry(mill_type, Position::from_f64(0.0, 0.0))?;
//! world.spawn_station(Position::from_f64(3.0, 0.0), &[flour])?;
//! world.accept_cargo(mill, 0, fixed(12.0))?;
//! let report = world.run_period();
//! world.begin_period();
//! ```
//!
//! # Key Types
//!
//! - [`catalog::IndustryCatalog`] -- Immutable set of cargo and industry
//!   types, built and validated through [`catalog::CatalogBuilder`].
//! - [`catalog::SupplyPolicy`] -- Boost, Assemble, and Convert.
//! - [`industry::IndustryStore`] -- Live industries and their material.
//! - [`station::StationStore`] -- Live stations and their cargo loads.
//! - [`production`] -- Production checks and supply output.
//! - [`distribution`] -- Even split of cargo between industries and stations.
//! - [`world::World`] -- Owns all of the above and drives whole periods.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for deterministic math.

pub mod acceptance;
pub mod catalog;
pub mod distribution;
pub mod error;
pub mod fixed;
pub mod id;
pub mod industry;
pub mod production;
pub mod station;
pub mod world;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
