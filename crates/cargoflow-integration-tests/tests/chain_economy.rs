//! End-to-end tests: a catalog loaded from data files drives a small
//! economy over several periods.
//!
//! Three depots sit along a line. Mines feed depot A, the steel mill sits by
//! depot B, the factory by depot C. A "truck" step between periods moves
//! cargo from one depot to the next, the way a host's vehicle logic would.

use cargoflow_core::fixed::Fixed64;
use cargoflow_core::id::*;
use cargoflow_core::test_utils::{at, fixed};
use cargoflow_core::world::World;
use cargoflow_data::load_catalog;
use std::path::PathBuf;
use std::sync::Arc;

// ============================================================================
// Setup
// ============================================================================

fn fixture_world() -> World {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("cargoflow-data")
        .join("tests")
        .join("fixtures")
        .join("ron");
    World::new(Arc::new(load_catalog(&dir).unwrap()))
}

struct Line {
    world: World,
    coal_mine: IndustryId,
    iron_mine: IndustryId,
    steel_mill: IndustryId,
    factory: IndustryId,
    depot_a: StationId,
    depot_b: StationId,
    depot_c: StationId,
}

impl Line {
    fn cargo(&self, name: &str) -> CargoTypeId {
        self.world.catalog().cargo_id(name).unwrap()
    }

    fn industry_type(&self, name: &str) -> IndustryTypeId {
        self.world.catalog().industry_type_id(name).unwrap()
    }

    fn held(&self, station: StationId, cargo: &str) -> Fixed64 {
        self.world
            .station_cargo_amount(station, self.cargo(cargo))
            .unwrap()
    }

    /// Move everything of `cargo` from one depot and unload it at another.
    fn truck(&mut self, from: StationId, to: StationId, cargo: &str) -> Fixed64 {
        let cargo = self.cargo(cargo);
        let held = self.world.station_cargo_amount(from, cargo).unwrap();
        let taken = self.world.station_take_cargo(from, cargo, held).unwrap();
        self.world.unload_at_station(to, cargo, taken).unwrap()
    }
}

fn build_line() -> Line {
    let mut world = fixture_world();
    let catalog = world.catalog();
    let ty = |name: &str| catalog.industry_type_id(name).unwrap();
    let cargo = |name: &str| catalog.cargo_id(name).unwrap();
    let (coal_mine_t, iron_mine_t, mill_t, factory_t) =
        (ty("coal_mine"), ty("iron_mine"), ty("steel_mill"), ty("factory"));
    let (coal, iron_ore, steel, goods) =
        (cargo("coal"), cargo("iron_ore"), cargo("steel"), cargo("goods"));

    let coal_mine = world.spawn_industry(coal_mine_t, at(0.0, 0.0)).unwrap();
    let iron_mine = world.spawn_industry(iron_mine_t, at(4.0, 0.0)).unwrap();
    let steel_mill = world.spawn_industry(mill_t, at(30.0, 0.0)).unwrap();
    let factory = world.spawn_industry(factory_t, at(60.0, 0.0)).unwrap();
    let depot_a = world.spawn_station(at(2.0, 0.0), &[coal, iron_ore]).unwrap();
    let depot_b = world.spawn_station(at(32.0, 0.0), &[steel]).unwrap();
    let depot_c = world.spawn_station(at(62.0, 0.0), &[goods]).unwrap();

    Line {
        world,
        coal_mine,
        iron_mine,
        steel_mill,
        factory,
        depot_a,
        depot_b,
        depot_c,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn raw_material_reaches_first_depot() {
    let mut line = build_line();
    let report = line.world.run_period();

    assert_eq!(report.reports.len(), 4);
    assert_eq!(report.producing().count(), 2);
    assert_eq!(line.held(line.depot_a, "coal"), fixed(10.0));
    assert_eq!(line.held(line.depot_a, "iron_ore"), fixed(8.0));
    let mine = line.world.industries.get(line.coal_mine).unwrap();
    assert_eq!(mine.produced(0), fixed(10.0));
    assert_eq!(mine.transported(0), Fixed64::ONE);
}

#[test]
fn steel_mill_assembles_from_trucked_material() {
    let mut line = build_line();
    let (depot_a, depot_b) = (line.depot_a, line.depot_b);

    line.world.run_period();
    assert_eq!(line.truck(depot_a, depot_b, "coal"), fixed(10.0));
    assert_eq!(line.truck(depot_a, depot_b, "iron_ore"), fixed(8.0));
    line.world.begin_period();

    let report = line.world.run_period();
    let mill = report
        .reports
        .iter()
        .find(|r| r.industry == line.steel_mill)
        .unwrap();
    assert_eq!(mill.units, fixed(8.0));
    assert_eq!(line.held(depot_b, "steel"), fixed(8.0));

    let mill_state = line.world.industries.get(line.steel_mill).unwrap();
    assert_eq!(mill_state.material(0), fixed(2.0));
    assert_eq!(mill_state.material(1), Fixed64::ZERO);
}

#[test]
fn factory_boosts_once_both_inputs_arrive() {
    let mut line = build_line();
    let (depot_a, depot_b, depot_c) = (line.depot_a, line.depot_b, line.depot_c);

    // Periods 1 and 2 fill the mill and make the first steel.
    for _ in 0..2 {
        line.world.run_period();
        line.truck(depot_a, depot_b, "coal");
        line.truck(depot_a, depot_b, "iron_ore");
        line.world.begin_period();
    }
    assert_eq!(line.truck(depot_b, depot_c, "steel"), fixed(8.0));

    // Steel alone: converted one-for-one.
    assert!(!line.world.is_boosted(line.factory).unwrap());
    line.world.run_period();
    assert_eq!(line.held(depot_c, "goods"), fixed(8.0));
    line.world.begin_period();

    // Steel plus wood: every slot stocked, output tripled.
    line.truck(depot_b, depot_c, "steel");
    let wood = line.cargo("wood");
    line.world.unload_at_station(depot_c, wood, fixed(4.0)).unwrap();
    assert!(line.world.is_boosted(line.factory).unwrap());

    let report = line.world.run_period();
    let factory = report
        .reports
        .iter()
        .find(|r| r.industry == line.factory)
        .unwrap();
    assert!(factory.boosted);
    assert_eq!(factory.units, fixed(30.0));
    assert_eq!(line.held(depot_c, "goods"), fixed(38.0));
    assert_eq!(
        line.world.industries.get(line.factory).unwrap().material_total(),
        Fixed64::ZERO
    );
}

#[test]
fn unloading_far_from_any_consumer_absorbs_nothing() {
    let mut line = build_line();
    line.world.run_period();
    let (depot_a, depot_c) = (line.depot_a, line.depot_c);
    // No industry near depot C accepts coal.
    assert_eq!(line.truck(depot_a, depot_c, "coal"), Fixed64::ZERO);
    assert_eq!(line.held(depot_a, "coal"), Fixed64::ZERO);
}

#[test]
fn fertilizer_keeps_farm_boosted_across_periods() {
    let mut line = build_line();
    let farm_t = line.industry_type("farm");
    let grain = line.cargo("grain");
    let fertilizer = line.cargo("fertilizer");

    let farm = line.world.spawn_industry(farm_t, at(100.0, 0.0)).unwrap();
    let silo = line.world.spawn_station(at(101.0, 0.0), &[grain]).unwrap();
    line.world.unload_at_station(silo, fertilizer, fixed(30.0)).unwrap();

    for period in 1..=3 {
        line.world.run_period();
        line.world.begin_period();
        let held = line.world.station_cargo_amount(silo, grain).unwrap();
        assert_eq!(held, fixed(24.0 * period as f64));
    }
    assert!(line.world.is_boosted(farm).unwrap());
    assert_eq!(line.world.industries.get(line.iron_mine).unwrap().material_total(), Fixed64::ZERO);
}

#[test]
fn statistics_reset_only_at_period_boundary() {
    let mut line = build_line();
    let mine = line.coal_mine;

    line.world.check_production(mine).unwrap();
    line.world.check_production(mine).unwrap();
    assert_eq!(line.world.industries.get(mine).unwrap().produced(0), fixed(20.0));

    line.world.begin_period();
    let state = line.world.industries.get(mine).unwrap();
    assert_eq!(state.produced(0), Fixed64::ZERO);
    assert_eq!(state.transported(0), Fixed64::ZERO);
    assert_eq!(line.world.period(), 0);
}
