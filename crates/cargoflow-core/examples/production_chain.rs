//! Production chain example: coal + iron ore -> steel -> goods.
//!
//! A coal mine and an iron mine feed a shared depot. Each period the
//! example carries whatever the depot holds to the steel mill and the
//! factory, and prints what every industry made.
//!
//! Run with: `RUST_LOG=debug cargo run -p cargoflow-core --example production_chain`

use cargoflow_core::catalog::{CatalogBuilder, IndustryType, SupplyPolicy};
use cargoflow_core::fixed::{Fixed64, Position, fixed64_to_f64};
use cargoflow_core::world::World;
use std::sync::Arc;

fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // --- Catalog ---

    let mut b = CatalogBuilder::new();
    let coal = b.register_cargo("coal");
    let iron_ore = b.register_cargo("iron_ore");
    let steel = b.register_cargo("steel");
    let goods = b.register_cargo("goods");

    let coal_mine = b.register_industry_type(
        IndustryType::new(
            "coal_mine",
            SupplyPolicy::Boost {
                base_production: fixed(6.0),
                boost_multiplier: fixed(2.0),
                boost_threshold: fixed(40.0),
            },
        )
        .with_reach(fixed(10.0))
        .supplying(coal, fixed(1.0)),
    );
    let iron_mine = b.register_industry_type(
        IndustryType::new(
            "iron_mine",
            SupplyPolicy::Boost {
                base_production: fixed(4.0),
                boost_multiplier: fixed(1.0),
                boost_threshold: fixed(0.0),
            },
        )
        .with_reach(fixed(10.0))
        .supplying(iron_ore, fixed(1.0)),
    );
    let steel_mill = b.register_industry_type(
        IndustryType::new("steel_mill", SupplyPolicy::Assemble)
            .with_reach(fixed(10.0))
            .accepting(coal, fixed(1.0))
            .accepting(iron_ore, fixed(1.0))
            .supplying(steel, fixed(1.0)),
    );
    let factory = b.register_industry_type(
        IndustryType::new(
            "factory",
            SupplyPolicy::Convert {
                boost_multiplier: fixed(2.0),
            },
        )
        .with_reach(fixed(10.0))
        .accepting(steel, fixed(0.5))
        .supplying(goods, fixed(1.0)),
    );

    let catalog = match b.build() {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!(error = %e, "catalog rejected");
            return;
        }
    };

    // --- World: four industries around one depot ---

    let mut world = World::new(Arc::new(catalog));
    let spawned = [
        world.spawn_industry(coal_mine, Position::from_f64(-5.0, 0.0)),
        world.spawn_industry(iron_mine, Position::from_f64(5.0, 0.0)),
        world.spawn_industry(steel_mill, Position::from_f64(0.0, 5.0)),
        world.spawn_industry(factory, Position::from_f64(0.0, -5.0)),
    ];
    if spawned.iter().any(Result::is_err) {
        return;
    }
    let Ok(depot) = world.spawn_station(Position::default(), &[coal, iron_ore, steel, goods]) else {
        return;
    };

    // --- Run ---

    for _ in 0..5 {
        let report = world.run_period();
        for r in report.producing() {
            let label = world
                .industry_type(r.industry)
                .map(|t| t.label.clone())
                .unwrap_or_default();
            println!(
                "period {}: {:<10} made {:>6.2} units{}",
                report.period,
                label,
                fixed64_to_f64(r.units),
                if r.boosted { " (boosted)" } else { "" }
            );
        }

        // Carry everything the depot holds back to accepting industries.
        for cargo in [coal, iron_ore, steel] {
            let Ok(held) = world.station_cargo_amount(depot, cargo) else {
                continue;
            };
            if world.station_take_cargo(depot, cargo, held).is_ok() {
                let _ = world.unload_at_station(depot, cargo, held);
            }
        }
        world.begin_period();
    }

    let goods_held = world.station_cargo_amount(depot, goods).unwrap_or_default();
    println!("goods waiting at depot: {:.2}", fixed64_to_f64(goods_held));
}
