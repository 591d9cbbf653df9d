//! Moving cargo between industries and stations within reach.
//!
//! Two directions:
//! - [`disperse`]: produced cargo leaves an industry and is split evenly over
//!   every accepting station within the industry type's reach.
//! - [`unload_at_station`]: cargo unloaded at a station is split evenly over
//!   every industry that accepts it and whose reach covers the station.

use crate::acceptance::StationAcceptance;
use crate::catalog::IndustryCatalog;
use crate::error::{SimError, check_amount};
use crate::fixed::{Fixed64, Position};
use crate::id::{CargoTypeId, IndustryId, LoadOrigin, StationId};
use crate::industry::IndustryStore;
use crate::station::StationStore;

/// Outcome of dispersing one batch of produced cargo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dispersal {
    /// Stations in reach that accept the cargo.
    pub eligible: usize,
    /// Cargo Units that ended up in a station load.
    pub delivered: Fixed64,
}

/// Stations within `reach` of `from` that accept `cargo`, in id order.
pub fn eligible_stations<A>(
    stations: &StationStore,
    acceptance: &A,
    from: Position,
    reach: Fixed64,
    cargo: CargoTypeId,
) -> Vec<StationId>
where
    A: StationAcceptance + ?Sized,
{
    stations
        .iter()
        .filter(|(id, station)| {
            station.position().within(&from, reach) && acceptance.accepts(*id, cargo)
        })
        .map(|(id, _)| id)
        .collect()
}

/// Split `quantity` evenly across `n` receivers. The last share absorbs the
/// fixed-point rounding remainder so the shares sum to `quantity` exactly.
fn even_shares(quantity: Fixed64, n: usize) -> impl Iterator<Item = Fixed64> {
    let share = quantity / Fixed64::from_num(n);
    let last = quantity - share * Fixed64::from_num(n - 1);
    (0..n).map(move |i| if i + 1 == n { last } else { share })
}

/// Disperse `quantity` of `cargo` produced by industry `origin` over the
/// accepting stations in reach.
///
/// With no eligible station the cargo is lost. A station with no free load
/// for the cargo refuses its share, which is lost too. Zero shares, left
/// when the quantity is smaller than one fixed-point step per station, are
/// not added as loads.
pub fn disperse<A>(
    stations: &mut StationStore,
    acceptance: &A,
    origin: IndustryId,
    from: Position,
    reach: Fixed64,
    cargo: CargoTypeId,
    quantity: Fixed64,
) -> Dispersal
where
    A: StationAcceptance + ?Sized,
{
    let targets = eligible_stations(stations, acceptance, from, reach, cargo);
    let mut dispersal = Dispersal {
        eligible: targets.len(),
        delivered: Fixed64::ZERO,
    };
    if targets.is_empty() || quantity <= Fixed64::ZERO {
        tracing::trace!(industry = %origin, %cargo, %quantity, eligible = targets.len(), "nothing dispersed");
        return dispersal;
    }

    let load_origin = Some(LoadOrigin::Industry(origin));
    for (station, share) in targets.iter().zip(even_shares(quantity, targets.len())) {
        if share == Fixed64::ZERO {
            continue;
        }
        match stations.add_cargo(*station, cargo, load_origin, share) {
            Ok(()) => {
                dispersal.delivered = dispersal.delivered.saturating_add(share);
                tracing::trace!(industry = %origin, %station, %cargo, %share, "cargo dispersed");
            }
            Err(_) => {
                tracing::debug!(industry = %origin, %station, %cargo, %share, "share lost");
            }
        }
    }
    dispersal
}

/// Deliver `amount` of `cargo` unloaded at `station` into the industries
/// that accept it and whose reach covers the station.
///
/// Returns the Cargo Units absorbed: `amount` when at least one industry
/// takes the cargo, zero otherwise. If any receiver cannot take its share
/// the call fails and no industry is changed.
pub fn unload_at_station(
    catalog: &IndustryCatalog,
    industries: &mut IndustryStore,
    stations: &StationStore,
    station: StationId,
    cargo: CargoTypeId,
    amount: Fixed64,
) -> Result<Fixed64, SimError> {
    let at = stations.require(station)?.position();
    check_amount(amount)?;

    let receivers: Vec<(IndustryId, usize)> = industries
        .iter()
        .filter_map(|(id, industry)| {
            let industry_type = catalog.get(industry.type_id())?;
            let slot = industry_type.accept_slot(cargo)?;
            industry
                .position()
                .within(&at, industry_type.reach)
                .then_some((id, slot))
        })
        .collect();

    if receivers.is_empty() || amount == Fixed64::ZERO {
        tracing::debug!(%station, %cargo, %amount, "no industry in reach takes the cargo");
        return Ok(Fixed64::ZERO);
    }

    // Every receiver must take its share before any of them is changed.
    let deliveries: Vec<(IndustryId, usize, Fixed64)> = receivers
        .iter()
        .zip(even_shares(amount, receivers.len()))
        .filter(|(_, share)| *share > Fixed64::ZERO)
        .map(|(&(industry, slot), share)| {
            industries.prepare_accept(catalog, industry, slot, share)?;
            Ok((industry, slot, share))
        })
        .collect::<Result<_, SimError>>()?;

    for (industry, slot, share) in deliveries {
        industries.accept_cargo(catalog, industry, slot, share)?;
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acceptance::AcceptanceTable;
    use crate::catalog::{CatalogBuilder, IndustryType, SupplyPolicy};
    use crate::error::EntityRef;
    use crate::id::IndustryTypeId;
    use crate::station::MAX_CARGO_LOADS;

    fn fixed(v: f64) -> Fixed64 {
        Fixed64::from_num(v)
    }

    fn coal() -> CargoTypeId {
        CargoTypeId(0)
    }

    fn accept_all(_: StationId, _: CargoTypeId) -> bool {
        true
    }

    fn stations_at(points: &[(f64, f64)]) -> StationStore {
        let mut store = StationStore::new();
        for &(x, y) in points {
            store.spawn(Position::from_f64(x, y)).unwrap();
        }
        store
    }

    #[test]
    fn even_shares_sum_exactly() {
        let shares: Vec<_> = even_shares(fixed(10.0), 3).collect();
        assert_eq!(shares.len(), 3);
        assert_eq!(shares[0], shares[1]);
        let total = shares.iter().fold(Fixed64::ZERO, |a, s| a + *s);
        assert_eq!(total, fixed(10.0));
    }

    #[test]
    fn only_stations_in_reach_are_eligible() {
        let stations = stations_at(&[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)]);
        let found = eligible_stations(&stations, &accept_all, Position::default(), fixed(5.0), coal());
        assert_eq!(found, vec![StationId(0), StationId(1)]);
    }

    #[test]
    fn only_accepting_stations_are_eligible() {
        let stations = stations_at(&[(0.0, 0.0), (1.0, 0.0)]);
        let mut table = AcceptanceTable::new();
        table.accept(StationId(1), coal());
        let found = eligible_stations(&stations, &table, Position::default(), fixed(5.0), coal());
        assert_eq!(found, vec![StationId(1)]);
    }

    #[test]
    fn disperse_splits_evenly() {
        let mut stations = stations_at(&[(1.0, 0.0), (0.0, 1.0)]);
        let d = disperse(
            &mut stations,
            &accept_all,
            IndustryId(0),
            Position::default(),
            fixed(2.0),
            coal(),
            fixed(30.0),
        );
        assert_eq!(d.eligible, 2);
        assert_eq!(d.delivered, fixed(30.0));
        for (_, station) in stations.iter() {
            let load = station
                .load(coal(), LoadOrigin::Industry(IndustryId(0)))
                .unwrap();
            assert_eq!(load.amount, fixed(15.0));
        }
    }

    #[test]
    fn disperse_with_no_station_in_reach_loses_cargo() {
        let mut stations = stations_at(&[(100.0, 100.0)]);
        let before = stations.clone();
        let d = disperse(
            &mut stations,
            &accept_all,
            IndustryId(0),
            Position::default(),
            fixed(10.0),
            coal(),
            fixed(30.0),
        );
        assert_eq!(d, Dispersal::default());
        assert_eq!(stations, before);
    }

    #[test]
    fn full_station_loses_only_its_share() {
        let mut stations = stations_at(&[(0.0, 0.0), (1.0, 0.0)]);
        for i in 0..MAX_CARGO_LOADS as u32 {
            stations
                .add_cargo(StationId(0), CargoTypeId(1), Some(LoadOrigin::Industry(IndustryId(i + 10))), fixed(1.0))
                .unwrap();
        }
        let d = disperse(
            &mut stations,
            &accept_all,
            IndustryId(0),
            Position::default(),
            fixed(5.0),
            coal(),
            fixed(8.0),
        );
        assert_eq!(d.eligible, 2);
        assert_eq!(d.delivered, fixed(4.0));
        assert_eq!(stations.get(StationId(1)).unwrap().cargo_amount(coal()), fixed(4.0));
    }

    fn mill_world() -> (IndustryCatalog, IndustryStore, StationStore) {
        let mut b = CatalogBuilder::new();
        let coal = b.register_cargo("coal");
        let steel = b.register_cargo("steel");
        b.register_industry_type(
            IndustryType::new(
                "plant",
                SupplyPolicy::Convert {
                    boost_multiplier: fixed(2.0),
                },
            )
            .with_reach(fixed(10.0))
            .accepting(coal, fixed(2.0))
            .supplying(steel, fixed(1.0)),
        );
        let catalog = b.build().unwrap();
        let mut industries = IndustryStore::new();
        industries
            .spawn(&catalog, IndustryTypeId(0), Position::from_f64(0.0, 0.0))
            .unwrap();
        industries
            .spawn(&catalog, IndustryTypeId(0), Position::from_f64(8.0, 0.0))
            .unwrap();
        industries
            .spawn(&catalog, IndustryTypeId(0), Position::from_f64(50.0, 0.0))
            .unwrap();
        let stations = stations_at(&[(4.0, 0.0), (200.0, 0.0)]);
        (catalog, industries, stations)
    }

    #[test]
    fn unload_splits_over_industries_in_reach() {
        let (catalog, mut industries, stations) = mill_world();
        let absorbed =
            unload_at_station(&catalog, &mut industries, &stations, StationId(0), coal(), fixed(6.0))
                .unwrap();
        assert_eq!(absorbed, fixed(6.0));
        assert_eq!(industries.get(IndustryId(0)).unwrap().material(0), fixed(6.0));
        assert_eq!(industries.get(IndustryId(1)).unwrap().material(0), fixed(6.0));
        assert_eq!(industries.get(IndustryId(2)).unwrap().material(0), Fixed64::ZERO);
    }

    #[test]
    fn unload_out_of_reach_absorbs_nothing() {
        let (catalog, mut industries, stations) = mill_world();
        let before = industries.clone();
        let absorbed =
            unload_at_station(&catalog, &mut industries, &stations, StationId(1), coal(), fixed(6.0))
                .unwrap();
        assert_eq!(absorbed, Fixed64::ZERO);
        assert_eq!(industries, before);
    }

    #[test]
    fn unload_of_unaccepted_cargo_absorbs_nothing() {
        let (catalog, mut industries, stations) = mill_world();
        let steel = catalog.cargo_id("steel").unwrap();
        let absorbed =
            unload_at_station(&catalog, &mut industries, &stations, StationId(0), steel, fixed(6.0))
                .unwrap();
        assert_eq!(absorbed, Fixed64::ZERO);
    }

    #[test]
    fn unload_at_dead_station_is_bad_index() {
        let (catalog, mut industries, stations) = mill_world();
        assert_eq!(
            unload_at_station(&catalog, &mut industries, &stations, StationId(7), coal(), fixed(1.0)),
            Err(SimError::BadIndex(EntityRef::Station(StationId(7))))
        );
    }

    #[test]
    fn tiny_quantity_adds_no_empty_loads() {
        let mut stations = stations_at(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let d = disperse(
            &mut stations,
            &accept_all,
            IndustryId(0),
            Position::default(),
            fixed(5.0),
            coal(),
            Fixed64::DELTA,
        );
        assert_eq!(d.eligible, 3);
        assert_eq!(d.delivered, Fixed64::DELTA);
        assert!(stations.get(StationId(0)).unwrap().loads().is_empty());
        assert!(stations.get(StationId(1)).unwrap().loads().is_empty());
        assert_eq!(stations.get(StationId(2)).unwrap().cargo_amount(coal()), Fixed64::DELTA);
    }

    #[test]
    fn unload_that_would_overflow_one_receiver_changes_nothing() {
        let (catalog, mut industries, stations) = mill_world();
        // Coal weight is 2, so industry 1 holds 2e9 Material Units.
        industries
            .accept_cargo(&catalog, IndustryId(1), 0, fixed(1.0e9))
            .unwrap();
        let before = industries.clone();

        assert_eq!(
            unload_at_station(&catalog, &mut industries, &stations, StationId(0), coal(), fixed(4.0e8)),
            Err(SimError::Overflow(EntityRef::Industry(IndustryId(1))))
        );
        assert_eq!(industries, before);
    }
}
