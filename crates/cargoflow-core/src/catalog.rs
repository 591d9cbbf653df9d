use crate::fixed::Fixed64;
use crate::id::{CargoTypeId, IndustryTypeId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Maximum number of accepted (and, separately, supplied) cargo slots per
/// industry type.
pub const MAX_INDUSTRY_SLOTS: usize = 5;

/// Maximum number of industry types in a catalog.
pub const MAX_INDUSTRY_TYPES: usize = 32;

/// An explicit-length list of cargo slots, never longer than
/// [`MAX_INDUSTRY_SLOTS`] once the catalog is built.
pub type SlotList = SmallVec<[CargoSlot; MAX_INDUSTRY_SLOTS]>;

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// A cargo type paired with its conversion weight.
///
/// On the accept side the weight is Material Units gained per Cargo Unit
/// unloaded. On the supply side it is Cargo Units generated per Production
/// Unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CargoSlot {
    pub cargo: CargoTypeId,
    pub weight: Fixed64,
}

/// How an industry type turns accumulated material into production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplyPolicy {
    /// Always produces `base_production` per period. Multiplied by
    /// `boost_multiplier` while accumulated material is at or above
    /// `boost_threshold`. Material is never consumed.
    Boost {
        base_production: Fixed64,
        boost_multiplier: Fixed64,
        boost_threshold: Fixed64,
    },
    /// Produces only when every accepted slot holds material, at the rate of
    /// the scarcest slot. Cannot be boosted.
    Assemble,
    /// Produces from whatever material is present. Boosted when every
    /// accepted slot holds material at once.
    Convert { boost_multiplier: Fixed64 },
}

impl SupplyPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            SupplyPolicy::Boost { .. } => "boost",
            SupplyPolicy::Assemble => "assemble",
            SupplyPolicy::Convert { .. } => "convert",
        }
    }
}

/// A cargo type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CargoTypeDef {
    pub name: String,
}

/// An industry type definition. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndustryType {
    /// Display name, also the lookup key in the catalog.
    pub label: String,
    /// Actor class spawned to represent industries of this type in the
    /// world. Not used by the engine.
    pub spawner_kind: String,
    pub policy: SupplyPolicy,
    /// Inclusive radius within which stations exchange cargo with
    /// industries of this type.
    pub reach: Fixed64,
    pub accepts: SlotList,
    pub supplies: SlotList,
}

impl IndustryType {
    pub fn new(label: &str, policy: SupplyPolicy) -> Self {
        Self {
            label: label.to_string(),
            spawner_kind: String::new(),
            policy,
            reach: Fixed64::ZERO,
            accepts: SlotList::new(),
            supplies: SlotList::new(),
        }
    }

    pub fn with_spawner(mut self, spawner_kind: &str) -> Self {
        self.spawner_kind = spawner_kind.to_string();
        self
    }

    pub fn with_reach(mut self, reach: Fixed64) -> Self {
        self.reach = reach;
        self
    }

    pub fn accepting(mut self, cargo: CargoTypeId, weight: Fixed64) -> Self {
        self.accepts.push(CargoSlot { cargo, weight });
        self
    }

    pub fn supplying(mut self, cargo: CargoTypeId, weight: Fixed64) -> Self {
        self.supplies.push(CargoSlot { cargo, weight });
        self
    }

    /// Resolve a cargo type to its accept slot index.
    pub fn accept_slot(&self, cargo: CargoTypeId) -> Option<usize> {
        self.accepts.iter().position(|s| s.cargo == cargo)
    }

    /// Resolve a cargo type to its supply slot index.
    pub fn supply_slot(&self, cargo: CargoTypeId) -> Option<usize> {
        self.supplies.iter().position(|s| s.cargo == cargo)
    }

    fn validate(&self, cargo_count: usize) -> Result<(), CatalogError> {
        let lists = [
            (SlotSide::Accepts, &self.accepts),
            (SlotSide::Supplies, &self.supplies),
        ];
        for (side, slots) in lists {
            if slots.len() > MAX_INDUSTRY_SLOTS {
                return Err(CatalogError::TooManySlots {
                    industry: self.label.clone(),
                    side,
                    count: slots.len(),
                });
            }
            for (i, slot) in slots.iter().enumerate() {
                if slot.cargo.index() >= cargo_count {
                    return Err(CatalogError::UnknownCargo {
                        industry: self.label.clone(),
                        cargo: slot.cargo,
                    });
                }
                if slots[..i].iter().any(|s| s.cargo == slot.cargo) {
                    return Err(CatalogError::DuplicateCargo {
                        industry: self.label.clone(),
                        side,
                        cargo: slot.cargo,
                    });
                }
                if slot.weight < Fixed64::ZERO {
                    return Err(self.negative("weight"));
                }
            }
        }

        if self.reach < Fixed64::ZERO {
            return Err(self.negative("reach"));
        }

        match self.policy {
            SupplyPolicy::Boost {
                base_production,
                boost_multiplier,
                boost_threshold,
            } => {
                if base_production < Fixed64::ZERO {
                    return Err(self.negative("base_production"));
                }
                if boost_multiplier < Fixed64::ZERO {
                    return Err(self.negative("boost_multiplier"));
                }
                if boost_threshold < Fixed64::ZERO {
                    return Err(self.negative("boost_threshold"));
                }
            }
            SupplyPolicy::Convert { boost_multiplier } if boost_multiplier < Fixed64::ZERO => {
                return Err(self.negative("boost_multiplier"));
            }
            SupplyPolicy::Assemble | SupplyPolicy::Convert { .. } if self.accepts.is_empty() => {
                return Err(CatalogError::NoAccepts {
                    industry: self.label.clone(),
                    policy: self.policy.name(),
                });
            }
            SupplyPolicy::Assemble | SupplyPolicy::Convert { .. } => {}
        }

        Ok(())
    }

    fn negative(&self, parameter: &'static str) -> CatalogError {
        CatalogError::NegativeParameter {
            industry: self.label.clone(),
            parameter,
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for an immutable [`IndustryCatalog`].
///
/// Register cargo types first, then industry types that reference them;
/// `build()` validates every slot list before freezing the catalog.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    cargo: Vec<CargoTypeDef>,
    cargo_name_to_id: HashMap<String, CargoTypeId>,
    types: Vec<IndustryType>,
    type_name_to_id: HashMap<String, IndustryTypeId>,
    duplicate: Option<String>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cargo type. Returns its ID.
    pub fn register_cargo(&mut self, name: &str) -> CargoTypeId {
        let id = CargoTypeId(self.cargo.len() as u32);
        self.cargo.push(CargoTypeDef {
            name: name.to_string(),
        });
        if self.cargo_name_to_id.insert(name.to_string(), id).is_some() {
            self.duplicate.get_or_insert_with(|| name.to_string());
        }
        id
    }

    /// Register an industry type under its label. Returns its ID.
    pub fn register_industry_type(&mut self, industry_type: IndustryType) -> IndustryTypeId {
        let id = IndustryTypeId(self.types.len() as u32);
        let label = industry_type.label.clone();
        self.types.push(industry_type);
        if self.type_name_to_id.insert(label.clone(), id).is_some() {
            self.duplicate.get_or_insert(label);
        }
        id
    }

    pub fn cargo_id(&self, name: &str) -> Option<CargoTypeId> {
        self.cargo_name_to_id.get(name).copied()
    }

    pub fn industry_type_id(&self, name: &str) -> Option<IndustryTypeId> {
        self.type_name_to_id.get(name).copied()
    }

    /// Validate and freeze.
    pub fn build(self) -> Result<IndustryCatalog, CatalogError> {
        if let Some(name) = self.duplicate {
            return Err(CatalogError::DuplicateName(name));
        }
        if self.types.len() > MAX_INDUSTRY_TYPES {
            return Err(CatalogError::TooManyTypes {
                count: self.types.len(),
            });
        }
        for industry_type in &self.types {
            industry_type.validate(self.cargo.len())?;
        }

        Ok(IndustryCatalog {
            cargo: self.cargo,
            cargo_name_to_id: self.cargo_name_to_id,
            types: self.types,
            type_name_to_id: self.type_name_to_id,
        })
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Immutable table of cargo and industry types. Frozen after `build()`, so
/// it can be shared freely (typically behind an `Arc`).
#[derive(Debug)]
pub struct IndustryCatalog {
    cargo: Vec<CargoTypeDef>,
    cargo_name_to_id: HashMap<String, CargoTypeId>,
    types: Vec<IndustryType>,
    type_name_to_id: HashMap<String, IndustryTypeId>,
}

impl IndustryCatalog {
    pub fn get(&self, id: IndustryTypeId) -> Option<&IndustryType> {
        self.types.get(id.index())
    }

    pub fn cargo(&self, id: CargoTypeId) -> Option<&CargoTypeDef> {
        self.cargo.get(id.index())
    }

    pub fn cargo_id(&self, name: &str) -> Option<CargoTypeId> {
        self.cargo_name_to_id.get(name).copied()
    }

    pub fn industry_type_id(&self, name: &str) -> Option<IndustryTypeId> {
        self.type_name_to_id.get(name).copied()
    }

    pub fn cargo_count(&self) -> usize {
        self.cargo.len()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn types(&self) -> impl Iterator<Item = (IndustryTypeId, &IndustryType)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, t)| (IndustryTypeId(i as u32), t))
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Which slot list of an industry type an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotSide {
    Accepts,
    Supplies,
}

impl std::fmt::Display for SlotSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotSide::Accepts => f.write_str("accepts"),
            SlotSide::Supplies => f.write_str("supplies"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate name: {0}")]
    DuplicateName(String),
    #[error("too many industry types: {count} (max {max})", max = MAX_INDUSTRY_TYPES)]
    TooManyTypes { count: usize },
    #[error("{industry}: {count} {side} slots (max {max})", max = MAX_INDUSTRY_SLOTS)]
    TooManySlots {
        industry: String,
        side: SlotSide,
        count: usize,
    },
    #[error("{industry}: cargo {cargo} listed twice in {side}")]
    DuplicateCargo {
        industry: String,
        side: SlotSide,
        cargo: CargoTypeId,
    },
    #[error("{industry}: unknown cargo reference {cargo}")]
    UnknownCargo {
        industry: String,
        cargo: CargoTypeId,
    },
    #[error("{industry}: {parameter} must not be negative")]
    NegativeParameter {
        industry: String,
        parameter: &'static str,
    },
    #[error("{industry}: {policy} industries need at least one accepted cargo")]
    NoAccepts {
        industry: String,
        policy: &'static str,
    },
}
