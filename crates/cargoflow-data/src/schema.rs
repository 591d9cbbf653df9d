//! Serde data file structs for catalog definitions.
//!
//! These structs define the on-disk format for cargo types and industry
//! types. They are deserialized from RON, JSON, or TOML data files and then
//! resolved into catalog types by the loader.

use serde::Deserialize;

// ===========================================================================
// Cargo
// ===========================================================================

/// A cargo type definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct CargoData {
    pub name: String,
}

// ===========================================================================
// Industry types
// ===========================================================================

/// An industry type definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct IndustryTypeData {
    pub name: String,
    /// Actor class the host spawns for this type.
    #[serde(default)]
    pub spawner: String,
    pub policy: PolicyData,
    #[serde(default)]
    pub reach: f64,
    #[serde(default)]
    pub accepts: Vec<SlotData>,
    #[serde(default)]
    pub supplies: Vec<SlotData>,
}

/// An accept or supply slot, supporting both short tuple form and full form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SlotData {
    /// Short form: `("cargo_name", weight)`.
    Short(String, f64),
    /// Full form; the weight defaults to 1.
    Full {
        cargo: String,
        #[serde(default = "default_weight")]
        weight: f64,
    },
}

impl SlotData {
    pub fn cargo(&self) -> &str {
        match self {
            SlotData::Short(cargo, _) | SlotData::Full { cargo, .. } => cargo,
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            SlotData::Short(_, weight) | SlotData::Full { weight, .. } => *weight,
        }
    }
}

fn default_weight() -> f64 {
    1.0
}

fn default_multiplier() -> f64 {
    1.0
}

/// The supply policy of an industry type.
#[derive(Debug, Clone, Deserialize)]
pub enum PolicyData {
    Boost {
        base_production: f64,
        #[serde(default = "default_multiplier")]
        boost_multiplier: f64,
        #[serde(default)]
        boost_threshold: f64,
    },
    Assemble,
    Convert {
        #[serde(default = "default_multiplier")]
        boost_multiplier: f64,
    },
}

// ===========================================================================
// Tests
// ===========================================================================
