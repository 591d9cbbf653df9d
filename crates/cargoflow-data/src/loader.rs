//! Resolution pipeline: reads data files, resolves cargo names, builds the catalog.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and the
//! deserialization helpers that [`load_catalog`] is built from.

use crate::schema::{CargoData, IndustryTypeData, PolicyData, SlotData};
use cargoflow_core::catalog::{CatalogBuilder, CatalogError, IndustryCatalog, IndustryType, SupplyPolicy};
use cargoflow_core::fixed::Fixed64;
use cargoflow_core::id::{CargoTypeId, IndustryTypeId};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Base name of the cargo data file.
pub const CARGO_FILE: &str = "cargo";
/// Base name of the industry data file.
pub const INDUSTRIES_FILE: &str = "industries";

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A name reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// A duplicate name was found.
    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// A number does not fit the fixed-point range, or is not finite.
    #[error("{field} of '{name}' in {file} is out of range: {value}")]
    OutOfRange {
        file: PathBuf,
        name: String,
        field: &'static str,
        value: f64,
    },

    /// The resolved catalog failed validation.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

const EXTENSIONS: [(&str, Format); 3] = [
    ("ron", Format::Ron),
    ("toml", Format::Toml),
    ("json", Format::Json),
];

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    let ext = path.extension().and_then(|e| e.to_str());
    EXTENSIONS
        .iter()
        .find(|(known, _)| Some(*known) == ext)
        .map(|(_, format)| *format)
        .ok_or_else(|| DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        })
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Find `{base_name}.ron`, `.toml` or `.json` in `dir`.
///
/// Returns `Ok(None)` if none exists and `ConflictingFormats` if more than
/// one does.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;
    for (ext, _) in EXTENSIONS {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if !candidate.exists() {
            continue;
        }
        if let Some(existing) = found.take() {
            return Err(DataLoadError::ConflictingFormats {
                a: existing,
                b: candidate,
            });
        }
        found = Some(candidate);
    }
    Ok(found)
}

/// Like [`find_data_file`], but a missing file is an error.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse_error(path: &Path, detail: impl ToString) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: detail.to_string(),
    }
}

/// Deserialize a list from a file. TOML files hold the array under
/// `toml_key` in a top-level table; RON and JSON hold a bare list.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => {
            let mut table: toml::Table =
                toml::from_str(&content).map_err(|e| parse_error(path, e))?;
            let array = table
                .remove(toml_key)
                .ok_or_else(|| parse_error(path, format!("missing key '{toml_key}' in TOML file")))?;
            array
                .try_into()
                .map_err(|e: toml::de::Error| parse_error(path, e))
        }
    }
}

// ===========================================================================
// Name resolution helpers
// ===========================================================================

/// Look up a name in a map, returning an `UnresolvedRef` error if not found.
pub fn resolve_name<'a, V>(
    map: &'a HashMap<String, V>,
    name: &str,
    file: &Path,
    expected_kind: &'static str,
) -> Result<&'a V, DataLoadError> {
    map.get(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: name.to_string(),
        expected_kind,
    })
}

/// Reject a name that is already in `map`.
pub fn check_duplicate<V>(
    map: &HashMap<String, V>,
    name: &str,
    file: &Path,
) -> Result<(), DataLoadError> {
    if map.contains_key(name) {
        return Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_string(),
        });
    }
    Ok(())
}

// ===========================================================================
// Catalog pipeline
// ===========================================================================

/// Converts data-file numbers for one named entry.
struct Numbers<'a> {
    file: &'a Path,
    name: &'a str,
}

impl Numbers<'_> {
    fn fixed(&self, field: &'static str, value: f64) -> Result<Fixed64, DataLoadError> {
        Fixed64::checked_from_num(value).ok_or_else(|| DataLoadError::OutOfRange {
            file: self.file.to_path_buf(),
            name: self.name.to_string(),
            field,
            value,
        })
    }
}

fn resolve_policy(policy: &PolicyData, num: &Numbers<'_>) -> Result<SupplyPolicy, DataLoadError> {
    Ok(match *policy {
        PolicyData::Boost {
            base_production,
            boost_multiplier,
            boost_threshold,
        } => SupplyPolicy::Boost {
            base_production: num.fixed("base_production", base_production)?,
            boost_multiplier: num.fixed("boost_multiplier", boost_multiplier)?,
            boost_threshold: num.fixed("boost_threshold", boost_threshold)?,
        },
        PolicyData::Assemble => SupplyPolicy::Assemble,
        PolicyData::Convert { boost_multiplier } => SupplyPolicy::Convert {
            boost_multiplier: num.fixed("boost_multiplier", boost_multiplier)?,
        },
    })
}

fn resolve_slots(
    slots: &[SlotData],
    cargo: &HashMap<String, CargoTypeId>,
    num: &Numbers<'_>,
) -> Result<Vec<(CargoTypeId, Fixed64)>, DataLoadError> {
    slots
        .iter()
        .map(|slot| {
            let id = *resolve_name(cargo, slot.cargo(), num.file, "cargo")?;
            Ok((id, num.fixed("weight", slot.weight())?))
        })
        .collect()
}

fn resolve_industry_type(
    data: &IndustryTypeData,
    cargo: &HashMap<String, CargoTypeId>,
    file: &Path,
) -> Result<IndustryType, DataLoadError> {
    let num = Numbers {
        file,
        name: &data.name,
    };
    let mut industry_type = IndustryType::new(&data.name, resolve_policy(&data.policy, &num)?)
        .with_spawner(&data.spawner)
        .with_reach(num.fixed("reach", data.reach)?);
    for (id, weight) in resolve_slots(&data.accepts, cargo, &num)? {
        industry_type = industry_type.accepting(id, weight);
    }
    for (id, weight) in resolve_slots(&data.supplies, cargo, &num)? {
        industry_type = industry_type.supplying(id, weight);
    }
    Ok(industry_type)
}

/// Load and validate the catalog held in `dir`.
///
/// Cargo types get ids in file order, then industry types do. Every cargo
/// name an industry references must be defined in the cargo file.
pub fn load_catalog(dir: &Path) -> Result<IndustryCatalog, DataLoadError> {
    let cargo_path = require_data_file(dir, CARGO_FILE)?;
    let industries_path = require_data_file(dir, INDUSTRIES_FILE)?;
    let cargo_data: Vec<CargoData> = deserialize_list(&cargo_path, "cargo")?;
    let industry_data: Vec<IndustryTypeData> = deserialize_list(&industries_path, "industries")?;

    let mut builder = CatalogBuilder::new();

    let mut cargo: HashMap<String, CargoTypeId> = HashMap::new();
    for entry in &cargo_data {
        check_duplicate(&cargo, &entry.name, &cargo_path)?;
        let id = builder.register_cargo(&entry.name);
        cargo.insert(entry.name.clone(), id);
    }

    let mut industries: HashMap<String, IndustryTypeId> = HashMap::new();
    for entry in &industry_data {
        check_duplicate(&industries, &entry.name, &industries_path)?;
        let industry_type = resolve_industry_type(entry, &cargo, &industries_path)?;
        let id = builder.register_industry_type(industry_type);
        industries.insert(entry.name.clone(), id);
    }

    let catalog = builder.build()?;
    tracing::info!(
        dir = %dir.display(),
        cargo = catalog.cargo_count(),
        industry_types = catalog.type_count(),
        "catalog loaded"
    );
    Ok(catalog)
}

// ===========================================================================
// Tests
// ===========================================================================
