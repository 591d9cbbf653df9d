//! Data-driven catalog loading for Cargoflow.
//!
//! A data directory holds `cargo.{ron,toml,json}` and
//! `industries.{ron,toml,json}`. [`load_catalog`] reads both, resolves cargo
//! names, and hands back a validated
//! [`IndustryCatalog`](cargoflow_core::catalog::IndustryCatalog).

pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, load_catalog};
