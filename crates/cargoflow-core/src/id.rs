use serde::{Deserialize, Serialize};

/// Identifies a cargo type in the catalog. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CargoTypeId(pub u32);

/// Identifies an industry type definition in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IndustryTypeId(pub u32);

/// Dense index of a live industry instance in an [`IndustryStore`](crate::industry::IndustryStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IndustryId(pub u32);

/// Dense index of a live station in a [`StationStore`](crate::station::StationStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StationId(pub u32);

macro_rules! dense_index {
    ($($ty:ident),*) => {
        $(
            impl $ty {
                #[inline]
                pub fn index(self) -> usize {
                    self.0 as usize
                }
            }

            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "#{}", self.0)
                }
            }
        )*
    };
}

dense_index!(CargoTypeId, IndustryTypeId, IndustryId, StationId);

/// Where the cargo in a station load came from.
///
/// Produced cargo dispersed by an industry carries that industry as its
/// origin; cargo added without an explicit origin belongs to the station
/// it was added to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LoadOrigin {
    Industry(IndustryId),
    Station(StationId),
}
