//! Industry instances and the arena that owns them.
//!
//! Industries are addressed by dense [`IndustryId`]s handed out in spawn
//! order. Ids are never reused and the arena never reorders, so an id stays
//! valid for the lifetime of the store.

use crate::catalog::{IndustryCatalog, MAX_INDUSTRY_SLOTS};
use crate::error::{EntityRef, SimError, StoreKind, check_amount};
use crate::fixed::{Fixed64, Position, clamped_ratio};
use crate::id::{IndustryId, IndustryTypeId};

/// Maximum number of industries in a world.
pub const MAX_INDUSTRIES: usize = 128;

/// Per-slot values, one entry per accept or supply slot of the industry's type.
pub type SlotValues = [Fixed64; MAX_INDUSTRY_SLOTS];

const EMPTY: SlotValues = [Fixed64::ZERO; MAX_INDUSTRY_SLOTS];

// ---------------------------------------------------------------------------
// Industry
// ---------------------------------------------------------------------------

/// An industry somewhere in the world.
///
/// Material is grouped by accept slot of the industry's type. Production
/// statistics are grouped by supply slot and cover the current period only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Industry {
    type_id: IndustryTypeId,
    position: Position,
    material: SlotValues,
    material_total: Fixed64,
    produced: SlotValues,
    delivered: SlotValues,
    transported: SlotValues,
}

impl Industry {
    fn new(type_id: IndustryTypeId, position: Position) -> Self {
        Self {
            type_id,
            position,
            material: EMPTY,
            material_total: Fixed64::ZERO,
            produced: EMPTY,
            delivered: EMPTY,
            transported: EMPTY,
        }
    }

    pub fn type_id(&self) -> IndustryTypeId {
        self.type_id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Material Units accumulated in one accept slot. Zero for unused slots.
    pub fn material(&self, slot: usize) -> Fixed64 {
        self.material.get(slot).copied().unwrap_or(Fixed64::ZERO)
    }

    pub fn materials(&self) -> &SlotValues {
        &self.material
    }

    /// Sum of all accumulated material.
    pub fn material_total(&self) -> Fixed64 {
        self.material_total
    }

    /// Cargo Units produced this period for one supply slot.
    pub fn produced(&self, slot: usize) -> Fixed64 {
        self.produced.get(slot).copied().unwrap_or(Fixed64::ZERO)
    }

    /// Cargo Units of this period's production that reached a station.
    pub fn delivered(&self, slot: usize) -> Fixed64 {
        self.delivered.get(slot).copied().unwrap_or(Fixed64::ZERO)
    }

    /// Fraction in `[0, 1]` of this period's production that reached a station.
    pub fn transported(&self, slot: usize) -> Fixed64 {
        self.transported.get(slot).copied().unwrap_or(Fixed64::ZERO)
    }

    /// Whether `amount` more Material Units fit in `slot` and in the total.
    pub(crate) fn fits_material(&self, slot: usize, amount: Fixed64) -> bool {
        self.material
            .get(slot)
            .and_then(|m| m.checked_add(amount))
            .is_some()
            && self.material_total.checked_add(amount).is_some()
    }

    /// Add to one slot. Leaves the industry untouched and returns `None`
    /// when the slot or the total would overflow.
    pub(crate) fn add_material(&mut self, slot: usize, amount: Fixed64) -> Option<()> {
        let slot_value = self.material.get(slot)?.checked_add(amount)?;
        let total = self.material_total.checked_add(amount)?;
        self.material[slot] = slot_value;
        self.material_total = total;
        Some(())
    }

    /// Subtract per-slot amounts, never going below zero. The total drops
    /// by exactly what left the slots.
    pub(crate) fn drain(&mut self, amounts: &SlotValues) {
        for (have, take) in self.material.iter_mut().zip(amounts) {
            let taken = (*take).clamp(Fixed64::ZERO, *have);
            *have -= taken;
            self.material_total -= taken;
        }
    }

    pub(crate) fn record_output(&mut self, slot: usize, generated: Fixed64, delivered: Fixed64) {
        self.produced[slot] = self.produced[slot].saturating_add(generated);
        self.delivered[slot] = self.delivered[slot].saturating_add(delivered);
        if self.produced[slot] > Fixed64::ZERO {
            self.transported[slot] = clamped_ratio(self.delivered[slot], self.produced[slot]);
        }
    }

    fn reset_period_stats(&mut self) {
        self.produced = EMPTY;
        self.delivered = EMPTY;
        self.transported = EMPTY;
    }
}

// ---------------------------------------------------------------------------
// IndustryStore
// ---------------------------------------------------------------------------

/// Fixed-capacity arena of industries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndustryStore {
    industries: Vec<Industry>,
    capacity: usize,
}

impl Default for IndustryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IndustryStore {
    pub fn new() -> Self {
        Self::with_capacity(MAX_INDUSTRIES)
    }

    /// A store holding at most `capacity` industries (never more than
    /// [`MAX_INDUSTRIES`]).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(MAX_INDUSTRIES);
        Self {
            industries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Place a new industry of the given type. The type must exist in
    /// `catalog`.
    pub fn spawn(
        &mut self,
        catalog: &IndustryCatalog,
        type_id: IndustryTypeId,
        position: Position,
    ) -> Result<IndustryId, SimError> {
        if catalog.get(type_id).is_none() {
            return Err(SimError::BadType(type_id).reported());
        }
        if self.industries.len() >= self.capacity {
            return Err(SimError::StoreFull {
                kind: StoreKind::Industries,
                capacity: self.capacity,
            }
            .reported());
        }
        let id = IndustryId(self.industries.len() as u32);
        self.industries.push(Industry::new(type_id, position));
        tracing::debug!(industry = %id, industry_type = %type_id, "industry spawned");
        Ok(id)
    }

    /// Whether `id` refers to a live industry.
    pub fn contains(&self, id: IndustryId) -> bool {
        id.index() < self.industries.len()
    }

    pub fn get(&self, id: IndustryId) -> Option<&Industry> {
        self.industries.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: IndustryId) -> Option<&mut Industry> {
        self.industries.get_mut(id.index())
    }

    /// Look up a live industry or fail with `BadIndex`.
    pub(crate) fn require(&self, id: IndustryId) -> Result<&Industry, SimError> {
        self.get(id)
            .ok_or_else(|| SimError::BadIndex(EntityRef::Industry(id)).reported())
    }

    pub fn len(&self) -> usize {
        self.industries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.industries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ids(&self) -> impl Iterator<Item = IndustryId> {
        (0..self.industries.len() as u32).map(IndustryId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (IndustryId, &Industry)> {
        self.industries
            .iter()
            .enumerate()
            .map(|(i, ind)| (IndustryId(i as u32), ind))
    }

    /// Supply cargo into an industry's accept slot.
    ///
    /// `slot` indexes the type's accept list, not a cargo type; resolve the
    /// cargo with [`IndustryType::accept_slot`](crate::catalog::IndustryType::accept_slot)
    /// first. Adds `amount × weight` Material Units. Production only happens
    /// at period boundaries, never here.
    pub fn accept_cargo(
        &mut self,
        catalog: &IndustryCatalog,
        id: IndustryId,
        slot: usize,
        amount: Fixed64,
    ) -> Result<(), SimError> {
        let material = self.prepare_accept(catalog, id, slot, amount)?;
        self.get_mut(id)
            .and_then(|industry| industry.add_material(slot, material))
            .ok_or_else(|| SimError::Overflow(EntityRef::Industry(id)).reported())?;
        tracing::trace!(industry = %id, slot, %material, "material accepted");
        Ok(())
    }

    /// Run every check of [`accept_cargo`](Self::accept_cargo) without
    /// mutating, and return the Material Units the call would add.
    pub(crate) fn prepare_accept(
        &self,
        catalog: &IndustryCatalog,
        id: IndustryId,
        slot: usize,
        amount: Fixed64,
    ) -> Result<Fixed64, SimError> {
        let industry = self.require(id)?;
        let type_id = industry.type_id;
        let industry_type = catalog
            .get(type_id)
            .ok_or_else(|| SimError::BadType(type_id).reported())?;
        let accept = industry_type.accepts.get(slot).ok_or_else(|| {
            SimError::BadAccept {
                industry_type: type_id,
                slot,
            }
            .reported()
        })?;
        check_amount(amount)?;

        amount
            .checked_mul(accept.weight)
            .filter(|material| industry.fits_material(slot, *material))
            .ok_or_else(|| SimError::Overflow(EntityRef::Industry(id)).reported())
    }

    /// Clear `produced` and `transported` on every industry. Called by the
    /// period driver after reporting has read them.
    pub fn reset_period_stats(&mut self) {
        for industry in &mut self.industries {
            industry.reset_period_stats();
        }
    }
}
