//! # Entity Identity
//!
//! Entities are lightweight identifiers consisting of:
//! - An index into component arrays
//! - A generation counter for safe slot reuse
//!
//! An entity carries no data of its own; components attached through the
//! registry give it meaning.

use super::component::CapabilitySet;

/// Unique identifier for an entity.
///
/// The ID is split into two parts:
/// - Lower 32 bits: index into component arrays
/// - Upper 32 bits: generation counter for detecting stale references
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new entity ID from index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the index portion of the entity ID.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation portion of the entity ID.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Null/invalid entity ID.
    pub const NULL: Self = Self(u64::MAX);

    /// Checks if this entity ID is null/invalid.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NULL
    }
}

/// Registry bookkeeping for one entity slot.
///
/// Tracks whether the slot is occupied and which component types are
/// attached, as a capability bitmask.
#[derive(Clone, Copy, Debug)]
pub struct EntitySlot {
    /// The identifier currently occupying this slot.
    pub id: EntityId,
    /// Capability set of attached components.
    pub capabilities: CapabilitySet,
    /// Whether this slot is currently alive.
    pub alive: bool,
}

impl EntitySlot {
    /// Creates a freshly occupied slot with no components.
    #[inline]
    #[must_use]
    pub const fn occupied(id: EntityId) -> Self {
        Self {
            id,
            capabilities: CapabilitySet::EMPTY,
            alive: true,
        }
    }

    /// Creates a vacant slot.
    #[inline]
    #[must_use]
    pub const fn vacant() -> Self {
        Self {
            id: EntityId::NULL,
            capabilities: CapabilitySet::EMPTY,
            alive: false,
        }
    }
}

impl Default for EntitySlot {
    fn default() -> Self {
        Self::vacant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_roundtrip() {
        let id = EntityId::new(12345, 67890);
        assert_eq!(id.index(), 12345);
        assert_eq!(id.generation(), 67890);
        assert!(!id.is_null());
    }

    #[test]
    fn test_null_id() {
        assert!(EntityId::NULL.is_null());
        assert!(EntityId::default().is_null());
    }

    #[test]
    fn test_slot_states() {
        let slot = EntitySlot::vacant();
        assert!(!slot.alive);

        let slot = EntitySlot::occupied(EntityId::new(1, 1));
        assert!(slot.alive);
        assert!(slot.capabilities.is_empty());
    }
}
