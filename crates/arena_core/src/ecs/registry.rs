//! # Entity Registry
//!
//! Owns entity identities and their capability masks, and maintains the
//! cached capability-set queries ("families") that systems iterate.
//!
//! ## Membership Notification
//!
//! Every structural change - spawn, despawn, capability add or remove -
//! updates all registered family caches **synchronously, inside the
//! mutating call**. Systems therefore always observe a member list that
//! reflects the registry as of the last structural change. There is no
//! deferred or batched recompute; a stale cache is a correctness bug
//! because both integration and collision depend on iterating current
//! membership.
//!
//! Despite the synchronous caches, an entity may still be despawned
//! *while a system is iterating* (e.g. destroyed by its own collision
//! handler). That mutation is tolerated, not prevented: iteration is
//! index-based and bounds-checked, and callers recover locally from an
//! index that has gone stale mid-loop.

use tracing::trace;

use super::component::CapabilitySet;
use super::entity::{EntityId, EntitySlot};

/// Handle to a registered family (cached capability-set query).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FamilyHandle(usize);

/// A cached query: the ordered list of entities whose capability set
/// contains the required set.
struct Family {
    /// Required capability set.
    required: CapabilitySet,
    /// Current members, in the order they became matching.
    members: Vec<EntityId>,
}

impl Family {
    fn matches(&self, capabilities: CapabilitySet) -> bool {
        capabilities.contains_all(self.required)
    }
}

/// The entity registry: slot allocation, capability tracking and family
/// maintenance.
///
/// All slot memory is pre-allocated at creation; spawn and despawn reuse
/// slots through a free list, with a generation counter invalidating
/// stale [`EntityId`]s.
pub struct EntityRegistry {
    /// All entity slots (pre-allocated).
    slots: Box<[EntitySlot]>,
    /// Free list of slot indices for reuse.
    free_indices: Vec<u32>,
    /// Number of currently alive entities.
    alive_count: usize,
    /// Registered families.
    families: Vec<Family>,
}

impl EntityRegistry {
    /// Creates a new registry with the specified entity capacity.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero or exceeds `u32::MAX`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        assert!(
            capacity <= u32::MAX as usize,
            "Capacity cannot exceed u32::MAX"
        );

        let slots = (0..capacity)
            .map(|_| EntitySlot::vacant())
            .collect::<Vec<_>>()
            .into_boxed_slice();
        let free_indices: Vec<u32> = (0..capacity as u32).rev().collect();

        Self {
            slots,
            free_indices,
            alive_count: 0,
            families: Vec::new(),
        }
    }

    /// Returns the maximum capacity of this registry.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of currently alive entities.
    #[inline]
    #[must_use]
    pub const fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Spawns a new entity with no components, returning its ID.
    ///
    /// Reuses a pre-allocated slot; returns [`EntityId::NULL`] if the
    /// registry is at capacity.
    #[inline]
    pub fn spawn(&mut self) -> EntityId {
        let Some(index) = self.free_indices.pop() else {
            return EntityId::NULL;
        };

        let idx = index as usize;
        let slot = &mut self.slots[idx];

        // Increment generation to invalidate old references to this slot.
        let generation = slot.id.generation().wrapping_add(1);
        let new_id = EntityId::new(index, generation);

        *slot = EntitySlot::occupied(new_id);
        self.alive_count += 1;

        // A fresh entity has an empty capability set, so it cannot match
        // any family; no membership update is needed here.
        new_id
    }

    /// Despawns an entity, freeing its slot for reuse.
    ///
    /// The entity leaves every family it was a member of before this
    /// call returns. Component storages are *not* touched; the owning
    /// world resets them.
    ///
    /// # Returns
    ///
    /// `true` if the entity was despawned, `false` if it was already
    /// dead or the ID was stale/invalid.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        let Some(idx) = self.live_index(id) else {
            return false;
        };

        self.slots[idx].alive = false;
        self.slots[idx].capabilities = CapabilitySet::EMPTY;
        self.alive_count -= 1;
        self.free_indices.push(id.index());

        for family in &mut self.families {
            if let Some(pos) = family.members.iter().position(|&m| m == id) {
                family.members.remove(pos);
            }
        }

        true
    }

    /// Checks if an entity is alive.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.live_index(id).is_some()
    }

    /// Returns the capability set of an entity, or `None` if it is dead.
    #[inline]
    #[must_use]
    pub fn capabilities(&self, id: EntityId) -> Option<CapabilitySet> {
        self.live_index(id).map(|idx| self.slots[idx].capabilities)
    }

    /// Records that a component type was attached to an entity.
    ///
    /// Families whose required set becomes satisfied gain the entity at
    /// the end of their member list, synchronously.
    ///
    /// # Returns
    ///
    /// `true` if the capability was newly added, `false` if the entity
    /// is dead or already had it.
    pub fn add_capability(&mut self, id: EntityId, component_id: u8) -> bool {
        let Some(idx) = self.live_index(id) else {
            return false;
        };
        if self.slots[idx].capabilities.contains_id(component_id) {
            return false;
        }

        let before = self.slots[idx].capabilities;
        self.slots[idx].capabilities.insert(component_id);
        let after = self.slots[idx].capabilities;

        for family in &mut self.families {
            if !family.matches(before) && family.matches(after) {
                family.members.push(id);
            }
        }
        true
    }

    /// Records that a component type was detached from an entity.
    ///
    /// Families whose required set is no longer satisfied lose the
    /// entity, synchronously.
    ///
    /// # Returns
    ///
    /// `true` if the capability was removed, `false` if the entity is
    /// dead or did not have it.
    pub fn remove_capability(&mut self, id: EntityId, component_id: u8) -> bool {
        let Some(idx) = self.live_index(id) else {
            return false;
        };
        if !self.slots[idx].capabilities.contains_id(component_id) {
            return false;
        }

        let before = self.slots[idx].capabilities;
        self.slots[idx].capabilities.remove(component_id);
        let after = self.slots[idx].capabilities;

        for family in &mut self.families {
            if family.matches(before) && !family.matches(after) {
                if let Some(pos) = family.members.iter().position(|&m| m == id) {
                    family.members.remove(pos);
                }
            }
        }
        true
    }

    /// Registers a family for the given capability set and returns a
    /// handle for member access.
    ///
    /// The member list is seeded from currently alive entities in slot
    /// order; afterwards it is maintained incrementally, entities
    /// appended in the order they become matching.
    ///
    /// # Panics
    ///
    /// Panics if `required` is empty (an empty query would match every
    /// entity and is never what a system wants).
    pub fn register_family(&mut self, required: CapabilitySet) -> FamilyHandle {
        assert!(
            !required.is_empty(),
            "a family must require at least one capability"
        );

        let members: Vec<EntityId> = self
            .slots
            .iter()
            .filter(|slot| slot.alive && slot.capabilities.contains_all(required))
            .map(|slot| slot.id)
            .collect();

        trace!(
            members = members.len(),
            "registered family for capability set {required:?}"
        );

        self.families.push(Family { required, members });
        FamilyHandle(self.families.len() - 1)
    }

    /// Returns the current members of a family.
    ///
    /// The slice reflects the registry as of the last structural change.
    #[inline]
    #[must_use]
    pub fn family_members(&self, handle: FamilyHandle) -> &[EntityId] {
        &self.families[handle.0].members
    }

    /// Returns the number of members currently in a family.
    #[inline]
    #[must_use]
    pub fn family_len(&self, handle: FamilyHandle) -> usize {
        self.families[handle.0].members.len()
    }

    /// Returns the member at `index`, or `None` if the index has gone
    /// stale because membership changed mid-iteration.
    #[inline]
    #[must_use]
    pub fn family_member(&self, handle: FamilyHandle, index: usize) -> Option<EntityId> {
        self.families[handle.0].members.get(index).copied()
    }

    /// Resolves an ID to its slot index, checking liveness and generation.
    #[inline]
    fn live_index(&self, id: EntityId) -> Option<usize> {
        if id.is_null() {
            return None;
        }
        let idx = id.index() as usize;
        let slot = self.slots.get(idx)?;
        if slot.alive && slot.id.generation() == id.generation() {
            Some(idx)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::Component;

    #[derive(Clone, Copy, Default)]
    struct Body;
    impl Component for Body {
        const ID: u8 = 0;
    }

    #[derive(Clone, Copy, Default)]
    struct Sprite;
    impl Component for Sprite {
        const ID: u8 = 1;
    }

    #[test]
    fn test_spawn_despawn_recycles_slots() {
        let mut registry = EntityRegistry::new(8);

        let a = registry.spawn();
        assert!(!a.is_null());
        assert!(registry.is_alive(a));
        assert_eq!(registry.alive_count(), 1);

        assert!(registry.despawn(a));
        assert!(!registry.is_alive(a));
        assert_eq!(registry.alive_count(), 0);

        // The slot is reused with a bumped generation.
        let b = registry.spawn();
        assert_eq!(b.index(), a.index());
        assert_ne!(b.generation(), a.generation());
        assert!(!registry.is_alive(a));
        assert!(registry.is_alive(b));
    }

    #[test]
    fn test_spawn_returns_null_at_capacity() {
        let mut registry = EntityRegistry::new(2);
        assert!(!registry.spawn().is_null());
        assert!(!registry.spawn().is_null());
        assert!(registry.spawn().is_null());
    }

    #[test]
    fn test_family_gains_member_on_capability_add() {
        let mut registry = EntityRegistry::new(8);
        let family = registry.register_family(CapabilitySet::of::<Body>());

        let e = registry.spawn();
        assert!(registry.family_members(family).is_empty());

        assert!(registry.add_capability(e, Body::ID));
        assert_eq!(registry.family_members(family), &[e]);

        // Adding the same capability twice is a no-op.
        assert!(!registry.add_capability(e, Body::ID));
        assert_eq!(registry.family_len(family), 1);
    }

    #[test]
    fn test_family_loses_member_synchronously() {
        let mut registry = EntityRegistry::new(8);
        let family = registry.register_family(CapabilitySet::of::<Body>());

        let a = registry.spawn();
        let b = registry.spawn();
        registry.add_capability(a, Body::ID);
        registry.add_capability(b, Body::ID);
        assert_eq!(registry.family_members(family), &[a, b]);

        registry.despawn(a);
        assert_eq!(registry.family_members(family), &[b]);

        registry.remove_capability(b, Body::ID);
        assert!(registry.family_members(family).is_empty());
    }

    #[test]
    fn test_family_requires_all_capabilities() {
        let mut registry = EntityRegistry::new(8);
        let renderable = registry.register_family(CapabilitySet::of::<Body>().with::<Sprite>());

        let e = registry.spawn();
        registry.add_capability(e, Body::ID);
        assert!(registry.family_members(renderable).is_empty());

        registry.add_capability(e, Sprite::ID);
        assert_eq!(registry.family_members(renderable), &[e]);

        registry.remove_capability(e, Body::ID);
        assert!(registry.family_members(renderable).is_empty());
    }

    #[test]
    fn test_family_registered_late_is_seeded() {
        let mut registry = EntityRegistry::new(8);
        let a = registry.spawn();
        let b = registry.spawn();
        registry.add_capability(a, Body::ID);
        registry.add_capability(b, Body::ID);

        let family = registry.register_family(CapabilitySet::of::<Body>());
        assert_eq!(registry.family_members(family), &[a, b]);
    }

    #[test]
    fn test_stale_index_access_returns_none() {
        let mut registry = EntityRegistry::new(8);
        let family = registry.register_family(CapabilitySet::of::<Body>());

        let e = registry.spawn();
        registry.add_capability(e, Body::ID);
        assert!(registry.family_member(family, 0).is_some());

        registry.despawn(e);
        assert!(registry.family_member(family, 0).is_none());
    }
}
