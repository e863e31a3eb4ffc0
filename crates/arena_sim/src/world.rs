//! # Simulation World
//!
//! Composes the [`EntityRegistry`] with one [`ComponentStorage`] per
//! component type. All structural changes go through this type so the
//! registry's capability masks and family caches stay in lockstep with
//! the storages.
//!
//! Component getters check the capability mask first: an entity in a
//! query set that lacks an expected component (e.g. a body without
//! combat state) reads as "component absent", a valid null case rather
//! than an error.

use arena_core::{
    CapabilitySet, Component, ComponentStorage, EntityId, EntityRegistry, FamilyHandle, Vec2,
};

use crate::components::{CombatState, PhysicsBody, SpriteRef};

/// The simulation world: entity registry plus component storages.
///
/// Single-threaded mutable state scoped to one simulation instance.
pub struct SimWorld {
    registry: EntityRegistry,
    bodies: ComponentStorage<PhysicsBody>,
    combat: ComponentStorage<CombatState>,
    sprites: ComponentStorage<SpriteRef>,
}

impl SimWorld {
    /// Creates a world with the given entity capacity.
    ///
    /// All storage is pre-allocated here; nothing allocates during a
    /// tick.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero or exceeds `u32::MAX`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            registry: EntityRegistry::new(capacity),
            bodies: ComponentStorage::new(capacity),
            combat: ComponentStorage::new(capacity),
            sprites: ComponentStorage::new(capacity),
        }
    }

    // -------------------------------------------------------------------------
    // Entity lifecycle
    // -------------------------------------------------------------------------

    /// Spawns a new entity with no components.
    ///
    /// Returns [`EntityId::NULL`] if the world is at capacity.
    #[inline]
    pub fn spawn(&mut self) -> EntityId {
        self.registry.spawn()
    }

    /// Despawns an entity, removing all its components.
    ///
    /// Every family loses the entity before this call returns.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        if !self.registry.despawn(id) {
            return false;
        }
        let idx = id.index() as usize;
        self.bodies.reset(idx);
        self.combat.reset(idx);
        self.sprites.reset(idx);
        true
    }

    /// Checks if an entity is alive.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.registry.is_alive(id)
    }

    /// Returns the number of currently alive entities.
    #[inline]
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.registry.alive_count()
    }

    // -------------------------------------------------------------------------
    // Families (capability-set queries)
    // -------------------------------------------------------------------------

    /// Registers a family and returns its handle.
    #[inline]
    pub fn register_family(&mut self, required: CapabilitySet) -> FamilyHandle {
        self.registry.register_family(required)
    }

    /// Returns the current members of a family.
    #[inline]
    #[must_use]
    pub fn family_members(&self, handle: FamilyHandle) -> &[EntityId] {
        self.registry.family_members(handle)
    }

    /// Returns the number of members currently in a family.
    #[inline]
    #[must_use]
    pub fn family_len(&self, handle: FamilyHandle) -> usize {
        self.registry.family_len(handle)
    }

    /// Returns the member at `index`, or `None` if membership changed
    /// under the caller's feet.
    #[inline]
    #[must_use]
    pub fn family_member(&self, handle: FamilyHandle, index: usize) -> Option<EntityId> {
        self.registry.family_member(handle, index)
    }

    // -------------------------------------------------------------------------
    // PhysicsBody
    // -------------------------------------------------------------------------

    /// Attaches a physics body to an entity.
    ///
    /// Returns `false` if the entity is dead or already has a body; an
    /// entity has at most one component per type.
    pub fn add_body(&mut self, id: EntityId, body: PhysicsBody) -> bool {
        if !self.registry.add_capability(id, PhysicsBody::ID) {
            return false;
        }
        self.bodies.set(id.index() as usize, body)
    }

    /// Reads an entity's physics body, if attached.
    #[inline]
    #[must_use]
    pub fn body(&self, id: EntityId) -> Option<&PhysicsBody> {
        self.component(id, &self.bodies)
    }

    /// Mutably borrows an entity's physics body, if attached.
    #[inline]
    pub fn body_mut(&mut self, id: EntityId) -> Option<&mut PhysicsBody> {
        if !self.has_component::<PhysicsBody>(id) {
            return None;
        }
        self.bodies.get_mut(id.index() as usize)
    }

    /// Detaches an entity's physics body.
    pub fn remove_body(&mut self, id: EntityId) -> bool {
        if !self.registry.remove_capability(id, PhysicsBody::ID) {
            return false;
        }
        self.bodies.reset(id.index() as usize);
        true
    }

    // -------------------------------------------------------------------------
    // CombatState
    // -------------------------------------------------------------------------

    /// Attaches combat state to an entity.
    pub fn add_combat(&mut self, id: EntityId, state: CombatState) -> bool {
        if !self.registry.add_capability(id, CombatState::ID) {
            return false;
        }
        self.combat.set(id.index() as usize, state)
    }

    /// Reads an entity's combat state, if attached.
    #[inline]
    #[must_use]
    pub fn combat(&self, id: EntityId) -> Option<&CombatState> {
        self.component(id, &self.combat)
    }

    /// Mutably borrows an entity's combat state, if attached.
    #[inline]
    pub fn combat_mut(&mut self, id: EntityId) -> Option<&mut CombatState> {
        if !self.has_component::<CombatState>(id) {
            return None;
        }
        self.combat.get_mut(id.index() as usize)
    }

    /// Detaches an entity's combat state.
    pub fn remove_combat(&mut self, id: EntityId) -> bool {
        if !self.registry.remove_capability(id, CombatState::ID) {
            return false;
        }
        self.combat.reset(id.index() as usize);
        true
    }

    // -------------------------------------------------------------------------
    // SpriteRef
    // -------------------------------------------------------------------------

    /// Attaches a sprite reference to an entity.
    pub fn add_sprite(&mut self, id: EntityId, sprite: SpriteRef) -> bool {
        if !self.registry.add_capability(id, SpriteRef::ID) {
            return false;
        }
        self.sprites.set(id.index() as usize, sprite)
    }

    /// Reads an entity's sprite reference, if attached.
    #[inline]
    #[must_use]
    pub fn sprite(&self, id: EntityId) -> Option<&SpriteRef> {
        self.component(id, &self.sprites)
    }

    /// Detaches an entity's sprite reference.
    pub fn remove_sprite(&mut self, id: EntityId) -> bool {
        if !self.registry.remove_capability(id, SpriteRef::ID) {
            return false;
        }
        self.sprites.reset(id.index() as usize);
        true
    }

    // -------------------------------------------------------------------------
    // Collaborator channels
    // -------------------------------------------------------------------------

    /// Fire-and-forget impulse channel: overwrites the body's
    /// self-decaying velocity overlay (knockback, explosions).
    ///
    /// Returns `false` if the entity has no body.
    pub fn set_sim_velocity(&mut self, id: EntityId, sim_velocity: Vec2) -> bool {
        match self.body_mut(id) {
            Some(body) => {
                body.sim_velocity = sim_velocity;
                true
            }
            None => false,
        }
    }

    /// Sets the per-tick movement intent flags consumed by physics.
    ///
    /// Input and AI collaborators call this; the flags persist until
    /// overwritten.
    pub fn set_move_intent(
        &mut self,
        id: EntityId,
        moving_left: bool,
        moving_right: bool,
        jumping: bool,
    ) -> bool {
        match self.body_mut(id) {
            Some(body) => {
                body.moving_left = moving_left;
                body.moving_right = moving_right;
                body.jumping = jumping;
                true
            }
            None => false,
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    #[inline]
    fn has_component<C: Component>(&self, id: EntityId) -> bool {
        self.registry
            .capabilities(id)
            .is_some_and(|caps| caps.contains_id(C::ID))
    }

    #[inline]
    fn component<'a, C: Component>(
        &self,
        id: EntityId,
        storage: &'a ComponentStorage<C>,
    ) -> Option<&'a C> {
        if !self.has_component::<C>(id) {
            return None;
        }
        storage.get(id.index() as usize)
    }
}
