//! # Simulation Orchestrator
//!
//! Owns the world, the physics system, the listener table, the render
//! view and the event bus, and drives them in order each frame. This is
//! the only type most embedders need to touch.

use arena_core::{EntityId, Vec2};
use tracing::info;

use crate::components::{CombatState, PhysicsBody, SpriteRef};
use crate::config::SimConfig;
use crate::events::{EventBus, EventReceiver};
use crate::listener::{CollisionListener, ListenerId, ListenerTable};
use crate::physics::{PhysicsSystem, TickStats};
use crate::render::RenderView;
use crate::world::SimWorld;

/// Entities created by [`Simulation::spawn_demo_level`].
#[derive(Clone, Copy, Debug)]
pub struct DemoLevel {
    /// The player-controlled body.
    pub player: EntityId,
    /// The floor slab.
    pub ground: EntityId,
    /// Left boundary wall.
    pub left_wall: EntityId,
    /// Right boundary wall.
    pub right_wall: EntityId,
}

/// A complete simulation instance.
pub struct Simulation {
    world: SimWorld,
    physics: PhysicsSystem,
    listeners: ListenerTable,
    render: RenderView,
    events: EventBus,
}

impl Simulation {
    /// Creates a simulation from a config.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        let mut world = SimWorld::new(config.entity_capacity);
        let events = EventBus::new(config.event_capacity);
        let physics = PhysicsSystem::new(&mut world, events.sender(), config.clone());
        let render = RenderView::new(&mut world);
        info!(
            capacity = config.entity_capacity,
            updates_per_second = config.updates_per_second,
            "simulation initialized"
        );
        Self {
            world,
            physics,
            listeners: ListenerTable::new(),
            render,
            events,
        }
    }

    /// Advances the simulation by `delta_time` seconds.
    pub fn advance(&mut self, delta_time: f32) -> TickStats {
        self.physics
            .update(&mut self.world, &mut self.listeners, delta_time)
    }

    /// The world, for spawning and queries.
    #[inline]
    #[must_use]
    pub fn world(&self) -> &SimWorld {
        &self.world
    }

    /// The world, mutably.
    #[inline]
    pub fn world_mut(&mut self) -> &mut SimWorld {
        &mut self.world
    }

    /// The render view over sprite-bearing bodies.
    #[inline]
    #[must_use]
    pub fn render_view(&self) -> &RenderView {
        &self.render
    }

    /// Registers a collision listener and returns its handle to store
    /// on bodies.
    pub fn register_listener(&mut self, listener: Box<dyn CollisionListener>) -> ListenerId {
        self.listeners.register(listener)
    }

    /// Unregisters a listener. Bodies still holding the handle fall
    /// back to no-op dispatch.
    pub fn unregister_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.unregister(id).is_some()
    }

    /// A receiver for outbound events (sound requests).
    #[must_use]
    pub fn sound_events(&self) -> EventReceiver {
        self.events.receiver()
    }

    /// Spawns the stock test arena: a floor slab, two boundary walls
    /// and a player standing between them.
    pub fn spawn_demo_level(&mut self) -> DemoLevel {
        let player = self.world.spawn();
        self.world.add_body(
            player,
            PhysicsBody::new().with_size(4.0, 4.0).with_position(0.0, 0.0),
        );
        self.world.add_combat(player, CombatState::default());
        self.world.add_sprite(player, SpriteRef { sprite_id: 0 });

        let ground = self.world.spawn();
        self.world.add_body(
            ground,
            PhysicsBody::new()
                .with_size(16.0, 4.0)
                .with_position(-2.5, -5.0)
                .with_movable(false)
                .with_gravity_applied(false),
        );

        let left_wall = self.world.spawn();
        self.world.add_body(
            left_wall,
            PhysicsBody::new()
                .with_size(4.0, 4.0)
                .with_position(-5.0, 0.0)
                .with_movable(false)
                .with_gravity_applied(false),
        );

        let right_wall = self.world.spawn();
        self.world.add_body(
            right_wall,
            PhysicsBody::new()
                .with_size(4.0, 4.0)
                .with_position(5.0, 0.0)
                .with_movable(false)
                .with_gravity_applied(false),
        );

        info!(
            ?player,
            ?ground,
            "demo level spawned"
        );
        DemoLevel {
            player,
            ground,
            left_wall,
            right_wall,
        }
    }

    /// Applies a knockback impulse to an entity.
    pub fn apply_impulse(&mut self, entity: EntityId, impulse: Vec2) -> bool {
        self.world.set_sim_velocity(entity, impulse)
    }
}
