//! # Simulation Components
//!
//! Plain data records attached to entities:
//!
//! - [`PhysicsBody`] - everything the integrator and collision resolver
//!   read and write
//! - [`CombatState`] - attack-recovery state; physics only consumes the
//!   swing cooldown counter to slow horizontal movement
//! - [`SpriteRef`] - renderable marker exposing the render query
//!
//! Components carry no behavior. Bodies are configured through
//! builder-style `with_*` setters mirroring how game objects are
//! assembled at spawn time.

use arena_core::{Component, Vec2};

use crate::listener::{Direction, ListenerId};

/// Physics state for one entity.
///
/// Mutated every substep by the physics system. All tunables are
/// per-body; the system-level constants (substep rate, displacement
/// clamp, collision precision) live in [`crate::config::SimConfig`].
#[derive(Clone, Copy, Debug)]
pub struct PhysicsBody {
    /// Center position of the body's AABB.
    pub position: Vec2,
    /// Current velocity (units per second).
    pub velocity: Vec2,
    /// Externally injected velocity overlay (knockback, explosions).
    ///
    /// Added into `velocity` each substep and decayed toward zero by
    /// `drag`; never reverses sign.
    pub sim_velocity: Vec2,
    /// Full extents of the AABB. Both components must be non-negative.
    pub size: Vec2,
    /// Horizontal speed while an intent flag is set (units per second).
    pub move_speed: f32,
    /// Upward velocity applied on jump start.
    pub jump_force: f32,
    /// Downward acceleration while `gravity_applied` is set.
    pub gravity: f32,
    /// Decay rate for `sim_velocity` (units per second per second).
    pub drag: f32,
    /// Parallax depth hint for the renderer; inert to physics.
    pub z_parallax: f32,
    /// Whether the entity moves by itself (intent flags, jumping, drag).
    pub movable: bool,
    /// Whether gravity acts on the body.
    pub gravity_applied: bool,
    /// Whether the body runs pairwise collision resolution as side A.
    pub process_collisions: bool,
    /// Ghosts are detected (listener still fires) but never physically
    /// resolved, and never block other bodies.
    pub ghost: bool,
    /// Whether the body is standing on something. Set exclusively by a
    /// DOWN-direction resolution; gates jumping.
    pub grounded: bool,
    /// Intent: move left this tick. Set by input/AI collaborators.
    pub moving_left: bool,
    /// Intent: move right this tick. Right wins when both are set.
    pub moving_right: bool,
    /// Intent: jump when grounded.
    pub jumping: bool,
    /// Facing memory: `true` if the last horizontal intent was leftward.
    pub moved_left_last: bool,
    /// Cooldown until the body may play a step sound again. Ticked down
    /// by the audio collaborator, carried here as data only.
    pub step_cd: f32,
    /// Optional collision listener handle. Non-owning; resolved against
    /// the gameplay layer's listener table at call time.
    pub listener: Option<ListenerId>,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            sim_velocity: Vec2::ZERO,
            size: Vec2::ZERO,
            move_speed: 15.0,
            jump_force: 35.0,
            gravity: 100.0,
            drag: 30.0,
            z_parallax: 1.0,
            movable: true,
            gravity_applied: true,
            process_collisions: true,
            ghost: false,
            grounded: true,
            moving_left: false,
            moving_right: false,
            jumping: false,
            moved_left_last: false,
            step_cd: 0.0,
            listener: None,
        }
    }
}

impl Component for PhysicsBody {
    const ID: u8 = 0;
}

impl PhysicsBody {
    /// Creates a body with default tunables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the AABB extents.
    #[must_use]
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = Vec2::new(width, height);
        self
    }

    /// Sets the center position.
    #[must_use]
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Vec2::new(x, y);
        self
    }

    /// Sets the velocity.
    #[must_use]
    pub fn with_velocity(mut self, x: f32, y: f32) -> Self {
        self.velocity = Vec2::new(x, y);
        self
    }

    /// Toggles whether the entity can move by itself.
    #[must_use]
    pub fn with_movable(mut self, movable: bool) -> Self {
        self.movable = movable;
        self
    }

    /// Toggles whether the entity is affected by gravity.
    #[must_use]
    pub fn with_gravity_applied(mut self, gravity_applied: bool) -> Self {
        self.gravity_applied = gravity_applied;
        self
    }

    /// Toggles whether the entity processes collisions.
    #[must_use]
    pub fn with_process_collisions(mut self, process_collisions: bool) -> Self {
        self.process_collisions = process_collisions;
        self
    }

    /// Toggles ghost mode (listener callbacks without physical response).
    #[must_use]
    pub fn with_ghost(mut self, ghost: bool) -> Self {
        self.ghost = ghost;
        self
    }

    /// Sets the horizontal movement speed.
    #[must_use]
    pub fn with_move_speed(mut self, move_speed: f32) -> Self {
        self.move_speed = move_speed;
        self
    }

    /// Sets the jump impulse.
    #[must_use]
    pub fn with_jump_force(mut self, jump_force: f32) -> Self {
        self.jump_force = jump_force;
        self
    }

    /// Sets the gravity acceleration.
    #[must_use]
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Sets the sim-velocity decay rate.
    #[must_use]
    pub fn with_drag(mut self, drag: f32) -> Self {
        self.drag = drag;
        self
    }

    /// Sets the parallax depth hint.
    #[must_use]
    pub fn with_z_parallax(mut self, z_parallax: f32) -> Self {
        self.z_parallax = z_parallax;
        self
    }

    /// Attaches a collision listener handle.
    #[must_use]
    pub fn with_listener(mut self, listener: ListenerId) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Sets the facing memory from a direction. Only `Left` and `Right`
    /// have an effect.
    pub fn set_facing(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.moved_left_last = true,
            Direction::Right => self.moved_left_last = false,
            _ => {}
        }
    }

    /// Returns the current facing.
    #[must_use]
    pub fn facing(&self) -> Direction {
        if self.moved_left_last {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    /// X coordinate of the left edge.
    #[inline]
    #[must_use]
    pub fn left_edge(&self) -> f32 {
        self.position.x - self.size.x / 2.0
    }

    /// X coordinate of the right edge.
    #[inline]
    #[must_use]
    pub fn right_edge(&self) -> f32 {
        self.position.x + self.size.x / 2.0
    }

    /// Y coordinate of the bottom edge.
    #[inline]
    #[must_use]
    pub fn bottom_edge(&self) -> f32 {
        self.position.y - self.size.y / 2.0
    }

    /// Y coordinate of the top edge.
    #[inline]
    #[must_use]
    pub fn top_edge(&self) -> f32 {
        self.position.y + self.size.y / 2.0
    }
}

/// Combat state for one entity.
///
/// Full combat logic lives with the combat collaborator; physics reads
/// and is slowed by `swing_cd_counter` only.
#[derive(Clone, Copy, Debug, Default)]
pub struct CombatState {
    /// Cooldown applied after a swing (seconds).
    pub swing_cd: f32,
    /// Remaining attack-recovery time. While nonzero, horizontal
    /// movement speed is halved.
    pub swing_cd_counter: f32,
}

impl Component for CombatState {
    const ID: u8 = 1;
}

/// Reference to a renderable sprite.
///
/// Entities holding both a `SpriteRef` and a `PhysicsBody` appear in
/// the render view; the body supplies placement, this supplies what to
/// draw.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpriteRef {
    /// Identifier of the sprite/animation the renderer should play.
    pub sprite_id: u32,
}

impl Component for SpriteRef {
    const ID: u8 = 2;
}
