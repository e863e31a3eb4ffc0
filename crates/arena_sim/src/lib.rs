//! # ARENA Simulation
//!
//! Deterministic 2D side-view physics and collision simulation on top
//! of the `arena_core` entity-component substrate.
//!
//! The pipeline per frame:
//!
//! 1. Collaborators write intent ([`SimWorld::set_move_intent`]) and
//!    impulses ([`SimWorld::set_sim_velocity`]).
//! 2. [`Simulation::advance`] cuts the frame into fixed substeps and,
//!    per body, integrates motion then resolves axis-aligned collisions
//!    pairwise, invoking [`CollisionListener`]s synchronously.
//! 3. Renderers read [`RenderView`] placements; audio drains
//!    [`Simulation::sound_events`].
//!
//! Everything is single-threaded and allocation-free inside the tick;
//! outbound events ride a bounded channel that drops rather than
//! blocks.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod components;
pub mod config;
pub mod events;
pub mod listener;
pub mod physics;
pub mod render;
pub mod simulation;
pub mod world;

pub use components::{CombatState, PhysicsBody, SpriteRef};
pub use config::{ConfigError, SimConfig};
pub use events::{EventReceiver, SimEvent, SoundKind};
pub use listener::{CollisionListener, Direction, ListenerId, ListenerTable};
pub use physics::{PhysicsSystem, TickStats};
pub use render::{debug_outline, RenderView, SpritePlacement};
pub use simulation::{DemoLevel, Simulation};
pub use world::SimWorld;
