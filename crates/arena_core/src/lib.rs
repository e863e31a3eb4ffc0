//! # ARENA Core
//!
//! Entity/component substrate for the ARENA 2D simulation:
//!
//! - Entities are opaque identifiers with no intrinsic data
//! - Components are plain data records attached to entities
//! - Systems enumerate entities through cached capability-set queries
//!   ("families") that are kept in sync with the registry on every
//!   structural change, never recomputed per tick
//!
//! ## Architecture Rules
//!
//! 1. **No heap allocations in the tick** - storage is pre-allocated
//! 2. **Data-oriented design** - components live in contiguous arrays
//! 3. **Membership changes are synchronous** - a stale family cache is a
//!    correctness bug, not a performance trade-off

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod ecs;
pub mod math;

pub use ecs::{
    CapabilitySet, Component, ComponentStorage, EntityId, EntityRegistry, EntitySlot,
    FamilyHandle,
};
pub use math::Vec2;
