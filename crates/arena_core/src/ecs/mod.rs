//! # Entity Component System
//!
//! A pre-allocated entity/component substrate.
//!
//! ## Design Philosophy
//!
//! - All storage is pre-allocated at registry creation
//! - Components are stored in dense arrays for cache efficiency
//! - Entity IDs are simple indices with generation counters
//! - Capability-set queries are cached and maintained synchronously on
//!   every structural change

mod component;
mod entity;
mod registry;
mod storage;

pub use component::{CapabilitySet, Component};
pub use entity::{EntityId, EntitySlot};
pub use registry::{EntityRegistry, FamilyHandle};
pub use storage::ComponentStorage;
