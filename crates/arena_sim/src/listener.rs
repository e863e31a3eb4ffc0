//! # Collision Listener Contract
//!
//! Gameplay reacts to collisions through [`CollisionListener`] callbacks,
//! invoked synchronously inside pairwise resolution. A listener may fire
//! multiple times per substep for one body: once per qualifying edge,
//! plus a [`Direction::Centre`] fallback when the overlap is too deep or
//! symmetric to attribute to an edge.
//!
//! The physics body stores only a [`ListenerId`]; the boxed listener
//! lives in a [`ListenerTable`] owned by the gameplay layer and is
//! looked up at call time. A body pointing at an unregistered ID is a
//! silent no-op, which gives the link weak-reference semantics: physics
//! neither owns the listener nor manages its lifecycle.

use std::collections::HashMap;

use arena_core::EntityId;
use tracing::trace;

use crate::world::SimWorld;

/// The side of a body on which a collision was detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// The body's left edge met the other body's right edge.
    Left,
    /// The body's right edge met the other body's left edge.
    Right,
    /// The body's bottom edge met the other body's top edge.
    Down,
    /// The body's top edge met the other body's bottom edge.
    Up,
    /// Overlap too deep or symmetric to resolve to an edge.
    Centre,
}

impl Direction {
    /// Returns the opposite direction. `Centre` is its own opposite.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Up => Self::Down,
            Self::Centre => Self::Centre,
        }
    }
}

/// Callback contract for collision reactions.
///
/// Invoked zero or more times per substep with no batching or
/// deduplication. Implementations must not assume any ordering relative
/// to the symmetric pair's own resolution call; the (A,B) and (B,A)
/// passes are separate calls in the same inner loop and each observes
/// the other's already-applied mutations.
///
/// The callback receives mutable world access and may perform structural
/// changes, including despawning either entity; the physics loop
/// tolerates that and recovers locally.
pub trait CollisionListener: Send {
    /// Reacts to a collision on `direction` side of `this`.
    fn on_collision(
        &mut self,
        world: &mut SimWorld,
        direction: Direction,
        this: EntityId,
        other: EntityId,
    );
}

/// Handle to a listener registered in a [`ListenerTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

/// Registry of collision listeners, keyed by [`ListenerId`].
///
/// Dispatch looks the listener up at call time; a missing entry means
/// the gameplay layer already dropped it and the event is discarded.
#[derive(Default)]
pub struct ListenerTable {
    entries: HashMap<u32, Box<dyn CollisionListener>>,
    next_id: u32,
}

impl ListenerTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener and returns its handle.
    pub fn register(&mut self, listener: Box<dyn CollisionListener>) -> ListenerId {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.insert(id, listener);
        ListenerId(id)
    }

    /// Removes a listener, returning it if it was registered.
    pub fn unregister(&mut self, id: ListenerId) -> Option<Box<dyn CollisionListener>> {
        self.entries.remove(&id.0)
    }

    /// Checks whether a listener is currently registered.
    #[must_use]
    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.contains_key(&id.0)
    }

    /// Dispatches a collision event to the listener behind `id`.
    ///
    /// A stale ID is a no-op; the body outlived its listener.
    pub fn dispatch(
        &mut self,
        world: &mut SimWorld,
        id: ListenerId,
        direction: Direction,
        this: EntityId,
        other: EntityId,
    ) {
        if let Some(listener) = self.entries.get_mut(&id.0) {
            listener.on_collision(world, direction, this, other);
        } else {
            trace!("collision event for unregistered listener {id:?} dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingListener {
        calls: Arc<AtomicUsize>,
    }

    impl CollisionListener for CountingListener {
        fn on_collision(
            &mut self,
            _world: &mut SimWorld,
            _direction: Direction,
            _this: EntityId,
            _other: EntityId,
        ) {
            self.calls.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_register_dispatch_unregister() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut table = ListenerTable::new();
        let mut world = SimWorld::new(4);

        let id = table.register(Box::new(CountingListener {
            calls: Arc::clone(&calls),
        }));
        assert!(table.contains(id));

        table.dispatch(
            &mut world,
            id,
            Direction::Down,
            EntityId::NULL,
            EntityId::NULL,
        );
        assert_eq!(calls.load(Ordering::Relaxed), 1);

        assert!(table.unregister(id).is_some());
        assert!(!table.contains(id));

        // Dispatch to a stale ID is a silent no-op.
        table.dispatch(
            &mut world,
            id,
            Direction::Down,
            EntityId::NULL,
            EntityId::NULL,
        );
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Centre.opposite(), Direction::Centre);
    }
}
