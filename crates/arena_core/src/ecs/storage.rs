//! # Component Storage
//!
//! Pre-allocated, dense component storage.
//!
//! The storage uses a dense array strategy:
//! - All component slots are allocated at creation
//! - Access is O(1) via entity index
//! - Iteration is cache-friendly (contiguous memory)
//!
//! The storage itself does not know which slots are meaningful; the
//! registry's capability masks are the source of truth for attachment.
//! An entity either has a component of a given type or it does not -
//! there is exactly one slot per (entity, type) pair.

use super::component::Component;

/// Pre-allocated storage for a single component type.
///
/// # Example
///
/// ```rust,ignore
/// let mut bodies: ComponentStorage<PhysicsBody> = ComponentStorage::new(4096);
/// bodies.set(entity.index() as usize, PhysicsBody::default());
/// ```
pub struct ComponentStorage<C: Component> {
    /// The dense array of components.
    data: Box<[C]>,
}

impl<C: Component> ComponentStorage<C> {
    /// Creates new component storage with the specified capacity.
    ///
    /// All slots are initialized to the component's default value.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        let data = vec![C::default(); capacity].into_boxed_slice();
        Self { data }
    }

    /// Returns the capacity of this storage.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Gets a component by entity index.
    ///
    /// Returns `None` if the index is out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&C> {
        self.data.get(index)
    }

    /// Gets a mutable component by entity index.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut C> {
        self.data.get_mut(index)
    }

    /// Sets a component at the specified index.
    ///
    /// Overwrites the existing pre-allocated slot; no allocation occurs.
    ///
    /// # Returns
    ///
    /// `true` if the component was set, `false` if index was out of bounds.
    #[inline]
    pub fn set(&mut self, index: usize, component: C) -> bool {
        if let Some(slot) = self.data.get_mut(index) {
            *slot = component;
            true
        } else {
            false
        }
    }

    /// Resets a component slot to its default value.
    #[inline]
    pub fn reset(&mut self, index: usize) {
        if let Some(slot) = self.data.get_mut(index) {
            *slot = C::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Default, PartialEq, Debug)]
    struct Counter {
        value: i32,
    }
    impl Component for Counter {
        const ID: u8 = 7;
    }

    #[test]
    fn test_storage_get_set() {
        let mut storage: ComponentStorage<Counter> = ComponentStorage::new(100);
        assert_eq!(storage.capacity(), 100);

        assert!(storage.set(50, Counter { value: 9 }));
        assert_eq!(storage.get(50), Some(&Counter { value: 9 }));
    }

    #[test]
    fn test_storage_bounds() {
        let storage: ComponentStorage<Counter> = ComponentStorage::new(100);
        assert!(storage.get(100).is_none());
        assert!(storage.get(99).is_some());
    }

    #[test]
    fn test_storage_reset() {
        let mut storage: ComponentStorage<Counter> = ComponentStorage::new(10);
        storage.set(3, Counter { value: -1 });
        storage.reset(3);
        assert_eq!(storage.get(3), Some(&Counter::default()));
    }
}
