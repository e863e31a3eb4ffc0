//! # Component Contract
//!
//! Components are pure data records with no behavior. They must be
//! `Copy` with a fixed size so storage can be pre-allocated, and
//! `Default` so empty slots have a well-defined value.

/// Marker trait for ECS components.
///
/// Components must be:
/// - `Copy`: no heap allocations, bitwise copyable
/// - `Default`: empty slots hold the default value
/// - `Send + Sync`: safe to hand to other threads wholesale
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Copy, Default)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     const ID: u8 = 3;
/// }
/// ```
pub trait Component: Copy + Default + Send + Sync + 'static {
    /// Unique identifier for this component type (0-63).
    ///
    /// This ID is the bit index of the component in a [`CapabilitySet`].
    const ID: u8;
}

/// A set of component capabilities, stored as a 64-bit mask.
///
/// An entity's capability set records which component types are attached
/// to it. Systems declare the capability set they require; the registry
/// keeps a cached member list ("family") per declared set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CapabilitySet(u64);

impl CapabilitySet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Creates a set containing a single component type.
    #[inline]
    #[must_use]
    pub const fn of<C: Component>() -> Self {
        Self(1 << C::ID)
    }

    /// Returns this set extended with component type `C`.
    #[inline]
    #[must_use]
    pub const fn with<C: Component>(self) -> Self {
        Self(self.0 | (1 << C::ID))
    }

    /// Inserts a component type by its raw ID.
    #[inline]
    pub fn insert(&mut self, component_id: u8) {
        self.0 |= 1 << component_id;
    }

    /// Removes a component type by its raw ID.
    #[inline]
    pub fn remove(&mut self, component_id: u8) {
        self.0 &= !(1 << component_id);
    }

    /// Checks whether a single component type is present.
    #[inline]
    #[must_use]
    pub const fn contains_id(self, component_id: u8) -> bool {
        (self.0 & (1 << component_id)) != 0
    }

    /// Checks whether every capability in `required` is present.
    #[inline]
    #[must_use]
    pub const fn contains_all(self, required: Self) -> bool {
        (self.0 & required.0) == required.0
    }

    /// Checks whether the set is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Default)]
    struct A;
    impl Component for A {
        const ID: u8 = 0;
    }

    #[derive(Clone, Copy, Default)]
    struct B;
    impl Component for B {
        const ID: u8 = 5;
    }

    #[test]
    fn test_capability_set_insert_remove() {
        let mut set = CapabilitySet::EMPTY;
        assert!(set.is_empty());

        set.insert(A::ID);
        set.insert(B::ID);
        assert!(set.contains_id(0));
        assert!(set.contains_id(5));

        set.remove(B::ID);
        assert!(!set.contains_id(5));
        assert!(set.contains_id(0));
    }

    #[test]
    fn test_capability_set_contains_all() {
        let both = CapabilitySet::of::<A>().with::<B>();
        let just_a = CapabilitySet::of::<A>();

        assert!(both.contains_all(just_a));
        assert!(both.contains_all(both));
        assert!(!just_a.contains_all(both));
    }
}
