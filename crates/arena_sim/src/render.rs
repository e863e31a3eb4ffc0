//! # Render View
//!
//! Read-only projection of the world for a renderer. Entities holding
//! both a [`SpriteRef`] and a [`PhysicsBody`] appear as
//! [`SpritePlacement`]s; the view carries no draw calls of its own, it
//! just answers "what is where".

use arena_core::{CapabilitySet, EntityId, FamilyHandle, Vec2};

use crate::components::{PhysicsBody, SpriteRef};
use crate::world::SimWorld;

/// Placement of one renderable entity for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpritePlacement {
    /// The entity being drawn.
    pub entity: EntityId,
    /// Which sprite/animation to draw.
    pub sprite_id: u32,
    /// Center of the entity's AABB.
    pub position: Vec2,
    /// Full extents of the AABB.
    pub size: Vec2,
    /// Parallax depth hint.
    pub z_parallax: f32,
    /// `true` when the entity last moved leftward; renderers mirror the
    /// sprite horizontally on this.
    pub facing_left: bool,
}

/// Cached query over renderable entities.
pub struct RenderView {
    family: FamilyHandle,
}

impl RenderView {
    /// Creates the view and registers its {SpriteRef, PhysicsBody}
    /// family.
    #[must_use]
    pub fn new(world: &mut SimWorld) -> Self {
        let family = world.register_family(
            CapabilitySet::of::<SpriteRef>().with::<PhysicsBody>(),
        );
        Self { family }
    }

    /// Yields placements for every renderable entity, in registry
    /// order.
    pub fn placements<'a>(
        &'a self,
        world: &'a SimWorld,
    ) -> impl Iterator<Item = SpritePlacement> + 'a {
        world
            .family_members(self.family)
            .iter()
            .filter_map(move |&entity| {
                let body = world.body(entity)?;
                let sprite = world.sprite(entity)?;
                Some(SpritePlacement {
                    entity,
                    sprite_id: sprite.sprite_id,
                    position: body.position,
                    size: body.size,
                    z_parallax: body.z_parallax,
                    facing_left: body.moved_left_last,
                })
            })
    }

    /// Number of renderable entities right now.
    #[must_use]
    pub fn len(&self, world: &SimWorld) -> usize {
        world.family_len(self.family)
    }

    /// `true` if nothing is renderable.
    #[must_use]
    pub fn is_empty(&self, world: &SimWorld) -> bool {
        self.len(world) == 0
    }
}

/// The four edges of a body's AABB as line segments, for debug
/// overlays. Order: left, right, bottom, top.
#[must_use]
pub fn debug_outline(body: &PhysicsBody) -> [(Vec2, Vec2); 4] {
    let left = body.left_edge();
    let right = body.right_edge();
    let bottom = body.bottom_edge();
    let top = body.top_edge();
    [
        (Vec2::new(left, bottom), Vec2::new(left, top)),
        (Vec2::new(right, bottom), Vec2::new(right, top)),
        (Vec2::new(left, bottom), Vec2::new(right, bottom)),
        (Vec2::new(left, top), Vec2::new(right, top)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_sprite_and_body_holders_are_visible() {
        let mut world = SimWorld::new(8);
        let view = RenderView::new(&mut world);

        let drawn = world.spawn();
        world.add_body(drawn, PhysicsBody::new().with_size(4.0, 4.0));
        world.add_sprite(drawn, SpriteRef { sprite_id: 3 });

        let invisible = world.spawn();
        world.add_body(invisible, PhysicsBody::new().with_size(4.0, 4.0));

        let placements: Vec<_> = view.placements(&world).collect();
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].entity, drawn);
        assert_eq!(placements[0].sprite_id, 3);
    }

    #[test]
    fn test_placement_reflects_body_state() {
        let mut world = SimWorld::new(8);
        let view = RenderView::new(&mut world);

        let e = world.spawn();
        world.add_body(
            e,
            PhysicsBody::new()
                .with_size(4.0, 4.0)
                .with_position(-2.5, -5.0)
                .with_z_parallax(0.5),
        );
        world.add_sprite(e, SpriteRef::default());

        let placement = view.placements(&world).next().unwrap();
        assert_eq!(placement.position, Vec2::new(-2.5, -5.0));
        assert_eq!(placement.size, Vec2::new(4.0, 4.0));
        assert!((placement.z_parallax - 0.5).abs() < f32::EPSILON);
        assert!(!placement.facing_left);
    }

    #[test]
    fn test_debug_outline_edges() {
        let body = PhysicsBody::new().with_size(2.0, 2.0).with_position(0.0, 0.0);
        let [left, right, bottom, top] = debug_outline(&body);
        assert_eq!(left.0, Vec2::new(-1.0, -1.0));
        assert_eq!(left.1, Vec2::new(-1.0, 1.0));
        assert_eq!(right.0, Vec2::new(1.0, -1.0));
        assert_eq!(bottom.1, Vec2::new(1.0, -1.0));
        assert_eq!(top.0, Vec2::new(-1.0, 1.0));
        assert_eq!(top.1, Vec2::new(1.0, 1.0));
    }
}
