//! # Physics & Collision System
//!
//! The fixed-substep integrator and O(n²) pairwise AABB resolver.
//!
//! Each `update(delta_time)` call subdivides the frame into substeps no
//! longer than `1 / updates_per_second`, then for each substep walks the
//! {PhysicsBody} family in registry order: integrate position, apply
//! movement intent and drag, apply gravity, then resolve collisions
//! against every other member.
//!
//! ## The tolerated race
//!
//! Listeners run synchronously inside resolution and may despawn
//! entities, which shrinks the family mid-iteration. Iteration is
//! index-based and bounds-checked; an index that has gone stale is a
//! recoverable miss - logged and skipped, never fatal. This is a
//! sanctioned behavior (an entity may die during its own
//! death-collision handling), not a bug to eliminate.
//!
//! ## Pair ordering
//!
//! (A,B) and (B,A) are resolved as two separate calls in the same inner
//! loop; the later call observes the earlier call's already-applied
//! position/velocity changes. The outcome is order-dependent by design
//! and matches the original behavior.

use arena_core::{CapabilitySet, EntityId, FamilyHandle};
use tracing::warn;

use crate::components::PhysicsBody;
use crate::config::SimConfig;
use crate::events::{EventSender, SimEvent, SoundKind};
use crate::listener::{Direction, ListenerTable};
use crate::world::SimWorld;

/// Counters for one `update` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Substeps executed.
    pub substeps: u32,
    /// Family members at the start of the call.
    pub bodies: usize,
    /// Pairwise resolution attempts across all substeps.
    pub pair_tests: u64,
    /// Entities that vanished from the family mid-iteration.
    pub stale_misses: u32,
}

/// The physics system.
///
/// Pure function of (body state, elapsed time); holds no per-entity
/// state of its own beyond the cached family handle.
pub struct PhysicsSystem {
    family: FamilyHandle,
    config: SimConfig,
    events: EventSender,
}

impl PhysicsSystem {
    /// Creates the system and registers its {PhysicsBody} family.
    #[must_use]
    pub fn new(world: &mut SimWorld, events: EventSender, config: SimConfig) -> Self {
        let family = world.register_family(CapabilitySet::of::<PhysicsBody>());
        Self {
            family,
            config,
            events,
        }
    }

    /// Returns the handle of the {PhysicsBody} family this system walks.
    #[must_use]
    pub fn family(&self) -> FamilyHandle {
        self.family
    }

    /// Advances the simulation by `delta_time` seconds.
    ///
    /// The frame is cut into `ceil(delta_time * updates_per_second)`
    /// substeps whose durations sum back to `delta_time` exactly
    /// (floating-point rounding aside), so collision precision is
    /// stable across frame-rate variance. A zero or negative
    /// `delta_time` runs no substeps.
    pub fn update(
        &mut self,
        world: &mut SimWorld,
        listeners: &mut ListenerTable,
        delta_time: f32,
    ) -> TickStats {
        let mut stats = TickStats {
            bodies: world.family_len(self.family),
            ..TickStats::default()
        };

        let substep_cap = 1.0 / self.config.updates_per_second;
        let times = (delta_time / substep_cap).ceil();
        if !(times >= 1.0) {
            return stats;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let times = times as u32;
        let dt = delta_time / times as f32;

        for _ in 0..times {
            stats.substeps += 1;

            let mut i = 0;
            while i < world.family_len(self.family) {
                if let Some(entity) = world.family_member(self.family, i) {
                    self.step_body(world, listeners, entity, dt, &mut stats);
                }
                i += 1;
            }
        }

        stats
    }

    /// Runs one substep for one body: integrate, movement, gravity,
    /// collisions.
    fn step_body(
        &mut self,
        world: &mut SimWorld,
        listeners: &mut ListenerTable,
        entity: EntityId,
        dt: f32,
        stats: &mut TickStats,
    ) {
        let Some(mut body) = world.body(entity).copied() else {
            stats.stale_misses += 1;
            return;
        };

        // Integrate position. The displacement clamp caps per-substep
        // travel per axis independent of velocity magnitude, so a body
        // cannot tunnel through thin colliders during a lag spike.
        body.position += (body.velocity * dt).clamped(self.config.max_step_displacement);

        // Movement intent. Right is evaluated last and wins when both
        // flags are set, including for the facing memory.
        if body.movable {
            let mut movement = 0.0;
            if body.moving_left {
                movement -= 1.0;
                body.moved_left_last = true;
            }
            if body.moving_right {
                movement += 1.0;
                body.moved_left_last = false;
            }
            body.velocity.x = movement * body.move_speed;

            if let Some(combat) = world.combat(entity) {
                if combat.swing_cd_counter > 0.0 {
                    // Attack recovery halves ground speed.
                    body.velocity.x /= 2.0;
                }
            }

            if body.jumping && body.grounded {
                body.grounded = false;
                body.velocity.y = body.jump_force;
                self.events.send(SimEvent::PlaySound {
                    entity,
                    sound: SoundKind::Step,
                });
            }

            // Knockback overlay, then linear decay toward zero. The
            // decay stops at zero instead of oscillating past it.
            body.velocity += body.sim_velocity;
            let decay = body.drag * dt;
            body.sim_velocity.x = decay_toward_zero(body.sim_velocity.x, decay);
            body.sim_velocity.y = decay_toward_zero(body.sim_velocity.y, decay);
        }

        if body.gravity_applied {
            body.velocity.y -= body.gravity * dt;
        }

        if let Some(slot) = world.body_mut(entity) {
            *slot = body;
        }

        if body.process_collisions {
            let mut j = 0;
            while j < world.family_len(self.family) {
                if let Some(other) = world.family_member(self.family, j) {
                    if other != entity {
                        stats.pair_tests += 1;
                        if !self.resolve_pair(world, listeners, entity, other) {
                            warn!(
                                "tried to process collisions for a removed entity \
                                 ({entity:?} vs {other:?})"
                            );
                            stats.stale_misses += 1;
                        }
                    }
                }
                j += 1;
            }
        }
    }

    /// Resolves one ordered pair (A, B), mutating only A and invoking
    /// only A's listener.
    ///
    /// Edge coordinates are sampled once at entry; resolution offsets
    /// accumulate on A without re-deriving edges, so multiple sides can
    /// fire from one overlap exactly as sampled. Listeners observe A's
    /// already-updated state because changes are committed to storage
    /// before each callback.
    ///
    /// Returns `false` if either body vanished before or during
    /// resolution (e.g. despawned by a listener); remaining directional
    /// checks for the pair are abandoned.
    fn resolve_pair(
        &mut self,
        world: &mut SimWorld,
        listeners: &mut ListenerTable,
        a_id: EntityId,
        b_id: EntityId,
    ) -> bool {
        let (Some(a0), Some(b0)) = (world.body(a_id).copied(), world.body(b_id).copied()) else {
            return false;
        };
        let mut a = a0;
        let mut b = b0;

        let a_left = a.left_edge();
        let a_right = a.right_edge();
        let a_bottom = a.bottom_edge();
        let a_top = a.top_edge();
        let b_left = b.left_edge();
        let b_right = b.right_edge();
        let b_bottom = b.bottom_edge();
        let b_top = b.top_edge();

        let overlapping =
            a_left < b_right && a_right > b_left && a_bottom < b_top && a_top > b_bottom;
        if !overlapping {
            return true;
        }

        // Shallow-penetration tolerance, scaled with body size so only
        // the true leading edge of contact resolves, not a stale deep
        // overlap. Zero-size bodies yield a zero tolerance (no edge
        // fires; the CENTRE fallback still reports the contact).
        let tolerance_x = edge_tolerance(self.config.collision_precision, a.size.x, b.size.x);
        let tolerance_y = edge_tolerance(self.config.collision_precision, a.size.y, b.size.y);

        let mut collided = false;

        // A's left edge against B's right edge.
        if a_left <= b_right && (a_left - b_right).abs() < tolerance_x {
            if !a.ghost && !b.ghost {
                if a.velocity.x < 0.0 {
                    a.velocity.x = 0.0;
                }
                a.position.x += b_right - a_left;
            }
            if !self.notify(world, listeners, &mut a, &mut b, Direction::Left, a_id, b_id) {
                return false;
            }
            collided = true;
        }

        // A's right edge against B's left edge.
        if a_right > b_left && (a_right - b_left).abs() < tolerance_x {
            if !a.ghost && !b.ghost {
                if a.velocity.x > 0.0 {
                    a.velocity.x = 0.0;
                }
                a.position.x += b_left - a_right;
            }
            if !self.notify(world, listeners, &mut a, &mut b, Direction::Right, a_id, b_id) {
                return false;
            }
            collided = true;
        }

        // A's bottom edge against B's top edge. The sole place
        // `grounded` is set by the simulation.
        if a_bottom <= b_top && (a_bottom - b_top).abs() < tolerance_y {
            if !a.ghost && !b.ghost {
                if a.velocity.y < 0.0 {
                    a.velocity.y = 0.0;
                }
                a.grounded = true;
                a.position.y += b_top - a_bottom;
            }
            if !self.notify(world, listeners, &mut a, &mut b, Direction::Down, a_id, b_id) {
                return false;
            }
            collided = true;
        }

        // A's top edge against B's bottom edge.
        if a_top > b_bottom && (a_top - b_bottom).abs() < tolerance_y {
            if !a.ghost && !b.ghost {
                if a.velocity.y > 0.0 {
                    a.velocity.y = 0.0;
                }
                a.position.y += b_bottom - a_top;
            }
            if !self.notify(world, listeners, &mut a, &mut b, Direction::Up, a_id, b_id) {
                return false;
            }
            collided = true;
        }

        // Deep or symmetric overlap that no edge claimed: report it
        // once so a contact is never silently unobserved.
        if !collided && !self.notify(world, listeners, &mut a, &mut b, Direction::Centre, a_id, b_id)
        {
            return false;
        }

        if let Some(slot) = world.body_mut(a_id) {
            *slot = a;
        }
        true
    }

    /// Commits A's pending changes, dispatches A's listener (if any),
    /// then re-reads both bodies so later checks observe listener
    /// mutations.
    ///
    /// Returns `false` if either entity no longer has a body afterwards.
    #[allow(clippy::too_many_arguments)]
    fn notify(
        &mut self,
        world: &mut SimWorld,
        listeners: &mut ListenerTable,
        a: &mut PhysicsBody,
        b: &mut PhysicsBody,
        direction: Direction,
        a_id: EntityId,
        b_id: EntityId,
    ) -> bool {
        if let Some(slot) = world.body_mut(a_id) {
            *slot = *a;
        } else {
            return false;
        }

        let Some(listener) = a.listener else {
            return true;
        };
        listeners.dispatch(world, listener, direction, a_id, b_id);

        match (world.body(a_id).copied(), world.body(b_id).copied()) {
            (Some(new_a), Some(new_b)) => {
                *a = new_a;
                *b = new_b;
                true
            }
            _ => false,
        }
    }
}

/// Shallow-penetration tolerance for one axis.
///
/// `precision * sqrt(max_extent)` scales with body size; the tolerance
/// is the combined extent divided by that. Degenerate zero-size bodies
/// produce a zero tolerance instead of dividing by zero.
fn edge_tolerance(precision: f32, extent_a: f32, extent_b: f32) -> f32 {
    let scaled = precision * extent_a.max(extent_b).sqrt();
    if scaled > 0.0 {
        (extent_a + extent_b) / scaled
    } else {
        0.0
    }
}

/// Moves `value` toward zero by `amount`, stopping at zero rather than
/// overshooting and flipping sign.
fn decay_toward_zero(value: f32, amount: f32) -> f32 {
    if value > 0.0 {
        (value - amount).max(0.0)
    } else if value < 0.0 {
        (value + amount).min(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBus;

    fn harness() -> (SimWorld, PhysicsSystem, ListenerTable, EventBus) {
        let config = SimConfig::default();
        let mut world = SimWorld::new(config.entity_capacity);
        let bus = EventBus::new(config.event_capacity);
        let system = PhysicsSystem::new(&mut world, bus.sender(), config);
        (world, system, ListenerTable::new(), bus)
    }

    #[test]
    fn test_decay_toward_zero_never_flips_sign() {
        assert!((decay_toward_zero(1.0, 0.3) - 0.7).abs() < f32::EPSILON);
        assert!((decay_toward_zero(-1.0, 0.3) + 0.7).abs() < f32::EPSILON);
        // Overshoot clamps at zero.
        assert_eq!(decay_toward_zero(0.1, 5.0), 0.0);
        assert_eq!(decay_toward_zero(-0.1, 5.0), 0.0);
        assert_eq!(decay_toward_zero(0.0, 5.0), 0.0);
    }

    #[test]
    fn test_edge_tolerance_zero_size_guard() {
        assert_eq!(edge_tolerance(12.0, 0.0, 0.0), 0.0);
        let tol = edge_tolerance(12.0, 1.0, 1.0);
        assert!((tol - 2.0 / 12.0).abs() < 1e-6);
    }

    #[test]
    fn test_substep_count_and_duration() {
        let (mut world, mut system, mut listeners, _bus) = harness();

        // 1/100s frame at 300 substeps/s needs 3 substeps.
        let stats = system.update(&mut world, &mut listeners, 0.01);
        assert_eq!(stats.substeps, 3);

        // Zero or negative delta runs nothing.
        let stats = system.update(&mut world, &mut listeners, 0.0);
        assert_eq!(stats.substeps, 0);
        let stats = system.update(&mut world, &mut listeners, -0.5);
        assert_eq!(stats.substeps, 0);
    }

    #[test]
    fn test_gravity_applied_per_substep() {
        let (mut world, mut system, mut listeners, _bus) = harness();
        let e = world.spawn();
        world.add_body(
            e,
            PhysicsBody::new()
                .with_size(1.0, 1.0)
                .with_movable(false)
                .with_process_collisions(false)
                .with_gravity(100.0),
        );

        system.update(&mut world, &mut listeners, 1.0 / 300.0);
        let vy = world.body(e).unwrap().velocity.y;
        assert!((vy + 100.0 / 300.0).abs() < 1e-4);
    }

    #[test]
    fn test_right_intent_wins_and_sets_facing() {
        let (mut world, mut system, mut listeners, _bus) = harness();
        let e = world.spawn();
        world.add_body(
            e,
            PhysicsBody::new()
                .with_size(1.0, 1.0)
                .with_gravity_applied(false)
                .with_process_collisions(false),
        );
        world.set_move_intent(e, true, true, false);

        system.update(&mut world, &mut listeners, 1.0 / 300.0);
        let body = world.body(e).unwrap();
        assert!((body.velocity.x - body.move_speed).abs() < f32::EPSILON);
        assert!(!body.moved_left_last);
    }

    #[test]
    fn test_swing_recovery_halves_speed() {
        let (mut world, mut system, mut listeners, _bus) = harness();
        let e = world.spawn();
        world.add_body(
            e,
            PhysicsBody::new()
                .with_size(1.0, 1.0)
                .with_gravity_applied(false)
                .with_process_collisions(false),
        );
        world.add_combat(
            e,
            crate::components::CombatState {
                swing_cd: 0.5,
                swing_cd_counter: 0.2,
            },
        );
        world.set_move_intent(e, false, true, false);

        system.update(&mut world, &mut listeners, 1.0 / 300.0);
        let body = world.body(e).unwrap();
        assert!((body.velocity.x - body.move_speed / 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_jump_emits_sound_request_once() {
        let (mut world, mut system, mut listeners, bus) = harness();
        let rx = bus.receiver();
        let e = world.spawn();
        world.add_body(
            e,
            PhysicsBody::new()
                .with_size(1.0, 1.0)
                .with_gravity_applied(false)
                .with_process_collisions(false),
        );
        world.set_move_intent(e, false, false, true);

        system.update(&mut world, &mut listeners, 1.0 / 300.0);
        assert_eq!(
            rx.drain(),
            vec![SimEvent::PlaySound {
                entity: e,
                sound: SoundKind::Step
            }]
        );
        let body = world.body(e).unwrap();
        assert!(!body.grounded);
        assert!((body.velocity.y - body.jump_force).abs() < f32::EPSILON);

        // Still airborne: holding jump does not re-trigger.
        system.update(&mut world, &mut listeners, 1.0 / 300.0);
        assert!(rx.drain().is_empty());
    }

    #[test]
    fn test_sim_velocity_decays_monotonically() {
        let (mut world, mut system, mut listeners, _bus) = harness();
        let e = world.spawn();
        world.add_body(
            e,
            PhysicsBody::new()
                .with_size(1.0, 1.0)
                .with_gravity_applied(false)
                .with_process_collisions(false)
                .with_drag(30.0),
        );
        world.set_sim_velocity(e, arena_core::Vec2::new(2.0, -2.0));

        let mut last = 2.0f32;
        for _ in 0..50 {
            system.update(&mut world, &mut listeners, 1.0 / 300.0);
            let sv = world.body(e).unwrap().sim_velocity;
            // Magnitude shrinks, sign never flips.
            assert!(sv.x >= 0.0 && sv.x <= last);
            assert!(sv.y <= 0.0 && -sv.y <= last);
            last = sv.x;
        }
    }
}
