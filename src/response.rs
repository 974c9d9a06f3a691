//! Collision response math
//!
//! The single deflection primitive (`push_direction`) plus the bounce and
//! shield-deflection rules built on it. This is deliberately not a physics
//! solver: responses are deterministic, designer-tunable reflection rules in
//! the same unit space as the physics velocity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Direction;
use crate::shape::Rect;

/// Cardinal direction that pushes `a` out of `b` with minimum separation.
///
/// When the rects do not overlap (edge or corner contact), the direction is
/// derived from the vector between their centers instead.
pub fn push_direction(a: &Rect, b: &Rect) -> Direction {
    let depth = a.overlap_depth(b);
    let delta = a.center_delta(b);

    if depth.x > 0.0 && depth.y > 0.0 {
        // Overlapping: separate along the axis of least penetration
        if depth.y <= depth.x {
            if delta.y >= 0.0 { Direction::Up } else { Direction::Down }
        } else if delta.x >= 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else {
        // Touching or separated: fall back to the center-to-center vector
        if delta.x.abs() >= delta.y.abs() {
            if delta.x >= 0.0 { Direction::Right } else { Direction::Left }
        } else if delta.y >= 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

/// Reflect a velocity off the face implied by a struck direction.
///
/// The component orthogonal to the struck face is forced to point along the
/// push-out direction and scaled by the restitution factor; the tangential
/// component is untouched.
pub fn bounce(vel: Vec2, struck: Direction, restitution: f32) -> Vec2 {
    match struck {
        Direction::Up => Vec2::new(vel.x, vel.y.abs() * restitution),
        Direction::Down => Vec2::new(vel.x, -vel.y.abs() * restitution),
        Direction::Left => Vec2::new(-vel.x.abs() * restitution, vel.y),
        Direction::Right => Vec2::new(vel.x.abs() * restitution, vel.y),
    }
}

/// Deflect a trajectory off a shield.
///
/// Without a preferred deflection direction this is a passive mirror of the
/// orthogonal component at full speed. With one, the deflected component's
/// magnitude is reset to `reflect_speed` in that direction: directional parry
/// rather than a scaled bounce.
pub fn deflect_off_shield(
    traj: Vec2,
    struck: Direction,
    preferred: Option<Direction>,
    reflect_speed: f32,
) -> Vec2 {
    match preferred {
        None => bounce(traj, struck, 1.0),
        Some(dir) => {
            if dir.is_vertical() {
                Vec2::new(traj.x, dir.as_vec2().y * reflect_speed)
            } else {
                Vec2::new(dir.as_vec2().x * reflect_speed, traj.y)
            }
        }
    }
}

/// Outcome of registering one more bounce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BounceOutcome {
    /// Still under the limit: reflect and keep flying
    Reflect,
    /// Limit exceeded: the caller must force the exploding transition
    Exhausted,
}

/// Per-entity bounce budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BounceCounter {
    count: u32,
    max: u32,
}

impl BounceCounter {
    pub fn new(max: u32) -> Self {
        Self { count: 0, max }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn reset(&mut self, max: u32) {
        self.count = 0;
        self.max = max;
    }

    /// Count one contact; exceeding the per-type maximum exhausts the budget
    pub fn register(&mut self) -> BounceOutcome {
        self.count += 1;
        if self.count > self.max {
            BounceOutcome::Exhausted
        } else {
            BounceOutcome::Reflect
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_push_direction_least_penetration() {
        // a sits mostly above b: shallow vertical overlap, deep horizontal
        let a = Rect::square(Vec2::new(0.0, 1.5), 2.0);
        let b = Rect::square(Vec2::ZERO, 2.0);
        assert_eq!(push_direction(&a, &b), Direction::Up);
        assert_eq!(push_direction(&b, &a), Direction::Down);
    }

    #[test]
    fn test_push_direction_horizontal() {
        let a = Rect::square(Vec2::new(1.5, 0.2), 2.0);
        let b = Rect::square(Vec2::ZERO, 2.0);
        assert_eq!(push_direction(&a, &b), Direction::Right);
        assert_eq!(push_direction(&b, &a), Direction::Left);
    }

    #[test]
    fn test_push_direction_corner_fallback() {
        // No overlap: direction comes from the center vector
        let a = Rect::square(Vec2::new(5.0, 1.0), 2.0);
        let b = Rect::square(Vec2::ZERO, 2.0);
        assert_eq!(push_direction(&a, &b), Direction::Right);
    }

    #[test]
    fn test_bounce_reflects_orthogonal_component() {
        // Moving up-right into a block overhead, restitution 0.75
        let v = bounce(Vec2::new(5.0, 5.0), Direction::Down, 0.75);
        assert!((v.x - 5.0).abs() < 1e-6);
        assert!((v.y - (-3.75)).abs() < 1e-6);
    }

    #[test]
    fn test_bounce_forces_sign_regardless_of_incoming() {
        // Already moving down and struck from above: still pushed down
        let v = bounce(Vec2::new(1.0, -4.0), Direction::Down, 0.5);
        assert!((v.y - (-2.0)).abs() < 1e-6);
    }

    #[test]
    fn test_shield_deflect_passive_mirror() {
        let v = deflect_off_shield(Vec2::new(6.0, 2.0), Direction::Left, None, 160.0);
        assert_eq!(v, Vec2::new(-6.0, 2.0));
    }

    #[test]
    fn test_shield_deflect_preferred_direction_resets_speed() {
        let v = deflect_off_shield(Vec2::new(6.0, 2.0), Direction::Left, Some(Direction::Up), 160.0);
        assert_eq!(v, Vec2::new(6.0, 160.0));
    }

    #[test]
    fn test_bounce_counter_exhausts_past_max() {
        let mut counter = BounceCounter::new(1);
        assert_eq!(counter.register(), BounceOutcome::Reflect);
        assert_eq!(counter.register(), BounceOutcome::Exhausted);
        // Stays exhausted
        assert_eq!(counter.register(), BounceOutcome::Exhausted);
    }

    proptest! {
        /// Swapping the rect pair always yields the opposite direction when
        /// the overlap is strictly off-center on the separating axis.
        #[test]
        fn prop_push_direction_antisymmetric(
            ax in -10.0f32..10.0, ay in -10.0f32..10.0,
            dx in 0.3f32..1.7, dy in 0.3f32..1.7,
        ) {
            prop_assume!((dx - dy).abs() > 1e-3);
            let a = Rect::square(Vec2::new(ax, ay), 2.0);
            let b = Rect::square(Vec2::new(ax + dx, ay + dy), 2.0);
            prop_assert!(a.overlaps(&b));
            let d1 = push_direction(&a, &b);
            let d2 = push_direction(&b, &a);
            prop_assert_eq!(d1, d2.opposite());
        }

        /// Deeper penetration along x than y separates vertically, and never
        /// left/right.
        #[test]
        fn prop_min_overlap_axis(
            cx in -10.0f32..10.0, cy in -10.0f32..10.0,
            dx in 0.0f32..0.5, dy in 1.0f32..1.9,
        ) {
            let a = Rect::square(Vec2::new(cx, cy), 2.0);
            let b = Rect::square(Vec2::new(cx + dx, cy + dy), 2.0);
            // x-overlap = 2 - dx > y-overlap = 2 - dy
            let dir = push_direction(&b, &a);
            prop_assert!(dir.is_vertical());
            prop_assert_eq!(dir, Direction::Up);
        }

        /// Bounce never changes the tangential component.
        #[test]
        fn prop_bounce_preserves_tangent(
            vx in -100.0f32..100.0, vy in -100.0f32..100.0,
            r in 0.1f32..1.0,
        ) {
            let v = Vec2::new(vx, vy);
            let up = bounce(v, Direction::Up, r);
            prop_assert_eq!(up.x, v.x);
            let left = bounce(v, Direction::Left, r);
            prop_assert_eq!(left.y, v.y);
        }
    }
}
