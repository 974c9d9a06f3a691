//! Brimstone - hazard and projectile behavior core for a 2D action game
//!
//! Core modules:
//! - `fixture`: fixture category model (every collidable shape carries one category)
//! - `contact`: contact events and the category-routed dispatch table
//! - `response`: push-out direction, bounce, and shield deflection math
//! - `lifecycle`: per-entity phase machine and cull triggers
//! - `pool`: entity reuse and bounded death-spawn chains
//! - `world`: fixed-timestep frame orchestration
//! - `catalog`: the concrete hazard/projectile behaviors built on the above
//!
//! The crate is pure and deterministic: fixed timestep, seeded RNG, stable
//! iteration order, no rendering or platform dependencies. Broad/narrow phase
//! collision detection is an external collaborator that feeds contact events
//! into [`world::World::step`].

pub mod behavior;
pub mod catalog;
pub mod config;
pub mod contact;
pub mod entity;
pub mod events;
pub mod fixture;
pub mod lifecycle;
pub mod pool;
pub mod props;
pub mod response;
pub mod shape;
pub mod world;

pub use behavior::{Behavior, ChildSlot, StateLoop};
pub use config::Tuning;
pub use contact::{ContactEvent, FixtureRef, ProcessState};
pub use entity::{Entity, EntityId, EntityKind, Faction};
pub use events::{Cue, EventKey};
pub use fixture::{Fixture, FixtureKind};
pub use lifecycle::{Lifecycle, Phase, Timer};
pub use pool::{Archetype, PoolError, Registry};
pub use props::{Props, SpawnError, SpawnProps};
pub use response::{BounceCounter, BounceOutcome, bounce, deflect_off_shield, push_direction};
pub use shape::Rect;
pub use world::{Fx, World};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Simulation constants
pub mod consts {
    /// World units per tile; all velocities are units/sec scaled by this
    pub const UNITS_PER_TILE: f32 = 32.0;
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Default restitution applied to bounced velocity components
    pub const DEFAULT_RESTITUTION: f32 = 0.75;
    /// Fixed speed given to a trajectory deflected by a directional shield
    pub const SHIELD_REFLECT_SPEED: f32 = 5.0 * UNITS_PER_TILE;

    /// Default time-based cull countdown (seconds)
    pub const DEFAULT_CULL_TIME: f32 = 2.0;
    /// Default distance beyond the viewport before spatial culling starts
    pub const DEFAULT_CULL_RANGE: f32 = 4.0 * UNITS_PER_TILE;
    /// Grace period an entity may stay out of bounds before it is culled
    pub const DEFAULT_CULL_GRACE: f32 = 0.5;
}

/// Cardinal direction, used for push-out results, fixture side tags, and
/// shield deflection preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Unit vector pointing in this direction (+y is up)
    pub fn as_vec2(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::Y,
            Direction::Down => Vec2::NEG_Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }

    /// Rotate a vector expressed in the `Up` frame into this direction's frame.
    ///
    /// Shatter impulse tables are authored as if the struck face were up, then
    /// rotated toward the actual push-out direction.
    pub fn rotate(self, v: Vec2) -> Vec2 {
        match self {
            Direction::Up => v,
            Direction::Down => -v,
            Direction::Left => Vec2::new(-v.y, v.x),
            Direction::Right => Vec2::new(v.y, -v.x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_opposite_involution() {
        for d in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            assert_eq!(d.opposite().opposite(), d);
        }
    }

    #[test]
    fn test_direction_rotate_preserves_length() {
        let v = Vec2::new(1.0, 2.0);
        assert_eq!(Direction::Up.rotate(v), v);
        assert_eq!(Direction::Down.rotate(v), -v);
        assert!((Direction::Left.rotate(v).length() - v.length()).abs() < 1e-6);
        assert!((Direction::Right.rotate(v).length() - v.length()).abs() < 1e-6);
    }
}
