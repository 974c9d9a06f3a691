//! Fixture category model
//!
//! Every collidable shape attached to an entity is a fixture tagged with
//! exactly one category. The category is fixed at creation; dispatch routes
//! contacts by the category of the *other* fixture. Inactive fixtures never
//! participate in dispatch.

use glam::Vec2;

use crate::entity::EntityId;
use crate::props::Props;
use crate::shape::Rect;

/// The category a fixture participates in dispatch as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureKind {
    /// The entity's main physical volume
    Body,
    /// Deals damage to overlapping damageables
    Damager,
    /// Accepts damage from overlapping damagers
    Damageable,
    /// Projectile sensor (projectile-vs-world interactions)
    Projectile,
    /// Deflects projectiles, optionally with a preferred direction
    Shield,
    /// Solid terrain
    Block,
    /// Left/right contact sensor (carries a `side` tag)
    Side,
    /// Ground contact sensor
    Feet,
    /// Ceiling contact sensor
    Head,
    /// Slows and sinks what touches it
    Sand,
    /// Submerges what touches it
    Water,
    /// Beam segment
    Laser,
    /// Catch-all sensor that observes any overlap
    Consumer,
    /// Instant-kill region
    Death,
}

/// A single collidable shape owned by one entity
#[derive(Debug, Clone)]
pub struct Fixture {
    kind: FixtureKind,
    pub shape: Rect,
    /// Offset of the shape center from the owning body center
    pub offset: Vec2,
    pub active: bool,
    pub owner: EntityId,
    pub props: Props,
}

impl Fixture {
    pub fn new(owner: EntityId, kind: FixtureKind, shape: Rect) -> Self {
        Self {
            kind,
            shape,
            offset: Vec2::ZERO,
            active: true,
            owner,
            props: Props::new(),
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Category never changes after creation
    pub fn kind(&self) -> FixtureKind {
        self.kind
    }

    /// Recenter the shape on the owning body (called during pre-process)
    pub fn follow_body(&mut self, body_center: Vec2) {
        self.shape.set_center(body_center + self.offset);
    }
}

/// Blueprint for a fixture, stored on an archetype and instantiated per spawn
#[derive(Debug, Clone)]
pub struct FixtureDef {
    pub kind: FixtureKind,
    pub half: Vec2,
    pub offset: Vec2,
    /// Whether the fixture starts active on spawn
    pub active: bool,
    pub props: Props,
}

impl FixtureDef {
    pub fn new(kind: FixtureKind, half: Vec2) -> Self {
        Self {
            kind,
            half,
            offset: Vec2::ZERO,
            active: true,
            props: Props::new(),
        }
    }

    pub fn offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn prop(mut self, key: &str, value: crate::props::PropValue) -> Self {
        self.props.put(key, value);
        self
    }

    pub fn build(&self, owner: EntityId, body_center: Vec2) -> Fixture {
        let mut fixture = Fixture::new(
            owner,
            self.kind,
            Rect::new(body_center + self.offset, self.half),
        );
        fixture.offset = self.offset;
        fixture.active = self.active;
        fixture.props = self.props.clone();
        fixture
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_body_applies_offset() {
        let owner = EntityId(1);
        let mut f = Fixture::new(owner, FixtureKind::Feet, Rect::square(Vec2::ZERO, 1.0))
            .with_offset(Vec2::new(0.0, -2.0));
        f.follow_body(Vec2::new(5.0, 5.0));
        assert_eq!(f.shape.center, Vec2::new(5.0, 3.0));
    }

    #[test]
    fn test_def_builds_with_start_state() {
        let def = FixtureDef::new(FixtureKind::Damager, Vec2::splat(0.5)).inactive();
        let f = def.build(EntityId(7), Vec2::ZERO);
        assert!(!f.active);
        assert_eq!(f.kind(), FixtureKind::Damager);
        assert_eq!(f.owner, EntityId(7));
    }
}
