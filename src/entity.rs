//! Projectile/hazard entity state
//!
//! One flat struct per instance rather than an inheritance chain: the
//! tagged [`EntityKind`] is used only for pool/behavior lookups, and the
//! capability data (faction, damage tag, immunities, facing) is resolved
//! once at spawn so handlers never inspect concrete types at runtime.

use glam::Vec2;

use crate::Direction;
use crate::behavior::ChildSlot;
use crate::fixture::Fixture;
use crate::lifecycle::{Lifecycle, Timer};
use crate::props::Props;
use crate::response::BounceCounter;
use crate::shape::Rect;

/// Unique id of one spawned life; never reused across respawns of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Entity kinds known to the pool. Used only as a dispatch/registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Slug,
    ChargeBolt,
    Residual,
    Boulder,
    IceCube,
    Shard,
    Blast,
    GoopDripper,
    GoopDrip,
    FlameVent,
    /// Static terrain piece (block fixture only)
    Barrier,
    /// Static deflector, optionally with a preferred deflection direction
    Aegis,
    /// Static patch of loose sand that swallows projectiles
    Quicksand,
    /// Static beam segment
    Beam,
    /// Static instant-kill region
    Pit,
}

/// Faction an entity fights for; damage never crosses within a faction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Faction {
    Player,
    Enemy,
    Hazard,
}

/// What kind of damage a damager deals; damageables may be immune per tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageTag {
    Ballistic,
    Fire,
    Ice,
    Blast,
    Crush,
}

/// Size variant shared by the kinds that come in sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    Large,
    Medium,
    Small,
}

/// One pooled hazard/projectile instance
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,

    /// Body center
    pub pos: Vec2,
    /// Velocity in physics units (units/sec)
    pub vel: Vec2,
    pub gravity: Vec2,
    /// Body half extents
    pub half: Vec2,

    /// Entity attributed as this one's cause, for friendly fire and kill
    /// attribution; inherited down spawn chains
    pub owner: Option<EntityId>,
    pub faction: Faction,
    pub deals: DamageTag,
    pub immune_to: Vec<DamageTag>,
    pub facing: Direction,

    pub bounce: BounceCounter,
    /// Hits absorbed this life (damageable kinds)
    pub hits: u32,
    pub max_hits: u32,
    pub variant: Variant,

    /// Contacts are ignored until this runs out ("ignore initial collision
    /// for N seconds" spawn flag)
    pub contact_grace: Option<Timer>,
    /// Charge-before-fire delay (kinds with a Charging sub-state)
    pub charge: Option<Timer>,
    /// Generic per-kind delay (drip timers and the like)
    pub delay: Option<Timer>,

    pub lifecycle: Lifecycle,
    pub cycle: Option<crate::behavior::StateLoop>,
    pub child: ChildSlot,

    pub fixtures: Vec<Fixture>,
    /// Per-instance scratch values
    pub props: Props,
}

impl Entity {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.half)
    }

    /// Key the presentation layer polls to pick a visual
    pub fn behavior_key(&self) -> &'static str {
        match &self.cycle {
            Some(cycle) if !self.lifecycle.ignores_contacts() => cycle.current(),
            _ => self.lifecycle.phase().as_str(),
        }
    }

    /// Whether contacts should be processed at all this frame
    pub fn accepts_contacts(&self) -> bool {
        if self.lifecycle.ignores_contacts() {
            return false;
        }
        match &self.contact_grace {
            Some(grace) => grace.is_finished(),
            None => true,
        }
    }

    /// Friendly-fire rule, resolved from capability data only
    pub fn can_damage(&self, other: &Entity) -> bool {
        if self.faction == other.faction {
            return false;
        }
        if self.owner == Some(other.id) || other.owner == Some(self.id) {
            return false;
        }
        if self.owner.is_some() && self.owner == other.owner {
            return false;
        }
        !other.immune_to.contains(&self.deals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::CullConfig;

    fn bare(id: u32, faction: Faction, deals: DamageTag) -> Entity {
        Entity {
            id: EntityId(id),
            kind: EntityKind::Slug,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            gravity: Vec2::ZERO,
            half: Vec2::splat(0.5),
            owner: None,
            faction,
            deals,
            immune_to: Vec::new(),
            facing: Direction::Right,
            bounce: BounceCounter::new(1),
            hits: 0,
            max_hits: 0,
            variant: Variant::default(),
            contact_grace: None,
            charge: None,
            delay: None,
            lifecycle: Lifecycle::default(),
            cycle: None,
            child: ChildSlot::empty(),
            fixtures: Vec::new(),
            props: Props::new(),
        }
    }

    #[test]
    fn test_same_faction_never_damages() {
        let a = bare(1, Faction::Player, DamageTag::Ballistic);
        let b = bare(2, Faction::Player, DamageTag::Fire);
        assert!(!a.can_damage(&b));
    }

    #[test]
    fn test_owner_chain_blocks_damage() {
        let parent = bare(1, Faction::Enemy, DamageTag::Fire);
        let mut child = bare(2, Faction::Player, DamageTag::Ballistic);
        child.owner = Some(parent.id);
        assert!(!child.can_damage(&parent));
        assert!(!parent.can_damage(&child));

        // Siblings of the same owner don't hurt each other either
        let mut sibling = bare(3, Faction::Enemy, DamageTag::Fire);
        sibling.owner = Some(EntityId(9));
        let mut other = bare(4, Faction::Player, DamageTag::Fire);
        other.owner = Some(EntityId(9));
        assert!(!sibling.can_damage(&other));
    }

    #[test]
    fn test_immunity_blocks_by_tag() {
        let fire = bare(1, Faction::Hazard, DamageTag::Fire);
        let mut cube = bare(2, Faction::Enemy, DamageTag::Ice);
        cube.immune_to.push(DamageTag::Ice);
        assert!(fire.can_damage(&cube));
        cube.immune_to.push(DamageTag::Fire);
        assert!(!fire.can_damage(&cube));
    }

    #[test]
    fn test_contact_grace_gates_contacts() {
        let mut e = bare(1, Faction::Enemy, DamageTag::Crush);
        e.lifecycle.begin_spawn(CullConfig::default(), None);
        e.lifecycle.activate();
        e.contact_grace = Some(Timer::new(0.25));
        assert!(!e.accepts_contacts());
        e.contact_grace.as_mut().unwrap().update(0.3);
        assert!(e.accepts_contacts());
    }
}
