//! Entity pool and kind registry
//!
//! Destroyed entities return to a per-kind free list instead of being freed;
//! fetching reuses a pooled instance when one exists. Respawning overwrites
//! the instance wholesale from its archetype, so no field can leak a prior
//! life's value. Fetching a kind that was never registered is a fatal
//! configuration bug surfaced immediately.

use std::collections::HashMap;

use glam::Vec2;
use thiserror::Error;

use crate::Direction;
use crate::behavior::{Behavior, ChildSlot};
use crate::entity::{DamageTag, Entity, EntityId, EntityKind, Faction, Variant};
use crate::fixture::FixtureDef;
use crate::lifecycle::{CullConfig, Lifecycle};
use crate::props::{Props, SpawnProps};
use crate::response::BounceCounter;

/// Fatal pool configuration error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("entity kind {0:?} was never registered")]
    Unregistered(EntityKind),
}

/// Static description of one entity kind: behavior plus the defaults every
/// spawn starts from.
pub struct Archetype {
    pub behavior: &'static dyn Behavior,
    pub half: Vec2,
    pub gravity: Vec2,
    pub faction: Faction,
    pub deals: DamageTag,
    pub immune_to: Vec<DamageTag>,
    pub max_bounces: u32,
    pub max_hits: u32,
    pub cull: CullConfig,
    /// Delay between the death chain and finalization, if any
    pub disintegrate: Option<f32>,
    pub fixtures: Vec<FixtureDef>,
}

impl Archetype {
    /// Build a fresh instance in its pre-spawn state. Used both for pool
    /// misses and to scrub a reused slot: assignment replaces every field.
    pub fn instantiate(&self, id: EntityId, kind: EntityKind) -> Entity {
        Entity {
            id,
            kind,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            gravity: self.gravity,
            half: self.half,
            owner: None,
            faction: self.faction,
            deals: self.deals,
            immune_to: self.immune_to.clone(),
            facing: Direction::Right,
            bounce: BounceCounter::new(self.max_bounces),
            hits: 0,
            max_hits: self.max_hits,
            variant: Variant::default(),
            contact_grace: None,
            charge: None,
            delay: None,
            lifecycle: Lifecycle::default(),
            cycle: None,
            child: ChildSlot::empty(),
            fixtures: self
                .fixtures
                .iter()
                .map(|def| def.build(id, Vec2::ZERO))
                .collect(),
            props: Props::new(),
        }
    }
}

/// Kind -> archetype table, populated once at startup
#[derive(Default)]
pub struct Registry {
    map: HashMap<EntityKind, Archetype>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: EntityKind, archetype: Archetype) {
        self.map.insert(kind, archetype);
    }

    pub fn get(&self, kind: EntityKind) -> Result<&Archetype, PoolError> {
        self.map.get(&kind).ok_or(PoolError::Unregistered(kind))
    }
}

/// Deferred child spawn produced by a handler, applied by the world after
/// dispatch completes. The id is allocated up front so the requester can
/// hold a handle to the child before it exists.
#[derive(Debug, Clone)]
pub struct SpawnRequest {
    pub id: EntityId,
    pub kind: EntityKind,
    pub props: SpawnProps,
}

struct Slot {
    entity: Entity,
    live: bool,
}

/// Slot arena: an instance is exactly pooled+inactive or spawned+active
#[derive(Default)]
pub struct Pool {
    slots: Vec<Slot>,
    free: HashMap<EntityKind, Vec<usize>>,
    live: HashMap<EntityId, usize>,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch-or-create a slot for `kind` and scrub it into the pre-spawn
    /// state for a new life under `id`.
    pub fn fetch(&mut self, kind: EntityKind, archetype: &Archetype, id: EntityId) -> usize {
        let index = match self.free.get_mut(&kind).and_then(Vec::pop) {
            Some(index) => {
                log::debug!("pool hit: {:?} slot {}", kind, index);
                self.slots[index].entity = archetype.instantiate(id, kind);
                index
            }
            None => {
                log::debug!("pool miss: constructing {:?}", kind);
                self.slots.push(Slot {
                    entity: archetype.instantiate(id, kind),
                    live: false,
                });
                self.slots.len() - 1
            }
        };
        self.slots[index].live = true;
        self.live.insert(id, index);
        index
    }

    /// Return a slot to the free list (end-of-frame sweep only)
    pub fn release(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        debug_assert!(slot.live, "releasing a slot that is not live");
        slot.live = false;
        self.live.remove(&slot.entity.id);
        self.free.entry(slot.entity.kind).or_default().push(index);
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, id: EntityId) -> bool {
        self.live.contains_key(&id)
    }

    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.live.get(&id).copied()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.slots[i].entity)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let index = self.index_of(id)?;
        Some(&mut self.slots[index].entity)
    }

    pub fn entity_at(&self, index: usize) -> Option<&Entity> {
        let slot = self.slots.get(index)?;
        slot.live.then_some(&slot.entity)
    }

    pub fn entity_at_mut(&mut self, index: usize) -> Option<&mut Entity> {
        let slot = self.slots.get_mut(index)?;
        slot.live.then_some(&mut slot.entity)
    }

    /// Live slot indices in stable (slot) order, for deterministic iteration
    pub fn live_indices(&self) -> Vec<usize> {
        (0..self.slots.len())
            .filter(|&i| self.slots[i].live)
            .collect()
    }

    pub fn live_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self.live.keys().copied().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::config::Tuning;

    fn registry() -> Registry {
        catalog::standard_registry(&Tuning::default())
    }

    #[test]
    fn test_unregistered_kind_is_fatal() {
        let registry = Registry::new();
        assert_eq!(
            registry.get(EntityKind::Slug).err(),
            Some(PoolError::Unregistered(EntityKind::Slug))
        );
    }

    #[test]
    fn test_fetch_reuses_released_slot() {
        let registry = registry();
        let mut pool = Pool::new();
        let arche = registry.get(EntityKind::Shard).unwrap();

        let id1 = EntityId(1);
        let index = pool.fetch(EntityKind::Shard, arche, id1);
        assert_eq!(pool.slot_count(), 1);
        pool.release(index);
        assert_eq!(pool.live_count(), 0);

        let id2 = EntityId(2);
        let reused = pool.fetch(EntityKind::Shard, arche, id2);
        assert_eq!(reused, index);
        assert_eq!(pool.slot_count(), 1);
        assert_ne!(id1, id2);
        assert!(!pool.is_live(id1));
        assert!(pool.is_live(id2));
    }

    #[test]
    fn test_free_lists_are_per_kind() {
        let registry = registry();
        let mut pool = Pool::new();
        let shard = registry.get(EntityKind::Shard).unwrap();
        let blast = registry.get(EntityKind::Blast).unwrap();

        let id = EntityId(1);
        let shard_index = pool.fetch(EntityKind::Shard, shard, id);
        pool.release(shard_index);

        // A different kind does not steal the shard's slot
        let id2 = EntityId(2);
        let blast_index = pool.fetch(EntityKind::Blast, blast, id2);
        assert_ne!(blast_index, shard_index);
        assert_eq!(pool.slot_count(), 2);
    }

    #[test]
    fn test_reused_slot_matches_fresh_instance() {
        let registry = registry();
        let mut pool = Pool::new();
        let arche = registry.get(EntityKind::IceCube).unwrap();

        // First life: dirty every mutable field we can reach
        let id1 = EntityId(1);
        let index = pool.fetch(EntityKind::IceCube, arche, id1);
        {
            let e = pool.entity_at_mut(index).unwrap();
            e.pos = Vec2::new(40.0, 40.0);
            e.vel = Vec2::new(-3.0, 9.0);
            e.hits = 7;
            e.owner = Some(EntityId(999));
            e.bounce.register();
            e.props.put("junk", crate::props::PropValue::Bool(true));
        }
        pool.release(index);

        // Second life must be indistinguishable from a fresh construction
        let id2 = EntityId(2);
        let reused_index = pool.fetch(EntityKind::IceCube, arche, id2);
        assert_eq!(reused_index, index);
        let reused = pool.entity_at(reused_index).unwrap().clone();
        let fresh = arche.instantiate(id2, EntityKind::IceCube);

        assert_eq!(reused.pos, fresh.pos);
        assert_eq!(reused.vel, fresh.vel);
        assert_eq!(reused.hits, fresh.hits);
        assert_eq!(reused.owner, fresh.owner);
        assert_eq!(reused.bounce, fresh.bounce);
        assert_eq!(reused.props, fresh.props);
        assert_eq!(reused.lifecycle, fresh.lifecycle);
    }
}
