//! The per-kind behavior contract, plus two small building blocks most
//! behaviors lean on: cyclic timed state loops and single-child slots.

use crate::contact::{FixtureView, ProcessState};
use crate::entity::{DamageTag, Entity, EntityId};
use crate::lifecycle::Timer;
use crate::props::{SpawnError, SpawnProps};
use crate::world::Fx;

/// Behavior of one entity kind. Implementations are stateless unit structs;
/// all mutable state lives on the [`Entity`].
///
/// Contact handlers are optional: a kind that does not override a category's
/// handler ignores contacts of that category. Handlers must not destroy
/// entities directly; they mark lifecycles and enqueue work on [`Fx`], and
/// the world finalizes at end of frame.
pub trait Behavior: Sync {
    /// Configure a freshly fetched instance from spawn parameters. Every
    /// field the behavior uses must be set here; the pool has already reset
    /// the entity to its archetype defaults.
    fn on_spawn(&self, e: &mut Entity, props: &SpawnProps, fx: &mut Fx) -> Result<(), SpawnError>;

    /// Per-frame fixture maintenance (activation toggles, shape resizing)
    /// before dispatch runs. Fixture positions already follow the body.
    fn pre_process(&self, _e: &mut Entity) {}

    /// Per-frame update while live
    fn update(&self, _e: &mut Entity, _dt: f32, _fx: &mut Fx) {}

    fn hit_block(
        &self,
        _e: &mut Entity,
        _mine: &FixtureView,
        _other: &FixtureView,
        _state: ProcessState,
        _fx: &mut Fx,
    ) {
    }

    fn hit_body(
        &self,
        _e: &mut Entity,
        _mine: &FixtureView,
        _other: &FixtureView,
        _state: ProcessState,
        _fx: &mut Fx,
    ) {
    }

    fn hit_shield(
        &self,
        _e: &mut Entity,
        _mine: &FixtureView,
        _other: &FixtureView,
        _state: ProcessState,
        _fx: &mut Fx,
    ) {
    }

    fn hit_projectile(
        &self,
        _e: &mut Entity,
        _mine: &FixtureView,
        _other: &FixtureView,
        _state: ProcessState,
        _fx: &mut Fx,
    ) {
    }

    fn hit_sand(
        &self,
        _e: &mut Entity,
        _mine: &FixtureView,
        _other: &FixtureView,
        _state: ProcessState,
        _fx: &mut Fx,
    ) {
    }

    fn hit_water(
        &self,
        _e: &mut Entity,
        _mine: &FixtureView,
        _other: &FixtureView,
        _state: ProcessState,
        _fx: &mut Fx,
    ) {
    }

    fn hit_laser(
        &self,
        _e: &mut Entity,
        _mine: &FixtureView,
        _other: &FixtureView,
        _state: ProcessState,
        _fx: &mut Fx,
    ) {
    }

    /// Death regions destroy on begin-contact unless overridden
    fn hit_death(
        &self,
        e: &mut Entity,
        _mine: &FixtureView,
        _other: &FixtureView,
        state: ProcessState,
        _fx: &mut Fx,
    ) {
        if state == ProcessState::Begin {
            e.lifecycle.kill();
        }
    }

    /// Consumer fixtures observe every overlapping fixture regardless of
    /// category
    fn consume(
        &self,
        _e: &mut Entity,
        _other: &FixtureView,
        _state: ProcessState,
        _fx: &mut Fx,
    ) {
    }

    /// Damage negotiation, damageable side. Returning false refuses the hit.
    fn take_damage(
        &self,
        _e: &mut Entity,
        _tag: DamageTag,
        _from: &FixtureView,
        _fx: &mut Fx,
    ) -> bool {
        false
    }

    /// Damage negotiation, damager side, after a successful hit
    fn on_damage_inflicted(&self, _e: &mut Entity, _fx: &mut Fx) {}

    /// Death chain: runs exactly once per life, after `explode` succeeded.
    /// Spawns enqueued here are the entity's bounded child chain.
    fn on_explode(&self, _e: &mut Entity, _fx: &mut Fx) {}
}

/// Cyclic timed multi-state behavior (idle -> warn -> active -> cooldown ->
/// ...). The current state's name doubles as the presentation behavior key.
#[derive(Debug, Clone, PartialEq)]
pub struct StateLoop {
    states: Vec<(&'static str, f32)>,
    index: usize,
    timer: Timer,
}

impl StateLoop {
    /// Panics if `states` is empty; loops are authored statically.
    pub fn new(states: Vec<(&'static str, f32)>) -> Self {
        assert!(!states.is_empty(), "state loop needs at least one state");
        let timer = Timer::new(states[0].1);
        Self {
            states,
            index: 0,
            timer,
        }
    }

    pub fn current(&self) -> &'static str {
        self.states[self.index].0
    }

    /// Advance; returns true on the tick the loop moves to the next state
    pub fn update(&mut self, dt: f32) -> bool {
        if self.timer.update(dt) {
            self.index = (self.index + 1) % self.states.len();
            self.timer.reset_with(self.states[self.index].1);
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.timer.reset_with(self.states[0].1);
    }
}

/// At-most-one-in-flight child handle.
///
/// "No live child" and "child destroyed" are the same empty state: the world
/// sweep clears the slot when the referenced entity leaves play, so holders
/// never observe a dangling id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChildSlot(Option<EntityId>);

impl ChildSlot {
    pub fn empty() -> Self {
        Self(None)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn get(&self) -> Option<EntityId> {
        self.0
    }

    /// Occupy the slot. Panics in debug builds if a child is already live;
    /// suppliers must check `is_empty` first.
    pub fn set(&mut self, id: EntityId) {
        debug_assert!(self.0.is_none(), "child slot already occupied");
        self.0 = Some(id);
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_loop_cycles() {
        let mut cycle = StateLoop::new(vec![("idle", 1.0), ("warn", 0.5), ("active", 2.0)]);
        assert_eq!(cycle.current(), "idle");
        assert!(!cycle.update(0.5));
        assert!(cycle.update(0.6));
        assert_eq!(cycle.current(), "warn");
        assert!(cycle.update(0.5));
        assert_eq!(cycle.current(), "active");
        assert!(cycle.update(2.0));
        assert_eq!(cycle.current(), "idle");
    }

    #[test]
    fn test_state_loop_reset() {
        let mut cycle = StateLoop::new(vec![("a", 0.1), ("b", 0.1)]);
        cycle.update(0.2);
        assert_eq!(cycle.current(), "b");
        cycle.reset();
        assert_eq!(cycle.current(), "a");
    }

    #[test]
    fn test_child_slot_collapses_states() {
        let mut slot = ChildSlot::empty();
        assert!(slot.is_empty());
        slot.set(EntityId(3));
        assert_eq!(slot.get(), Some(EntityId(3)));
        slot.clear();
        assert!(slot.is_empty());
        assert_eq!(slot, ChildSlot::empty());
    }
}
