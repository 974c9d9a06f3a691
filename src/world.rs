//! Fixed-timestep frame orchestration
//!
//! The world owns the pool, the kind registry, the open-contact ledger, and
//! the outbound queues. Each `step` runs four phases in a fixed order:
//! pre-process, contact dispatch, update, sweep. Destruction and spawning
//! are never interleaved with dispatch; handlers only mark lifecycles and
//! enqueue spawns, and the sweep finalizes both at end of frame.
//!
//! Determinism: seeded RNG, slot-ordered iteration, and a single id counter.
//! Two worlds built with the same registry, seed, and inputs stay identical.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::catalog;
use crate::config::Tuning;
use crate::contact::{ContactEvent, ContactLedger, FixtureRef, FixtureView, ProcessState};
use crate::entity::{Entity, EntityId, EntityKind};
use crate::events::{Cue, EventKey, Outbox};
use crate::fixture::FixtureKind;
use crate::lifecycle::Phase;
use crate::pool::{Pool, Registry, SpawnRequest};
use crate::props::{SpawnError, SpawnProps, keys};
use crate::shape::Rect;

/// Frame-scoped effect context handed to behavior hooks.
///
/// Everything a handler may do besides mutating its own entity goes through
/// here: enqueue child spawns, play cues, publish events, draw random
/// numbers. Spawns are deferred; the returned id is valid immediately as a
/// handle but the child only enters play at the end-of-frame sweep.
pub struct Fx<'a> {
    pub tick: u64,
    pub viewport: Rect,
    pub tuning: &'a Tuning,
    pub rng: &'a mut Pcg32,
    outbox: &'a mut Outbox,
    spawns: &'a mut Vec<SpawnRequest>,
    next_id: &'a mut u32,
}

impl Fx<'_> {
    /// Enqueue a child spawn. The id is allocated up front so the caller can
    /// hold a handle to the child before it exists.
    pub fn spawn(&mut self, kind: EntityKind, props: SpawnProps) -> EntityId {
        *self.next_id += 1;
        let id = EntityId(*self.next_id);
        self.spawns.push(SpawnRequest { id, kind, props });
        id
    }

    pub fn cue(&mut self, cue: Cue) {
        self.outbox.play_cue(cue);
    }

    pub fn publish(&mut self, key: EventKey) {
        self.outbox.publish(key);
    }
}

/// The hazard/projectile world
pub struct World {
    pool: Pool,
    registry: Registry,
    ledger: ContactLedger,
    outbox: Outbox,
    spawn_queue: Vec<SpawnRequest>,
    rng: Pcg32,
    pub viewport: Rect,
    pub tuning: Tuning,
    tick: u64,
    next_id: u32,
}

impl World {
    pub fn new(registry: Registry, tuning: Tuning, viewport: Rect, seed: u64) -> Self {
        Self {
            pool: Pool::new(),
            registry,
            ledger: ContactLedger::default(),
            outbox: Outbox::default(),
            spawn_queue: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            viewport,
            tuning,
            tick: 0,
            next_id: 0,
        }
    }

    /// World with the standard behavior catalog and default tuning
    pub fn standard(viewport: Rect, seed: u64) -> Self {
        let tuning = Tuning::default();
        let registry = catalog::standard_registry(&tuning);
        Self::new(registry, tuning, viewport, seed)
    }

    /// Spawn an entity immediately, along with any children its `on_spawn`
    /// enqueued. A configuration error returns the slot to the pool and
    /// propagates.
    pub fn spawn(&mut self, kind: EntityKind, props: SpawnProps) -> Result<EntityId, SpawnError> {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        self.spawn_now(id, kind, &props)?;
        self.apply_spawn_queue()?;
        Ok(id)
    }

    /// Per-frame tick. `contacts` are the fixture-pair transitions the
    /// physics engine detected since the last step.
    pub fn step(&mut self, dt: f32, contacts: &[ContactEvent]) -> Result<(), SpawnError> {
        self.tick += 1;

        // 1. Pre-process: fixtures follow the body, behaviors toggle them
        for i in self.pool.live_indices() {
            let Some(kind) = self.pool.entity_at(i).map(|e| e.kind) else {
                continue;
            };
            let behavior = self.registry.get(kind)?.behavior;
            if let Some(e) = self.pool.entity_at_mut(i) {
                let pos = e.pos;
                for f in &mut e.fixtures {
                    f.follow_body(pos);
                }
                behavior.pre_process(e);
            }
        }

        // 2. Contact dispatch, ledger-filtered
        for &event in contacts {
            let Some(event) = self.ledger.admit(event) else {
                continue;
            };
            self.dispatch(event)?;
        }

        // 3. Integrate, behavior update, cull checks
        for i in self.pool.live_indices() {
            let Some(kind) = self.pool.entity_at(i).map(|e| e.kind) else {
                continue;
            };
            let behavior = self.registry.get(kind)?.behavior;
            let viewport = self.viewport;
            let (pool, mut fx) = self.split();
            let Some(e) = pool.entity_at_mut(i) else {
                continue;
            };

            e.vel += e.gravity * dt;
            e.pos += e.vel * dt;
            if let Some(grace) = &mut e.contact_grace {
                grace.update(dt);
            }
            behavior.update(e, dt, &mut fx);

            let in_bounds = match &e.lifecycle.cull.bounds {
                Some(b) => {
                    let reach = Rect::new(viewport.center, viewport.half + Vec2::splat(b.range));
                    reach.overlaps(&e.bounds())
                }
                None => true,
            };
            e.lifecycle.update(dt, in_bounds);
        }

        // 4. Death chains: exactly once per exploding life
        for i in self.pool.live_indices() {
            let needs = self
                .pool
                .entity_at(i)
                .is_some_and(|e| e.lifecycle.needs_death_handling());
            if !needs {
                continue;
            }
            let Some(kind) = self.pool.entity_at(i).map(|e| e.kind) else {
                continue;
            };
            let behavior = self.registry.get(kind)?.behavior;
            let (pool, mut fx) = self.split();
            if let Some(e) = pool.entity_at_mut(i) {
                behavior.on_explode(e, &mut fx);
                e.lifecycle.mark_death_handled();
            }
        }

        // 5. Sweep: terminal -> pooled, stale child handles, deferred spawns
        self.sweep()?;
        Ok(())
    }

    /// Deliver an inbound event; subscribed entities are destroyed at the
    /// next sweep.
    pub fn publish(&mut self, key: EventKey) {
        for i in self.pool.live_indices() {
            if let Some(e) = self.pool.entity_at_mut(i) {
                e.lifecycle.on_event(key);
            }
        }
    }

    /// Take everything queued for the embedder this frame
    pub fn drain_outbox(&mut self) -> (Vec<Cue>, Vec<EventKey>) {
        self.outbox.drain()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.pool.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.pool.get_mut(id)
    }

    pub fn is_live(&self, id: EntityId) -> bool {
        self.pool.is_live(id)
    }

    pub fn live_count(&self) -> usize {
        self.pool.live_count()
    }

    pub fn live_ids(&self) -> Vec<EntityId> {
        self.pool.live_ids()
    }

    pub fn slot_count(&self) -> usize {
        self.pool.slot_count()
    }

    pub fn open_contacts(&self) -> usize {
        self.ledger.open_count()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Presentation key for a live entity
    pub fn behavior_key(&self, id: EntityId) -> Option<&'static str> {
        self.pool.get(id).map(Entity::behavior_key)
    }

    /// Borrow the pool and an effect context at the same time
    fn split(&mut self) -> (&mut Pool, Fx<'_>) {
        (
            &mut self.pool,
            Fx {
                tick: self.tick,
                viewport: self.viewport,
                tuning: &self.tuning,
                rng: &mut self.rng,
                outbox: &mut self.outbox,
                spawns: &mut self.spawn_queue,
                next_id: &mut self.next_id,
            },
        )
    }

    fn spawn_now(
        &mut self,
        id: EntityId,
        kind: EntityKind,
        props: &SpawnProps,
    ) -> Result<(), SpawnError> {
        let arche = self.registry.get(kind)?;
        let index = self.pool.fetch(kind, arche, id);
        match self.configure(index, kind, props) {
            Ok(()) => {
                log::debug!("spawned {:?} as {:?}", kind, id);
                Ok(())
            }
            Err(err) => {
                log::error!("spawn of {:?} failed: {}", kind, err);
                self.pool.release(index);
                Err(err)
            }
        }
    }

    /// Common spawn configuration, then the behavior's `on_spawn`
    fn configure(
        &mut self,
        index: usize,
        kind: EntityKind,
        props: &SpawnProps,
    ) -> Result<(), SpawnError> {
        let arche = self.registry.get(kind)?;
        let behavior = arche.behavior;
        let disintegrate = arche.disintegrate;
        let mut cull = arche.cull.clone();
        if let Some(secs) = props.0.f32(keys::CULL_TIME) {
            cull.ttl = Some(crate::lifecycle::Timer::new(secs));
        }
        if props.0.bool(keys::CULL_OUT_OF_BOUNDS) == Some(true) {
            cull.bounds = Some(crate::lifecycle::BoundsCull {
                range: self.tuning.cull_range,
                grace: crate::lifecycle::Timer::new(self.tuning.cull_grace),
            });
        }
        let position = props.position()?;

        let (pool, mut fx) = self.split();
        let Some(e) = pool.entity_at_mut(index) else {
            return Ok(());
        };
        e.pos = position;
        e.owner = props.owner();
        if let Some(facing) = props.0.dir(keys::FACING) {
            e.facing = facing;
        }
        if let Some(gravity) = props.0.vec2(keys::GRAVITY) {
            e.gravity = gravity;
        }
        if let Some(grace) = props.0.f32(keys::CONTACT_GRACE) {
            e.contact_grace = Some(crate::lifecycle::Timer::new(grace));
        }
        e.lifecycle.begin_spawn(cull, disintegrate);
        behavior.on_spawn(e, props, &mut fx)?;
        e.lifecycle.activate();
        let pos = e.pos;
        for f in &mut e.fixtures {
            f.follow_body(pos);
        }
        Ok(())
    }

    /// Apply deferred spawns, including the ones those spawns enqueue.
    ///
    /// One malformed request never strands its siblings: the whole chain is
    /// drained either way, and the first error surfaces afterward.
    fn apply_spawn_queue(&mut self) -> Result<(), SpawnError> {
        let mut first_err = None;
        while !self.spawn_queue.is_empty() {
            let batch: Vec<SpawnRequest> = self.spawn_queue.drain(..).collect();
            for req in batch {
                if let Err(err) = self.spawn_now(req.id, req.kind, &req.props) {
                    log::error!("deferred spawn of {:?} failed: {err}", req.kind);
                    first_err.get_or_insert(err);
                }
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn view(&self, fref: FixtureRef) -> Option<FixtureView> {
        let e = self.pool.get(fref.entity)?;
        if !e.accepts_contacts() {
            return None;
        }
        FixtureView::snapshot(e, fref.fixture)
    }

    /// Route one admitted contact to both sides
    fn dispatch(&mut self, event: ContactEvent) -> Result<(), SpawnError> {
        let (Some(va), Some(vb)) = (self.view(event.a), self.view(event.b)) else {
            return Ok(());
        };
        self.dispatch_side(event.a.entity, &va, &vb, event.state)?;
        self.dispatch_side(event.b.entity, &vb, &va, event.state)?;
        Ok(())
    }

    fn dispatch_side(
        &mut self,
        me: EntityId,
        mine: &FixtureView,
        other: &FixtureView,
        state: ProcessState,
    ) -> Result<(), SpawnError> {
        let Some(kind) = self.pool.get(me).map(|e| e.kind) else {
            return Ok(());
        };
        let behavior = self.registry.get(kind)?.behavior;

        // Damager/damageable pairs negotiate instead of routing to a handler;
        // the damageable side drives so the pair resolves exactly once
        if mine.kind == FixtureKind::Damageable && other.kind == FixtureKind::Damager {
            if state == ProcessState::Begin {
                self.negotiate_damage(me, other)?;
            }
            return Ok(());
        }

        let (pool, mut fx) = self.split();
        let Some(e) = pool.get_mut(me) else {
            return Ok(());
        };

        if mine.kind == FixtureKind::Consumer {
            behavior.consume(e, other, state, &mut fx);
            return Ok(());
        }

        match other.kind {
            FixtureKind::Block => behavior.hit_block(e, mine, other, state, &mut fx),
            FixtureKind::Body => behavior.hit_body(e, mine, other, state, &mut fx),
            FixtureKind::Shield => behavior.hit_shield(e, mine, other, state, &mut fx),
            FixtureKind::Projectile => behavior.hit_projectile(e, mine, other, state, &mut fx),
            FixtureKind::Sand => behavior.hit_sand(e, mine, other, state, &mut fx),
            FixtureKind::Water => behavior.hit_water(e, mine, other, state, &mut fx),
            FixtureKind::Laser => behavior.hit_laser(e, mine, other, state, &mut fx),
            FixtureKind::Death => behavior.hit_death(e, mine, other, state, &mut fx),
            _ => {}
        }
        Ok(())
    }

    /// Begin-contact damage negotiation between a damager and a damageable
    fn negotiate_damage(
        &mut self,
        defender: EntityId,
        attacker_view: &FixtureView,
    ) -> Result<(), SpawnError> {
        let attacker = attacker_view.entity;
        let (Some(atk), Some(def)) = (self.pool.get(attacker), self.pool.get(defender)) else {
            return Ok(());
        };
        if !atk.can_damage(def) {
            return Ok(());
        }
        let tag = atk.deals;
        let def_behavior = self.registry.get(def.kind)?.behavior;
        let atk_behavior = self.registry.get(atk.kind)?.behavior;

        let accepted = {
            let (pool, mut fx) = self.split();
            match pool.get_mut(defender) {
                Some(e) => def_behavior.take_damage(e, tag, attacker_view, &mut fx),
                None => false,
            }
        };
        if accepted {
            log::debug!("{:?} damaged {:?} ({:?})", attacker, defender, tag);
            let (pool, mut fx) = self.split();
            if let Some(e) = pool.get_mut(attacker) {
                atk_behavior.on_damage_inflicted(e, &mut fx);
            }
        }
        Ok(())
    }

    /// End-of-frame finalization
    fn sweep(&mut self) -> Result<(), SpawnError> {
        let mut dead: Vec<(usize, EntityId)> = Vec::new();
        for i in self.pool.live_indices() {
            if let Some(e) = self.pool.entity_at(i)
                && e.lifecycle.phase() == Phase::Terminal
            {
                dead.push((i, e.id));
            }
        }
        for (i, id) in dead {
            log::debug!("destroyed {:?}", id);
            self.ledger.close_for(id);
            if let Some(e) = self.pool.entity_at_mut(i) {
                e.lifecycle.pool();
            }
            self.pool.release(i);
        }

        // Queued children enter play before the stale-slot pass; a slot set
        // this frame holds a pre-allocated id that is not live yet, and
        // clearing it here would let the supplier double up
        self.apply_spawn_queue()?;

        // A supplier whose child just left play gets its slot back
        let stale: Vec<usize> = self
            .pool
            .live_indices()
            .into_iter()
            .filter(|&i| {
                self.pool
                    .entity_at(i)
                    .and_then(|e| e.child.get())
                    .is_some_and(|child| !self.pool.is_live(child))
            })
            .collect();
        for i in stale {
            if let Some(e) = self.pool.entity_at_mut(i) {
                e.child.clear();
            }
        }
        Ok(())
    }
}
