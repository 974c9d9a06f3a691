//! The standard behavior catalog
//!
//! Concrete hazards and projectiles built on the behavior contract. Each
//! kind is a stateless unit struct; everything mutable lives on the entity,
//! and everything tunable comes from [`Tuning`] through the effect context.
//!
//! The roster covers the structurally distinct shapes: a bouncing shot, a
//! charging shot with directional shield parry, a break-apart boulder chain,
//! a shattering ice cube, a timed blast, a single-child drip supplier, and a
//! cyclic flame vent. `Barrier`, `Aegis`, `Quicksand`, `Beam`, and `Pit` are
//! the static level pieces the others collide with.

use glam::Vec2;
use rand::Rng;

use crate::Direction;
use crate::behavior::{Behavior, StateLoop};
use crate::config::Tuning;
use crate::consts;
use crate::contact::{FixtureView, ProcessState};
use crate::entity::{DamageTag, Entity, EntityKind, Faction, Variant};
use crate::events::{Cue, EventKey};
use crate::fixture::{FixtureDef, FixtureKind};
use crate::lifecycle::{BoundsCull, CullConfig, Phase, Timer};
use crate::pool::{Archetype, Registry};
use crate::props::{PropValue, SpawnError, SpawnProps, keys};
use crate::response::{self, BounceOutcome};
use crate::world::Fx;

/// Scratch key: push-out direction recorded at the fatal impact, read back
/// by the death chain to orient break-apart impulses
const STRUCK: &str = "struck";
/// Scratch key: something overlaps the supplier's sensor this frame
const PRIMED: &str = "primed";

/// Shared shield response: count the bounce, then either explode or take the
/// deflected trajectory and switch sides to the shield's owner.
fn deflect(e: &mut Entity, mine: &FixtureView, other: &FixtureView, fx: &mut Fx) {
    if e.bounce.register() == BounceOutcome::Exhausted {
        e.lifecycle.explode();
        return;
    }
    let struck = response::push_direction(&mine.shape, &other.shape);
    e.vel = response::deflect_off_shield(
        e.vel,
        struck,
        other.deflect(),
        fx.tuning.shield_reflect_speed,
    );
    e.owner = Some(other.entity);
    e.lifecycle.enter(Phase::Bouncing);
    fx.cue(Cue::Deflect);
}

/// Shared projectile death chain: one blast, attributed to the projectile's
/// owner so the child cannot hurt whoever fired it.
fn explode_into_blast(e: &Entity, fx: &mut Fx) {
    fx.cue(Cue::Explosion);
    let owner = e.owner.unwrap_or(e.id);
    fx.spawn(
        EntityKind::Blast,
        SpawnProps::at(e.pos).with(keys::OWNER, PropValue::Entity(owner)),
    );
}

/// Plain shot: flies straight, deflects off shields up to its bounce budget,
/// explodes on terrain or on a successful hit.
struct Slug;

impl Behavior for Slug {
    fn on_spawn(&self, e: &mut Entity, props: &SpawnProps, _fx: &mut Fx) -> Result<(), SpawnError> {
        e.vel = props.trajectory()?;
        Ok(())
    }

    fn hit_block(
        &self,
        e: &mut Entity,
        _mine: &FixtureView,
        _other: &FixtureView,
        state: ProcessState,
        fx: &mut Fx,
    ) {
        if state == ProcessState::Begin && e.lifecycle.explode() {
            fx.cue(Cue::Thump);
        }
    }

    fn hit_shield(
        &self,
        e: &mut Entity,
        mine: &FixtureView,
        other: &FixtureView,
        state: ProcessState,
        fx: &mut Fx,
    ) {
        if state == ProcessState::Begin {
            deflect(e, mine, other, fx);
        }
    }

    fn hit_sand(
        &self,
        e: &mut Entity,
        _mine: &FixtureView,
        _other: &FixtureView,
        state: ProcessState,
        fx: &mut Fx,
    ) {
        // Swallowed whole, no blast
        if state == ProcessState::Begin {
            e.lifecycle.kill();
            fx.cue(Cue::Thump);
        }
    }

    fn hit_water(
        &self,
        e: &mut Entity,
        _mine: &FixtureView,
        _other: &FixtureView,
        state: ProcessState,
        _fx: &mut Fx,
    ) {
        // Fizzles out, no blast
        if state == ProcessState::Begin {
            e.lifecycle.kill();
        }
    }

    fn on_damage_inflicted(&self, e: &mut Entity, _fx: &mut Fx) {
        e.lifecycle.explode();
    }

    fn on_explode(&self, e: &mut Entity, fx: &mut Fx) {
        explode_into_blast(e, fx);
    }
}

/// Charged shot: holds still through a charge delay, then flies its stored
/// trajectory. Directional shields parry it at fixed speed.
struct ChargeBolt;

impl Behavior for ChargeBolt {
    fn on_spawn(&self, e: &mut Entity, props: &SpawnProps, fx: &mut Fx) -> Result<(), SpawnError> {
        let trajectory = props.trajectory()?;
        e.props.put(keys::TRAJECTORY, PropValue::Vec2(trajectory));
        e.charge = Some(Timer::new(fx.tuning.bolt_charge_time));
        e.lifecycle.enter(Phase::Charging);
        let owner = e.owner.unwrap_or(e.id);
        fx.spawn(
            EntityKind::Residual,
            SpawnProps::at(e.pos).with(keys::OWNER, PropValue::Entity(owner)),
        );
        Ok(())
    }

    fn update(&self, e: &mut Entity, dt: f32, _fx: &mut Fx) {
        if e.lifecycle.phase() == Phase::Charging
            && let Some(charge) = &mut e.charge
            && charge.update(dt)
        {
            e.vel = e.props.vec2(keys::TRAJECTORY).unwrap_or(Vec2::ZERO);
            e.lifecycle.enter(Phase::Active);
        }
    }

    fn hit_block(
        &self,
        e: &mut Entity,
        _mine: &FixtureView,
        _other: &FixtureView,
        state: ProcessState,
        fx: &mut Fx,
    ) {
        if state == ProcessState::Begin && e.lifecycle.explode() {
            fx.cue(Cue::Thump);
        }
    }

    fn hit_shield(
        &self,
        e: &mut Entity,
        mine: &FixtureView,
        other: &FixtureView,
        state: ProcessState,
        fx: &mut Fx,
    ) {
        // Untouchable while still charging
        if state == ProcessState::Begin && e.lifecycle.phase() != Phase::Charging {
            deflect(e, mine, other, fx);
        }
    }

    fn on_damage_inflicted(&self, e: &mut Entity, _fx: &mut Fx) {
        e.lifecycle.explode();
    }

    fn on_explode(&self, e: &mut Entity, fx: &mut Fx) {
        explode_into_blast(e, fx);
    }
}

/// Short-lived muzzle residue left behind by a charge bolt
struct Residual;

impl Behavior for Residual {
    fn on_spawn(&self, _e: &mut Entity, _props: &SpawnProps, _fx: &mut Fx) -> Result<(), SpawnError> {
        Ok(())
    }
}

fn variant_scale(variant: Variant) -> f32 {
    match variant {
        Variant::Large => 1.0,
        Variant::Medium => 0.5,
        Variant::Small => 0.25,
    }
}

/// Falling boulder: large and medium break apart into four of the next size
/// down, thrown along an impulse table rotated toward the struck face; small
/// ones just crumble.
struct Boulder;

impl Boulder {
    fn record_struck_and_explode(&self, e: &mut Entity, struck: Direction, fx: &mut Fx) {
        e.props.put(STRUCK, PropValue::Dir(struck));
        if e.lifecycle.explode() {
            fx.cue(Cue::Quake);
        }
    }
}

impl Behavior for Boulder {
    fn on_spawn(&self, e: &mut Entity, props: &SpawnProps, fx: &mut Fx) -> Result<(), SpawnError> {
        e.variant = match props.0.str(keys::VARIANT) {
            Some("medium") => Variant::Medium,
            Some("small") => Variant::Small,
            _ => Variant::Large,
        };
        let scale = variant_scale(e.variant);
        e.half *= scale;
        for f in &mut e.fixtures {
            f.shape.half *= scale;
        }
        if let Some(trajectory) = props.0.vec2(keys::TRAJECTORY) {
            e.vel = trajectory;
        }
        // Fragments spawn overlapping whatever killed the parent
        if e.contact_grace.is_none() {
            e.contact_grace = Some(Timer::new(fx.tuning.boulder_contact_grace));
        }
        Ok(())
    }

    fn hit_block(
        &self,
        e: &mut Entity,
        mine: &FixtureView,
        other: &FixtureView,
        state: ProcessState,
        fx: &mut Fx,
    ) {
        if state == ProcessState::Begin {
            let struck = response::push_direction(&mine.shape, &other.shape);
            self.record_struck_and_explode(e, struck, fx);
        }
    }

    fn hit_body(
        &self,
        e: &mut Entity,
        mine: &FixtureView,
        other: &FixtureView,
        state: ProcessState,
        fx: &mut Fx,
    ) {
        if state == ProcessState::Begin {
            let struck = response::push_direction(&mine.shape, &other.shape);
            self.record_struck_and_explode(e, struck, fx);
        }
    }

    fn take_damage(
        &self,
        e: &mut Entity,
        _tag: DamageTag,
        from: &FixtureView,
        fx: &mut Fx,
    ) -> bool {
        e.hits += 1;
        if e.hits >= e.max_hits {
            let struck = response::push_direction(&e.bounds(), &from.shape);
            self.record_struck_and_explode(e, struck, fx);
        }
        true
    }

    fn on_explode(&self, e: &mut Entity, fx: &mut Fx) {
        fx.cue(Cue::Shatter);
        let next = match e.variant {
            Variant::Large => "medium",
            Variant::Medium => "small",
            Variant::Small => return,
        };
        let struck = e.props.dir(STRUCK).unwrap_or(Direction::Up);
        let owner = e.owner.unwrap_or(e.id);
        let impulses = fx.tuning.boulder_impulses.clone();
        for impulse in impulses {
            fx.spawn(
                EntityKind::Boulder,
                SpawnProps::at(e.pos)
                    .with(keys::VARIANT, PropValue::Str(next.into()))
                    .with(keys::TRAJECTORY, PropValue::Vec2(struck.rotate(impulse)))
                    .with(keys::OWNER, PropValue::Entity(owner)),
            );
        }
    }
}

/// Ice cube: bounces off terrain, absorbs a few hits, then shatters into
/// exactly one shard per entry of the fixed impulse table.
struct IceCube;

impl Behavior for IceCube {
    fn on_spawn(&self, e: &mut Entity, props: &SpawnProps, _fx: &mut Fx) -> Result<(), SpawnError> {
        if let Some(trajectory) = props.0.vec2(keys::TRAJECTORY) {
            e.vel = trajectory;
        }
        Ok(())
    }

    fn hit_block(
        &self,
        e: &mut Entity,
        mine: &FixtureView,
        other: &FixtureView,
        state: ProcessState,
        fx: &mut Fx,
    ) {
        if state != ProcessState::Begin {
            return;
        }
        // A spent bounce budget shatters the cube no matter the geometry
        if e.bounce.register() == BounceOutcome::Exhausted {
            e.lifecycle.explode();
            return;
        }
        let struck = response::push_direction(&mine.shape, &other.shape);
        e.vel = response::bounce(e.vel, struck, fx.tuning.restitution);
        e.lifecycle.enter(Phase::Bouncing);
        fx.cue(Cue::Thump);
    }

    fn hit_laser(
        &self,
        e: &mut Entity,
        _mine: &FixtureView,
        _other: &FixtureView,
        state: ProcessState,
        _fx: &mut Fx,
    ) {
        // Beams cut straight through the ice
        if state == ProcessState::Begin {
            e.lifecycle.explode();
        }
    }

    fn take_damage(
        &self,
        e: &mut Entity,
        _tag: DamageTag,
        _from: &FixtureView,
        _fx: &mut Fx,
    ) -> bool {
        e.hits += 1;
        if e.hits >= e.max_hits {
            e.lifecycle.explode();
        }
        true
    }

    fn on_explode(&self, e: &mut Entity, fx: &mut Fx) {
        fx.cue(Cue::Shatter);
        let owner = e.owner.unwrap_or(e.id);
        let impulses = fx.tuning.shard_impulses.clone();
        for impulse in impulses {
            fx.spawn(
                EntityKind::Shard,
                SpawnProps::at(e.pos)
                    .with(keys::TRAJECTORY, PropValue::Vec2(impulse))
                    .with(keys::OWNER, PropValue::Entity(owner)),
            );
        }
    }
}

/// Ice debris; hurts what it lands on, gone on the first surface or timeout
struct Shard;

impl Behavior for Shard {
    fn on_spawn(&self, e: &mut Entity, props: &SpawnProps, _fx: &mut Fx) -> Result<(), SpawnError> {
        e.vel = props.trajectory()?;
        Ok(())
    }

    fn hit_block(
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
}

/// Stationary explosion: the damager fixture is only live during the active
/// window, then the blast removes itself.
struct Blast;

impl Behavior for Blast {
    fn on_spawn(&self, e: &mut Entity, _props: &SpawnProps, fx: &mut Fx) -> Result<(), SpawnError> {
        e.delay = Some(Timer::new(fx.tuning.blast_active_time));
        Ok(())
    }

    fn pre_process(&self, e: &mut Entity) {
        let live = e.delay.as_ref().is_some_and(|d| !d.is_finished());
        for f in &mut e.fixtures {
            if f.kind() == FixtureKind::Damager {
                f.active = live;
            }
        }
    }

    fn update(&self, e: &mut Entity, dt: f32, _fx: &mut Fx) {
        if let Some(delay) = &mut e.delay
            && delay.update(dt)
        {
            e.lifecycle.kill();
        }
    }
}

/// Drip supplier: while something overlaps its sensor it drips on a
/// randomized delay, never holding more than one live drip. The world sweep
/// hands the slot back when the drip leaves play.
struct GoopDripper;

impl Behavior for GoopDripper {
    fn on_spawn(&self, e: &mut Entity, _props: &SpawnProps, fx: &mut Fx) -> Result<(), SpawnError> {
        let (lo, hi) = (fx.tuning.drip_delay_min, fx.tuning.drip_delay_max);
        e.delay = Some(Timer::new(fx.rng.random_range(lo..=hi)));
        Ok(())
    }

    fn pre_process(&self, e: &mut Entity) {
        e.props.put(PRIMED, PropValue::Bool(false));
    }

    fn consume(&self, e: &mut Entity, _other: &FixtureView, state: ProcessState, _fx: &mut Fx) {
        if matches!(state, ProcessState::Begin | ProcessState::Continue) {
            e.props.put(PRIMED, PropValue::Bool(true));
        }
    }

    fn update(&self, e: &mut Entity, dt: f32, fx: &mut Fx) {
        // The delay only runs while the slot is free and the sensor is hot
        if !e.child.is_empty() || e.props.bool(PRIMED) != Some(true) {
            return;
        }
        if let Some(delay) = &mut e.delay
            && delay.update(dt)
        {
            let mouth = e.pos - Vec2::new(0.0, e.half.y);
            let child = fx.spawn(
                EntityKind::GoopDrip,
                SpawnProps::at(mouth).with(keys::OWNER, PropValue::Entity(e.id)),
            );
            e.child.set(child);
            let (lo, hi) = (fx.tuning.drip_delay_min, fx.tuning.drip_delay_max);
            e.delay = Some(Timer::new(fx.rng.random_range(lo..=hi)));
            fx.cue(Cue::Drip);
        }
    }
}

/// A falling drip; splats on the first surface
struct GoopDrip;

impl Behavior for GoopDrip {
    fn on_spawn(&self, _e: &mut Entity, _props: &SpawnProps, _fx: &mut Fx) -> Result<(), SpawnError> {
        Ok(())
    }

    fn hit_block(
        &self,
        e: &mut Entity,
        _mine: &FixtureView,
        _other: &FixtureView,
        state: ProcessState,
        fx: &mut Fx,
    ) {
        if state == ProcessState::Begin {
            e.lifecycle.kill();
            fx.cue(Cue::Drip);
        }
    }
}

/// Cyclic vent: idle, warn, active, cooldown. The flame damager only exists
/// during the active window.
struct FlameVent;

impl Behavior for FlameVent {
    fn on_spawn(&self, e: &mut Entity, _props: &SpawnProps, fx: &mut Fx) -> Result<(), SpawnError> {
        let t = fx.tuning;
        e.cycle = Some(StateLoop::new(vec![
            ("idle", t.flame_idle),
            ("warn", t.flame_warn),
            ("active", t.flame_active),
            ("cooldown", t.flame_cooldown),
        ]));
        Ok(())
    }

    fn pre_process(&self, e: &mut Entity) {
        let burning = e.cycle.as_ref().is_some_and(|c| c.current() == "active");
        for f in &mut e.fixtures {
            if f.kind() == FixtureKind::Damager {
                f.active = burning;
            }
        }
    }

    fn update(&self, e: &mut Entity, dt: f32, fx: &mut Fx) {
        if let Some(cycle) = &mut e.cycle
            && cycle.update(dt)
            && cycle.current() == "active"
        {
            fx.cue(Cue::FlameBurst);
        }
    }
}

/// Static terrain
struct Barrier;

impl Behavior for Barrier {
    fn on_spawn(&self, _e: &mut Entity, _props: &SpawnProps, _fx: &mut Fx) -> Result<(), SpawnError> {
        Ok(())
    }
}

/// Static deflector; an optional `deflect` spawn parameter lands on the
/// shield fixture for projectiles to read.
struct Aegis;

impl Behavior for Aegis {
    fn on_spawn(&self, e: &mut Entity, props: &SpawnProps, _fx: &mut Fx) -> Result<(), SpawnError> {
        if let Some(dir) = props.0.dir(keys::DEFLECT)
            && let Some(f) = e.fixtures.first_mut()
        {
            f.props.put(keys::DEFLECT, PropValue::Dir(dir));
        }
        Ok(())
    }
}

/// Loose sand that swallows projectiles
struct Quicksand;

impl Behavior for Quicksand {
    fn on_spawn(&self, _e: &mut Entity, _props: &SpawnProps, _fx: &mut Fx) -> Result<(), SpawnError> {
        Ok(())
    }
}

/// Static beam segment
struct Beam;

impl Behavior for Beam {
    fn on_spawn(&self, _e: &mut Entity, _props: &SpawnProps, _fx: &mut Fx) -> Result<(), SpawnError> {
        Ok(())
    }
}

/// Instant-kill region
struct Pit;

impl Behavior for Pit {
    fn on_spawn(&self, _e: &mut Entity, _props: &SpawnProps, _fx: &mut Fx) -> Result<(), SpawnError> {
        Ok(())
    }
}

static SLUG: Slug = Slug;
static CHARGE_BOLT: ChargeBolt = ChargeBolt;
static RESIDUAL: Residual = Residual;
static BOULDER: Boulder = Boulder;
static ICE_CUBE: IceCube = IceCube;
static SHARD: Shard = Shard;
static BLAST: Blast = Blast;
static GOOP_DRIPPER: GoopDripper = GoopDripper;
static GOOP_DRIP: GoopDrip = GoopDrip;
static FLAME_VENT: FlameVent = FlameVent;
static BARRIER: Barrier = Barrier;
static AEGIS: Aegis = Aegis;
static QUICKSAND: Quicksand = Quicksand;
static BEAM: Beam = Beam;
static PIT: Pit = Pit;

/// Downward gravity applied to the kinds that fall
const FALL: Vec2 = Vec2::new(0.0, -12.5 * consts::UNITS_PER_TILE);

/// How long charge-bolt residue lingers
const RESIDUAL_LINGER: f32 = 0.5;

/// Registry with every standard kind, tuned from `t`
pub fn standard_registry(t: &Tuning) -> Registry {
    let u = consts::UNITS_PER_TILE;
    let drift = || CullConfig::out_of_bounds(t.cull_range, t.cull_grace);
    let mut r = Registry::new();

    r.register(
        EntityKind::Slug,
        Archetype {
            behavior: &SLUG,
            half: Vec2::splat(0.15 * u),
            gravity: Vec2::ZERO,
            faction: Faction::Player,
            deals: DamageTag::Ballistic,
            immune_to: Vec::new(),
            max_bounces: t.slug_max_bounces,
            max_hits: 0,
            cull: drift(),
            disintegrate: None,
            fixtures: vec![
                FixtureDef::new(FixtureKind::Projectile, Vec2::splat(0.15 * u)),
                FixtureDef::new(FixtureKind::Damager, Vec2::splat(0.15 * u)),
            ],
        },
    );

    r.register(
        EntityKind::ChargeBolt,
        Archetype {
            behavior: &CHARGE_BOLT,
            half: Vec2::splat(0.25 * u),
            gravity: Vec2::ZERO,
            faction: Faction::Player,
            deals: DamageTag::Blast,
            immune_to: Vec::new(),
            max_bounces: t.bolt_max_bounces,
            max_hits: 0,
            cull: drift(),
            disintegrate: Some(0.15),
            fixtures: vec![
                FixtureDef::new(FixtureKind::Projectile, Vec2::splat(0.25 * u)),
                FixtureDef::new(FixtureKind::Damager, Vec2::splat(0.25 * u)),
            ],
        },
    );

    r.register(
        EntityKind::Residual,
        Archetype {
            behavior: &RESIDUAL,
            half: Vec2::splat(0.1 * u),
            gravity: Vec2::ZERO,
            faction: Faction::Player,
            deals: DamageTag::Ballistic,
            immune_to: Vec::new(),
            max_bounces: 0,
            max_hits: 0,
            cull: CullConfig::timed(RESIDUAL_LINGER),
            disintegrate: None,
            fixtures: vec![FixtureDef::new(FixtureKind::Body, Vec2::splat(0.1 * u))],
        },
    );

    r.register(
        EntityKind::Boulder,
        Archetype {
            behavior: &BOULDER,
            half: Vec2::splat(0.5 * u),
            gravity: FALL,
            faction: Faction::Hazard,
            deals: DamageTag::Crush,
            immune_to: Vec::new(),
            max_bounces: 0,
            max_hits: 1,
            cull: drift(),
            disintegrate: None,
            fixtures: vec![
                FixtureDef::new(FixtureKind::Body, Vec2::splat(0.5 * u)),
                FixtureDef::new(FixtureKind::Damager, Vec2::splat(0.5 * u)),
                FixtureDef::new(FixtureKind::Damageable, Vec2::splat(0.5 * u)),
            ],
        },
    );

    r.register(
        EntityKind::IceCube,
        Archetype {
            behavior: &ICE_CUBE,
            half: Vec2::splat(0.25 * u),
            gravity: FALL,
            faction: Faction::Enemy,
            deals: DamageTag::Crush,
            immune_to: vec![DamageTag::Ice],
            max_bounces: t.ice_max_bounces,
            max_hits: t.ice_max_hits,
            cull: CullConfig::out_of_bounds(t.cull_range, t.cull_grace)
                .with_event(EventKey::PlayerRespawned),
            disintegrate: None,
            fixtures: vec![
                FixtureDef::new(FixtureKind::Body, Vec2::splat(0.25 * u)),
                FixtureDef::new(FixtureKind::Damageable, Vec2::splat(0.25 * u)),
            ],
        },
    );

    let mut shard_cull = CullConfig::timed(t.cull_time);
    shard_cull.bounds = Some(BoundsCull {
        range: t.cull_range,
        grace: Timer::new(t.cull_grace),
    });
    r.register(
        EntityKind::Shard,
        Archetype {
            behavior: &SHARD,
            half: Vec2::splat(0.1 * u),
            gravity: FALL,
            faction: Faction::Enemy,
            deals: DamageTag::Ice,
            immune_to: Vec::new(),
            max_bounces: 0,
            max_hits: 0,
            cull: shard_cull,
            disintegrate: None,
            fixtures: vec![
                FixtureDef::new(FixtureKind::Body, Vec2::splat(0.1 * u)),
                FixtureDef::new(FixtureKind::Damager, Vec2::splat(0.1 * u)),
            ],
        },
    );

    r.register(
        EntityKind::Blast,
        Archetype {
            behavior: &BLAST,
            half: Vec2::splat(0.4 * u),
            gravity: Vec2::ZERO,
            faction: Faction::Player,
            deals: DamageTag::Blast,
            immune_to: Vec::new(),
            max_bounces: 0,
            max_hits: 0,
            cull: CullConfig::default(),
            disintegrate: None,
            fixtures: vec![FixtureDef::new(FixtureKind::Damager, Vec2::splat(0.4 * u))],
        },
    );

    r.register(
        EntityKind::GoopDripper,
        Archetype {
            behavior: &GOOP_DRIPPER,
            half: Vec2::splat(0.5 * u),
            gravity: Vec2::ZERO,
            faction: Faction::Hazard,
            deals: DamageTag::Crush,
            immune_to: Vec::new(),
            max_bounces: 0,
            max_hits: 0,
            cull: CullConfig::default().with_event(EventKey::RoomTransitionBegin),
            disintegrate: None,
            fixtures: vec![
                FixtureDef::new(FixtureKind::Body, Vec2::splat(0.5 * u)),
                // Drip sensor hangs below the mouth
                FixtureDef::new(FixtureKind::Consumer, Vec2::new(0.5 * u, 1.5 * u))
                    .offset(Vec2::new(0.0, -2.0 * u)),
            ],
        },
    );

    r.register(
        EntityKind::GoopDrip,
        Archetype {
            behavior: &GOOP_DRIP,
            half: Vec2::splat(0.15 * u),
            gravity: FALL,
            faction: Faction::Hazard,
            deals: DamageTag::Crush,
            immune_to: Vec::new(),
            max_bounces: 0,
            max_hits: 0,
            cull: drift(),
            disintegrate: None,
            fixtures: vec![
                FixtureDef::new(FixtureKind::Body, Vec2::splat(0.15 * u)),
                FixtureDef::new(FixtureKind::Damager, Vec2::splat(0.15 * u)),
            ],
        },
    );

    r.register(
        EntityKind::FlameVent,
        Archetype {
            behavior: &FLAME_VENT,
            half: Vec2::new(0.25 * u, 0.5 * u),
            gravity: Vec2::ZERO,
            faction: Faction::Hazard,
            deals: DamageTag::Fire,
            immune_to: Vec::new(),
            max_bounces: 0,
            max_hits: 0,
            cull: CullConfig::default().with_event(EventKey::RoomTransitionBegin),
            disintegrate: None,
            fixtures: vec![
                FixtureDef::new(FixtureKind::Body, Vec2::new(0.25 * u, 0.5 * u)),
                // Flame column above the nozzle, lit only while active
                FixtureDef::new(FixtureKind::Damager, Vec2::new(0.25 * u, 1.0 * u))
                    .offset(Vec2::new(0.0, 1.5 * u))
                    .inactive(),
            ],
        },
    );

    r.register(
        EntityKind::Barrier,
        Archetype {
            behavior: &BARRIER,
            half: Vec2::splat(0.5 * u),
            gravity: Vec2::ZERO,
            faction: Faction::Hazard,
            deals: DamageTag::Crush,
            immune_to: Vec::new(),
            max_bounces: 0,
            max_hits: 0,
            cull: CullConfig::default(),
            disintegrate: None,
            fixtures: vec![FixtureDef::new(FixtureKind::Block, Vec2::splat(0.5 * u))],
        },
    );

    r.register(
        EntityKind::Aegis,
        Archetype {
            behavior: &AEGIS,
            half: Vec2::splat(0.5 * u),
            gravity: Vec2::ZERO,
            faction: Faction::Enemy,
            deals: DamageTag::Crush,
            immune_to: Vec::new(),
            max_bounces: 0,
            max_hits: 0,
            cull: CullConfig::default(),
            disintegrate: None,
            fixtures: vec![FixtureDef::new(FixtureKind::Shield, Vec2::splat(0.5 * u))],
        },
    );

    r.register(
        EntityKind::Quicksand,
        Archetype {
            behavior: &QUICKSAND,
            half: Vec2::new(1.0 * u, 0.5 * u),
            gravity: Vec2::ZERO,
            faction: Faction::Hazard,
            deals: DamageTag::Crush,
            immune_to: Vec::new(),
            max_bounces: 0,
            max_hits: 0,
            cull: CullConfig::default(),
            disintegrate: None,
            fixtures: vec![FixtureDef::new(
                FixtureKind::Sand,
                Vec2::new(1.0 * u, 0.5 * u),
            )],
        },
    );

    r.register(
        EntityKind::Beam,
        Archetype {
            behavior: &BEAM,
            half: Vec2::new(1.5 * u, 0.1 * u),
            gravity: Vec2::ZERO,
            faction: Faction::Hazard,
            deals: DamageTag::Fire,
            immune_to: Vec::new(),
            max_bounces: 0,
            max_hits: 0,
            cull: CullConfig::default(),
            disintegrate: None,
            fixtures: vec![FixtureDef::new(
                FixtureKind::Laser,
                Vec2::new(1.5 * u, 0.1 * u),
            )],
        },
    );

    r.register(
        EntityKind::Pit,
        Archetype {
            behavior: &PIT,
            half: Vec2::new(1.0 * u, 0.5 * u),
            gravity: Vec2::ZERO,
            faction: Faction::Hazard,
            deals: DamageTag::Crush,
            immune_to: Vec::new(),
            max_bounces: 0,
            max_hits: 0,
            cull: CullConfig::default(),
            disintegrate: None,
            fixtures: vec![FixtureDef::new(
                FixtureKind::Death,
                Vec2::new(1.0 * u, 0.5 * u),
            )],
        },
    );

    r
}
