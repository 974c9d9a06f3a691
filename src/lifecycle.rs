//! Entity lifecycle state machine
//!
//! `Spawning -> Active -> (Bouncing | Charging | Exploding)* -> Terminal ->
//! Pooled`. The exploding transition is idempotent, culling is three
//! independent triggers (timed, spatial, event-driven), and everything here
//! is reset unconditionally when a pooled instance is respawned.

use crate::events::EventKey;

/// Countdown timer (duration + elapsed), the workhorse of every multi-phase
/// hazard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    duration: f32,
    elapsed: f32,
}

impl Timer {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            elapsed: 0.0,
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Advance; returns true on the tick the timer finishes
    pub fn update(&mut self, dt: f32) -> bool {
        if self.is_finished() {
            return false;
        }
        self.elapsed += dt;
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn set_to_end(&mut self) {
        self.elapsed = self.duration;
    }

    pub fn reset_with(&mut self, duration: f32) {
        self.duration = duration;
        self.elapsed = 0.0;
    }
}

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Spawning,
    Active,
    Bouncing,
    Charging,
    Exploding,
    Terminal,
    Pooled,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Spawning => "spawning",
            Phase::Active => "active",
            Phase::Bouncing => "bouncing",
            Phase::Charging => "charging",
            Phase::Exploding => "exploding",
            Phase::Terminal => "terminal",
            Phase::Pooled => "pooled",
        }
    }
}

/// Spatial cull: out past `range` from the viewport for longer than `grace`
#[derive(Debug, Clone, PartialEq)]
pub struct BoundsCull {
    pub range: f32,
    pub grace: Timer,
}

/// Three independent, composable cull triggers; any one suffices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CullConfig {
    /// Countdown to destruction
    pub ttl: Option<Timer>,
    /// Out-of-viewport destruction after a grace period
    pub bounds: Option<BoundsCull>,
    /// Immediate destruction when any subscribed event arrives
    pub on_events: Vec<EventKey>,
}

impl CullConfig {
    pub fn timed(seconds: f32) -> Self {
        Self {
            ttl: Some(Timer::new(seconds)),
            ..Default::default()
        }
    }

    pub fn out_of_bounds(range: f32, grace: f32) -> Self {
        Self {
            bounds: Some(BoundsCull {
                range,
                grace: Timer::new(grace),
            }),
            ..Default::default()
        }
    }

    pub fn with_event(mut self, key: EventKey) -> Self {
        self.on_events.push(key);
        self
    }
}

/// Per-entity lifecycle state
#[derive(Debug, Clone, PartialEq)]
pub struct Lifecycle {
    phase: Phase,
    pub cull: CullConfig,
    /// Optional delay between the death chain and finalization
    disintegrate: Option<Timer>,
    death_handled: bool,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            phase: Phase::Pooled,
            cull: CullConfig::default(),
            disintegrate: None,
            death_handled: false,
        }
    }
}

impl Lifecycle {
    /// One-shot reconfiguration at the start of a new life. Resets every
    /// mutable field; nothing survives from a previous use of the slot.
    pub fn begin_spawn(&mut self, cull: CullConfig, disintegrate: Option<f32>) {
        self.phase = Phase::Spawning;
        self.cull = cull;
        self.disintegrate = disintegrate.map(Timer::new);
        self.death_handled = false;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether all contact callbacks are dropped for this entity
    pub fn ignores_contacts(&self) -> bool {
        matches!(self.phase, Phase::Exploding | Phase::Terminal | Phase::Pooled)
    }

    pub fn is_live(&self) -> bool {
        !matches!(self.phase, Phase::Terminal | Phase::Pooled)
    }

    /// Spawning -> Active, once configuration is applied
    pub fn activate(&mut self) {
        if self.phase == Phase::Spawning {
            self.phase = Phase::Active;
        }
    }

    /// Enter an optional sub-state (Bouncing or Charging) or return to Active.
    /// No-op once exploding has begun.
    pub fn enter(&mut self, sub: Phase) {
        debug_assert!(matches!(sub, Phase::Active | Phase::Bouncing | Phase::Charging));
        if matches!(
            self.phase,
            Phase::Spawning | Phase::Active | Phase::Bouncing | Phase::Charging
        ) {
            self.phase = sub;
        }
    }

    /// The terminal "explode and die" transition. Returns true exactly once
    /// per life; repeat calls are no-ops.
    pub fn explode(&mut self) -> bool {
        match self.phase {
            Phase::Spawning | Phase::Active | Phase::Bouncing | Phase::Charging => {
                self.phase = Phase::Exploding;
                true
            }
            _ => false,
        }
    }

    /// Immediate destruction without a death chain (event culls, death
    /// fixtures, timers).
    pub fn kill(&mut self) {
        if self.is_live() {
            self.phase = Phase::Terminal;
        }
    }

    /// True while the death chain for this life still has to run
    pub fn needs_death_handling(&self) -> bool {
        self.phase == Phase::Exploding && !self.death_handled
    }

    /// Record that the death chain ran; starts the disintegration delay, or
    /// finalizes immediately when there is none.
    pub fn mark_death_handled(&mut self) {
        self.death_handled = true;
        match &mut self.disintegrate {
            Some(timer) => timer.reset(),
            None => self.phase = Phase::Terminal,
        }
    }

    /// Per-frame tick: cull triggers while live, disintegration while
    /// exploding.
    pub fn update(&mut self, dt: f32, in_bounds: bool) {
        match self.phase {
            Phase::Active | Phase::Bouncing | Phase::Charging => {
                if let Some(ttl) = &mut self.cull.ttl
                    && ttl.update(dt)
                {
                    self.kill();
                    return;
                }
                if let Some(bounds) = &mut self.cull.bounds {
                    if in_bounds {
                        bounds.grace.reset();
                    } else if bounds.grace.update(dt) {
                        self.kill();
                    }
                }
            }
            Phase::Exploding if self.death_handled => {
                if let Some(timer) = &mut self.disintegrate
                    && timer.update(dt)
                {
                    self.phase = Phase::Terminal;
                }
            }
            _ => {}
        }
    }

    /// Event-driven cull: destroys immediately when subscribed
    pub fn on_event(&mut self, key: EventKey) {
        if self.is_live() && self.cull.on_events.contains(&key) {
            self.kill();
        }
    }

    /// Terminal -> Pooled (end-of-frame sweep)
    pub fn pool(&mut self) {
        debug_assert_eq!(self.phase, Phase::Terminal);
        self.phase = Phase::Pooled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_lifecycle(cull: CullConfig) -> Lifecycle {
        let mut lc = Lifecycle::default();
        lc.begin_spawn(cull, None);
        lc.activate();
        lc
    }

    #[test]
    fn test_timer_finishes_once() {
        let mut t = Timer::new(1.0);
        assert!(!t.update(0.5));
        assert!(t.update(0.6));
        assert!(!t.update(0.1));
        assert!(t.is_finished());
    }

    #[test]
    fn test_explode_is_idempotent() {
        let mut lc = live_lifecycle(CullConfig::default());
        assert!(lc.explode());
        assert!(!lc.explode());
        assert_eq!(lc.phase(), Phase::Exploding);
        assert!(lc.ignores_contacts());
    }

    #[test]
    fn test_timed_cull_kills() {
        let mut lc = live_lifecycle(CullConfig::timed(1.0));
        lc.update(0.5, true);
        assert!(lc.is_live());
        lc.update(0.6, true);
        assert_eq!(lc.phase(), Phase::Terminal);
    }

    #[test]
    fn test_bounds_cull_needs_grace_and_resets() {
        let mut lc = live_lifecycle(CullConfig::out_of_bounds(10.0, 0.5));
        lc.update(0.4, false);
        assert!(lc.is_live());
        // Coming back in bounds resets the grace period
        lc.update(0.1, true);
        lc.update(0.4, false);
        assert!(lc.is_live());
        lc.update(0.2, false);
        assert_eq!(lc.phase(), Phase::Terminal);
    }

    #[test]
    fn test_cull_triggers_are_independent() {
        // Spatial-only cull ignores events
        let mut spatial = live_lifecycle(CullConfig::out_of_bounds(10.0, 0.5));
        spatial.on_event(EventKey::PlayerRespawned);
        assert!(spatial.is_live());

        // Event-only cull ignores time and bounds
        let mut evented =
            live_lifecycle(CullConfig::default().with_event(EventKey::PlayerRespawned));
        evented.update(100.0, false);
        assert!(evented.is_live());
        evented.on_event(EventKey::RoomTransitionBegin);
        assert!(evented.is_live());
        evented.on_event(EventKey::PlayerRespawned);
        assert_eq!(evented.phase(), Phase::Terminal);
    }

    #[test]
    fn test_disintegration_delays_terminal() {
        let mut lc = Lifecycle::default();
        lc.begin_spawn(CullConfig::default(), Some(0.25));
        lc.activate();
        assert!(lc.explode());
        assert!(lc.needs_death_handling());
        lc.mark_death_handled();
        assert_eq!(lc.phase(), Phase::Exploding);
        lc.update(0.3, true);
        assert_eq!(lc.phase(), Phase::Terminal);
    }

    #[test]
    fn test_respawn_resets_prior_life() {
        let mut lc = live_lifecycle(CullConfig::timed(0.1));
        lc.update(0.2, true);
        lc.pool();
        lc.begin_spawn(CullConfig::timed(5.0), None);
        lc.activate();
        assert_eq!(lc.phase(), Phase::Active);
        lc.update(0.2, true);
        assert!(lc.is_live());
    }
}
