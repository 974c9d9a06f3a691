//! Designer-tunable balance values
//!
//! Loaded from JSON so designers can retune reflection rules and spawn
//! chains without a recompile. Every field has a default; partial files are
//! fine.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts;

/// Balance knobs for the behavior catalog and the shared response rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Scale applied to the reflected velocity component on bounce
    pub restitution: f32,
    /// Fixed speed of a trajectory deflected by a directional shield
    pub shield_reflect_speed: f32,

    /// Default time-based cull (seconds)
    pub cull_time: f32,
    /// Distance past the viewport before spatial culling arms
    pub cull_range: f32,
    /// Grace period out of bounds before the cull fires
    pub cull_grace: f32,

    pub slug_max_bounces: u32,
    pub bolt_max_bounces: u32,
    /// Charge-before-fire delay for charge bolts
    pub bolt_charge_time: f32,

    /// Seconds a boulder ignores contacts after spawning
    pub boulder_contact_grace: f32,
    /// Break-apart impulses, authored for an upward push-out and rotated
    /// toward the actual struck direction
    pub boulder_impulses: Vec<Vec2>,

    /// Hits an ice cube absorbs before shattering
    pub ice_max_hits: u32,
    /// Terrain bounces an ice cube survives before shattering
    pub ice_max_bounces: u32,
    /// The 5-piece shatter table; one shard per entry, always
    pub shard_impulses: Vec<Vec2>,

    /// Blast damager window (seconds)
    pub blast_active_time: f32,

    /// Supplier drip delay range (seconds)
    pub drip_delay_min: f32,
    pub drip_delay_max: f32,

    /// Flame vent state loop durations (seconds)
    pub flame_idle: f32,
    pub flame_warn: f32,
    pub flame_active: f32,
    pub flame_cooldown: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        let u = consts::UNITS_PER_TILE;
        Self {
            restitution: consts::DEFAULT_RESTITUTION,
            shield_reflect_speed: consts::SHIELD_REFLECT_SPEED,
            cull_time: consts::DEFAULT_CULL_TIME,
            cull_range: consts::DEFAULT_CULL_RANGE,
            cull_grace: consts::DEFAULT_CULL_GRACE,
            slug_max_bounces: 3,
            bolt_max_bounces: 3,
            bolt_charge_time: 0.5,
            boulder_contact_grace: 0.25,
            boulder_impulses: vec![
                Vec2::new(-4.5, 12.0) * u,
                Vec2::new(-2.0, 9.0) * u,
                Vec2::new(2.0, 9.0) * u,
                Vec2::new(4.5, 12.0) * u,
            ],
            ice_max_hits: 1,
            ice_max_bounces: 3,
            shard_impulses: vec![
                Vec2::new(-7.0, 5.0) * u,
                Vec2::new(-3.0, 8.0) * u,
                Vec2::new(0.0, 9.0) * u,
                Vec2::new(3.0, 8.0) * u,
                Vec2::new(7.0, 5.0) * u,
            ],
            blast_active_time: 0.3,
            drip_delay_min: 0.75,
            drip_delay_max: 1.5,
            flame_idle: 1.5,
            flame_warn: 0.5,
            flame_active: 1.0,
            flame_cooldown: 0.5,
        }
    }
}

impl Tuning {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{"restitution": 0.5, "ice_max_hits": 3}"#).unwrap();
        assert_eq!(tuning.restitution, 0.5);
        assert_eq!(tuning.ice_max_hits, 3);
        assert_eq!(tuning.slug_max_bounces, Tuning::default().slug_max_bounces);
        assert_eq!(tuning.shard_impulses.len(), 5);
    }

    #[test]
    fn test_roundtrip() {
        let tuning = Tuning::default();
        let json = tuning.to_json().unwrap();
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(back.drip_delay_max, tuning.drip_delay_max);
        assert_eq!(back.boulder_impulses, tuning.boulder_impulses);
    }
}
