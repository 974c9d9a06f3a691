//! Property bags and spawn parameters
//!
//! Entities, fixtures, and spawn calls all carry a string-keyed bag of loose
//! values. Spawn parameters come with a stricter contract: a missing or
//! mistyped required key is a configuration error surfaced at spawn time,
//! never silently defaulted.

use std::collections::HashMap;

use glam::Vec2;
use thiserror::Error;

use crate::Direction;
use crate::entity::EntityId;
use crate::pool::PoolError;

/// Well-known property keys
pub mod keys {
    pub const POSITION: &str = "position";
    pub const TRAJECTORY: &str = "trajectory";
    pub const GRAVITY: &str = "gravity";
    pub const OWNER: &str = "owner";
    pub const SIDE: &str = "side";
    pub const DEFLECT: &str = "deflect";
    pub const VARIANT: &str = "variant";
    pub const FACING: &str = "facing";
    /// Seconds during which contacts are ignored after spawn
    pub const CONTACT_GRACE: &str = "contact_grace";
    pub const CULL_TIME: &str = "cull_time";
    pub const CULL_OUT_OF_BOUNDS: &str = "cull_out_of_bounds";
}

/// A loosely typed property value
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Bool(bool),
    F32(f32),
    U32(u32),
    Vec2(Vec2),
    Dir(Direction),
    Str(String),
    Entity(EntityId),
}

/// String-keyed property bag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    map: HashMap<String, PropValue>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: impl Into<String>, value: PropValue) -> &mut Self {
        self.map.insert(key.into(), value);
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: PropValue) -> Self {
        self.map.insert(key.into(), value);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.map.get(key)
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        match self.map.get(key) {
            Some(PropValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn f32(&self, key: &str) -> Option<f32> {
        match self.map.get(key) {
            Some(PropValue::F32(f)) => Some(*f),
            _ => None,
        }
    }

    pub fn u32(&self, key: &str) -> Option<u32> {
        match self.map.get(key) {
            Some(PropValue::U32(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn vec2(&self, key: &str) -> Option<Vec2> {
        match self.map.get(key) {
            Some(PropValue::Vec2(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn dir(&self, key: &str) -> Option<Direction> {
        match self.map.get(key) {
            Some(PropValue::Dir(d)) => Some(*d),
            _ => None,
        }
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        match self.map.get(key) {
            Some(PropValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn entity(&self, key: &str) -> Option<EntityId> {
        match self.map.get(key) {
            Some(PropValue::Entity(id)) => Some(*id),
            _ => None,
        }
    }
}

/// Fatal spawn-time configuration error
#[derive(Debug, Error, PartialEq)]
pub enum SpawnError {
    #[error("missing required spawn parameter `{0}`")]
    MissingKey(&'static str),
    #[error("spawn parameter `{key}` has the wrong type (expected {expected})")]
    WrongType {
        key: &'static str,
        expected: &'static str,
    },
    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// Spawn parameters: a property bag plus required-key accessors
///
/// Unknown keys are ignored by every consumer; required keys missing fail the
/// spawn loudly.
#[derive(Debug, Clone, Default)]
pub struct SpawnProps(pub Props);

impl SpawnProps {
    pub fn new() -> Self {
        Self(Props::new())
    }

    pub fn at(position: Vec2) -> Self {
        Self(Props::new().with(keys::POSITION, PropValue::Vec2(position)))
    }

    pub fn with(mut self, key: impl Into<String>, value: PropValue) -> Self {
        self.0.put(key, value);
        self
    }

    fn require(&self, key: &'static str) -> Result<&PropValue, SpawnError> {
        self.0.get(key).ok_or(SpawnError::MissingKey(key))
    }

    pub fn require_vec2(&self, key: &'static str) -> Result<Vec2, SpawnError> {
        match self.require(key)? {
            PropValue::Vec2(v) => Ok(*v),
            _ => Err(SpawnError::WrongType {
                key,
                expected: "vec2",
            }),
        }
    }

    pub fn require_entity(&self, key: &'static str) -> Result<EntityId, SpawnError> {
        match self.require(key)? {
            PropValue::Entity(id) => Ok(*id),
            _ => Err(SpawnError::WrongType {
                key,
                expected: "entity id",
            }),
        }
    }

    /// Required spawn position
    pub fn position(&self) -> Result<Vec2, SpawnError> {
        self.require_vec2(keys::POSITION)
    }

    /// Required trajectory (entities that fly must be told where)
    pub fn trajectory(&self) -> Result<Vec2, SpawnError> {
        self.require_vec2(keys::TRAJECTORY)
    }

    /// Optional owner attribution
    pub fn owner(&self) -> Option<EntityId> {
        self.0.entity(keys::OWNER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_key_fails() {
        let props = SpawnProps::new();
        assert_eq!(props.position(), Err(SpawnError::MissingKey(keys::POSITION)));
    }

    #[test]
    fn test_wrong_type_fails() {
        let props = SpawnProps::new().with(keys::POSITION, PropValue::F32(3.0));
        assert!(matches!(
            props.position(),
            Err(SpawnError::WrongType { key: "position", .. })
        ));
    }

    #[test]
    fn test_typed_getters_ignore_mismatched_values() {
        let mut props = Props::new();
        props.put("x", PropValue::F32(1.0));
        assert_eq!(props.f32("x"), Some(1.0));
        assert_eq!(props.bool("x"), None);
        assert_eq!(props.f32("y"), None);
    }
}
