//! Contact events and open-contact bookkeeping
//!
//! The physics engine hands the world a set of fixture-pair transitions each
//! frame; this module defines those events, the read-only views dispatch
//! hands to behavior handlers, and the ledger that enforces the begin/end
//! pairing invariant.

use std::collections::HashSet;

use crate::Direction;
use crate::entity::{DamageTag, Entity, EntityId, Faction};
use crate::fixture::FixtureKind;
use crate::props::{Props, keys};
use crate::shape::Rect;

/// Transition state of a contact between two fixtures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessState {
    Begin,
    Continue,
    End,
}

/// Reference to one fixture: owning entity plus index into its fixture list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixtureRef {
    pub entity: EntityId,
    pub fixture: usize,
}

/// A begun/continuing/ended contact between two fixtures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub a: FixtureRef,
    pub b: FixtureRef,
    pub state: ProcessState,
}

impl ContactEvent {
    pub fn new(a: FixtureRef, b: FixtureRef, state: ProcessState) -> Self {
        Self { a, b, state }
    }
}

/// Read-only snapshot of a fixture handed to contact handlers.
///
/// Carries everything a handler legitimately reads about the other side:
/// shape, category, tags, and the owning entity's capability data.
#[derive(Debug, Clone)]
pub struct FixtureView {
    pub entity: EntityId,
    /// Owner of the owning entity (attribution chain)
    pub entity_owner: Option<EntityId>,
    pub kind: FixtureKind,
    pub shape: Rect,
    pub faction: Faction,
    pub deals: DamageTag,
    pub props: Props,
}

impl FixtureView {
    pub fn snapshot(entity: &Entity, fixture: usize) -> Option<Self> {
        let f = entity.fixtures.get(fixture)?;
        if !f.active {
            return None;
        }
        Some(Self {
            entity: entity.id,
            entity_owner: entity.owner,
            kind: f.kind(),
            shape: f.shape,
            faction: entity.faction,
            deals: entity.deals,
            props: f.props.clone(),
        })
    }

    /// `side` tag, present on Side fixtures
    pub fn side(&self) -> Option<Direction> {
        self.props.dir(keys::SIDE)
    }

    /// Preferred deflection direction, present on directional shields
    pub fn deflect(&self) -> Option<Direction> {
        self.props.dir(keys::DEFLECT)
    }
}

/// Tracks which ordered fixture pairs currently have an open contact.
///
/// For a given pair at most one Begin is open at a time; Begin is eventually
/// matched by exactly one End, or closed implicitly when either entity is
/// destroyed.
#[derive(Debug, Default)]
pub struct ContactLedger {
    open: HashSet<(FixtureRef, FixtureRef)>,
}

impl ContactLedger {
    /// Filter an incoming event against the ledger. Returns the event to
    /// dispatch, or None when the invariant makes it a duplicate
    /// (re-entrant Begin, End without Begin).
    pub fn admit(&mut self, event: ContactEvent) -> Option<ContactEvent> {
        let key = (event.a, event.b);
        match event.state {
            ProcessState::Begin => {
                if self.open.insert(key) {
                    Some(event)
                } else {
                    log::debug!("duplicate begin dropped: {:?}", key);
                    None
                }
            }
            ProcessState::Continue => self.open.contains(&key).then_some(event),
            ProcessState::End => {
                if self.open.remove(&key) {
                    Some(event)
                } else {
                    None
                }
            }
        }
    }

    /// Implicitly close every contact referencing a destroyed entity
    pub fn close_for(&mut self, entity: EntityId) {
        self.open
            .retain(|(a, b)| a.entity != entity && b.entity != entity);
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fref(entity: u32, fixture: usize) -> FixtureRef {
        FixtureRef {
            entity: EntityId(entity),
            fixture,
        }
    }

    #[test]
    fn test_single_open_begin_per_pair() {
        let mut ledger = ContactLedger::default();
        let e = ContactEvent::new(fref(1, 0), fref(2, 0), ProcessState::Begin);
        assert!(ledger.admit(e).is_some());
        assert!(ledger.admit(e).is_none());
        let end = ContactEvent::new(fref(1, 0), fref(2, 0), ProcessState::End);
        assert!(ledger.admit(end).is_some());
        // Closed: a new begin opens again
        assert!(ledger.admit(e).is_some());
    }

    #[test]
    fn test_continue_requires_open_contact() {
        let mut ledger = ContactLedger::default();
        let cont = ContactEvent::new(fref(1, 0), fref(2, 0), ProcessState::Continue);
        assert!(ledger.admit(cont).is_none());
        ledger.admit(ContactEvent::new(fref(1, 0), fref(2, 0), ProcessState::Begin));
        assert!(ledger.admit(cont).is_some());
    }

    #[test]
    fn test_destruction_closes_implicitly() {
        let mut ledger = ContactLedger::default();
        ledger.admit(ContactEvent::new(fref(1, 0), fref(2, 0), ProcessState::Begin));
        ledger.admit(ContactEvent::new(fref(3, 1), fref(1, 2), ProcessState::Begin));
        ledger.admit(ContactEvent::new(fref(3, 0), fref(4, 0), ProcessState::Begin));
        ledger.close_for(EntityId(1));
        assert_eq!(ledger.open_count(), 1);
        // Ends for the closed pairs are silently ignored
        let end = ContactEvent::new(fref(1, 0), fref(2, 0), ProcessState::End);
        assert!(ledger.admit(end).is_none());
    }
}
