//! Outbound event bus and audio cues
//!
//! Both are fire-and-forget queues the embedder drains after each step; the
//! core never blocks on them and never reads presentation state back.

/// Keys an entity may subscribe to for event-driven culling, or publish on
/// notable transitions. Closed set by design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKey {
    PlayerRespawned,
    RoomTransitionBegin,
    BossDefeated,
}

/// Audio cue requests ("play cue" is fire-and-forget)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Thump,
    Quake,
    Shatter,
    Deflect,
    Explosion,
    FlameBurst,
    Drip,
}

/// Per-frame outbound queues
#[derive(Debug, Default)]
pub struct Outbox {
    pub cues: Vec<Cue>,
    pub events: Vec<EventKey>,
}

impl Outbox {
    pub fn play_cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    pub fn publish(&mut self, event: EventKey) {
        self.events.push(event);
    }

    /// Take everything queued this frame
    pub fn drain(&mut self) -> (Vec<Cue>, Vec<EventKey>) {
        (
            std::mem::take(&mut self.cues),
            std::mem::take(&mut self.events),
        )
    }
}
