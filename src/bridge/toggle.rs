//! Toggle-edge handshake.
//!
//! The source flips one bit per request or event instead of asserting a
//! level. The destination synchronizes that bit and treats any difference
//! from the value it saw on its previous tick as exactly one event.
//!
//! The source must leave the bit alone for at least `D + 1` destination ticks
//! between flips. Faster flips coalesce: two flips that both land between
//! the same pair of destination samples are seen as no transition at all,
//! and nothing in the handshake can detect it.

use crate::bridge::{sync::Synchronizer, types::Latched};

/// Source side of a toggle handshake.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ToggleSender {
    level: bool,
}

impl ToggleSender {
    pub const fn new() -> Self {
        Self { level: false }
    }

    /// Issues one event and returns the new toggle level.
    #[inline]
    pub fn flip(&mut self) -> bool {
        self.level = !self.level;
        self.level
    }

    #[inline]
    pub fn level(&self) -> bool {
        self.level
    }

    pub fn reset(&mut self) {
        self.level = false;
    }
}

/// Destination side of a toggle handshake with synchronizer depth `D`.
#[derive(Debug, Clone, Default)]
pub struct ToggleReceiver<const D: usize = 2> {
    sync: Synchronizer<bool, D>,
    last: bool,
}

impl<const D: usize> ToggleReceiver<D> {
    pub fn new() -> Self {
        Self {
            sync: Synchronizer::new(),
            last: false,
        }
    }

    /// Advances one destination tick with the raw toggle level sampled from
    /// the source. Returns true on the single tick an event is recognized.
    pub fn tick(&mut self, raw: bool) -> bool {
        let level = self.sync.tick(raw);
        let edge = level != self.last;
        self.last = level;
        edge
    }

    pub fn reset(&mut self) {
        self.sync.reset();
        self.last = false;
    }
}

/// Destination side of a toggle handshake whose marker travels inside a
/// latched record.
///
/// The whole record is synchronized, so the payload handed out on an edge is
/// always the one whose marker flip produced that edge.
#[derive(Debug, Clone, Default)]
pub struct RecordReceiver<P: Copy + Default, const D: usize = 2> {
    sync: Synchronizer<Latched<P>, D>,
    last: bool,
}

impl<P: Copy + Default, const D: usize> RecordReceiver<P, D> {
    pub fn new() -> Self {
        Self {
            sync: Synchronizer::new(),
            last: false,
        }
    }

    /// Advances one destination tick with the record currently published by
    /// the source. Returns the record on the tick its event is recognized.
    pub fn tick(&mut self, raw: Latched<P>) -> Option<Latched<P>> {
        let record = self.sync.tick(raw);
        let edge = record.toggle != self.last;
        self.last = record.toggle;
        edge.then_some(record)
    }

    pub fn reset(&mut self) {
        self.sync.reset();
        self.last = false;
    }
}
