use crate::bridge::{toggle::ToggleSender, types::Latched};

/// Holding record for one kind of sampling-domain event.
///
/// Every pulse overwrites the record unconditionally, bumps the sequence
/// number and flips the toggle marker. Nothing is buffered: a pulse that lands
/// before the previous one was picked up replaces it.
#[derive(Debug, Default, Clone)]
pub struct Latch<P: Copy + Default> {
    record: Latched<P>,
    marker: ToggleSender,
}

impl<P: Copy + Default> Latch<P> {
    pub fn new() -> Self {
        Self {
            record: Latched::default(),
            marker: ToggleSender::new(),
        }
    }

    /// Captures `payload` and returns the updated record.
    pub fn capture(&mut self, payload: P) -> Latched<P> {
        self.record = Latched {
            sequence: self.record.sequence.wrapping_add(1),
            toggle: self.marker.flip(),
            payload,
        };
        self.record
    }

    #[inline]
    pub fn record(&self) -> &Latched<P> {
        &self.record
    }

    pub fn reset(&mut self) {
        self.record = Latched::default();
        self.marker.reset();
    }
}
