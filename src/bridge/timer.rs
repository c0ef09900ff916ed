use crate::bridge::types::TimerConfig;

/// Free-running periodic pulse generator of the sampling domain.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TimerGenerator {
    counter: u32,
}

impl TimerGenerator {
    pub const fn new() -> Self {
        Self { counter: 0 }
    }

    /// Advances one sampling tick. Returns true on a one-tick pulse.
    ///
    /// - Disabled: counter held at zero, no pulse.
    /// - `period <= 1`: pulse every tick, counter held at zero.
    /// - Otherwise: pulse when the counter reaches `period - 1`, then wrap.
    ///
    /// `config` is read fresh every tick, so a new period applies at the next
    /// comparison without resetting the count.
    pub fn tick(&mut self, config: &TimerConfig) -> bool {
        if !config.enabled {
            self.counter = 0;
            return false;
        }
        if config.period <= 1 {
            self.counter = 0;
            return true;
        }
        if self.counter == config.period - 1 {
            self.counter = 0;
            true
        } else {
            self.counter = self.counter.wrapping_add(1);
            false
        }
    }

    #[inline]
    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn reset(&mut self) {
        self.counter = 0;
    }
}
