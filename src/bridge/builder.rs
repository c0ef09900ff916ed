use core::marker::PhantomData;

use crate::bridge::{error::BridgeError, storage::Bridge, types::TimerConfig};

/// Fixed identity and reset values of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Value of the `ID` register.
    pub id: u32,
    /// Value of the `VERSION` register.
    pub version: u32,
    /// Timer configuration restored on control-domain reset.
    pub timer_reset: TimerConfig,
}

impl BridgeConfig {
    /// "GTRK"
    pub const DEFAULT_ID: u32 = 0x4754_524B;
    pub const DEFAULT_VERSION: u32 = 0x0001_0000;
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            id: Self::DEFAULT_ID,
            version: Self::DEFAULT_VERSION,
            timer_reset: TimerConfig::default(),
        }
    }
}

// Builder states
pub struct NeedDepth;
pub struct Ready;

/// Typestate builder for [`Bridge`].
///
/// The synchronizer depth must be chosen first, either explicitly with
/// [`sync_depth`](BridgeBuilder::sync_depth) or with
/// [`default_depth`](BridgeBuilder::default_depth) (two stages).
///
/// ```
/// use gnss_track_bridge::prelude::*;
///
/// let bridge = BridgeBuilder::new()
///     .sync_depth::<3>()
///     .identity(0x1234_5678, 2)
///     .timer_defaults(16_368, true)
///     .build()
///     .unwrap();
/// assert_eq!(bridge.config().id, 0x1234_5678);
/// ```
pub struct BridgeBuilder<const D: usize, State> {
    config: BridgeConfig,
    _phantom: PhantomData<State>,
}

impl BridgeBuilder<0, NeedDepth> {
    pub fn new() -> Self {
        BridgeBuilder {
            config: BridgeConfig::default(),
            _phantom: PhantomData,
        }
    }

    /// Set the synchronizer depth in destination ticks.
    ///
    /// A depth of zero is rejected at compile time.
    pub fn sync_depth<const D: usize>(self) -> BridgeBuilder<D, Ready> {
        BridgeBuilder {
            config: self.config,
            _phantom: PhantomData,
        }
    }

    /// Use the usual two-stage synchronizer.
    pub fn default_depth(self) -> BridgeBuilder<2, Ready> {
        self.sync_depth::<2>()
    }
}

impl Default for BridgeBuilder<0, NeedDepth> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const D: usize> BridgeBuilder<D, Ready> {
    /// Values returned by the `ID` and `VERSION` registers.
    pub fn identity(mut self, id: u32, version: u32) -> Self {
        self.config.id = id;
        self.config.version = version;
        self
    }

    /// Timer configuration restored on control-domain reset.
    pub fn timer_defaults(mut self, period: u32, enabled: bool) -> Self {
        self.config.timer_reset = TimerConfig { period, enabled };
        self
    }

    /// Build the bridge.
    ///
    /// # Errors
    /// [`BridgeError::InvalidConfig`] if the identification constant is zero,
    /// which would be indistinguishable from an unmapped read.
    pub fn build(self) -> Result<Bridge<D>, BridgeError> {
        if self.config.id == 0 {
            return Err(BridgeError::InvalidConfig(
                "identification constant must be non-zero",
            ));
        }
        Ok(Bridge::new(self.config))
    }
}
