use crate::bridge::{
    builder::BridgeConfig,
    cell::SyncCell,
    control::ControlDomain,
    sampling::SamplingDomain,
    types::{ControlWord, DumpRecord, MeasurementRecord, TimerConfig},
};

/// Crossing storage shared by the two domains.
///
/// Holds one [`SyncCell`] per crossing value. [`Bridge::split`] hands out the
/// only pair of domain handles, each holding the writer side of the cells it
/// owns and the reader side of the others.
///
/// `D` is the synchronizer depth used by both destinations.
pub struct Bridge<const D: usize = 2> {
    config: BridgeConfig,
    control_word: SyncCell<ControlWord>,
    timer: SyncCell<TimerConfig>,
    dump: SyncCell<DumpRecord>,
    measurement: SyncCell<MeasurementRecord>,
}

impl<const D: usize> Bridge<D> {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config,
            control_word: SyncCell::default(),
            timer: SyncCell::new(config.timer_reset),
            dump: SyncCell::default(),
            measurement: SyncCell::default(),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Splits the bridge into its control and sampling domains.
    ///
    /// Both borrow the bridge, so at most one pair exists at a time. The two
    /// halves are `Send` and may be driven from different threads or
    /// interrupt contexts.
    pub fn split(&mut self) -> (ControlDomain<'_, D>, SamplingDomain<'_, D>) {
        let this: &Self = self;
        let control = ControlDomain::new(
            this.config,
            this.control_word.source(),
            this.timer.source(),
            this.dump.sink(),
            this.measurement.sink(),
        );
        let sampling = SamplingDomain::new(
            this.control_word.sink(),
            this.timer.sink(),
            this.dump.source(),
            this.measurement.source(),
        );
        (control, sampling)
    }
}

impl<const D: usize> core::fmt::Debug for Bridge<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Bridge")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
