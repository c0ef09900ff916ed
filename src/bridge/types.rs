use arbitrary_int::{u10, u11, u20};

/// Per-channel control fields owned by the control domain.
///
/// `enable` is not stored: it is `prn != 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlWord {
    pub prn: u8,
    pub carrier_increment: u32,
    pub code_increment: u32,
    pub slew_amount: u11,
    /// Flipped once per slew request.
    pub slew_toggle: bool,
}

impl ControlWord {
    /// Derived channel enable.
    #[inline]
    pub fn enable(&self) -> bool {
        self.prn != 0
    }
}

impl Default for ControlWord {
    fn default() -> Self {
        Self {
            prn: 0,
            carrier_increment: 0,
            code_increment: 0,
            slew_amount: u11::new(0),
            slew_toggle: false,
        }
    }
}

/// Timer configuration owned by the control domain.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    pub period: u32,
    pub enabled: bool,
}

/// The six correlator accumulators supplied on a dump pulse.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Accumulators {
    pub early_i: i16,
    pub early_q: i16,
    pub prompt_i: i16,
    pub prompt_q: i16,
    pub late_i: i16,
    pub late_q: i16,
}

/// Fields captured on a dump pulse.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DumpData {
    pub accumulators: Accumulators,
    pub epoch: u16,
}

/// Phase and cycle taps captured on a timer pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasurementTaps {
    pub epoch: u16,
    pub code_phase: u11,
    pub code_nco_phase: u10,
    pub carrier_cycle: u20,
    pub carrier_nco_phase: u10,
}

impl Default for MeasurementTaps {
    fn default() -> Self {
        Self {
            epoch: 0,
            code_phase: u11::new(0),
            code_nco_phase: u10::new(0),
            carrier_cycle: u20::new(0),
            carrier_nco_phase: u10::new(0),
        }
    }
}

/// A payload latched in the sampling domain together with its sequence
/// number and toggle marker.
///
/// Overwritten in place by every new pulse.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Latched<P> {
    pub sequence: u32,
    pub toggle: bool,
    pub payload: P,
}

pub type DumpRecord = Latched<DumpData>;
pub type MeasurementRecord = Latched<MeasurementTaps>;

/// Everything the collaborator hands the sampling domain on one tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SamplingInputs {
    /// One-tick dump pulse from the correlator.
    pub dump: bool,
    pub dump_data: DumpData,
    /// Current taps; only latched on a timer pulse.
    pub taps: MeasurementTaps,
}

/// Everything the sampling domain drives toward the collaborator on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingOutputs {
    pub enable: bool,
    pub prn: u8,
    pub carrier_increment: u32,
    pub code_increment: u32,
    pub slew_amount: u11,
    /// One-tick pulse per slew request.
    pub slew: bool,
    /// One-tick timer pulse, the collaborator's epoch marker.
    pub tic: bool,
}

impl Default for SamplingOutputs {
    fn default() -> Self {
        Self {
            enable: false,
            prn: 0,
            carrier_increment: 0,
            code_increment: 0,
            slew_amount: u11::new(0),
            slew: false,
            tic: false,
        }
    }
}
