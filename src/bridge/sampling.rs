use crate::bridge::{
    cell::{Sink, Source},
    latch::Latch,
    sync::Synchronizer,
    timer::TimerGenerator,
    toggle::ToggleReceiver,
    types::{
        ControlWord, DumpData, DumpRecord, MeasurementRecord, MeasurementTaps, SamplingInputs,
        SamplingOutputs, TimerConfig,
    },
};

/// The fast, free-running sampling domain.
///
/// Each [`tick`](Self::tick) synchronizes the control values, advances the
/// timer, latches whatever pulsed and publishes the latched records toward
/// the control domain.
pub struct SamplingDomain<'a, const D: usize = 2> {
    word_sync: Synchronizer<ControlWord, D>,
    timer_sync: Synchronizer<TimerConfig, D>,
    slew_rx: ToggleReceiver<D>,
    timer: TimerGenerator,
    applied_timer: TimerConfig,
    dumps: Latch<DumpData>,
    tics: Latch<MeasurementTaps>,
    control_word: Sink<'a, ControlWord>,
    timer_config: Sink<'a, TimerConfig>,
    dump: Source<'a, DumpRecord>,
    measurement: Source<'a, MeasurementRecord>,
}

impl<'a, const D: usize> core::fmt::Debug for SamplingDomain<'a, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SamplingDomain")
            .field("timer", &self.timer)
            .field("applied_timer", &self.applied_timer)
            .finish_non_exhaustive()
    }
}

impl<'a, const D: usize> SamplingDomain<'a, D> {
    pub(crate) fn new(
        control_word: Sink<'a, ControlWord>,
        timer_config: Sink<'a, TimerConfig>,
        dump: Source<'a, DumpRecord>,
        measurement: Source<'a, MeasurementRecord>,
    ) -> Self {
        let mut domain = Self {
            word_sync: Synchronizer::new(),
            timer_sync: Synchronizer::new(),
            slew_rx: ToggleReceiver::new(),
            timer: TimerGenerator::new(),
            applied_timer: TimerConfig::default(),
            dumps: Latch::new(),
            tics: Latch::new(),
            control_word,
            timer_config,
            dump,
            measurement,
        };
        domain.publish_records();
        domain
    }

    /// Advances one sampling tick with the collaborator's values for this
    /// tick and returns what the domain drives back.
    pub fn tick(&mut self, inputs: &SamplingInputs) -> SamplingOutputs {
        let raw_word = self.control_word.sample();
        let word = self.word_sync.tick(raw_word);
        let slew = self.slew_rx.tick(raw_word.slew_toggle);
        let config = self.timer_sync.tick(self.timer_config.sample());

        if config != self.applied_timer {
            log::debug!(
                "timer now period {} enabled {}",
                config.period,
                config.enabled
            );
            self.applied_timer = config;
        }

        let tic = self.timer.tick(&config);

        if inputs.dump {
            let record = self.dumps.capture(inputs.dump_data);
            self.dump.publish(record);
        }
        if tic {
            let record = self.tics.capture(inputs.taps);
            self.measurement.publish(record);
        }
        if slew {
            log::debug!("slew pulse, amount {}", word.slew_amount.value());
        }

        SamplingOutputs {
            enable: word.enable(),
            prn: word.prn,
            carrier_increment: word.carrier_increment,
            code_increment: word.code_increment,
            slew_amount: word.slew_amount,
            slew,
            tic,
        }
    }

    /// Synchronized control word as of the last tick.
    pub fn control_word(&self) -> ControlWord {
        self.word_sync.output()
    }

    /// Synchronized timer configuration as of the last tick.
    pub fn timer_config(&self) -> TimerConfig {
        self.timer_sync.output()
    }

    pub fn timer_counter(&self) -> u32 {
        self.timer.counter()
    }

    pub fn dump_record(&self) -> &DumpRecord {
        self.dumps.record()
    }

    pub fn measurement_record(&self) -> &MeasurementRecord {
        self.tics.record()
    }

    /// Domain-local reset: clears synchronizers, timer and latches and
    /// republishes the default records. The control domain is not touched.
    pub fn reset(&mut self) {
        log::info!("sampling domain reset");
        self.word_sync.reset();
        self.timer_sync.reset();
        self.slew_rx.reset();
        self.timer.reset();
        self.applied_timer = TimerConfig::default();
        self.dumps.reset();
        self.tics.reset();
        self.publish_records();
    }

    fn publish_records(&mut self) {
        self.dump.publish(*self.dumps.record());
        self.measurement.publish(*self.tics.record());
    }
}
