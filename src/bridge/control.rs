use heapless::Deque;

use crate::bridge::{
    builder::BridgeConfig,
    cell::{Sink, Source},
    port::{BusInputs, BusOutputs, RegisterPort},
    regs::{ControlFile, ControlRegs, RegisterTarget, file},
    status::{ShadowBank, StatusFlags},
    types::{ControlWord, DumpRecord, MeasurementRecord, TimerConfig},
};

/// Depth of the clear-request queue between the adapter and the shadow owner.
const CLEAR_QUEUE: usize = 2;

/// The externally clocked control/status domain.
///
/// One [`tick`](Self::tick) is one control-domain clock. Within a tick the
/// shadow owner runs first (it applies handshake transitions and the clear
/// requests accepted on earlier ticks), then the register port, then any
/// changed control values are published toward the sampling domain.
pub struct ControlDomain<'a, const D: usize = 2> {
    config: BridgeConfig,
    regs: ControlRegs,
    shadow: ShadowBank<D>,
    port: RegisterPort,
    clears: Deque<StatusFlags, CLEAR_QUEUE>,
    control_word: Source<'a, ControlWord>,
    timer: Source<'a, TimerConfig>,
    dump: Sink<'a, DumpRecord>,
    measurement: Sink<'a, MeasurementRecord>,
}

impl<'a, const D: usize> core::fmt::Debug for ControlDomain<'a, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ControlDomain")
            .field("regs", &self.regs)
            .field("shadow", &self.shadow)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

impl<'a, const D: usize> ControlDomain<'a, D> {
    pub(crate) fn new(
        config: BridgeConfig,
        control_word: Source<'a, ControlWord>,
        timer: Source<'a, TimerConfig>,
        dump: Sink<'a, DumpRecord>,
        measurement: Sink<'a, MeasurementRecord>,
    ) -> Self {
        let mut domain = Self {
            config,
            regs: ControlRegs::new(config.timer_reset),
            shadow: ShadowBank::new(),
            port: RegisterPort::new(),
            clears: Deque::new(),
            control_word,
            timer,
            dump,
            measurement,
        };
        domain.publish();
        domain
    }

    /// Advances one control tick with the master's channel values and
    /// returns the port's channel values for the same tick.
    pub fn tick(&mut self, inputs: BusInputs) -> BusOutputs {
        let mut clear = StatusFlags::new();
        while let Some(mask) = self.clears.pop_front() {
            clear = clear.union(mask);
        }

        let dump = self.dump.sample();
        let measurement = self.measurement.sample();
        self.shadow.tick(&dump, &measurement, clear);

        let clears = &mut self.clears;
        let mut target = ControlFile {
            config: &self.config,
            regs: &mut self.regs,
            shadow: &self.shadow,
            request_clear: |mask: StatusFlags| enqueue_clear(clears, mask),
        };
        let out = self.port.tick(&inputs, &mut target);

        self.publish();
        out
    }

    /// Reads a register the way the port would, without a bus transaction.
    pub fn peek(&mut self, addr: u16) -> u32 {
        let target = ControlFile {
            config: &self.config,
            regs: &mut self.regs,
            shadow: &self.shadow,
            request_clear: |_: StatusFlags| {},
        };
        target.read(addr)
    }

    pub fn shadow(&self) -> &ShadowBank<D> {
        &self.shadow
    }

    pub fn regs(&self) -> &ControlRegs {
        &self.regs
    }

    /// True when no register transaction is in flight.
    pub fn is_idle(&self) -> bool {
        self.port.is_idle()
    }

    /// Domain-local reset: restores every control-owned value to its reset
    /// default and republishes it. The sampling domain is not touched.
    pub fn reset(&mut self) {
        log::info!("control domain reset");
        self.regs = ControlRegs::new(self.config.timer_reset);
        self.shadow.reset();
        self.port.reset();
        self.clears.clear();
        self.publish();
    }

    fn publish(&mut self) {
        if !self.regs.any_dirty() {
            return;
        }
        let timer = *self.regs.timer();
        let word = *self.regs.channel();
        let (timer_source, word_source) = (&mut self.timer, &mut self.control_word);
        self.regs.drain_dirty(|index| match index {
            file::DIRTY_TIMER => timer_source.publish(timer),
            file::DIRTY_CHANNEL => word_source.publish(word),
            _ => {}
        });
    }
}

fn enqueue_clear(queue: &mut Deque<StatusFlags, CLEAR_QUEUE>, mask: StatusFlags) {
    if let Err(mask) = queue.push_back(mask) {
        if let Some(last) = queue.back_mut() {
            *last = last.union(mask);
        }
    }
}
