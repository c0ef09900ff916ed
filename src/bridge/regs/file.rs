use arbitrary_int::u4;
use bitmaps::Bitmap;

use crate::bridge::{
    builder::BridgeConfig,
    helpers::{merge_lanes, sign_extend_i16},
    regs::map::{
        ControlReg, PrnReg, Register, SlewAmountReg, SlewRequestReg, Target, WindowField,
    },
    status::{ShadowBank, StatusFlags},
    toggle::ToggleSender,
    types::{ControlWord, TimerConfig},
};

/// The decode side the register port drives.
///
/// A read must not have side effects. A write is always accepted; writes to
/// read-only or unmapped addresses are dropped by the implementation.
pub trait RegisterTarget {
    fn read(&self, addr: u16) -> u32;
    fn write(&mut self, addr: u16, data: u32, strobe: u4);
}

pub(crate) const DIRTY_TIMER: usize = 0;
pub(crate) const DIRTY_CHANNEL: usize = 1;
const DIRTY_COUNT: usize = 2;

/// Register-backed values the control domain owns and mirrors into the
/// sampling domain.
///
/// Writes mark the touched value dirty; the control domain publishes dirty
/// values at the end of its tick.
#[derive(Debug, Clone)]
pub struct ControlRegs {
    timer: TimerConfig,
    channel: ControlWord,
    slew: ToggleSender,
    dirty: Bitmap<DIRTY_COUNT>,
}

impl ControlRegs {
    pub fn new(timer: TimerConfig) -> Self {
        let mut dirty = Bitmap::new();
        dirty.set(DIRTY_TIMER, true);
        dirty.set(DIRTY_CHANNEL, true);
        Self {
            timer,
            channel: ControlWord::default(),
            slew: ToggleSender::new(),
            dirty,
        }
    }

    #[inline]
    pub fn timer(&self) -> &TimerConfig {
        &self.timer
    }

    #[inline]
    pub fn channel(&self) -> &ControlWord {
        &self.channel
    }

    pub fn any_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Calls `f` with the index of every dirty value, then clears them.
    pub(crate) fn drain_dirty(&mut self, mut f: impl FnMut(usize)) {
        let mut idx = self.dirty.first_index();
        while let Some(i) = idx {
            f(i);
            idx = self.dirty.next_index(i);
        }
        self.dirty = Bitmap::new();
    }

    fn write_timer(&mut self, timer: TimerConfig) {
        if timer != self.timer {
            self.timer = timer;
            self.dirty.set(DIRTY_TIMER, true);
        }
    }

    fn write_channel(&mut self, channel: ControlWord) {
        if channel != self.channel {
            self.channel = channel;
            self.dirty.set(DIRTY_CHANNEL, true);
        }
    }
}

/// Decode view over the control domain's state for one register access.
///
/// Accepted `STATUS` writes are not applied here; their clear mask is handed
/// to `request_clear` so the shadow owner can apply it on a later tick.
pub struct ControlFile<'a, const D: usize, F: FnMut(StatusFlags)> {
    pub(crate) config: &'a BridgeConfig,
    pub(crate) regs: &'a mut ControlRegs,
    pub(crate) shadow: &'a ShadowBank<D>,
    pub(crate) request_clear: F,
}

impl<'a, const D: usize, F: FnMut(StatusFlags)> ControlFile<'a, D, F> {
    fn read_window(&self, field: WindowField) -> u32 {
        let dump = self.shadow.dump();
        let acc = &dump.payload.accumulators;
        let meas = self.shadow.measurement();
        let taps = &meas.payload;
        match field {
            WindowField::DumpSequence => dump.sequence,
            WindowField::EarlyI => sign_extend_i16(acc.early_i),
            WindowField::EarlyQ => sign_extend_i16(acc.early_q),
            WindowField::PromptI => sign_extend_i16(acc.prompt_i),
            WindowField::PromptQ => sign_extend_i16(acc.prompt_q),
            WindowField::LateI => sign_extend_i16(acc.late_i),
            WindowField::LateQ => sign_extend_i16(acc.late_q),
            WindowField::DumpEpoch => u32::from(dump.payload.epoch),
            WindowField::MeasurementSequence => meas.sequence,
            WindowField::MeasurementEpoch => u32::from(taps.epoch),
            WindowField::CodePhase => u32::from(taps.code_phase.value()),
            WindowField::CodeNcoPhase => u32::from(taps.code_nco_phase.value()),
            WindowField::CarrierCycle => taps.carrier_cycle.value(),
            WindowField::CarrierNcoPhase => u32::from(taps.carrier_nco_phase.value()),
        }
    }

    fn read_fixed(&self, reg: Register) -> u32 {
        let regs = &*self.regs;
        match reg {
            Register::Id => self.config.id,
            Register::Version => self.config.version,
            Register::TimerPeriod => regs.timer.period,
            Register::Control => ControlReg::new_with_raw_value(0)
                .with_timer_enable(regs.timer.enabled)
                .raw_value(),
            Register::TicCount => self.shadow.tic_count(),
            Register::Status => self.shadow.status().to_register(),
            Register::ChPrn => u32::from(regs.channel.prn),
            Register::ChCarrIncr => regs.channel.carrier_increment,
            Register::ChCodeIncr => regs.channel.code_increment,
            Register::ChSlewAmount => u32::from(regs.channel.slew_amount.value()),
            Register::ChSlewRequest => 0,
            Register::ChEnable => u32::from(regs.channel.enable()),
        }
    }

    fn write_fixed(&mut self, reg: Register, data: u32, strobe: u4) {
        let mut timer = self.regs.timer;
        let mut channel = self.regs.channel;

        match reg {
            Register::TimerPeriod => {
                timer.period = merge_lanes(timer.period, data, strobe);
            }
            Register::Control => {
                let old = ControlReg::new_with_raw_value(0).with_timer_enable(timer.enabled);
                let merged = merge_lanes(old.raw_value(), data, strobe);
                let new = ControlReg::new_with_raw_value(merged);
                timer.enabled = new.timer_enable();
            }
            Register::Status => {
                let clear = StatusFlags::from_register(merge_lanes(0, data, strobe));
                if !clear.is_empty() {
                    (self.request_clear)(clear);
                }
            }
            Register::ChPrn => {
                // PRN and the derived enable change together.
                let old = u32::from(channel.prn);
                channel.prn = PrnReg::new_with_raw_value(merge_lanes(old, data, strobe)).prn();
            }
            Register::ChCarrIncr => {
                channel.carrier_increment = merge_lanes(channel.carrier_increment, data, strobe);
            }
            Register::ChCodeIncr => {
                channel.code_increment = merge_lanes(channel.code_increment, data, strobe);
            }
            Register::ChSlewAmount => {
                let old = u32::from(channel.slew_amount.value());
                channel.slew_amount =
                    SlewAmountReg::new_with_raw_value(merge_lanes(old, data, strobe)).amount();
            }
            Register::ChSlewRequest => {
                if SlewRequestReg::new_with_raw_value(merge_lanes(0, data, strobe)).request() {
                    channel.slew_toggle = self.regs.slew.flip();
                }
            }
            Register::Id | Register::Version | Register::TicCount | Register::ChEnable => {
                log::trace!("write to read-only {reg:?} dropped");
            }
        }

        self.regs.write_timer(timer);
        self.regs.write_channel(channel);
    }
}

impl<'a, const D: usize, F: FnMut(StatusFlags)> RegisterTarget for ControlFile<'a, D, F> {
    fn read(&self, addr: u16) -> u32 {
        let value = match Target::decode(addr) {
            Target::Fixed(reg) => self.read_fixed(reg),
            Target::Window { field, .. } => self.read_window(field),
            Target::Unmapped => 0,
        };
        log::trace!("read {addr:#06x} -> {value:#010x}");
        value
    }

    fn write(&mut self, addr: u16, data: u32, strobe: u4) {
        log::debug!(
            "write {addr:#06x} <- {data:#010x} (strobe {:#06b})",
            strobe.value()
        );
        match Target::decode(addr) {
            Target::Fixed(reg) => self.write_fixed(reg, data, strobe),
            Target::Window { .. } | Target::Unmapped => {
                log::trace!("write to {addr:#06x} dropped");
            }
        }
    }
}
