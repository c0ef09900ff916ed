//! Register map of the unit.
//!
//! All registers are 32 bits wide; offsets are relative to the unit's base.

use arbitrary_int::u11;

use super::macros::register_map;

/// Access semantics of a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    ReadWrite,
    WriteOnly,
    /// Readable; writing 1 to a bit requests its clear.
    WriteOneToClear,
}

register_map! {
    /// Fixed identification constant.
    id = 0x0000, ReadOnly;
    /// Fixed version constant.
    version = 0x0004, ReadOnly;
    /// Timer period in sampling-domain ticks.
    timer_period = 0x0008, ReadWrite;
    /// Bit 0: timer enable.
    control = 0x000C, ReadWrite;
    /// Timer events observed in the control domain.
    tic_count = 0x0010, ReadOnly;
    /// Bit 0: tic seen, bit 1: dump seen.
    status = 0x0014, WriteOneToClear;
    /// 8-bit PRN; zero disables the channel.
    ch_prn = 0x0020, ReadWrite;
    /// Carrier phase increment.
    ch_carr_incr = 0x0024, ReadWrite;
    /// Code phase increment.
    ch_code_incr = 0x0028, ReadWrite;
    /// 11-bit slew magnitude.
    ch_slew_amount = 0x002C, ReadWrite;
    /// Bit 0 set flips the slew-request toggle.
    ch_slew_request = 0x0030, WriteOnly;
    /// Derived channel enable.
    ch_enable = 0x0034, ReadOnly;
}

/// First byte of the channel window region.
pub const WINDOW_BASE: u16 = 0x0100;
/// Size of one channel window.
pub const WINDOW_STRIDE: u16 = 0x0040;
/// End (exclusive) of the channel window region.
pub const WINDOW_END: u16 = 0x1000;
/// Number of populated channel windows.
pub const WINDOW_CHANNELS: u16 = 1;

/// Word offsets inside a channel window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum WindowField {
    DumpSequence = 0x00,
    EarlyI = 0x04,
    EarlyQ = 0x08,
    PromptI = 0x0C,
    PromptQ = 0x10,
    LateI = 0x14,
    LateQ = 0x18,
    DumpEpoch = 0x1C,
    MeasurementSequence = 0x20,
    MeasurementEpoch = 0x24,
    CodePhase = 0x28,
    CodeNcoPhase = 0x2C,
    CarrierCycle = 0x30,
    CarrierNcoPhase = 0x34,
}

impl WindowField {
    pub const fn decode(offset: u16) -> Option<Self> {
        Some(match offset {
            0x00 => WindowField::DumpSequence,
            0x04 => WindowField::EarlyI,
            0x08 => WindowField::EarlyQ,
            0x0C => WindowField::PromptI,
            0x10 => WindowField::PromptQ,
            0x14 => WindowField::LateI,
            0x18 => WindowField::LateQ,
            0x1C => WindowField::DumpEpoch,
            0x20 => WindowField::MeasurementSequence,
            0x24 => WindowField::MeasurementEpoch,
            0x28 => WindowField::CodePhase,
            0x2C => WindowField::CodeNcoPhase,
            0x30 => WindowField::CarrierCycle,
            0x34 => WindowField::CarrierNcoPhase,
            _ => return None,
        })
    }

    /// Absolute offset of this field in the window of `channel`.
    pub const fn address(self, channel: u16) -> u16 {
        WINDOW_BASE + channel * WINDOW_STRIDE + self as u16
    }
}

/// What an address decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Fixed(Register),
    Window { channel: u16, field: WindowField },
    Unmapped,
}

impl Target {
    pub const fn decode(addr: u16) -> Self {
        if let Some(reg) = Register::decode(addr) {
            return Target::Fixed(reg);
        }
        if addr >= WINDOW_BASE && addr < WINDOW_END {
            let rel = addr - WINDOW_BASE;
            let channel = rel / WINDOW_STRIDE;
            if channel < WINDOW_CHANNELS {
                if let Some(field) = WindowField::decode(rel % WINDOW_STRIDE) {
                    return Target::Window { channel, field };
                }
            }
        }
        Target::Unmapped
    }
}

#[bitbybit::bitfield(u32, default = 0x0)]
#[derive(Debug, PartialEq, Eq)]
pub struct StatusReg {
    #[bit(1, rw)]
    dump_seen: bool,
    #[bit(0, rw)]
    tic_seen: bool,
}

#[bitbybit::bitfield(u32, default = 0x0)]
#[derive(Debug, PartialEq, Eq)]
pub struct ControlReg {
    #[bit(0, rw)]
    timer_enable: bool,
}

#[bitbybit::bitfield(u32, default = 0x0)]
#[derive(Debug, PartialEq, Eq)]
pub struct PrnReg {
    #[bits(0..=7, rw)]
    prn: u8,
}

#[bitbybit::bitfield(u32, default = 0x0)]
#[derive(Debug, PartialEq, Eq)]
pub struct SlewAmountReg {
    #[bits(0..=10, rw)]
    amount: u11,
}

#[bitbybit::bitfield(u32, default = 0x0)]
#[derive(Debug, PartialEq, Eq)]
pub struct SlewRequestReg {
    #[bit(0, rw)]
    request: bool,
}
