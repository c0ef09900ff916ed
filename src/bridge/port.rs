//! Control-domain register protocol.
//!
//! Split address/data/response channels with a valid/ready handshake on each,
//! in the style of a lite memory-mapped bus. A channel handshake completes on
//! the tick where the master offers a value (`Some`) and the port reports
//! ready. Ready and valid outputs reflect the port state at the start of the
//! tick, so a master can always tell from one tick's outputs whether its
//! offer was taken.
//!
//! Each direction holds at most one transaction. The address channel of a
//! direction stays not-ready until the response of the previous transaction of
//! that direction has been taken.

use arbitrary_int::u4;

use crate::bridge::regs::RegisterTarget;

/// Payload of the write data channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteData {
    pub data: u32,
    /// Byte-enable mask, bit `n` enables byte lane `n`.
    pub strobe: u4,
}

/// What the master drives on one control tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BusInputs {
    pub write_addr: Option<u16>,
    pub write_data: Option<WriteData>,
    pub write_resp_ready: bool,
    pub read_addr: Option<u16>,
    pub read_resp_ready: bool,
}

/// What the port drives on one control tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BusOutputs {
    pub write_addr_ready: bool,
    pub write_data_ready: bool,
    pub write_resp_valid: bool,
    pub read_addr_ready: bool,
    /// Read response, valid while `Some`.
    pub read_data: Option<u32>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum WritePhase {
    #[default]
    Idle,
    AddrAccepted(u16),
    DataAccepted(WriteData),
    Respond,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum ReadPhase {
    #[default]
    Idle,
    Respond(u32),
}

/// Register protocol state machine.
#[derive(Debug, Default, Clone)]
pub struct RegisterPort {
    write: WritePhase,
    read: ReadPhase,
}

impl RegisterPort {
    pub const fn new() -> Self {
        Self {
            write: WritePhase::Idle,
            read: ReadPhase::Idle,
        }
    }

    /// Outputs for the current state, before this tick's inputs are applied.
    pub fn outputs(&self) -> BusOutputs {
        BusOutputs {
            write_addr_ready: matches!(self.write, WritePhase::Idle | WritePhase::DataAccepted(_)),
            write_data_ready: matches!(self.write, WritePhase::Idle | WritePhase::AddrAccepted(_)),
            write_resp_valid: matches!(self.write, WritePhase::Respond),
            read_addr_ready: matches!(self.read, ReadPhase::Idle),
            read_data: match self.read {
                ReadPhase::Respond(data) => Some(data),
                ReadPhase::Idle => None,
            },
        }
    }

    /// Advances one control tick.
    ///
    /// A write is applied to `target` on the tick its second half (address or
    /// data) is accepted. A read is decoded on the tick its address is
    /// accepted and held until the response is taken.
    pub fn tick<T: RegisterTarget>(&mut self, inputs: &BusInputs, target: &mut T) -> BusOutputs {
        let out = self.outputs();

        let addr = inputs.write_addr.filter(|_| out.write_addr_ready);
        let data = inputs.write_data.filter(|_| out.write_data_ready);
        self.write = match (self.write, addr, data) {
            (WritePhase::Idle, Some(a), Some(d))
            | (WritePhase::AddrAccepted(a), _, Some(d))
            | (WritePhase::DataAccepted(d), Some(a), _) => {
                target.write(a, d.data, d.strobe);
                WritePhase::Respond
            }
            (WritePhase::Idle, Some(a), None) => WritePhase::AddrAccepted(a),
            (WritePhase::Idle, None, Some(d)) => WritePhase::DataAccepted(d),
            (WritePhase::Respond, _, _) if inputs.write_resp_ready => WritePhase::Idle,
            (phase, _, _) => phase,
        };

        self.read = match self.read {
            ReadPhase::Idle => match inputs.read_addr {
                Some(a) => ReadPhase::Respond(target.read(a)),
                None => ReadPhase::Idle,
            },
            ReadPhase::Respond(_) if inputs.read_resp_ready => ReadPhase::Idle,
            phase => phase,
        };

        out
    }

    pub fn is_idle(&self) -> bool {
        self.write == WritePhase::Idle && self.read == ReadPhase::Idle
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
