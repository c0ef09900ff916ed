use arbitrary_int::u4;

use crate::bridge::{
    error::BridgeError,
    port::{BusInputs, BusOutputs, WriteData},
};

/// Outcome of a completed bus transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Written,
    Read(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Write {
        addr: u16,
        data: WriteData,
        addr_done: bool,
        data_done: bool,
    },
    Read {
        addr: u16,
        addr_done: bool,
    },
}

/// Caller-side driver for one register transaction at a time.
///
/// The register protocol has no timeouts of its own; [`BusMaster::run`] adds
/// a tick budget on top.
#[derive(Debug, Default, Clone)]
pub struct BusMaster {
    pending: Option<Pending>,
}

impl BusMaster {
    pub const fn new() -> Self {
        Self { pending: None }
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }

    pub fn start_write(&mut self, addr: u16, data: u32, strobe: u4) -> Result<(), BridgeError> {
        if self.pending.is_some() {
            return Err(BridgeError::Busy);
        }
        self.pending = Some(Pending::Write {
            addr,
            data: WriteData { data, strobe },
            addr_done: false,
            data_done: false,
        });
        Ok(())
    }

    pub fn start_read(&mut self, addr: u16) -> Result<(), BridgeError> {
        if self.pending.is_some() {
            return Err(BridgeError::Busy);
        }
        self.pending = Some(Pending::Read {
            addr,
            addr_done: false,
        });
        Ok(())
    }

    /// Channel values to drive on the next tick.
    pub fn inputs(&self) -> BusInputs {
        match self.pending {
            None => BusInputs::default(),
            Some(Pending::Write {
                addr,
                data,
                addr_done,
                data_done,
            }) => BusInputs {
                write_addr: (!addr_done).then_some(addr),
                write_data: (!data_done).then_some(data),
                write_resp_ready: addr_done && data_done,
                ..Default::default()
            },
            Some(Pending::Read { addr, addr_done }) => BusInputs {
                read_addr: (!addr_done).then_some(addr),
                read_resp_ready: addr_done,
                ..Default::default()
            },
        }
    }

    /// Records the port outputs of the tick driven with [`Self::inputs`].
    /// Returns the completion on the tick the response is taken.
    pub fn observe(&mut self, inputs: &BusInputs, out: &BusOutputs) -> Option<Completion> {
        let done = match self.pending.as_mut()? {
            Pending::Write {
                addr_done,
                data_done,
                ..
            } => {
                if inputs.write_resp_ready && out.write_resp_valid {
                    Some(Completion::Written)
                } else {
                    *addr_done |= inputs.write_addr.is_some() && out.write_addr_ready;
                    *data_done |= inputs.write_data.is_some() && out.write_data_ready;
                    None
                }
            }
            Pending::Read { addr_done, .. } => match out.read_data {
                Some(data) if inputs.read_resp_ready => Some(Completion::Read(data)),
                _ => {
                    *addr_done |= inputs.read_addr.is_some() && out.read_addr_ready;
                    None
                }
            },
        };
        if done.is_some() {
            self.pending = None;
        }
        done
    }

    /// Drives the pending transaction to completion, calling `tick` once per
    /// control tick. Gives up after `budget` ticks.
    pub fn run(
        &mut self,
        budget: u32,
        mut tick: impl FnMut(BusInputs) -> BusOutputs,
    ) -> Result<Completion, BridgeError> {
        for _ in 0..budget {
            let inputs = self.inputs();
            let out = tick(inputs);
            if let Some(done) = self.observe(&inputs, &out) {
                return Ok(done);
            }
        }
        self.pending = None;
        Err(BridgeError::Timeout { ticks: budget })
    }
}
