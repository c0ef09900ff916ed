pub mod builder;
pub mod cell;
pub mod control;
pub mod error;
pub mod helpers;
pub mod latch;
pub mod master;
pub mod port;
pub mod regs;
pub mod sampling;
pub mod status;
pub mod storage;
pub mod sync;
pub mod timer;
pub mod toggle;
pub mod types;

#[cfg(test)]
mod scenarios;

pub use builder::{BridgeBuilder, BridgeConfig};
pub use cell::{Sink, Source, SyncCell};
pub use control::ControlDomain;
pub use error::BridgeError;
pub use helpers::STROBE_ALL;
pub use latch::Latch;
pub use master::{BusMaster, Completion};
pub use port::{BusInputs, BusOutputs, RegisterPort, WriteData};
pub use regs::{Access, ControlRegs, Register, RegisterTarget, map};
pub use sampling::SamplingDomain;
pub use status::{ShadowBank, StatusBit, StatusFlags, StickyStatus};
pub use storage::Bridge;
pub use sync::Synchronizer;
pub use timer::TimerGenerator;
pub use toggle::{ToggleReceiver, ToggleSender};
pub use types::{
    Accumulators, ControlWord, DumpData, DumpRecord, Latched, MeasurementRecord, MeasurementTaps,
    SamplingInputs, SamplingOutputs, TimerConfig,
};

pub mod prelude {
    pub use super::{
        Access, Accumulators, Bridge, BridgeBuilder, BridgeConfig, BridgeError, BusInputs,
        BusMaster, BusOutputs, Completion, ControlDomain, ControlWord, DumpData, DumpRecord,
        MeasurementRecord, MeasurementTaps, Register, STROBE_ALL, SamplingDomain, SamplingInputs,
        SamplingOutputs, StatusBit, StatusFlags, TimerConfig, map,
    };
}
