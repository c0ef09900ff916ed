//! A `no_std`, no-alloc clock-domain bridge for a GNSS tracking channel.
//!
//! The unit sits between two independently paced execution domains:
//!
//! - a fast, free-running **sampling** domain that hosts the correlator
//!   collaborator, the periodic timer and the measurement/dump latches, and
//! - a slower **control** domain that answers register transactions and keeps
//!   shadow copies plus sticky status of whatever the sampling domain produced.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐  ControlWord    ┌──────────────────────────┐
//! │   Control domain         │  TimerConfig    │   Sampling domain        │
//! │                          │────────────────▶│                          │
//! │  RegisterPort (bus FSM)  │  Source → Sink  │  Synchronizer<D>         │
//! │  ControlRegs             │                 │  TimerGenerator          │
//! │                          │  DumpRecord     │  Latch<Dump|Measurement> │
//! │  ShadowBank (owner of    │◀────────────────│                          │
//! │  sticky status)          │  toggle marker  │  collaborator I/O        │
//! └──────────────────────────┘                 └──────────────────────────┘
//! ```
//!
//! - Every value that crosses has exactly one writer domain. The other domain
//!   reads it through a [`Synchronizer`](bridge::Synchronizer) or a toggle
//!   handshake and never mutates it.
//! - Events are signalled by flipping a toggle marker. Two flips inside the
//!   synchronization window coalesce; this is a documented rate constraint on
//!   the source, not an error.
//! - Sticky flags are only mutated by the shadow owner. Write-one-to-clear
//!   requests are queued and applied one control tick later, and a set on the
//!   same tick wins over the clear.
//!
//! # Example
//!
//! ```rust,no_run
//! use gnss_track_bridge::prelude::*;
//!
//! let mut bridge = BridgeBuilder::new().default_depth().build().unwrap();
//! let (mut control, mut sampling) = bridge.split();
//! let mut master = BusMaster::new();
//!
//! // Program a 1 ms timer at 1.6368 MHz and enable it.
//! for (addr, data) in [(map::TIMER_PERIOD, 1_636_800), (map::CONTROL, 1)] {
//!     master.start_write(addr, data, STROBE_ALL).unwrap();
//!     master
//!         .run(16, |inputs| {
//!             let out = control.tick(inputs);
//!             for _ in 0..4 {
//!                 sampling.tick(&SamplingInputs::default());
//!             }
//!             out
//!         })
//!         .unwrap();
//! }
//! ```

#![deny(unsafe_code)]
#![no_std]

#[cfg(test)]
extern crate std;

pub mod bridge;

pub mod prelude {
    pub use crate::bridge::prelude::*;
}
