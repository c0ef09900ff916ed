use bitmaps::Bitmap;

use crate::bridge::{
    regs::map::StatusReg,
    toggle::RecordReceiver,
    types::{DumpData, DumpRecord, Latched, MeasurementRecord, MeasurementTaps},
};

const FLAG_COUNT: usize = 2;

/// Bit positions of the sticky flags (also their `STATUS` register bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum StatusBit {
    TicSeen = 0,
    DumpSeen = 1,
}

impl StatusBit {
    pub const ALL: [StatusBit; FLAG_COUNT] = [StatusBit::TicSeen, StatusBit::DumpSeen];
}

/// A set of sticky status bits, used both for the flags themselves and for
/// set/clear masks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusFlags(Bitmap<FLAG_COUNT>);

impl StatusFlags {
    pub fn new() -> Self {
        Self(Bitmap::new())
    }

    pub fn with(mut self, bit: StatusBit) -> Self {
        self.insert(bit);
        self
    }

    #[inline]
    pub fn contains(&self, bit: StatusBit) -> bool {
        self.0.get(bit as usize)
    }

    pub fn insert(&mut self, bit: StatusBit) {
        self.0.set(bit as usize, true);
    }

    pub fn remove(&mut self, bit: StatusBit) {
        self.0.set(bit as usize, false);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn union(mut self, other: StatusFlags) -> Self {
        for bit in StatusBit::ALL {
            if other.contains(bit) {
                self.insert(bit);
            }
        }
        self
    }

    /// Decodes the flag bits of a `STATUS` register word; other bits are ignored.
    pub fn from_register(raw: u32) -> Self {
        let reg = StatusReg::new_with_raw_value(raw);
        let mut flags = Self::new();
        if reg.tic_seen() {
            flags.insert(StatusBit::TicSeen);
        }
        if reg.dump_seen() {
            flags.insert(StatusBit::DumpSeen);
        }
        flags
    }

    pub fn to_register(&self) -> u32 {
        StatusReg::new_with_raw_value(0)
            .with_tic_seen(self.contains(StatusBit::TicSeen))
            .with_dump_seen(self.contains(StatusBit::DumpSeen))
            .raw_value()
    }
}

/// Sticky flags with set-wins-over-clear arbitration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StickyStatus {
    flags: StatusFlags,
}

impl StickyStatus {
    /// Applies one tick worth of sets and clears. A bit present in both
    /// `set` and `clear` ends up set.
    pub fn apply(&mut self, set: StatusFlags, clear: StatusFlags) {
        for bit in StatusBit::ALL {
            if set.contains(bit) {
                self.flags.insert(bit);
            } else if clear.contains(bit) {
                self.flags.remove(bit);
            }
        }
    }

    #[inline]
    pub fn flags(&self) -> StatusFlags {
        self.flags
    }
}

/// Control-domain owner of the shadow copies, the tic counter and the sticky
/// status.
///
/// Nothing else mutates this state: event sets come from its own toggle
/// receivers and clears arrive as queued requests handed to [`Self::tick`].
///
/// A record whose sequence number does not advance past the one already held
/// comes from a restarted sampling domain. Sequence 0 is the default record
/// republished on reset: it only resynchronizes the shadow copy and is neither
/// counted nor flagged. A lower non-zero sequence is a real event, the first
/// one seen since the restart, and only the events missed since the restart
/// are added to the coalesced counters.
#[derive(Debug, Default, Clone)]
pub struct ShadowBank<const D: usize = 2> {
    dump: DumpRecord,
    measurement: MeasurementRecord,
    tic_count: u32,
    status: StickyStatus,
    dump_rx: RecordReceiver<DumpData, D>,
    tic_rx: RecordReceiver<MeasurementTaps, D>,
    coalesced_dumps: u32,
    coalesced_tics: u32,
}

impl<const D: usize> ShadowBank<D> {
    pub fn new() -> Self {
        Self {
            dump: DumpRecord::default(),
            measurement: MeasurementRecord::default(),
            tic_count: 0,
            status: StickyStatus::default(),
            dump_rx: RecordReceiver::new(),
            tic_rx: RecordReceiver::new(),
            coalesced_dumps: 0,
            coalesced_tics: 0,
        }
    }

    /// Advances one control tick.
    ///
    /// `dump` and `measurement` are the records currently published by the
    /// sampling domain; `clear` holds the clear requests accepted on earlier
    /// ticks. Returns the flags set on this tick.
    pub fn tick(
        &mut self,
        dump: &DumpRecord,
        measurement: &MeasurementRecord,
        clear: StatusFlags,
    ) -> StatusFlags {
        let mut set = StatusFlags::new();

        if let Some(record) = self.tic_rx.tick(*measurement) {
            if let Arrival::Event { missed } = classify(&self.measurement, &record, "tic") {
                self.coalesced_tics = self.coalesced_tics.saturating_add(missed);
                self.tic_count = self.tic_count.wrapping_add(1);
                set.insert(StatusBit::TicSeen);
            }
            self.measurement = record;
        }

        if let Some(record) = self.dump_rx.tick(*dump) {
            if let Arrival::Event { missed } = classify(&self.dump, &record, "dump") {
                self.coalesced_dumps = self.coalesced_dumps.saturating_add(missed);
                set.insert(StatusBit::DumpSeen);
            }
            self.dump = record;
        }

        self.status.apply(set, clear);
        set
    }

    pub fn dump(&self) -> &DumpRecord {
        &self.dump
    }

    pub fn measurement(&self) -> &MeasurementRecord {
        &self.measurement
    }

    pub fn tic_count(&self) -> u32 {
        self.tic_count
    }

    pub fn status(&self) -> StatusFlags {
        self.status.flags()
    }

    /// Dump events that were overwritten or coalesced before being recorded.
    pub fn coalesced_dumps(&self) -> u32 {
        self.coalesced_dumps
    }

    /// Timer events that were overwritten or coalesced before being recorded.
    pub fn coalesced_tics(&self) -> u32 {
        self.coalesced_tics
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

enum Arrival {
    /// Default record of a freshly reset source.
    Restart,
    Event { missed: u32 },
}

fn classify<P>(previous: &Latched<P>, next: &Latched<P>, what: &str) -> Arrival {
    if next.sequence == 0 {
        log::info!("{what} source reset");
        return Arrival::Restart;
    }
    if next.sequence <= previous.sequence {
        log::info!(
            "{what} source restarted, sequence {} after {}",
            next.sequence,
            previous.sequence
        );
        return Arrival::Event {
            missed: next.sequence - 1,
        };
    }
    let missed = next.sequence - previous.sequence - 1;
    if missed != 0 {
        log::warn!(
            "{what} sequence jumped from {} to {}",
            previous.sequence,
            next.sequence
        );
    }
    Arrival::Event { missed }
}
