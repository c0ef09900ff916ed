use core::cell::Cell;

use critical_section::Mutex;

/// Single-slot crossing cell shared by two domains.
///
/// Stores and loads move the whole value inside one critical section, so a
/// multi-bit value is always observed as a unit. Access goes through a
/// [`Source`] (the one writer) or a [`Sink`] (the reader).
pub struct SyncCell<T: Copy> {
    slot: Mutex<Cell<T>>,
}

impl<T: Copy> SyncCell<T> {
    pub const fn new(value: T) -> Self {
        Self {
            slot: Mutex::new(Cell::new(value)),
        }
    }

    fn load(&self) -> T {
        critical_section::with(|cs| self.slot.borrow(cs).get())
    }

    fn store(&self, value: T) {
        critical_section::with(|cs| self.slot.borrow(cs).set(value))
    }

    pub(crate) fn source(&self) -> Source<'_, T> {
        Source { cell: self }
    }

    pub(crate) fn sink(&self) -> Sink<'_, T> {
        Sink { cell: self }
    }
}

impl<T: Copy + Default> Default for SyncCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Copy> core::fmt::Debug for SyncCell<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SyncCell").finish_non_exhaustive()
    }
}

/// Writer side of a [`SyncCell`]. Only the owning domain holds one.
pub struct Source<'a, T: Copy> {
    cell: &'a SyncCell<T>,
}

impl<'a, T: Copy> Source<'a, T> {
    /// Publishes a new value for the other domain.
    #[inline]
    pub fn publish(&mut self, value: T) {
        self.cell.store(value)
    }
}

impl<'a, T: Copy> core::fmt::Debug for Source<'a, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Source").finish_non_exhaustive()
    }
}

/// Reader side of a [`SyncCell`].
pub struct Sink<'a, T: Copy> {
    cell: &'a SyncCell<T>,
}

impl<'a, T: Copy> Sink<'a, T> {
    /// Returns the value most recently published by the source.
    ///
    /// This is the raw, unsynchronized view; domains feed it through a
    /// [`Synchronizer`](crate::bridge::Synchronizer) before acting on it.
    #[inline]
    pub fn sample(&self) -> T {
        self.cell.load()
    }
}

impl<'a, T: Copy> core::fmt::Debug for Sink<'a, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Sink").finish_non_exhaustive()
    }
}
