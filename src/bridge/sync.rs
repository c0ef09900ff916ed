/// Destination-side synchronizer of depth `D`.
///
/// Each destination tick shifts the freshly sampled source value into the
/// first stage and returns the last stage. A value held stable by the source
/// for at least `D` destination ticks appears at the output after at most `D`
/// ticks, and no value is output that the source did not hold at some
/// earlier sample.
///
/// Reset forces every stage back to `T::default()` regardless of the source.
#[derive(Debug, Clone)]
pub struct Synchronizer<T: Copy + Default, const D: usize = 2> {
    stages: [T; D],
}

impl<T: Copy + Default, const D: usize> Synchronizer<T, D> {
    pub fn new() -> Self {
        const { assert!(D >= 1, "synchronizer depth must be at least 1") };
        Self {
            stages: [T::default(); D],
        }
    }

    /// Advances one destination tick with the value sampled from the source.
    pub fn tick(&mut self, sample: T) -> T {
        self.stages.copy_within(0..D - 1, 1);
        self.stages[0] = sample;
        self.stages[D - 1]
    }

    /// Current synchronized value, without advancing.
    #[inline]
    pub fn output(&self) -> T {
        self.stages[D - 1]
    }

    pub fn reset(&mut self) {
        self.stages = [T::default(); D];
    }
}

impl<T: Copy + Default, const D: usize> Default for Synchronizer<T, D> {
    fn default() -> Self {
        Self::new()
    }
}
