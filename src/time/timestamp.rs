use std::{
    sync::atomic::{self, Ordering::SeqCst},
    time::Instant,
};

use crate::time::FineDuration;

/// A monotonic measurement timestamp provided by the operating system.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Timestamp(Instant);

impl Timestamp {
    /// Takes the timestamp that opens a measurement.
    ///
    /// Work issued before this call cannot be reordered past it, and the
    /// clock read is not moved into the measured work.
    #[inline(always)]
    pub fn start() -> Self {
        atomic::fence(SeqCst);
        let value = Instant::now();
        atomic::compiler_fence(SeqCst);
        Self(value)
    }

    /// Takes the timestamp that closes a measurement.
    ///
    /// Measured work cannot be reordered past this call.
    #[inline(always)]
    pub fn end() -> Self {
        atomic::compiler_fence(SeqCst);
        let value = Instant::now();
        atomic::fence(SeqCst);
        Self(value)
    }

    /// Returns the time elapsed since `earlier`, saturating at zero.
    #[inline]
    pub fn duration_since(self, earlier: Self) -> FineDuration {
        self.0.saturating_duration_since(earlier.0).into()
    }
}
