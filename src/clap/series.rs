//! Clap counting shared with the interrupt, and its main-loop reader.

use core::cell::Cell;
use critical_section::{CriticalSection, Mutex};

/// Processed count at which a series is reported as [`ClapEvent::Overflow`].
/// Keeps every count representable in the signed event code.
pub const OVERFLOW_COUNT: u8 = 127;

/// Free-running millisecond clock.
pub trait Monotonic {
    fn now_ms(&self) -> u32;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClapEvent {
    None,
    /// A series is still running; `n`-th clap (1-based).
    SeriesInProgress(u8),
    /// The series timed out after `n` claps.
    SeriesFinished(u8),
    /// The series reached [`OVERFLOW_COUNT`] claps and was dropped.
    Overflow,
}

impl ClapEvent {
    /// Signed single-byte encoding: `0` none, `-n` running, `n` finished,
    /// `127` overflow.
    pub fn code(self) -> i8 {
        match self {
            ClapEvent::None => 0,
            ClapEvent::SeriesInProgress(n) => -(n as i8),
            ClapEvent::SeriesFinished(n) => n as i8,
            ClapEvent::Overflow => OVERFLOW_COUNT as i8,
        }
    }
}

/// Claps counted by the interrupt and the time of the latest one.
pub struct ClapLedger {
    count: Mutex<Cell<u8>>,
    last_clap_ms: Mutex<Cell<u32>>,
}

impl ClapLedger {
    pub const fn new() -> Self {
        Self {
            count: Mutex::new(Cell::new(0)),
            last_clap_ms: Mutex::new(Cell::new(0)),
        }
    }

    /// Interrupt side: count a clap detected at `now_ms`.
    pub fn record(&self, cs: CriticalSection<'_>, now_ms: u32) {
        let count = self.count.borrow(cs);
        count.set(count.get().saturating_add(1));
        self.last_clap_ms.borrow(cs).set(now_ms);
    }

    pub fn count(&self, cs: CriticalSection<'_>) -> u8 {
        self.count.borrow(cs).get()
    }

    pub fn last_clap_ms(&self, cs: CriticalSection<'_>) -> u32 {
        self.last_clap_ms.borrow(cs).get()
    }

    /// Remove `claps` already reported claps; whatever the interrupt added
    /// in the meantime stays counted.
    pub fn retire(&self, cs: CriticalSection<'_>, claps: u8) -> u8 {
        let count = self.count.borrow(cs);
        let left = count.get().saturating_sub(claps);
        count.set(left);
        left
    }

    pub fn clear(&self, cs: CriticalSection<'_>) {
        self.count.borrow(cs).set(0);
    }
}

impl Default for ClapLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns the raw clap count into [`ClapEvent`]s. Lives in the main loop.
#[derive(Debug)]
pub struct SeriesReducer {
    processed: u8,
    series_timeout_ms: u32,
}

impl SeriesReducer {
    pub const fn new(series_timeout_ms: u32) -> Self {
        Self {
            processed: 0,
            series_timeout_ms,
        }
    }

    /// Claps of the running series already handed out.
    pub fn processed(&self) -> u8 {
        self.processed
    }

    /// Non-blocking; call from the main loop as often as convenient.
    pub fn poll<M: Monotonic>(&mut self, ledger: &ClapLedger, clock: &M) -> ClapEvent {
        let count = critical_section::with(|cs| ledger.count(cs));

        if count > self.processed {
            self.processed += 1;
            if self.processed >= OVERFLOW_COUNT {
                self.processed = 0;
                critical_section::with(|cs| ledger.clear(cs));
                return ClapEvent::Overflow;
            }
            return ClapEvent::SeriesInProgress(self.processed);
        }

        if count > 0 {
            // Timestamp first: a clap landing between the two reads must not
            // make the gap look longer than it is.
            let last_clap = critical_section::with(|cs| ledger.last_clap_ms(cs));
            let now = clock.now_ms();
            if now.wrapping_sub(last_clap) > self.series_timeout_ms {
                let claps = self.processed;
                critical_section::with(|cs| ledger.retire(cs, claps));
                self.processed = 0;
                return ClapEvent::SeriesFinished(claps);
            }
        }

        ClapEvent::None
    }
}
