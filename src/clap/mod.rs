//! Hand clap detection on the ADC sample stream.
//!
//! The ADC interrupt feeds every sample into a [`ClapDetector`]; the main
//! loop polls a [`SeriesReducer`] which turns the running count into
//! [`ClapEvent`]s.

mod config;
mod detector;
mod series;

pub use config::{
    check_sample_period, ClapConfig, ConfigError, DetectorParams, MIN_SAMPLE_RATE_HZ,
};
pub use detector::{PeakTracker, TrackerState};
pub use series::{ClapEvent, ClapLedger, Monotonic, SeriesReducer, OVERFLOW_COUNT};

use core::cell::Cell;
use critical_section::{CriticalSection, Mutex};

/// Peak tracker plus the counters it shares with the main loop.
pub struct ClapDetector {
    tracker: Mutex<Cell<PeakTracker>>,
    ledger: ClapLedger,
}

impl ClapDetector {
    pub const fn new(params: DetectorParams) -> Self {
        Self {
            tracker: Mutex::new(Cell::new(PeakTracker::new(params))),
            ledger: ClapLedger::new(),
        }
    }

    /// Interrupt side: process one sample, stamping a detected clap with
    /// `clock`.
    pub fn on_sample<M: Monotonic>(
        &self,
        cs: CriticalSection<'_>,
        sample: u8,
        clock: &M,
    ) -> bool {
        let cell = self.tracker.borrow(cs);
        let mut tracker = cell.get();
        let clap = tracker.on_sample(sample);
        cell.set(tracker);
        if clap {
            self.ledger.record(cs, clock.now_ms());
        }
        clap
    }

    /// Forget a half-seen peak or a running debounce. Counted claps stay.
    pub fn reset(&self, cs: CriticalSection<'_>) {
        let cell = self.tracker.borrow(cs);
        let mut tracker = cell.get();
        tracker.reset();
        cell.set(tracker);
    }

    pub fn tracker_state(&self, cs: CriticalSection<'_>) -> TrackerState {
        self.tracker.borrow(cs).get().state()
    }

    pub fn ledger(&self) -> &ClapLedger {
        &self.ledger
    }
}

#[cfg(target_arch = "avr")]
pub use self::avr::{init, ClapSensor};

#[cfg(target_arch = "avr")]
mod avr {
    use super::{ClapDetector, ClapEvent, SeriesReducer};
    use crate::config::{CLAP_ADC_CHANNEL, CLAP_PARAMS};
    use crate::hal::adc::Adc;
    use crate::hal::timer::SystemClock;

    static DETECTOR: ClapDetector = ClapDetector::new(CLAP_PARAMS);

    /// Main-loop handle to the clap detector.
    pub struct ClapSensor {
        adc: Adc,
        reducer: SeriesReducer,
    }

    /// Configure the ADC for clap sampling. Call once, before [`ClapSensor::enable`].
    pub fn init() -> ClapSensor {
        ClapSensor {
            adc: Adc::init(CLAP_ADC_CHANNEL, CLAP_PARAMS.prescaler),
            reducer: SeriesReducer::new(CLAP_PARAMS.series_timeout_ms),
        }
    }

    impl ClapSensor {
        pub fn enable(&mut self) {
            self.adc.enable();
        }

        /// Stop sampling. A peak seen before this is dropped so the next
        /// [`enable`](Self::enable) starts from a quiet state.
        pub fn disable(&mut self) {
            self.adc.disable();
            critical_section::with(|cs| DETECTOR.reset(cs));
        }

        pub fn poll(&mut self) -> ClapEvent {
            self.reducer.poll(DETECTOR.ledger(), &SystemClock)
        }
    }

    #[avr_device::interrupt(atmega328p)]
    fn ADC() {
        let sample = Adc::read_sample();
        critical_section::with(|cs| {
            DETECTOR.on_sample(cs, sample, &SystemClock);
        });
    }
}
