//! End-to-end clap counting on a simulated 16MHz sample stream.

use clap_firmware::clap::{
    ClapConfig, ClapDetector, ClapEvent, DetectorParams, Monotonic, SeriesReducer, TrackerState,
};
use std::cell::Cell;

const IDLE: u8 = 70;
const SPIKE: [u8; 5] = [IDLE, 180, 220, 120, 10];

/// Millisecond clock driven by the sample count.
struct SampleClock {
    micros: Cell<u64>,
}

impl Monotonic for SampleClock {
    fn now_ms(&self) -> u32 {
        (self.micros.get() / 1000) as u32
    }
}

struct Rig {
    params: DetectorParams,
    detector: ClapDetector,
    reducer: SeriesReducer,
    clock: SampleClock,
}

impl Rig {
    fn new() -> Self {
        let params = ClapConfig::DEFAULT.validate(16_000_000).unwrap();
        Self {
            params,
            detector: ClapDetector::new(params),
            reducer: SeriesReducer::new(params.series_timeout_ms),
            clock: SampleClock {
                micros: Cell::new(0),
            },
        }
    }

    fn sample(&self, value: u8) -> bool {
        let micros = self.clock.micros.get() + self.params.sample_period_us as u64;
        self.clock.micros.set(micros);
        critical_section::with(|cs| self.detector.on_sample(cs, value, &self.clock))
    }

    fn feed(&self, values: &[u8]) -> usize {
        values.iter().filter(|&&v| self.sample(v)).count()
    }

    fn clap(&self) -> usize {
        self.feed(&SPIKE)
    }

    /// Idle signal for at least `ms` milliseconds.
    fn silence(&self, ms: u32) {
        let samples = (ms * 1000).div_ceil(self.params.sample_period_us);
        for _ in 0..samples {
            self.sample(IDLE);
        }
    }

    fn count(&self) -> u8 {
        critical_section::with(|cs| self.detector.ledger().count(cs))
    }

    fn poll(&mut self) -> ClapEvent {
        self.reducer.poll(self.detector.ledger(), &self.clock)
    }
}

#[test]
fn signal_below_upper_threshold_never_reports() {
    let mut rig = Rig::new();
    // deterministic noise spanning 0..110
    let mut x: u32 = 12345;
    for i in 0..50_000 {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12345);
        let value = ((x >> 16) % 110) as u8;
        assert!(!rig.sample(value));
        if i % 97 == 0 {
            assert_eq!(rig.poll(), ClapEvent::None);
        }
    }
    rig.silence(2000);
    assert_eq!(rig.poll(), ClapEvent::None);
    assert_eq!(rig.count(), 0);
}

#[test]
fn one_spike_counts_once() {
    let rig = Rig::new();
    assert_eq!(rig.clap(), 1);
    assert_eq!(rig.count(), 1);
    rig.silence(200);
    assert_eq!(rig.count(), 1);
}

#[test]
fn spike_too_slow_to_fall_is_noise() {
    let rig = Rig::new();
    rig.sample(200);
    // 20 samples above the lower threshold outlast the 19 sample timeout
    for _ in 0..20 {
        rig.sample(100);
    }
    rig.sample(0);
    assert_eq!(rig.count(), 0);
    assert_eq!(
        critical_section::with(|cs| rig.detector.tracker_state(cs)),
        TrackerState::Seeking
    );
}

#[test]
fn debounce_swallows_second_spike() {
    let rig = Rig::new();
    assert_eq!(rig.clap(), 1);

    // well inside the 50ms debounce
    rig.silence(20);
    assert_eq!(rig.clap(), 0);
    assert_eq!(rig.count(), 1);

    // total silence now exceeds the debounce window
    rig.silence(40);
    assert_eq!(rig.clap(), 1);
    assert_eq!(rig.count(), 2);
}

#[test]
fn running_series_counts_up_without_gaps() {
    let mut rig = Rig::new();
    for expected in 1..=5 {
        assert_eq!(rig.clap(), 1);
        assert_eq!(rig.poll(), ClapEvent::SeriesInProgress(expected));
        assert_eq!(rig.poll(), ClapEvent::None);
        rig.silence(200);
        assert_eq!(rig.poll(), ClapEvent::None);
    }
}

#[test]
fn claps_accumulated_between_polls_are_reported_one_by_one() {
    let mut rig = Rig::new();
    for _ in 0..3 {
        rig.clap();
        rig.silence(100);
    }
    assert_eq!(rig.poll(), ClapEvent::SeriesInProgress(1));
    assert_eq!(rig.poll(), ClapEvent::SeriesInProgress(2));
    assert_eq!(rig.poll(), ClapEvent::SeriesInProgress(3));
    assert_eq!(rig.poll(), ClapEvent::None);
}

#[test]
fn series_finishes_after_timeout() {
    let mut rig = Rig::new();
    for _ in 0..3 {
        rig.clap();
        assert!(matches!(rig.poll(), ClapEvent::SeriesInProgress(_)));
        rig.silence(300);
    }

    rig.silence(600);
    assert_eq!(rig.poll(), ClapEvent::None);

    rig.silence(200);
    assert_eq!(rig.poll(), ClapEvent::SeriesFinished(3));
    assert_eq!(rig.poll(), ClapEvent::None);
    assert_eq!(rig.count(), 0);
    assert_eq!(rig.reducer.processed(), 0);

    // next series starts from one again
    rig.clap();
    assert_eq!(rig.poll(), ClapEvent::SeriesInProgress(1));
}

#[test]
fn finished_series_counts_unpolled_claps_once_reported() {
    let mut rig = Rig::new();
    rig.clap();
    rig.silence(100);
    rig.clap();
    rig.silence(1100);

    // Both claps are handed out before the series may end
    assert_eq!(rig.poll(), ClapEvent::SeriesInProgress(1));
    assert_eq!(rig.poll(), ClapEvent::SeriesInProgress(2));
    assert_eq!(rig.poll(), ClapEvent::SeriesFinished(2));
}

#[test]
fn overflow_reported_once_while_polling() {
    let mut rig = Rig::new();
    for expected in 1..=126u8 {
        assert_eq!(rig.clap(), 1);
        assert_eq!(rig.poll(), ClapEvent::SeriesInProgress(expected));
        rig.silence(60);
    }

    assert_eq!(rig.clap(), 1);
    assert_eq!(rig.poll(), ClapEvent::Overflow);
    assert_eq!(rig.count(), 0);
    assert_eq!(rig.reducer.processed(), 0);

    assert_eq!(rig.poll(), ClapEvent::None);
    rig.silence(1500);
    assert_eq!(rig.poll(), ClapEvent::None);
}

#[test]
fn overflow_drops_excess_claps() {
    let mut rig = Rig::new();
    for _ in 0..140 {
        assert_eq!(rig.clap(), 1);
        rig.silence(60);
    }
    assert_eq!(rig.count(), 140);

    for expected in 1..=126u8 {
        assert_eq!(rig.poll(), ClapEvent::SeriesInProgress(expected));
    }
    assert_eq!(rig.poll(), ClapEvent::Overflow);
    assert_eq!(rig.count(), 0);
    assert_eq!(rig.poll(), ClapEvent::None);

    rig.clap();
    assert_eq!(rig.poll(), ClapEvent::SeriesInProgress(1));
}

#[test]
fn polling_without_new_samples_is_idempotent() {
    let mut rig = Rig::new();
    rig.clap();
    assert_eq!(rig.poll(), ClapEvent::SeriesInProgress(1));
    for _ in 0..1000 {
        assert_eq!(rig.poll(), ClapEvent::None);
    }
    assert_eq!(rig.count(), 1);
    assert_eq!(rig.reducer.processed(), 1);
}

#[test]
fn event_codes_follow_signed_convention() {
    let mut rig = Rig::new();
    rig.clap();
    assert_eq!(rig.poll().code(), -1);
    rig.silence(1100);
    assert_eq!(rig.poll().code(), 1);
    assert_eq!(rig.poll().code(), 0);
}
