//! Peak tracking over the raw sample stream.
//!
//! A clap is a sharp spike: the signal rises to at least the upper threshold
//! and, within the peak timeout, drops to the lower threshold with a total
//! swing of at least the peak delta. A rise that does not fall back in time
//! is dropped as noise.

use super::config::DetectorParams;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackerState {
    /// Waiting for the signal to reach the upper threshold.
    Seeking,
    /// A candidate peak is live for `remaining` more samples.
    Tracking { peak: u8, remaining: u16 },
    /// Blind for `remaining` more samples after a clap.
    Debouncing { remaining: u16 },
}

/// Sample-driven clap recogniser. Runs in the ADC interrupt.
#[derive(Clone, Copy, Debug)]
pub struct PeakTracker {
    params: DetectorParams,
    state: TrackerState,
}

impl PeakTracker {
    pub const fn new(params: DetectorParams) -> Self {
        Self {
            params,
            state: TrackerState::Seeking,
        }
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// Feed one sample. Returns `true` when it completes a clap.
    pub fn on_sample(&mut self, input: u8) -> bool {
        let p = &self.params;
        match self.state {
            TrackerState::Debouncing { remaining } => {
                self.state = match remaining.saturating_sub(1) {
                    0 => TrackerState::Seeking,
                    remaining => TrackerState::Debouncing { remaining },
                };
                false
            }
            TrackerState::Seeking => {
                if input >= p.max_threshold {
                    self.state = TrackerState::Tracking {
                        peak: input,
                        remaining: p.peak_timeout_samples,
                    };
                }
                false
            }
            TrackerState::Tracking { peak, remaining } => {
                if input >= peak {
                    // A louder, later sample supersedes the candidate
                    self.state = TrackerState::Tracking {
                        peak: input,
                        remaining: p.peak_timeout_samples,
                    };
                    false
                } else if input <= p.min_threshold && peak - input >= p.peak_delta {
                    let window = p.debounce_window();
                    self.state = TrackerState::Debouncing {
                        remaining: window.min(u16::MAX as u32) as u16,
                    };
                    true
                } else {
                    self.state = match remaining.saturating_sub(1) {
                        0 => TrackerState::Seeking,
                        remaining => TrackerState::Tracking { peak, remaining },
                    };
                    false
                }
            }
        }
    }

    /// Drop any candidate peak and debounce.
    pub fn reset(&mut self) {
        self.state = TrackerState::Seeking;
    }
}
