use crate::hal::adc::{self, AdcPrescaler};

/// Detector tuning, expressed in amplitude steps and wall-clock units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClapConfig {
    /// Level the signal has to reach for a peak to be considered.
    pub max_threshold: u8,
    /// Level the signal has to fall to after the peak.
    pub min_threshold: u8,
    /// Extra swing required on top of `max_threshold - min_threshold`.
    pub jitter_threshold: u8,
    /// Time allowed between the upper and the lower extreme.
    pub peak_timeout_us: u32,
    /// Dead time after a detected clap.
    pub debounce_ms: u32,
    /// Silence that ends a series.
    pub series_timeout_ms: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// No ADC prescaler is known for the CPU clock.
    UnsupportedClock,
    /// Sampling at or below 3kHz cannot resolve a clap.
    SampleRateTooLow,
    /// `min_threshold` is not below `max_threshold`.
    ThresholdOrder,
    /// Required peak swing does not fit into an 8-bit sample.
    PeakDeltaOverflow,
    /// Peak timeout rounds to zero samples or exceeds 255 samples.
    PeakTimeoutRange,
    /// Debounce does not fit below the upper threshold.
    DebounceTooLong,
}

/// Minimum sampling rate in Hz.
pub const MIN_SAMPLE_RATE_HZ: u32 = 3000;

/// Reject sample periods too long to catch the edges of a clap.
pub const fn check_sample_period(period_us: u32) -> Result<(), ConfigError> {
    if period_us == 0 || 1_000_000 / period_us <= MIN_SAMPLE_RATE_HZ {
        Err(ConfigError::SampleRateTooLow)
    } else {
        Ok(())
    }
}

/// Configuration resolved to sample periods for one CPU clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetectorParams {
    pub max_threshold: u8,
    pub min_threshold: u8,
    /// `(max_threshold - min_threshold) + jitter_threshold`
    pub peak_delta: u8,
    pub peak_timeout_samples: u16,
    pub debounce_samples: u16,
    pub series_timeout_ms: u32,
    pub prescaler: AdcPrescaler,
    pub sample_period_us: u32,
}

impl ClapConfig {
    pub const DEFAULT: Self = Self {
        max_threshold: 110,
        min_threshold: 30,
        jitter_threshold: 30,
        peak_timeout_us: 2000,
        debounce_ms: 50,
        series_timeout_ms: 1000,
    };

    /// Check the configuration against `cpu_hz` and derive the per-sample
    /// counts the detector runs on.
    pub const fn validate(&self, cpu_hz: u32) -> Result<DetectorParams, ConfigError> {
        let prescaler = match AdcPrescaler::for_cpu_freq(cpu_hz) {
            Some(prescaler) => prescaler,
            None => return Err(ConfigError::UnsupportedClock),
        };
        let sample_period_us = adc::sample_period_us(prescaler, cpu_hz);
        if let Err(err) = check_sample_period(sample_period_us) {
            return Err(err);
        }

        if self.min_threshold >= self.max_threshold {
            return Err(ConfigError::ThresholdOrder);
        }

        let peak_delta = (self.max_threshold - self.min_threshold) as u16
            + self.jitter_threshold as u16;
        if peak_delta > u8::MAX as u16 {
            return Err(ConfigError::PeakDeltaOverflow);
        }

        let peak_timeout = self.peak_timeout_us / sample_period_us;
        if peak_timeout == 0 || peak_timeout > u8::MAX as u32 {
            return Err(ConfigError::PeakTimeoutRange);
        }

        // Widened so the range check happens before truncation
        let debounce = (self.debounce_ms as u64 * 1000) / sample_period_us as u64;
        if (debounce >> 8) >= self.max_threshold as u64 {
            return Err(ConfigError::DebounceTooLong);
        }

        Ok(DetectorParams {
            max_threshold: self.max_threshold,
            min_threshold: self.min_threshold,
            peak_delta: peak_delta as u8,
            peak_timeout_samples: peak_timeout as u16,
            debounce_samples: debounce as u16,
            series_timeout_ms: self.series_timeout_ms,
            prescaler,
            sample_period_us,
        })
    }
}

impl Default for ClapConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl DetectorParams {
    /// Samples the detector stays blind after a clap.
    pub const fn debounce_window(&self) -> u32 {
        self.debounce_samples as u32 + 1
    }
}
