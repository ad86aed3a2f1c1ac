//! Configuration constants for the clap detector firmware

use crate::clap::{ClapConfig, ConfigError, DetectorParams};

/// CPU frequency in Hz, exported by the build script
pub const CPU_FREQ_HZ: u32 = parse_hz(env!("MCU_FREQ_HZ"));

/// UART baud rate
pub const UART_BAUD: u32 = 115_200;

/// ADC input the microphone amplifier is wired to
pub const CLAP_ADC_CHANNEL: u8 = 0;

/// How long the status LED stays lit after a clap, in milliseconds
pub const LED_BLINK_MS: u32 = 100;

/// Detector tuning.
///
/// ```text
/// 255
/// 130      ^        peak
/// 110     / \       max_threshold
///  70 ---/   \  --- idle level
///  30         \/    peak - input must reach the peak delta
///   0
/// ```
pub const CLAP: ClapConfig = ClapConfig {
    max_threshold: 110,
    min_threshold: 30,
    jitter_threshold: 30,
    peak_timeout_us: 2000,
    debounce_ms: 50,
    series_timeout_ms: 1000,
};

/// Detector parameters resolved against the CPU clock. An invalid
/// configuration fails the build here.
pub const CLAP_PARAMS: DetectorParams = match CLAP.validate(CPU_FREQ_HZ) {
    Ok(params) => params,
    Err(ConfigError::UnsupportedClock) => {
        panic!("CPU clock not supported, choose 1, 2, 4, 8, 16 or 20 MHz")
    }
    Err(ConfigError::SampleRateTooLow) => {
        panic!("samples must be taken faster than 3kHz to detect clapping")
    }
    Err(ConfigError::ThresholdOrder) => {
        panic!("upper threshold must be higher than lower threshold")
    }
    Err(ConfigError::PeakDeltaOverflow) => {
        panic!("jitter threshold exceeds the physical range of a sample")
    }
    Err(ConfigError::PeakTimeoutRange) => panic!("peak timeout is set either too high or too low"),
    Err(ConfigError::DebounceTooLong) => {
        panic!("debounce too long for the configured upper threshold")
    }
};

const fn parse_hz(s: &str) -> u32 {
    let bytes = s.as_bytes();
    assert!(!bytes.is_empty(), "MCU_FREQ_HZ is empty");
    let mut value: u32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        assert!(b.is_ascii_digit(), "MCU_FREQ_HZ must be decimal");
        value = value * 10 + (b - b'0') as u32;
        i += 1;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_frequency() {
        assert_eq!(parse_hz("16000000"), 16_000_000);
        assert_eq!(parse_hz("1"), 1);
    }

    #[test]
    fn default_build_resolves_104us_samples() {
        if CPU_FREQ_HZ == 16_000_000 {
            assert_eq!(CLAP_PARAMS.sample_period_us, 104);
            assert_eq!(CLAP_PARAMS.peak_timeout_samples, 19);
            assert_eq!(CLAP_PARAMS.debounce_samples, 480);
        }
        assert_eq!(CLAP_PARAMS.series_timeout_ms, CLAP.series_timeout_ms);
    }
}
