//! Free-running 8-bit ADC sampler.
//!
//! Each conversion takes 13 ADC clock cycles, so with the prescaler picked
//! from the CPU clock one interrupt fires roughly every 104us (9.6kHz). The
//! first conversion after enabling takes 25 cycles; the detector doesn't care.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum AdcPrescaler {
    Div2 = 1,
    Div4 = 2,
    Div8 = 3,
    Div16 = 4,
    Div32 = 5,
    Div64 = 6,
    Div128 = 7,
}

/// ADC clock cycles per conversion in free-running mode
pub const CYCLES_PER_CONVERSION: u32 = 13;

impl AdcPrescaler {
    /// Prescaler that keeps the sample period near 104us.
    ///
    /// 20MHz uses the largest divider as well and simply samples faster.
    pub const fn for_cpu_freq(cpu_hz: u32) -> Option<Self> {
        match cpu_hz {
            16_000_000 | 20_000_000 => Some(Self::Div128),
            8_000_000 => Some(Self::Div64),
            4_000_000 => Some(Self::Div32),
            2_000_000 => Some(Self::Div16),
            1_000_000 => Some(Self::Div8),
            _ => None,
        }
    }

    pub const fn division(self) -> u32 {
        1 << (self as u8)
    }

    /// ADPS2..0 field value
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Microseconds between two conversion-complete interrupts.
pub const fn sample_period_us(prescaler: AdcPrescaler, cpu_hz: u32) -> u32 {
    ((prescaler.division() * 1_000_000) / cpu_hz) * CYCLES_PER_CONVERSION
}

#[cfg(target_arch = "avr")]
pub use self::avr::Adc;

#[cfg(target_arch = "avr")]
mod avr {
    use super::AdcPrescaler;
    use crate::hal::pac::ADC;

    // ADMUX
    const REFS0: u8 = 1 << 6;
    const ADLAR: u8 = 1 << 5;
    const MUX_MASK: u8 = 0x0F;
    // ADCSRA
    const ADEN: u8 = 1 << 7;
    const ADSC: u8 = 1 << 6;
    const ADATE: u8 = 1 << 5;
    const ADIE: u8 = 1 << 3;
    const ADPS_MASK: u8 = 0x07;
    const ADTS_MASK: u8 = 0x07;

    /// Handle to the ADC register block. The sampler owns the converter for
    /// the lifetime of the firmware.
    pub struct Adc {
        _private: (),
    }

    impl Adc {
        /// Configure left-adjusted, AVcc-referenced, free-running conversion
        /// on `channel`. Does not start sampling.
        pub fn init(channel: u8, prescaler: AdcPrescaler) -> Self {
            unsafe {
                let p = ADC::ptr();
                (*p).admux.modify(|r, w| {
                    w.bits((r.bits() & !MUX_MASK) | ADLAR | REFS0 | (channel & MUX_MASK))
                });
                (*p).adcsra.modify(|r, w| {
                    w.bits((r.bits() & !ADPS_MASK) | ADEN | ADATE | prescaler.bits())
                });
                // Free running trigger source
                (*p).adcsrb.modify(|r, w| w.bits(r.bits() & !ADTS_MASK));
            }
            Self { _private: () }
        }

        /// Start converting and unmask the conversion-complete interrupt.
        pub fn enable(&mut self) {
            unsafe {
                let p = ADC::ptr();
                (*p).adcsra.modify(|r, w| w.bits(r.bits() | ADSC | ADIE));
            }
        }

        /// Mask the interrupt. Conversions keep running and are ignored.
        pub fn disable(&mut self) {
            unsafe {
                let p = ADC::ptr();
                (*p).adcsra.modify(|r, w| w.bits(r.bits() & !ADIE));
            }
        }

        /// High byte of the latest conversion.
        #[inline]
        pub fn read_sample() -> u8 {
            // The 16-bit access reads ADCL before ADCH
            unsafe { ((*ADC::ptr()).adc.read().bits() >> 8) as u8 }
        }
    }
}
