//! Timer0 millisecond clock.
//!
//! Timer0 runs from the CPU clock divided by 64 and overflows every 256
//! ticks (1.024ms at 16MHz, 0.8192ms at 20MHz). Whole milliseconds are added
//! per overflow and the remainder is carried in nanoseconds, which is exact
//! for every supported clock.

use crate::config::CPU_FREQ_HZ;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prescaler {
    Stop,
    Direct,
    Div8,
    Div64,
    Div256,
    Div1024,
}

impl Prescaler {
    pub const fn division(self) -> u32 {
        match self {
            Prescaler::Stop => 0,
            Prescaler::Direct => 1,
            Prescaler::Div8 => 8,
            Prescaler::Div64 => 64,
            Prescaler::Div256 => 256,
            Prescaler::Div1024 => 1024,
        }
    }

    /// CS02..0 field of TCCR0B
    pub const fn bits(self) -> u8 {
        match self {
            Prescaler::Stop => 0,
            Prescaler::Direct => 1,
            Prescaler::Div8 => 2,
            Prescaler::Div64 => 3,
            Prescaler::Div256 => 4,
            Prescaler::Div1024 => 5,
        }
    }
}

pub const MILLIS_PRESCALER: Prescaler = Prescaler::Div64;

/// Timer0 counts 256 ticks per overflow
const TICKS_PER_OVERFLOW: u64 = 256;

pub const FRACT_MAX: u32 = 1_000_000;

/// Increments applied by one overflow at a given CPU clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverflowStep {
    pub millis: u32,
    /// Nanoseconds beyond `millis`
    pub fract: u32,
}

impl OverflowStep {
    const fn overflow_ns(cpu_hz: u32) -> u64 {
        MILLIS_PRESCALER.division() as u64 * TICKS_PER_OVERFLOW * 1_000_000_000 / cpu_hz as u64
    }

    pub const fn for_cpu_freq(cpu_hz: u32) -> Self {
        let nanos = Self::overflow_ns(cpu_hz);
        Self {
            millis: (nanos / FRACT_MAX as u64) as u32,
            fract: (nanos % FRACT_MAX as u64) as u32,
        }
    }

    /// Whether the overflow period is a whole number of nanoseconds.
    pub const fn is_exact(cpu_hz: u32) -> bool {
        (MILLIS_PRESCALER.division() as u64 * TICKS_PER_OVERFLOW * 1_000_000_000) % cpu_hz as u64
            == 0
    }
}

pub const STEP: OverflowStep = OverflowStep::for_cpu_freq(CPU_FREQ_HZ);

const _: () = assert!(
    STEP.millis > 0 || STEP.fract > 0,
    "CPU clock too fast for the Timer0 millisecond clock"
);
const _: () = assert!(
    OverflowStep::is_exact(CPU_FREQ_HZ),
    "CPU clock does not give a whole-nanosecond Timer0 overflow"
);

/// Millisecond count advanced from the overflow interrupt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MillisCounter {
    millis: u32,
    fract: u32,
}

impl MillisCounter {
    pub const fn new() -> Self {
        Self { millis: 0, fract: 0 }
    }

    #[inline]
    pub fn on_overflow(&mut self, step: OverflowStep) {
        let mut millis = self.millis.wrapping_add(step.millis);
        let mut fract = self.fract + step.fract;
        if fract >= FRACT_MAX {
            fract -= FRACT_MAX;
            millis = millis.wrapping_add(1);
        }
        self.millis = millis;
        self.fract = fract;
    }

    #[inline]
    pub fn millis(&self) -> u32 {
        self.millis
    }
}

#[cfg(target_arch = "avr")]
pub use self::avr::{millis, Timer0, SystemClock};

#[cfg(target_arch = "avr")]
mod avr {
    use super::{MillisCounter, MILLIS_PRESCALER, STEP};
    use crate::clap::Monotonic;
    use crate::hal::pac::TC0;
    use core::cell::Cell;
    use critical_section::Mutex;

    static MILLIS: Mutex<Cell<MillisCounter>> = Mutex::new(Cell::new(MillisCounter::new()));

    pub struct Timer0 {
        _private: (),
    }

    impl Timer0 {
        /// Fast PWM, clk/64, overflow interrupt enabled.
        pub fn init() -> Self {
            unsafe {
                let p = TC0::ptr();
                // WGM01 | WGM00
                (*p).tccr0a.write(|w| w.bits(0x03));
                (*p).tccr0b.write(|w| w.bits(MILLIS_PRESCALER.bits()));
                // TOIE0
                (*p).timsk0.modify(|r, w| w.bits(r.bits() | 0x01));
            }
            Self { _private: () }
        }
    }

    /// Milliseconds since [`Timer0::init`], wrapping after ~49 days.
    #[inline]
    pub fn millis() -> u32 {
        critical_section::with(|cs| MILLIS.borrow(cs).get().millis())
    }

    /// [`Monotonic`] view of the Timer0 clock.
    #[derive(Clone, Copy, Default)]
    pub struct SystemClock;

    impl Monotonic for SystemClock {
        fn now_ms(&self) -> u32 {
            millis()
        }
    }

    #[avr_device::interrupt(atmega328p)]
    fn TIMER0_OVF() {
        critical_section::with(|cs| {
            let cell = MILLIS.borrow(cs);
            let mut counter = cell.get();
            counter.on_overflow(STEP);
            cell.set(counter);
        });
    }
}
