pub mod adc;
pub mod timer;
pub mod uart;

#[cfg(target_arch = "avr")]
pub mod gpio;

#[cfg(all(target_arch = "avr", feature = "atmega328p"))]
pub use avr_device::atmega328p as pac;

// Re-export commonly used types
pub use adc::AdcPrescaler;
pub use timer::{MillisCounter, Prescaler};

#[cfg(target_arch = "avr")]
pub use adc::Adc;
#[cfg(target_arch = "avr")]
pub use timer::{millis, SystemClock, Timer0};
#[cfg(target_arch = "avr")]
pub use uart::Uart;
