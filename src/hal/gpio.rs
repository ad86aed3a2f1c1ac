use crate::hal::pac::PORTB;
use core::convert::Infallible;

/// PORTB pin `P` driven as an output.
#[derive(Debug)]
pub struct PortBOutput<const P: u8> {
    _private: (),
}

impl<const P: u8> PortBOutput<P> {
    pub fn new() -> Self {
        // Set DDRx bit
        unsafe {
            (*PORTB::ptr()).ddrb.modify(|r, w| w.bits(r.bits() | (1 << P)));
        }
        Self { _private: () }
    }
}

impl<const P: u8> Default for PortBOutput<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const P: u8> embedded_hal::digital::v2::OutputPin for PortBOutput<P> {
    type Error = Infallible;

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        unsafe {
            (*PORTB::ptr()).portb.modify(|r, w| w.bits(r.bits() | (1 << P)));
        }
        Ok(())
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        unsafe {
            (*PORTB::ptr()).portb.modify(|r, w| w.bits(r.bits() & !(1 << P)));
        }
        Ok(())
    }
}

/// Board-specific pin definitions
pub mod board {
    use super::PortBOutput;

    /// On-board LED (Arduino Uno/Nano D13)
    pub type Led = PortBOutput<5>;
}
