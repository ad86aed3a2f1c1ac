//! USART0 transmitter used for reporting.

/// UBRR value for double-speed (U2X) mode, rounded to nearest.
pub const fn baud_divisor(cpu_hz: u32, baud: u32) -> u16 {
    ((cpu_hz / 4 / baud - 1) / 2) as u16
}

#[cfg(target_arch = "avr")]
pub use self::avr::Uart;

#[cfg(target_arch = "avr")]
mod avr {
    use super::baud_divisor;
    use crate::config::{CPU_FREQ_HZ, UART_BAUD};
    use crate::hal::pac::USART0;
    use core::convert::Infallible;

    const UBRR: u16 = baud_divisor(CPU_FREQ_HZ, UART_BAUD);

    // UCSR0A
    const U2X: u8 = 1 << 1;
    const UDRE: u8 = 1 << 5;
    // UCSR0B
    const TXEN: u8 = 1 << 3;
    // UCSR0C: 8 data bits, no parity, 1 stop bit
    const FRAME_8N1: u8 = 0x06;

    pub struct Uart {
        _private: (),
    }

    impl Uart {
        pub fn new() -> Self {
            unsafe {
                let p = USART0::ptr();

                // Set baud rate
                (*p).ubrr0.write(|w| w.bits(UBRR));

                (*p).ucsr0a.write(|w| w.bits(U2X));
                (*p).ucsr0c.write(|w| w.bits(FRAME_8N1));
                (*p).ucsr0b.write(|w| w.bits(TXEN));
            }

            Self { _private: () }
        }

        #[inline]
        fn data_register_empty() -> bool {
            unsafe { (*USART0::ptr()).ucsr0a.read().bits() & UDRE != 0 }
        }
    }

    impl Default for Uart {
        fn default() -> Self {
            Self::new()
        }
    }

    impl embedded_hal::serial::Write<u8> for Uart {
        type Error = Infallible;

        fn write(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
            if !Self::data_register_empty() {
                return Err(nb::Error::WouldBlock);
            }
            unsafe {
                (*USART0::ptr()).udr0.write(|w| w.bits(byte));
            }
            Ok(())
        }

        fn flush(&mut self) -> nb::Result<(), Self::Error> {
            if Self::data_register_empty() {
                Ok(())
            } else {
                Err(nb::Error::WouldBlock)
            }
        }
    }
}
