use crate::clap::ClapEvent;
use embedded_hal::serial;

/// Line-oriented text output over any blocking-capable serial transmitter.
pub struct SerialConsole<W> {
    serial: W,
}

impl<W: serial::Write<u8>> SerialConsole<W> {
    pub fn new(serial: W) -> Self {
        Self { serial }
    }

    pub fn write_byte(&mut self, byte: u8) -> Result<(), W::Error> {
        nb::block!(self.serial.write(byte))
    }

    pub fn write_line(&mut self, s: &str) -> Result<(), W::Error> {
        ufmt::uWrite::write_str(self, s)?;
        ufmt::uWrite::write_str(self, "\r\n")
    }

    // Print formatted debug info
    pub fn debug(&mut self, msg: &str, val: u32) -> Result<(), W::Error> {
        ufmt::uwrite!(self, "[DBG] {}: {}\r\n", msg, val)
    }

    /// One line per event; nothing for [`ClapEvent::None`].
    pub fn report(&mut self, event: ClapEvent) -> Result<(), W::Error> {
        match event {
            ClapEvent::None => Ok(()),
            ClapEvent::SeriesInProgress(n) => ufmt::uwrite!(self, "clap@{}\r\n", n),
            ClapEvent::SeriesFinished(n) => ufmt::uwrite!(self, "clap={}\r\n", n),
            ClapEvent::Overflow => self.write_line("clap overflow"),
        }
    }

    pub fn flush(&mut self) -> Result<(), W::Error> {
        nb::block!(self.serial.flush())
    }

    pub fn release(self) -> W {
        self.serial
    }
}

impl<W: serial::Write<u8>> ufmt::uWrite for SerialConsole<W> {
    type Error = W::Error;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for byte in s.bytes() {
            self.write_byte(byte)?;
        }
        Ok(())
    }
}
