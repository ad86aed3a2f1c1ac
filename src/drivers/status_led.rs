use embedded_hal::digital::v2::OutputPin;

/// LED that lights up on a clap and goes dark again after a fixed time,
/// without blocking the main loop.
pub struct StatusLed<P> {
    pin: P,
    blink_ms: u32,
    lit_at: Option<u32>,
}

impl<P: OutputPin> StatusLed<P> {
    pub fn new(pin: P, blink_ms: u32) -> Self {
        Self {
            pin,
            blink_ms,
            lit_at: None,
        }
    }

    /// Switch on and restart the blink window.
    pub fn flash(&mut self, now_ms: u32) -> Result<(), P::Error> {
        self.pin.set_high()?;
        self.lit_at = Some(now_ms);
        Ok(())
    }

    /// Switch off once the blink window has passed. Call from the main loop.
    pub fn update(&mut self, now_ms: u32) -> Result<(), P::Error> {
        if let Some(lit_at) = self.lit_at {
            if now_ms.wrapping_sub(lit_at) > self.blink_ms {
                self.pin.set_low()?;
                self.lit_at = None;
            }
        }
        Ok(())
    }

    pub fn is_lit(&self) -> bool {
        self.lit_at.is_some()
    }

    pub fn release(self) -> P {
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::pin::{Mock, State, Transaction};

    #[test]
    fn stays_on_for_blink_window() {
        let pin = Mock::new(&[
            Transaction::set(State::High),
            Transaction::set(State::Low),
        ]);
        let mut led = StatusLed::new(pin, 100);

        led.flash(1000).unwrap();
        led.update(1050).unwrap();
        led.update(1100).unwrap();
        assert!(led.is_lit());

        led.update(1101).unwrap();
        assert!(!led.is_lit());
        // already off: no further pin traffic
        led.update(5000).unwrap();

        led.release().done();
    }

    #[test]
    fn reflash_extends_window() {
        let pin = Mock::new(&[
            Transaction::set(State::High),
            Transaction::set(State::High),
            Transaction::set(State::Low),
        ]);
        let mut led = StatusLed::new(pin, 100);

        led.flash(0).unwrap();
        led.flash(80).unwrap();
        led.update(150).unwrap();
        assert!(led.is_lit());
        led.update(181).unwrap();
        assert!(!led.is_lit());

        led.release().done();
    }
}
