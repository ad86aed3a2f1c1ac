#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]

#[cfg(target_arch = "avr")]
use panic_halt as _;

#[cfg(target_arch = "avr")]
#[avr_device::entry]
fn main() -> ! {
    use clap_firmware::clap::{self, ClapEvent};
    use clap_firmware::config::{CLAP_PARAMS, LED_BLINK_MS};
    use clap_firmware::drivers::{SerialConsole, StatusLed};
    use clap_firmware::hal::gpio::board::Led;
    use clap_firmware::hal::{millis, Timer0, Uart};

    // Initialize usart, timer and adc before enabling interrupts globally
    let mut console = SerialConsole::new(Uart::new());
    let _timer = Timer0::init();
    let mut claps = clap::init();
    let mut led = StatusLed::new(Led::new(), LED_BLINK_MS);

    unsafe { avr_device::interrupt::enable() };
    claps.enable();

    // Print startup message
    console.write_line("clap detector start").ok();
    console.debug("sample period us", CLAP_PARAMS.sample_period_us).ok();
    console.debug("debounce samples", CLAP_PARAMS.debounce_samples.into()).ok();

    loop {
        led.update(millis()).ok();

        let event = claps.poll();
        if let ClapEvent::SeriesInProgress(_) = event {
            led.flash(millis()).ok();
        }
        console.report(event).ok();
    }
}

#[cfg(not(target_arch = "avr"))]
fn main() {
    eprintln!("clap_firmware only runs on AVR targets; build with --target avr-unknown-gnu-atmega328");
}
