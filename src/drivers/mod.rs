pub mod serial_console;
pub mod status_led;

pub use serial_console::SerialConsole;
pub use status_led::StatusLed;
