//! Hand clap detector for AVR microcontrollers.
//!
//! The ADC free-runs at roughly 9.6kHz in 8-bit mode and every sample is fed
//! to a peak tracker from the conversion-complete interrupt. The main loop
//! polls for claps and gets told whether a series is still running or has
//! finished.
#![cfg_attr(not(test), no_std)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

#[cfg(all(target_arch = "avr", not(feature = "atmega328p")))]
compile_error!("the atmega328p feature is required for AVR builds");

pub mod clap;
pub mod config;
pub mod drivers;
pub mod hal;

pub use clap::{ClapConfig, ClapEvent};
