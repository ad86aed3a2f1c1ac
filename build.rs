use std::env;

const DEFAULT_CPU_FREQ_HZ: u32 = 16_000_000;

fn main() {
    println!("cargo:rerun-if-env-changed=AVR_CPU_FREQUENCY_HZ");
    println!("cargo:rerun-if-changed=build.rs");

    let freq = match env::var("AVR_CPU_FREQUENCY_HZ") {
        Ok(value) => match value.trim().parse::<u32>() {
            Ok(freq) => freq,
            Err(_) => panic!("AVR_CPU_FREQUENCY_HZ must be an integer, got {value:?}"),
        },
        Err(_) => DEFAULT_CPU_FREQ_HZ,
    };

    // Pass CPU frequency for timing calculations
    println!("cargo:rustc-env=MCU_FREQ_HZ={freq}");

    let target = env::var("TARGET").unwrap_or_default();
    if target.contains("avr") {
        let mcu = "atmega328p";
        println!("cargo:rustc-link-arg=-mmcu={mcu}");
        println!("cargo:warning=Building for {mcu} at {freq}Hz");
    }
}
