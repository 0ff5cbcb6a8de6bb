//! HX711 bank driver
//!
//! Drives any number of HX711 chips whose PD_SCK inputs are tied to one
//! clock pin. Every clock pulse samples every chip, so a read cycle always
//! covers the whole bank and channels come back in data-pin order.
//!
//! # Usage
//!
//! ```ignore
//! let config = BankConfig::new(23, &[11, 26, 18])?.with_gain(64);
//! let mut bank = Hx711Bank::new(&config, gpio, delay)?;
//!
//! let measurement = bank.read();
//! bank.zero_calibrate(10);
//! ```
//!
//! # Timing
//!
//! A cycle must not be interrupted once clocking starts: a clock high
//! lasting 60 µs or more powers the chips down mid-read. Enable the
//! `critical-section` feature to run the clocked part of each cycle inside
//! `critical_section::with` on targets that provide an implementation.

mod acquire;
mod bank;
mod calibrate;

pub use bank::Hx711Bank;

/// Minimum clock high/low time (ns)
pub const PULSE_WIDTH_NS: u32 = 200;

/// Clock high time that powers the chips down (µs)
pub const RESET_HOLD_US: u32 = 60;
