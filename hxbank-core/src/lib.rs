//! Board-agnostic core logic for synchronized HX711 banks
//!
//! This crate contains everything about an HX711 bank that does not touch
//! a pin:
//!
//! - Pin roles and the pin set (clock pin, ordered data pins, offsets)
//! - Gain modes and their pulse counts
//! - 24-bit two's-complement sample handling
//! - Zero-offset accumulation
//! - Configuration and error types
//! - The [`MultiChannelAdc`] trait implemented by drivers

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod calibration;
pub mod config;
pub mod error;
pub mod pins;
pub mod sample;
pub mod traits;

pub use calibration::{fit_offsets, ZeroAccumulator};
pub use config::{gain_pulses, BankConfig, GainMode, InputChannel};
pub use error::{AcquisitionError, ConfigError, GainError, PinError};
pub use pins::{ClockPin, DataPin, PinRole, PinSet, RawPin};
pub use sample::{sign_extend_24, Measurement, Offsets, DATA_BITS, MAX_CHANNELS};
pub use traits::MultiChannelAdc;
