//! Hardware driver implementations
//!
//! This crate provides the concrete driver for banks of HX711 load-cell
//! ADCs that share one clock line, implementing the traits defined in
//! hxbank-core on top of the GPIO capability from hxbank-hal:
//!
//! - [`hx711::Hx711Bank`] - pin management, synchronized acquisition and
//!   zero calibration
//! - [`record`] - CSV rows and file naming for measurement logs

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod hx711;
pub mod record;

pub use hx711::Hx711Bank;
