//! hxbank Hardware Abstraction Layer
//!
//! This crate defines the GPIO capability the HX711 bank driver consumes.
//! The driver never talks to a concrete GPIO library; the host program
//! supplies an implementation of [`GpioBackend`] (sysfs, a register-level
//! HAL, a userspace GPIO library, ...).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Host program (CLI, logger, ...)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  hxbank-drivers (Hx711Bank)             │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  hxbank-hal (this crate - capability)   │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  board GPIO   │       │   MockGpio    │
//! │  (external)   │       │ (tests only)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Features
//!
//! - `mock` - [`mock::MockGpio`] and [`mock::MockDelay`], a deterministic
//!   fake of the capability with simulated HX711 chips
//! - `defmt` - `defmt::Format` derives

#![no_std]
#![deny(unsafe_code)]

#[cfg(any(test, feature = "mock"))]
extern crate std;

pub mod gpio;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export key items at crate root for convenience
pub use gpio::{GpioBackend, Level, PinId, PinMode};
