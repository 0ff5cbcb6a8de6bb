//! Error kinds
//!
//! Configuration errors are recoverable and leave the bank untouched; the
//! caller decides whether to retry (for pin conflicts, usually with
//! `force`).

use core::fmt;

use crate::pins::RawPin;

/// Errors from pin set changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin is the current clock pin
    ClockInUse(RawPin),
    /// Pin is already a data pin
    AlreadyData(RawPin),
    /// Pin is a data pin and cannot become the clock without `force`
    DataPinInUse(RawPin),
    /// Pin is not a data pin
    NotFound(RawPin),
    /// No room for another data channel
    CapacityExceeded,
}

impl fmt::Display for PinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinError::ClockInUse(pin) => write!(f, "pin {pin} is the clock pin"),
            PinError::AlreadyData(pin) => write!(f, "pin {pin} is already a data pin"),
            PinError::DataPinInUse(pin) => write!(f, "pin {pin} is in use as a data pin"),
            PinError::NotFound(pin) => write!(f, "pin {pin} is not a data pin"),
            PinError::CapacityExceeded => f.write_str("too many data pins"),
        }
    }
}

/// Errors from gain selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GainError {
    /// Gain is not one of 128, 64 or 32
    InvalidGain(u16),
}

impl fmt::Display for GainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GainError::InvalidGain(gain) => {
                write!(f, "invalid gain {gain} (expected 128, 64 or 32)")
            }
        }
    }
}

/// Errors from a bounded acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcquisitionError {
    /// Not every data line went low within the allowed number of polls
    Timeout {
        /// Number of readiness polls performed
        polls: u32,
    },
}

impl fmt::Display for AcquisitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquisitionError::Timeout { polls } => {
                write!(f, "channels not ready after {polls} polls")
            }
        }
    }
}

/// Errors from building a bank out of a configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Pin layout is inconsistent
    Pin(PinError),
    /// Configuration text could not be parsed
    Parse,
}

impl From<PinError> for ConfigError {
    fn from(err: PinError) -> Self {
        ConfigError::Pin(err)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Pin(err) => write!(f, "invalid pin layout: {err}"),
            ConfigError::Parse => f.write_str("malformed configuration"),
        }
    }
}
