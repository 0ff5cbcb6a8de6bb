//! Bank configuration
//!
//! Describes how a bank is wired and what the driver does when it is
//! brought up. Loaded from TOML with the `toml` feature:
//!
//! ```toml
//! clock_pin = 23
//! data_pins = [11, 26, 18, 22, 29, 32]
//! gain = 128
//! reset_on_init = true
//! zero_samples = 10
//! ```

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::gain::GainMode;
use crate::error::PinError;
use crate::pins::RawPin;
use crate::sample::{Offsets, MAX_CHANNELS};

/// Default number of zero-calibration readings at bring-up
pub const DEFAULT_ZERO_SAMPLES: u32 = 10;

/// Default delay between data-ready polls (ns)
pub const DEFAULT_POLL_INTERVAL_NS: u32 = 100;

/// Bank wiring and bring-up options
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BankConfig {
    /// Pin driving the shared PD_SCK line
    pub clock_pin: RawPin,
    /// DOUT pins, in channel order
    pub data_pins: Vec<RawPin, MAX_CHANNELS>,
    /// Numeric gain (128, 64 or 32); anything else falls back to 128
    #[cfg_attr(feature = "serde", serde(default = "default_gain"))]
    pub gain: u16,
    /// Reset the chips and latch the gain before first use
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub reset_on_init: bool,
    /// Readings to average for the initial zero offset (0 = skip)
    #[cfg_attr(feature = "serde", serde(default = "default_zero_samples"))]
    pub zero_samples: u32,
    /// Delay between data-ready polls (ns)
    #[cfg_attr(feature = "serde", serde(default = "default_poll_interval_ns"))]
    pub poll_interval_ns: u32,
    /// Offsets applied after bring-up, replacing any computed zero
    #[cfg_attr(feature = "serde", serde(default))]
    pub offsets: Option<Offsets>,
}

#[cfg(feature = "serde")]
fn default_gain() -> u16 {
    GainMode::default().gain()
}

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}

#[cfg(feature = "serde")]
fn default_zero_samples() -> u32 {
    DEFAULT_ZERO_SAMPLES
}

#[cfg(feature = "serde")]
fn default_poll_interval_ns() -> u32 {
    DEFAULT_POLL_INTERVAL_NS
}

impl BankConfig {
    /// Create a config with default bring-up options
    ///
    /// Fails only if more than [`MAX_CHANNELS`] data pins are given; pin
    /// conflicts are checked when the bank is built.
    pub fn new(clock_pin: RawPin, data_pins: &[RawPin]) -> Result<Self, PinError> {
        let data_pins = Vec::from_slice(data_pins).map_err(|_| PinError::CapacityExceeded)?;
        Ok(Self {
            clock_pin,
            data_pins,
            gain: GainMode::default().gain(),
            reset_on_init: true,
            zero_samples: DEFAULT_ZERO_SAMPLES,
            poll_interval_ns: DEFAULT_POLL_INTERVAL_NS,
            offsets: None,
        })
    }

    /// Set the numeric gain
    pub fn with_gain(mut self, gain: u16) -> Self {
        self.gain = gain;
        self
    }

    /// Enable or disable the reset pulse at bring-up
    pub fn with_reset(mut self, reset_on_init: bool) -> Self {
        self.reset_on_init = reset_on_init;
        self
    }

    /// Set the number of zero-calibration readings at bring-up
    pub fn with_zero_samples(mut self, zero_samples: u32) -> Self {
        self.zero_samples = zero_samples;
        self
    }

    /// Set the delay between data-ready polls
    pub fn with_poll_interval_ns(mut self, poll_interval_ns: u32) -> Self {
        self.poll_interval_ns = poll_interval_ns;
        self
    }

    /// Set explicit offsets
    pub fn with_offsets(mut self, offsets: &[i32]) -> Self {
        self.offsets = Some(offsets.iter().copied().take(MAX_CHANNELS).collect());
        self
    }

    /// Gain mode to use, with the power-on default for invalid values
    pub fn gain_mode(&self) -> GainMode {
        GainMode::from_gain(self.gain).unwrap_or_default()
    }

    /// Check if the configured gain is one of the supported modes
    pub fn has_valid_gain(&self) -> bool {
        GainMode::from_gain(self.gain).is_some()
    }
}

#[cfg(feature = "toml")]
impl BankConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml(input: &str) -> Result<Self, crate::error::ConfigError> {
        toml::from_str(input).map_err(|_| crate::error::ConfigError::Parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BankConfig::new(23, &[11, 26, 18]).unwrap();
        assert_eq!(config.clock_pin, 23);
        assert_eq!(config.data_pins.as_slice(), &[11, 26, 18]);
        assert_eq!(config.gain, 128);
        assert!(config.reset_on_init);
        assert_eq!(config.zero_samples, DEFAULT_ZERO_SAMPLES);
        assert_eq!(config.offsets, None);
    }

    #[test]
    fn test_invalid_gain_falls_back() {
        let config = BankConfig::new(4, &[1]).unwrap().with_gain(17);
        assert!(!config.has_valid_gain());
        assert_eq!(config.gain_mode(), GainMode::A128);

        let config = config.with_gain(32);
        assert_eq!(config.gain_mode(), GainMode::B32);
    }

    #[test]
    fn test_builder() {
        let config = BankConfig::new(4, &[1, 2])
            .unwrap()
            .with_reset(false)
            .with_zero_samples(0)
            .with_poll_interval_ns(500)
            .with_offsets(&[-3, 4]);

        assert!(!config.reset_on_init);
        assert_eq!(config.zero_samples, 0);
        assert_eq!(config.poll_interval_ns, 500);
        assert_eq!(config.offsets.as_deref(), Some(&[-3, 4][..]));
    }

    #[test]
    fn test_too_many_pins() {
        let pins = [0u8; MAX_CHANNELS + 1];
        assert_eq!(BankConfig::new(99, &pins), Err(PinError::CapacityExceeded));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_from_toml() {
        let config = BankConfig::from_toml(
            r#"
            clock_pin = 23
            data_pins = [11, 26, 18]
            gain = 64
            zero_samples = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.clock_pin, 23);
        assert_eq!(config.data_pins.as_slice(), &[11, 26, 18]);
        assert_eq!(config.gain_mode(), GainMode::A64);
        assert!(config.reset_on_init);
        assert_eq!(config.zero_samples, 0);
        assert_eq!(config.poll_interval_ns, DEFAULT_POLL_INTERVAL_NS);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_from_toml_rejects_garbage() {
        assert_eq!(
            BankConfig::from_toml("clock_pin = \"north\""),
            Err(crate::error::ConfigError::Parse)
        );
    }
}
