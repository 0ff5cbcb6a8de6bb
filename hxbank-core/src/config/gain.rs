//! Gain modes
//!
//! The HX711 selects amplifier gain and input channel together, by the
//! total number of clock pulses in the cycle *before* the conversion:
//!
//! | Gain | Channel | Pulses |
//! |------|---------|--------|
//! | 128  | A       | 25     |
//! | 64   | A       | 27     |
//! | 32   | B       | 26     |

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::GainError;
use crate::sample::DATA_BITS;

/// Analog input channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InputChannel {
    A,
    B,
}

/// Gain mode (amplifier gain and input channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GainMode {
    /// Channel A, gain 128 (power-on default)
    #[default]
    A128,
    /// Channel A, gain 64
    A64,
    /// Channel B, gain 32
    B32,
}

impl GainMode {
    /// Look up a mode by its numeric gain
    pub const fn from_gain(gain: u16) -> Option<Self> {
        match gain {
            128 => Some(GainMode::A128),
            64 => Some(GainMode::A64),
            32 => Some(GainMode::B32),
            _ => None,
        }
    }

    /// Numeric gain
    pub const fn gain(self) -> u16 {
        match self {
            GainMode::A128 => 128,
            GainMode::A64 => 64,
            GainMode::B32 => 32,
        }
    }

    /// Input channel selected by this mode
    pub const fn channel(self) -> InputChannel {
        match self {
            GainMode::A128 | GainMode::A64 => InputChannel::A,
            GainMode::B32 => InputChannel::B,
        }
    }

    /// Total clock pulses per read cycle
    pub const fn pulses(self) -> u8 {
        match self {
            GainMode::A128 => 25,
            GainMode::A64 => 27,
            GainMode::B32 => 26,
        }
    }

    /// Pulses after the 24 data bits
    pub const fn extra_pulses(self) -> u8 {
        self.pulses() - DATA_BITS as u8
    }
}

impl TryFrom<u16> for GainMode {
    type Error = GainError;

    fn try_from(gain: u16) -> Result<Self, Self::Error> {
        GainMode::from_gain(gain).ok_or(GainError::InvalidGain(gain))
    }
}

impl From<GainMode> for u16 {
    fn from(mode: GainMode) -> Self {
        mode.gain()
    }
}

/// Total pulse count for a numeric gain, `None` if the gain is invalid
pub const fn gain_pulses(gain: u16) -> Option<u8> {
    match GainMode::from_gain(gain) {
        Some(mode) => Some(mode.pulses()),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_table() {
        assert_eq!(gain_pulses(128), Some(25));
        assert_eq!(gain_pulses(64), Some(27));
        assert_eq!(gain_pulses(32), Some(26));
        assert_eq!(gain_pulses(17), None);
        assert_eq!(gain_pulses(0), None);
    }

    #[test]
    fn test_extra_pulses() {
        assert_eq!(GainMode::A128.extra_pulses(), 1);
        assert_eq!(GainMode::B32.extra_pulses(), 2);
        assert_eq!(GainMode::A64.extra_pulses(), 3);
    }

    #[test]
    fn test_round_trip_and_channels() {
        for gain in [128u16, 64, 32] {
            let mode = GainMode::try_from(gain).unwrap();
            assert_eq!(u16::from(mode), gain);
        }
        assert_eq!(GainMode::A64.channel(), InputChannel::A);
        assert_eq!(GainMode::B32.channel(), InputChannel::B);
        assert_eq!(GainMode::try_from(17), Err(GainError::InvalidGain(17)));
        assert_eq!(GainMode::default(), GainMode::A128);
    }
}
