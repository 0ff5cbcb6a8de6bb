//! GPIO capability
//!
//! Pins are addressed by plain numeric identifiers so that one backend can
//! serve a pin in either direction; role tracking (clock vs. data) happens
//! in the driver, not here.

/// Raw pin identifier as understood by the backend
///
/// The numbering scheme (physical header position, BCM number, chip line
/// offset) is whatever the backend uses.
pub type PinId = u8;

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Digital input (HX711 DOUT)
    Input,
    /// Digital output (HX711 PD_SCK)
    Output,
}

/// Logic level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logic 0
    Low,
    /// Logic 1
    High,
}

impl Level {
    /// Check if this is the high level
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Digital GPIO access
///
/// Implementations should handle the actual register or kernel interface
/// for the target board. Operations are infallible, matching the
/// fire-and-forget nature of digital pin access; a backend that can fail
/// should surface that at setup time, before handing itself to the driver.
pub trait GpioBackend {
    /// Configure the direction of a pin
    fn set_mode(&mut self, pin: PinId, mode: PinMode);

    /// Read the current logic level of a pin (true = high)
    ///
    /// Takes `&mut self` because some backends (and the test fake) advance
    /// internal state on every read.
    fn read_digital(&mut self, pin: PinId) -> bool;

    /// Drive an output pin to a level
    fn write_digital(&mut self, pin: PinId, level: Level);

    /// Drive an output pin high
    fn set_high(&mut self, pin: PinId) {
        self.write_digital(pin, Level::High);
    }

    /// Drive an output pin low
    fn set_low(&mut self, pin: PinId) {
        self.write_digital(pin, Level::Low);
    }

    /// Check if a pin reads low (logic 0)
    fn is_low(&mut self, pin: PinId) -> bool {
        !self.read_digital(pin)
    }
}

impl<T: GpioBackend + ?Sized> GpioBackend for &mut T {
    fn set_mode(&mut self, pin: PinId, mode: PinMode) {
        (**self).set_mode(pin, mode);
    }

    fn read_digital(&mut self, pin: PinId) -> bool {
        (**self).read_digital(pin)
    }

    fn write_digital(&mut self, pin: PinId, level: Level) {
        (**self).write_digital(pin, level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the last write and echoes it back on read
    struct LoopbackPin {
        level: Level,
        mode: Option<PinMode>,
    }

    impl GpioBackend for LoopbackPin {
        fn set_mode(&mut self, _pin: PinId, mode: PinMode) {
            self.mode = Some(mode);
        }

        fn read_digital(&mut self, _pin: PinId) -> bool {
            self.level.is_high()
        }

        fn write_digital(&mut self, _pin: PinId, level: Level) {
            self.level = level;
        }
    }

    #[test]
    fn test_default_helpers() {
        let mut pin = LoopbackPin {
            level: Level::Low,
            mode: None,
        };

        pin.set_mode(3, PinMode::Output);
        assert_eq!(pin.mode, Some(PinMode::Output));

        pin.set_high(3);
        assert!(pin.read_digital(3));
        assert!(!pin.is_low(3));

        pin.set_low(3);
        assert!(pin.is_low(3));
    }

    #[test]
    fn test_backend_through_mutable_reference() {
        fn pulse<B: GpioBackend>(mut backend: B) {
            backend.set_high(1);
        }

        let mut pin = LoopbackPin {
            level: Level::Low,
            mode: None,
        };
        pulse(&mut pin);
        assert_eq!(pin.level, Level::High);
    }

    #[test]
    fn test_level_from_bool() {
        assert_eq!(Level::from(true), Level::High);
        assert_eq!(Level::from(false), Level::Low);
        assert!(Level::High.is_high());
        assert!(!Level::Low.is_high());
    }
}
