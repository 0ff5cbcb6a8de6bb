//! Pin roles and the bank's pin set
//!
//! A bank has exactly one clock pin and an ordered list of data pins. The
//! order of the data pins is the channel order of every measurement, and
//! each data pin owns one offset at the same index.
//!
//! [`PinSet`] enforces those rules without touching hardware; the driver
//! applies the matching GPIO mode changes after a change succeeds.

use heapless::Vec;

use crate::calibration::fit_offsets;
use crate::error::PinError;
use crate::sample::{Offsets, MAX_CHANNELS};

/// Raw pin identifier, in the numbering used by the GPIO backend
pub type RawPin = u8;

/// Pin driving the shared PD_SCK line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockPin(RawPin);

impl ClockPin {
    /// Wrap a raw pin as the clock pin
    pub const fn new(pin: RawPin) -> Self {
        Self(pin)
    }

    /// Raw identifier for the backend
    pub const fn id(self) -> RawPin {
        self.0
    }
}

/// Pin connected to one chip's DOUT line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataPin(RawPin);

impl DataPin {
    /// Wrap a raw pin as a data pin
    pub const fn new(pin: RawPin) -> Self {
        Self(pin)
    }

    /// Raw identifier for the backend
    pub const fn id(self) -> RawPin {
        self.0
    }
}

/// Current role of a raw pin within a bank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinRole {
    /// The shared clock
    Clock,
    /// A data channel, with its channel index
    Data(usize),
    /// Not used by the bank
    Unused,
}

/// Clock pin, data pins and per-channel offsets
///
/// Invariant: `offsets().len() == data().len()` after every operation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinSet {
    clock: ClockPin,
    data: Vec<DataPin, MAX_CHANNELS>,
    offsets: Offsets,
}

impl PinSet {
    /// Create a pin set with zero offsets
    ///
    /// Repeated data pins are dropped (first occurrence wins). Fails if a
    /// data pin equals the clock pin or there are more than
    /// [`MAX_CHANNELS`] distinct data pins.
    pub fn new(clock: RawPin, data_pins: &[RawPin]) -> Result<Self, PinError> {
        let mut set = Self {
            clock: ClockPin::new(clock),
            data: Vec::new(),
            offsets: Vec::new(),
        };

        for &pin in data_pins {
            match set.add_data(pin, false) {
                Ok(_) | Err(PinError::AlreadyData(_)) => {}
                Err(err) => return Err(err),
            }
        }

        Ok(set)
    }

    /// Current clock pin
    pub fn clock(&self) -> ClockPin {
        self.clock
    }

    /// Data pins in channel order
    pub fn data(&self) -> &[DataPin] {
        &self.data
    }

    /// Offsets in channel order
    pub fn offsets(&self) -> &[i32] {
        &self.offsets
    }

    /// Number of data channels
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the bank has no data channels
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Channel index of a data pin
    pub fn position(&self, pin: RawPin) -> Option<usize> {
        self.data.iter().position(|d| d.id() == pin)
    }

    /// Role of a raw pin
    ///
    /// A force-added pin that duplicates another role reports its first role.
    pub fn role_of(&self, pin: RawPin) -> PinRole {
        if pin == self.clock.id() {
            PinRole::Clock
        } else if let Some(index) = self.position(pin) {
            PinRole::Data(index)
        } else {
            PinRole::Unused
        }
    }

    /// Append a data pin with a zero offset
    ///
    /// Without `force`, the clock pin and pins already in the list are
    /// rejected. With `force` the pin is appended regardless; only the
    /// channel capacity still applies.
    pub fn add_data(&mut self, pin: RawPin, force: bool) -> Result<DataPin, PinError> {
        if !force {
            if pin == self.clock.id() {
                return Err(PinError::ClockInUse(pin));
            }
            if self.position(pin).is_some() {
                return Err(PinError::AlreadyData(pin));
            }
        }

        let data_pin = DataPin::new(pin);
        if self.data.is_full() {
            return Err(PinError::CapacityExceeded);
        }
        // Both have the same capacity and length, so neither push can fail
        let _ = self.data.push(data_pin);
        let _ = self.offsets.push(0);
        Ok(data_pin)
    }

    /// Remove a data pin and its offset
    ///
    /// Returns the channel index the pin occupied.
    pub fn remove_data(&mut self, pin: RawPin) -> Result<usize, PinError> {
        let index = self.position(pin).ok_or(PinError::NotFound(pin))?;
        self.data.remove(index);
        self.offsets.remove(index);
        Ok(index)
    }

    /// Make `pin` the clock pin
    ///
    /// A pin that is not a data pin is always accepted. A data pin is
    /// rejected unless `force` is set, in which case it is removed from
    /// the data list (with its offset) first. Returns the channel index
    /// that was given up, if any.
    pub fn set_clock(&mut self, pin: RawPin, force: bool) -> Result<Option<usize>, PinError> {
        let displaced = match self.position(pin) {
            None => None,
            Some(_) if !force => return Err(PinError::DataPinInUse(pin)),
            Some(_) => Some(self.remove_data(pin)?),
        };

        self.clock = ClockPin::new(pin);
        Ok(displaced)
    }

    /// Overwrite offsets, padding with zero or truncating to the channel count
    pub fn set_offsets(&mut self, values: &[i32]) {
        self.offsets = fit_offsets(values, self.data.len());
    }

    /// Reset every offset to zero
    pub fn zero_offsets(&mut self) {
        self.offsets.iter_mut().for_each(|o| *o = 0);
    }
}
