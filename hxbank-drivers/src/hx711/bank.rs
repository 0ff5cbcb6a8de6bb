//! Bank state and pin management

use embedded_hal::delay::DelayNs;
use hxbank_core::{
    BankConfig, ClockPin, ConfigError, DataPin, GainError, GainMode, PinError, PinRole, PinSet,
};
use hxbank_hal::{GpioBackend, PinId, PinMode};

/// Bank of HX711 chips on a shared clock
///
/// Owns the GPIO backend and delay provider for its whole lifetime; use
/// [`release`](Hx711Bank::release) to get them back.
pub struct Hx711Bank<B, D> {
    pub(super) gpio: B,
    pub(super) delay: D,
    pub(super) pins: PinSet,
    pub(super) gain: GainMode,
    pub(super) poll_interval_ns: u32,
}

impl<B: GpioBackend, D: DelayNs> Hx711Bank<B, D> {
    /// Bring up a bank
    ///
    /// Configures the clock pin as output and the data pins as input, then
    /// optionally resets the chips (followed by one discarded read that
    /// latches the gain) and computes a zero offset. Configured offsets,
    /// if any, are applied last.
    ///
    /// An invalid gain falls back to 128. Repeated data pins are dropped.
    ///
    /// The reset read and zero calibration block until every chip is
    /// ready, so this does not return if a chip is missing.
    pub fn new(config: &BankConfig, gpio: B, delay: D) -> Result<Self, ConfigError> {
        let pins = PinSet::new(config.clock_pin, &config.data_pins)?;

        if !config.has_valid_gain() {
            #[cfg(feature = "defmt")]
            defmt::warn!("invalid gain {}, using 128", config.gain);
        }

        let mut bank = Self {
            gpio,
            delay,
            pins,
            gain: config.gain_mode(),
            poll_interval_ns: config.poll_interval_ns,
        };

        bank.configure_pins();

        if config.reset_on_init {
            bank.reset();
            // Latches the configured gain
            let _ = bank.read();
        }

        bank.zero_calibrate(config.zero_samples);

        if let Some(offsets) = &config.offsets {
            bank.set_offsets(offsets);
        }

        Ok(bank)
    }

    fn configure_pins(&mut self) {
        self.gpio.set_mode(self.pins.clock().id(), PinMode::Output);
        for pin in self.pins.data() {
            self.gpio.set_mode(pin.id(), PinMode::Input);
        }
    }

    /// Hand back the backend and delay provider
    pub fn release(self) -> (B, D) {
        (self.gpio, self.delay)
    }

    /// Append a data pin as the last channel
    ///
    /// Rejects the clock pin and pins already in use unless `force` is set.
    /// On success the pin is configured as input and gets a zero offset.
    pub fn add_data_pin(&mut self, pin: PinId, force: bool) -> Result<DataPin, PinError> {
        let data_pin = self.pins.add_data(pin, force).inspect_err(|_err| {
            #[cfg(feature = "defmt")]
            defmt::debug!("add data pin {} rejected: {}", pin, _err);
        })?;

        if force && self.pins.role_of(pin) != PinRole::Data(self.pins.len() - 1) {
            #[cfg(feature = "defmt")]
            defmt::warn!("pin {} force-added while already in use", pin);
        }

        self.gpio.set_mode(pin, PinMode::Input);
        Ok(data_pin)
    }

    /// Remove a data pin and its offset
    ///
    /// Returns the channel index the pin occupied. The pin's mode is left
    /// untouched.
    pub fn remove_data_pin(&mut self, pin: PinId) -> Result<usize, PinError> {
        self.pins.remove_data(pin)
    }

    /// Move the clock to another pin
    ///
    /// A data pin is only accepted with `force`, which removes it from the
    /// data channels first. The new pin is configured as output and used
    /// for every following cycle; the old clock pin is left as it was.
    pub fn set_clock_pin(&mut self, pin: PinId, force: bool) -> Result<ClockPin, PinError> {
        let displaced = self.pins.set_clock(pin, force).inspect_err(|_err| {
            #[cfg(feature = "defmt")]
            defmt::debug!("clock pin {} rejected: {}", pin, _err);
        })?;

        if let Some(_channel) = displaced {
            #[cfg(feature = "defmt")]
            defmt::warn!("pin {} taken from data channel {} for the clock", pin, _channel);
        }

        self.gpio.set_mode(pin, PinMode::Output);
        Ok(self.pins.clock())
    }

    /// Select a gain by its numeric value (128, 64 or 32)
    ///
    /// The chips switch at the end of the next read cycle, so the reading
    /// after that is the first one at the new gain.
    pub fn set_gain_mode(&mut self, gain: u16) -> Result<GainMode, GainError> {
        let mode = GainMode::try_from(gain)?;
        self.gain = mode;
        Ok(mode)
    }

    /// Select a gain mode
    pub fn set_gain(&mut self, mode: GainMode) {
        self.gain = mode;
    }

    /// Data pins in channel order
    pub fn data_pins(&self) -> &[DataPin] {
        self.pins.data()
    }

    /// Current clock pin
    pub fn clock_pin(&self) -> ClockPin {
        self.pins.clock()
    }

    /// Offsets in channel order
    pub fn offsets(&self) -> &[i32] {
        self.pins.offsets()
    }

    /// Current gain mode
    pub fn gain_mode(&self) -> GainMode {
        self.gain
    }

    /// Number of data channels
    pub fn channel_count(&self) -> usize {
        self.pins.len()
    }

    /// Full pin set (clock, data pins, offsets)
    pub fn pin_set(&self) -> &PinSet {
        &self.pins
    }

    /// Role of a raw pin in this bank
    pub fn role_of(&self, pin: PinId) -> PinRole {
        self.pins.role_of(pin)
    }

    /// The GPIO backend
    pub fn gpio(&self) -> &B {
        &self.gpio
    }

    /// The GPIO backend, mutably
    ///
    /// Changing the mode or level of the bank's pins behind its back
    /// corrupts the following cycles.
    pub fn gpio_mut(&mut self) -> &mut B {
        &mut self.gpio
    }
}
