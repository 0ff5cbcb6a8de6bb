//! Synchronized acquisition
//!
//! One read cycle:
//!
//! 1. Wait until every DOUT line is low
//! 2. Clock 24 data bits; on each pulse every channel shifts in one bit,
//!    sampled in data-pin order after the clock falls
//! 3. Clock 1-3 extra pulses that select the gain of the next conversion
//! 4. Sign-extend each 24-bit value and add the channel offset

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use hxbank_core::sample::finalize;
use hxbank_core::{AcquisitionError, Measurement, MultiChannelAdc, DATA_BITS, MAX_CHANNELS};
use hxbank_hal::GpioBackend;

use super::{Hx711Bank, PULSE_WIDTH_NS, RESET_HOLD_US};

impl<B: GpioBackend, D: DelayNs> Hx711Bank<B, D> {
    /// Check if every chip has a conversion ready (all DOUT lines low)
    ///
    /// A bank without data pins is always ready.
    pub fn data_ready(&mut self) -> bool {
        let Self { gpio, pins, .. } = self;
        pins.data().iter().all(|pin| gpio.is_low(pin.id()))
    }

    /// Read every channel
    ///
    /// Blocks until all chips are ready, polling at the configured
    /// interval. There is no timeout: a missing or stuck chip blocks
    /// forever. Use [`try_read`](Self::try_read) for a bounded wait.
    pub fn read(&mut self) -> Measurement {
        while !self.data_ready() {
            self.delay.delay_ns(self.poll_interval_ns);
        }
        self.clock_out()
    }

    /// Read every channel, giving up after `max_polls` readiness polls
    ///
    /// At least one poll is always made. On timeout no clock pulse has
    /// been sent and the bank is unchanged.
    pub fn try_read(&mut self, max_polls: u32) -> Result<Measurement, AcquisitionError> {
        let mut polls = 0u32;
        loop {
            polls += 1;
            if self.data_ready() {
                break;
            }
            if polls >= max_polls {
                #[cfg(feature = "defmt")]
                defmt::warn!("hx711 bank not ready after {} polls", polls);
                return Err(AcquisitionError::Timeout { polls });
            }
            self.delay.delay_ns(self.poll_interval_ns);
        }
        Ok(self.clock_out())
    }

    /// Pulse the clock high for at least 60 µs, then low
    ///
    /// The chips power down and come back up with the default gain (128).
    /// The first read afterwards re-latches the configured gain, so discard
    /// it when a different gain is in use.
    pub fn reset(&mut self) {
        let clock = self.pins.clock().id();

        #[cfg(feature = "defmt")]
        defmt::debug!("hx711 reset on clock pin {}", clock);

        self.gpio.set_high(clock);
        self.delay.delay_us(RESET_HOLD_US);
        self.gpio.set_low(clock);
    }

    fn clock_out(&mut self) -> Measurement {
        if self.pins.is_empty() {
            return Measurement::new();
        }

        #[cfg(feature = "critical-section")]
        let raw = critical_section::with(|_| self.shift_cycle());
        #[cfg(not(feature = "critical-section"))]
        let raw = self.shift_cycle();

        finalize(&raw, self.pins.offsets())
    }

    /// Clocked part of the cycle; must run without interruption
    fn shift_cycle(&mut self) -> Vec<u32, MAX_CHANNELS> {
        let clock = self.pins.clock().id();
        let mut raw: Vec<u32, MAX_CHANNELS> = self.pins.data().iter().map(|_| 0).collect();

        for _ in 0..DATA_BITS {
            self.gpio.set_high(clock);
            self.delay.delay_ns(PULSE_WIDTH_NS);
            for (value, pin) in raw.iter_mut().zip(self.pins.data()) {
                *value <<= 1;
                self.gpio.set_low(clock);
                if self.gpio.read_digital(pin.id()) {
                    *value |= 1;
                }
            }
        }

        // Selects gain and channel for the next conversion
        for _ in 0..self.gain.extra_pulses() {
            self.delay.delay_ns(PULSE_WIDTH_NS);
            self.gpio.set_high(clock);
            self.delay.delay_ns(PULSE_WIDTH_NS);
            self.gpio.set_low(clock);
        }

        raw
    }
}

impl<B: GpioBackend, D: DelayNs> MultiChannelAdc for Hx711Bank<B, D> {
    fn read(&mut self) -> Measurement {
        Hx711Bank::read(self)
    }

    fn channel_count(&self) -> usize {
        Hx711Bank::channel_count(self)
    }
}
