//! Zero calibration and offsets

use embedded_hal::delay::DelayNs;
use hxbank_core::{AcquisitionError, Offsets, ZeroAccumulator};
use hxbank_hal::GpioBackend;

use super::Hx711Bank;

impl<B: GpioBackend, D: DelayNs> Hx711Bank<B, D> {
    /// Make the current (unloaded) readings read as zero
    ///
    /// Clears the offsets, averages `samples` readings and stores the
    /// negated averages as the new offsets. Does nothing when `samples`
    /// is 0. Blocks like [`read`](Self::read).
    pub fn zero_calibrate(&mut self, samples: u32) {
        if samples == 0 {
            return;
        }

        self.pins.zero_offsets();
        let mut acc = ZeroAccumulator::new(self.pins.len());
        for _ in 0..samples {
            let measurement = self.read();
            acc.add(&measurement);
        }
        self.apply_zero(&acc);
    }

    /// Zero calibration with a bounded wait per reading
    ///
    /// On timeout the offsets that were in place before the call are
    /// restored.
    pub fn try_zero_calibrate(
        &mut self,
        samples: u32,
        max_polls: u32,
    ) -> Result<(), AcquisitionError> {
        if samples == 0 {
            return Ok(());
        }

        let previous: Offsets = self.pins.offsets().iter().copied().collect();
        self.pins.zero_offsets();

        let mut acc = ZeroAccumulator::new(self.pins.len());
        for _ in 0..samples {
            match self.try_read(max_polls) {
                Ok(measurement) => acc.add(&measurement),
                Err(err) => {
                    self.pins.set_offsets(&previous);
                    return Err(err);
                }
            }
        }
        self.apply_zero(&acc);
        Ok(())
    }

    /// Replace the offsets
    ///
    /// Shorter lists are padded with zero, longer ones truncated to the
    /// channel count.
    pub fn set_offsets(&mut self, offsets: &[i32]) {
        self.pins.set_offsets(offsets);
    }

    fn apply_zero(&mut self, acc: &ZeroAccumulator) {
        if let Some(offsets) = acc.offsets() {
            self.pins.set_offsets(&offsets);

            #[cfg(feature = "defmt")]
            defmt::info!(
                "zero calibrated over {} samples: {}",
                acc.samples(),
                self.pins.offsets()
            );
        }
    }
}
