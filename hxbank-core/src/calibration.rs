//! Zero-offset calibration math
//!
//! Readings taken with no load are summed per channel; the offset that
//! brings the average back to zero is the negated truncated mean.

use heapless::Vec;

use crate::sample::{Offsets, MAX_CHANNELS};

/// Fit offsets to a channel count
///
/// Missing entries become zero, extra entries are dropped.
pub fn fit_offsets(values: &[i32], channels: usize) -> Offsets {
    let channels = channels.min(MAX_CHANNELS);
    (0..channels)
        .map(|i| values.get(i).copied().unwrap_or(0))
        .collect()
}

/// Running per-channel sums of zero-load readings
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ZeroAccumulator {
    sums: Vec<i64, MAX_CHANNELS>,
    samples: u32,
}

impl ZeroAccumulator {
    /// Create an accumulator for `channels` channels
    pub fn new(channels: usize) -> Self {
        Self {
            sums: (0..channels.min(MAX_CHANNELS)).map(|_| 0).collect(),
            samples: 0,
        }
    }

    /// Add one measurement
    ///
    /// Values beyond the channel count are ignored.
    pub fn add(&mut self, measurement: &[i32]) {
        for (sum, &value) in self.sums.iter_mut().zip(measurement) {
            *sum += i64::from(value);
        }
        self.samples += 1;
    }

    /// Number of measurements added
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Per-channel sums
    pub fn sums(&self) -> &[i64] {
        &self.sums
    }

    /// Offsets that cancel the average reading
    ///
    /// Each offset is `-(sum / samples)` with truncating division.
    /// Returns `None` before any measurement was added.
    pub fn offsets(&self) -> Option<Offsets> {
        if self.samples == 0 {
            return None;
        }

        let n = i64::from(self.samples);
        Some(
            self.sums
                .iter()
                .map(|&sum| (-(sum / n)).clamp(i32::MIN.into(), i32::MAX.into()) as i32)
                .collect(),
        )
    }
}
