//! Acquisition traits
//!
//! The interface between consumers of measurements (recorders, scales,
//! loggers) and the driver that produces them.

use crate::sample::Measurement;

/// A set of ADC channels sampled together
///
/// One call to [`read`](MultiChannelAdc::read) is one acquisition cycle
/// covering every channel.
pub trait MultiChannelAdc {
    /// Acquire one measurement, blocking until every channel is ready
    ///
    /// Values are in channel order with offsets applied.
    fn read(&mut self) -> Measurement;

    /// Number of channels in each measurement
    fn channel_count(&self) -> usize;
}
