//! Measurement logs
//!
//! A log is one CSV line per read cycle with the channel values in
//! data-pin order. Files are named `<base>_<index>.csv`, where the index
//! advances for every new file.
//!
//! Everything writes to [`core::fmt::Write`], so the same code fills a
//! `heapless::String` on target or a file buffer on a host.

use core::fmt::{self, Write};

use heapless::String;
use hxbank_core::MultiChannelAdc;

/// Longest accepted base name
pub const MAX_BASE_LEN: usize = 64;

/// Capacity of a generated file name (base, `_`, u32 index, `.csv`)
pub const MAX_NAME_LEN: usize = MAX_BASE_LEN + 1 + 10 + 4;

/// Write one measurement as a CSV line
pub fn write_row<W: Write>(out: &mut W, values: &[i32]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.write_char(',')?;
        }
        write!(out, "{}", value)?;
    }
    out.write_char('\n')
}

/// Read `cycles` measurements and write one row for each
pub fn record<A, W>(adc: &mut A, cycles: u32, out: &mut W) -> fmt::Result
where
    A: MultiChannelAdc,
    W: Write,
{
    for _ in 0..cycles {
        let measurement = adc.read();
        write_row(out, &measurement)?;
    }
    Ok(())
}

/// Enumerated log file names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordName {
    base: String<MAX_BASE_LEN>,
    index: u32,
}

impl RecordName {
    /// Start at index 0
    ///
    /// Returns `None` if `base` is longer than [`MAX_BASE_LEN`] bytes.
    pub fn new(base: &str) -> Option<Self> {
        Some(Self {
            base: String::try_from(base).ok()?,
            index: 0,
        })
    }

    /// Name for the current index
    pub fn current(&self) -> String<MAX_NAME_LEN> {
        let mut name = String::new();
        // Fits: base and index are bounded
        let _ = write!(name, "{}_{}.csv", self.base, self.index);
        name
    }

    /// Name for the current index, then advance the index
    pub fn next_name(&mut self) -> String<MAX_NAME_LEN> {
        let name = self.current();
        self.index = self.index.wrapping_add(1);
        name
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Change the base name, keeping the index
    ///
    /// Returns `false` and leaves the name untouched if `base` is too long.
    pub fn set_base(&mut self, base: &str) -> bool {
        match String::try_from(base) {
            Ok(base) => {
                self.base = base;
                true
            }
            Err(_) => false,
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn set_index(&mut self, index: u32) {
        self.index = index;
    }

    pub fn reset_index(&mut self) {
        self.index = 0;
    }
}
