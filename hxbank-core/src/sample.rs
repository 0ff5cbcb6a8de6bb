//! Raw sample handling
//!
//! The HX711 shifts out a 24-bit two's-complement conversion, MSB first.

use heapless::Vec;

/// Maximum number of data channels in one bank
pub const MAX_CHANNELS: usize = 16;

/// Data bits per conversion
pub const DATA_BITS: u32 = 24;

/// Sign bit of a raw conversion
const SIGN_BIT: u32 = 1 << (DATA_BITS - 1);

/// Mask covering the raw conversion bits
const RAW_MASK: u32 = (1 << DATA_BITS) - 1;

/// Signed readings of one acquisition cycle, one per data pin, in pin order
pub type Measurement = Vec<i32, MAX_CHANNELS>;

/// Per-channel additive corrections, in pin order
pub type Offsets = Vec<i32, MAX_CHANNELS>;

/// Sign-extend a raw 24-bit conversion to `i32`
///
/// Bits above bit 23 of `raw` are ignored.
///
/// ```
/// use hxbank_core::sign_extend_24;
/// assert_eq!(sign_extend_24(0x00_0001), 1);
/// assert_eq!(sign_extend_24(0xFF_FFFF), -1);
/// assert_eq!(sign_extend_24(0x80_0000), -8_388_608);
/// ```
pub const fn sign_extend_24(raw: u32) -> i32 {
    let raw = raw & RAW_MASK;
    if raw & SIGN_BIT != 0 {
        (raw | !RAW_MASK) as i32
    } else {
        raw as i32
    }
}

/// Turn raw accumulators into a measurement
///
/// Each value is sign-extended and has the offset at the same index added
/// (saturating). Channels without an offset entry get none.
pub fn finalize(raw: &[u32], offsets: &[i32]) -> Measurement {
    raw.iter()
        .enumerate()
        .map(|(i, &r)| {
            let offset = offsets.get(i).copied().unwrap_or(0);
            sign_extend_24(r).saturating_add(offset)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sign_extension_edges() {
        assert_eq!(sign_extend_24(0x00_0000), 0);
        assert_eq!(sign_extend_24(0x00_0001), 1);
        assert_eq!(sign_extend_24(0x7F_FFFF), 8_388_607);
        assert_eq!(sign_extend_24(0xFF_FFFF), -1);
        assert_eq!(sign_extend_24(0x80_0000), -8_388_608);
    }

    #[test]
    fn test_sign_extension_is_not_xor() {
        // Flipping the sign bit would map 0xFFFFFF to 0x7FFFFF
        assert_ne!(sign_extend_24(0xFF_FFFF), 0x7F_FFFF);
        assert_ne!(sign_extend_24(0x00_0005), 0x80_0005);
    }

    #[test]
    fn test_upper_bits_ignored() {
        assert_eq!(sign_extend_24(0xAB00_0005), 5);
        assert_eq!(sign_extend_24(0x01FF_FFFF), -1);
    }

    #[test]
    fn test_finalize_applies_offsets() {
        let m = finalize(&[5, 0xFF_FFFF, 0x80_0000], &[-5, 1, 0]);
        assert_eq!(m.as_slice(), &[0, 0, -8_388_608]);
    }

    #[test]
    fn test_finalize_missing_offsets() {
        let m = finalize(&[3, 4], &[10]);
        assert_eq!(m.as_slice(), &[13, 4]);
    }

    #[test]
    fn test_finalize_saturates() {
        let m = finalize(&[0x7F_FFFF], &[i32::MAX]);
        assert_eq!(m.as_slice(), &[i32::MAX]);
    }

    proptest! {
        #[test]
        fn prop_sign_extension_matches_shift(raw in 0u32..(1 << 24)) {
            // Arithmetic shift of the value parked in the top 24 bits
            let expected = ((raw << 8) as i32) >> 8;
            prop_assert_eq!(sign_extend_24(raw), expected);
        }

        #[test]
        fn prop_sign_extension_in_range(raw in any::<u32>()) {
            let v = sign_extend_24(raw);
            prop_assert!((-8_388_608..=8_388_607).contains(&v));
            prop_assert_eq!((v as u32) & RAW_MASK, raw & RAW_MASK);
        }
    }
}
