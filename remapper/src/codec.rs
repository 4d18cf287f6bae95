// SPDX-License-Identifier: MIT
//! Packing of remap entry addresses into their register representation.
//!
//! The from-field carries the size class in its low bits, so a from offset must leave those bits
//! clear. The to-field is the offset itself.

use crate::error::RemapError;

/// Number of low from-field bits that hold the size class.
pub const SIZE_CLASS_BITS: u32 = 3;

/// Mask of the size class in a packed from-field.
pub const SIZE_CLASS_MASK: u64 = (1 << SIZE_CLASS_BITS) - 1;

/// The largest encodable size class.
pub const MAX_SIZE_CLASS: u8 = SIZE_CLASS_MASK as u8;

/// Encoder/decoder for a platform's minimum granularity.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct AddressCodec {
    granularity: u64,
}

impl AddressCodec {
    /// Create a codec.
    ///
    /// `granularity` must be a power of two wide enough to hold the size-class bits.
    pub const fn new(granularity: u64) -> Result<Self, RemapError> {
        if !granularity.is_power_of_two() || granularity <= SIZE_CLASS_MASK {
            return Err(RemapError::InvalidGranularity(granularity));
        }

        Ok(Self { granularity })
    }

    /// The minimum alignment of any offset.
    pub const fn granularity(&self) -> u64 {
        self.granularity
    }

    /// Bits of a from-field that are not address bits.
    pub const fn reserved_mask(&self) -> u64 {
        self.granularity - 1
    }

    pub fn check_alignment(&self, offset: u64, required: u64) -> Result<(), RemapError> {
        let required = required.max(self.granularity);
        if offset & (required - 1) != 0 {
            return Err(RemapError::Alignment { offset, required });
        }

        Ok(())
    }

    pub fn encode_from(&self, from_offset: u64, size_class: u8) -> Result<u64, RemapError> {
        if size_class > MAX_SIZE_CLASS {
            return Err(RemapError::InvalidSizeClass(size_class));
        }
        self.check_alignment(from_offset, self.granularity)?;

        Ok(from_offset | u64::from(size_class))
    }

    pub fn encode_to(&self, to_offset: u64) -> Result<u64, RemapError> {
        self.check_alignment(to_offset, self.granularity)?;

        Ok(to_offset)
    }

    pub const fn decode_size_class(&self, packed_from: u64) -> u8 {
        (packed_from & SIZE_CLASS_MASK) as u8
    }

    pub const fn decode_from(&self, packed_from: u64) -> u64 {
        packed_from & !self.reserved_mask()
    }

    pub const fn decode_to(&self, packed_to: u64) -> u64 {
        packed_to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODEC: AddressCodec = match AddressCodec::new(16) {
        Ok(codec) => codec,
        Err(_) => panic!("16-byte granularity holds the size class"),
    };

    #[test]
    fn granularity_must_hold_the_size_class() {
        assert_eq!(AddressCodec::new(4), Err(RemapError::InvalidGranularity(4)));
        assert_eq!(AddressCodec::new(8), Ok(AddressCodec { granularity: 8 }));
        assert_eq!(AddressCodec::new(24), Err(RemapError::InvalidGranularity(24)));
        assert_eq!(AddressCodec::new(0), Err(RemapError::InvalidGranularity(0)));
    }

    #[test]
    fn from_field_carries_size_class_in_low_bits() {
        let packed = CODEC.encode_from(0x0001_2340, 7).unwrap();

        assert_eq!(packed, 0x0001_2347);
        assert_eq!(CODEC.decode_size_class(packed), 7);
        assert_eq!(CODEC.decode_from(packed), 0x0001_2340);
    }

    #[test]
    fn reserved_bits_must_be_clear() {
        for low in 1..16u64 {
            assert_eq!(
                CODEC.encode_from(0x1000 | low, 0),
                Err(RemapError::Alignment {
                    offset: 0x1000 | low,
                    required: 16
                })
            );
        }
        // Bit 3 is outside the size class but still reserved.
        assert!(CODEC.encode_from(0x8, 7).is_err());
    }

    #[test]
    fn size_class_must_fit() {
        assert_eq!(
            CODEC.encode_from(0x100, 8),
            Err(RemapError::InvalidSizeClass(8))
        );
    }

    #[test]
    fn to_field_is_the_offset() {
        assert_eq!(CODEC.encode_to(0x2000), Ok(0x2000));
        assert_eq!(CODEC.decode_to(0x2000), 0x2000);
        assert!(CODEC.encode_to(0x2004).is_err());
    }

    #[test]
    fn alignment_never_drops_below_granularity() {
        assert!(CODEC.check_alignment(0x18, 8).is_err());
        assert!(CODEC.check_alignment(0x40, 64).is_ok());
        assert_eq!(
            CODEC.check_alignment(0x60, 64),
            Err(RemapError::Alignment {
                offset: 0x60,
                required: 64
            })
        );
    }
}
