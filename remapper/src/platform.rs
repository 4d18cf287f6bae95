// SPDX-License-Identifier: MIT
//! Per-target description of a remapper instance.

use crate::codec::{AddressCodec, MAX_SIZE_CLASS};
use crate::driver::ENTRIES_PER_GROUP;
use crate::error::RemapError;

//--------------------------------------------------------------------------------------------------
// Public definitions
//--------------------------------------------------------------------------------------------------

/// Span in bytes selected by each size class.
///
/// The mapping belongs to the hardware revision, so it is supplied by the board support code.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SizeClassTable {
    spans: [u64; MAX_SIZE_CLASS as usize + 1],
}

/// Everything the controller needs to know about the platform it runs on.
///
/// Only [`PlatformConfig::new`] builds one, so every instance carries a usable granularity.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PlatformConfig {
    from_region_base: u64,
    to_region_base: u64,
    capacity: usize,
    codec: AddressCodec,
    size_classes: SizeClassTable,
}

//--------------------------------------------------------------------------------------------------
// Public code
//--------------------------------------------------------------------------------------------------
impl SizeClassTable {
    /// Create a table. Every span must be a power of two.
    pub const fn new(spans: [u64; MAX_SIZE_CLASS as usize + 1]) -> Result<Self, RemapError> {
        let mut class = 0;
        while class < spans.len() {
            if !spans[class].is_power_of_two() {
                return Err(RemapError::InvalidSpan {
                    size_class: class as u8,
                    span: spans[class],
                });
            }
            class += 1;
        }

        Ok(Self { spans })
    }

    pub const fn span(&self, size_class: u8) -> Option<u64> {
        if size_class > MAX_SIZE_CLASS {
            return None;
        }

        Some(self.spans[size_class as usize])
    }
}

impl PlatformConfig {
    /// Describe a platform.
    ///
    /// `from_region_base` and `to_region_base` are the addresses offsets are relative to,
    /// `capacity` the number of entries the platform is built with, and `granularity` the
    /// minimum alignment of any offset.
    pub const fn new(
        from_region_base: u64,
        to_region_base: u64,
        capacity: usize,
        granularity: u64,
        size_classes: SizeClassTable,
    ) -> Result<Self, RemapError> {
        let codec = match AddressCodec::new(granularity) {
            Ok(codec) => codec,
            Err(err) => return Err(err),
        };

        Ok(Self {
            from_region_base,
            to_region_base,
            capacity,
            codec,
            size_classes,
        })
    }

    pub const fn from_region_base(&self) -> u64 {
        self.from_region_base
    }

    pub const fn to_region_base(&self) -> u64 {
        self.to_region_base
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub const fn granularity(&self) -> u64 {
        self.codec.granularity()
    }

    pub const fn size_classes(&self) -> &SizeClassTable {
        &self.size_classes
    }

    pub const fn codec(&self) -> AddressCodec {
        self.codec
    }

    /// Number of 32-entry validity groups covering the capacity.
    pub const fn groups(&self) -> usize {
        self.capacity.div_ceil(ENTRIES_PER_GROUP)
    }

    /// Alignment required of both offsets of an entry with the given size class.
    pub fn required_alignment(&self, size_class: u8) -> Result<u64, RemapError> {
        let span = self
            .size_classes
            .span(size_class)
            .ok_or(RemapError::InvalidSizeClass(size_class))?;

        Ok(span.max(self.granularity()))
    }

    /// Convert an absolute from-region address into an offset.
    pub fn from_offset(&self, address: u64) -> Result<u64, RemapError> {
        region_offset(address, self.from_region_base)
    }

    /// Convert an absolute to-region address into an offset.
    pub fn to_offset(&self, address: u64) -> Result<u64, RemapError> {
        region_offset(address, self.to_region_base)
    }
}

//--------------------------------------------------------------------------------------------------
// Private code
//--------------------------------------------------------------------------------------------------
fn region_offset(address: u64, base: u64) -> Result<u64, RemapError> {
    address
        .checked_sub(base)
        .ok_or(RemapError::OutsideRegion { address, base })
}
