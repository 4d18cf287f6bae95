// SPDX-License-Identifier: MIT
use core::fmt::{self, Display, Formatter};

/// An error returned by the remap table controller.
///
/// None of these are fatal to the controller: a failed operation leaves both the table and the
/// hardware registers as they were.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RemapError {
    /// An offset does not meet the granularity required by its size class.
    Alignment { offset: u64, required: u64 },
    /// The size class does not fit in the size-class bits of the from-field.
    InvalidSizeClass(u8),
    /// The entry index is not below the table capacity.
    IndexOutOfRange { index: usize, capacity: usize },
    /// The operation needs an installed entry, but the slot is empty.
    NotInstalled(usize),
    /// An absolute address lies below the base of the region it should be relative to.
    OutsideRegion { address: u64, base: u64 },
    /// The granularity is not a power of two wide enough for the size-class bits.
    InvalidGranularity(u64),
    /// A size class spans a byte count that is not a power of two.
    InvalidSpan { size_class: u8, span: u64 },
    /// The hardware valid register of a group disagrees with the controller's table.
    StateMismatch { group: usize, expected: u32, actual: u32 },
}

impl Display for RemapError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Alignment { offset, required } => {
                write!(f, "Offset {:#x} is not aligned to {:#x} bytes", offset, required)
            }
            Self::InvalidSizeClass(class) => write!(f, "Invalid size class {}", class),
            Self::IndexOutOfRange { index, capacity } => {
                write!(f, "Entry index {} out of range (capacity {})", index, capacity)
            }
            Self::NotInstalled(index) => write!(f, "No remap entry installed at index {}", index),
            Self::OutsideRegion { address, base } => {
                write!(f, "Address {:#x} is below region base {:#x}", address, base)
            }
            Self::InvalidGranularity(granularity) => {
                write!(f, "Granularity {:#x} cannot hold the size-class bits", granularity)
            }
            Self::InvalidSpan { size_class, span } => {
                write!(f, "Size class {} spans {:#x} bytes, not a power of two", size_class, span)
            }
            Self::StateMismatch {
                group,
                expected,
                actual,
            } => write!(
                f,
                "Valid group {} reads {:#010x}, expected {:#010x}",
                group, actual, expected
            ),
        }
    }
}
