// SPDX-License-Identifier: MIT
//! The reference platform: 224 entries in seven validity groups, 16-byte granularity.

pub mod mem;

use crate::platform::{PlatformConfig, SizeClassTable};

#[cfg(feature = "mmio")]
use crate::driver::remapper::MmioRemapper;

/// Number of remap entries built into the reference platform.
pub const ENTRIES: usize = 7 * 32;

/// Class `c` spans `16 << (7 - c)` bytes, so class 7 is the 16-byte minimum.
pub const SIZE_CLASSES: SizeClassTable =
    match SizeClassTable::new([2048, 1024, 512, 256, 128, 64, 32, 16]) {
        Ok(table) => table,
        Err(_) => panic!("reference size classes are powers of two"),
    };

/// Minimum alignment of any offset.
pub const GRANULARITY: u64 = 16;

pub const PLATFORM: PlatformConfig = match PlatformConfig::new(
    mem::map::FROM_REGION_BASE,
    mem::map::TO_REGION_BASE,
    ENTRIES,
    GRANULARITY,
    SIZE_CLASSES,
) {
    Ok(platform) => platform,
    Err(_) => panic!("reference platform granularity holds the size class"),
};

/// The remapper's register window.
///
/// # Safety
///
/// - Only sound on the reference platform, where the window is mapped at
///   [`mem::map::mmio::REMAPPER_START`].
#[cfg(feature = "mmio")]
pub unsafe fn remapper_registers() -> MmioRemapper {
    MmioRemapper::new(mem::map::mmio::REMAPPER_START)
}
