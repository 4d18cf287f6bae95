// SPDX-License-Identifier: MIT

//--------------------------------------------------------------------------------------------------
// Public definitions
//--------------------------------------------------------------------------------------------------
#[rustfmt::skip]
pub mod map {
    /// Start of the region whose accesses can be redirected.
    pub const FROM_REGION_BASE:     u64 =   0x2000_0000;

    /// Start of the region accesses are redirected into.
    pub const TO_REGION_BASE:       u64 =   0x8000_0000;

    /// Physical devices.
    pub mod mmio {
        pub const REMAPPER_START:   usize = 0x0300_0000;
    }
}
