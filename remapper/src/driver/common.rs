// SPDX-License-Identifier: MIT
#[cfg(feature = "mmio")]
use core::marker::PhantomData;
#[cfg(feature = "mmio")]
use core::ops;

/// Entries sharing one valid register.
pub const ENTRIES_PER_GROUP: usize = 32;

/// Largest table any supported remapper implements.
pub const MAX_ENTRIES: usize = 7 * ENTRIES_PER_GROUP;

/// Number of valid registers needed for [`MAX_ENTRIES`].
pub const MAX_GROUPS: usize = MAX_ENTRIES / ENTRIES_PER_GROUP;

/// The valid register holding `index`, and the entry's bit within it.
pub const fn group_bit(index: usize) -> (usize, u32) {
    (
        index / ENTRIES_PER_GROUP,
        1 << (index % ENTRIES_PER_GROUP),
    )
}

#[cfg(feature = "mmio")]
pub struct MMIODerefWrapper<T> {
    start_addr: usize,
    phantom: PhantomData<fn() -> T>,
}

#[cfg(feature = "mmio")]
impl<T> MMIODerefWrapper<T> {
    /// Create an instance.
    ///
    /// # Safety
    ///
    /// - `start_addr` must point at a mapped, suitably aligned instance of `T` for as long as the
    ///   wrapper lives.
    pub const unsafe fn new(start_addr: usize) -> Self {
        Self {
            start_addr,
            phantom: PhantomData,
        }
    }
}

#[cfg(feature = "mmio")]
impl<T> ops::Deref for MMIODerefWrapper<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        unsafe { &*(self.start_addr as *const _) }
    }
}
