// SPDX-License-Identifier: MIT
pub use common::*;

mod common;

#[cfg(feature = "mmio")]
pub mod remapper;
pub mod simulated;

pub mod interface {
    /// A driver the platform brings up by name.
    pub trait DeviceDriver {
        /// A string describing the device driver.
        fn compatible(&self) -> &'static str;

        /// Called by the platform to bring up the device.
        fn init(&self) -> Result<(), &'static str> {
            Ok(())
        }
    }

    /// Register-level access to a remapper.
    ///
    /// Values are the packed register contents; validation is the controller's job. Indices
    /// passed in are always below the capacity the controller derived from [`entries`].
    ///
    /// [`entries`]: RemapRegisters::entries
    pub trait RemapRegisters {
        /// Number of entries implemented by the hardware.
        fn entries(&self) -> u32;

        fn version(&self) -> u32;

        fn read_from(&self, index: usize) -> u64;

        fn write_from(&self, index: usize, value: u64);

        fn read_to(&self, index: usize) -> u64;

        fn write_to(&self, index: usize, value: u64);

        /// Valid bits of the 32 entries in `group`.
        fn read_valid(&self, group: usize) -> u32;

        fn write_valid(&self, group: usize, mask: u32);

        /// Invalidate every entry at once.
        fn flush(&self);
    }

    impl<T> RemapRegisters for &T
    where
        T: RemapRegisters + ?Sized,
    {
        fn entries(&self) -> u32 {
            (**self).entries()
        }

        fn version(&self) -> u32 {
            (**self).version()
        }

        fn read_from(&self, index: usize) -> u64 {
            (**self).read_from(index)
        }

        fn write_from(&self, index: usize, value: u64) {
            (**self).write_from(index, value)
        }

        fn read_to(&self, index: usize) -> u64 {
            (**self).read_to(index)
        }

        fn write_to(&self, index: usize, value: u64) {
            (**self).write_to(index, value)
        }

        fn read_valid(&self, group: usize) -> u32 {
            (**self).read_valid(group)
        }

        fn write_valid(&self, group: usize, mask: u32) {
            (**self).write_valid(group, mask)
        }

        fn flush(&self) {
            (**self).flush()
        }
    }
}
