// SPDX-License-Identifier: MIT

//--------------------------------------------------------------------------------------------------
// Public definitions
//--------------------------------------------------------------------------------------------------

/// Exclusive access to the wrapped data for the duration of a closure.
pub trait Mutex {
    type Data;

    fn lock<R>(&self, f: impl FnOnce(&mut Self::Data) -> R) -> R;
}

/// A reader-writer exclusion type.
/// The implementing object allows either a number of readers or at most one writer at any point
/// in time.
pub trait ReadWriteEx {
    type Data;

    /// Grants temporary mutable access to the data.
    fn write<R>(&self, f: impl FnOnce(&mut Self::Data) -> R) -> R;

    /// Grants temporary immutable access to the data.
    fn read<R>(&self, f: impl FnOnce(&Self::Data) -> R) -> R;
}
