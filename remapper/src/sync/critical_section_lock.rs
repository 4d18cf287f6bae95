// SPDX-License-Identifier: MIT
use core::cell::RefCell;

use crate::sync::interface::{Mutex, ReadWriteEx};

//--------------------------------------------------------------------------------------------------
// Public definitions
//--------------------------------------------------------------------------------------------------

/// A lock that grants access to its data from inside a `critical_section::with` block.
///
/// Readers and writers both take the critical section, so a writer can never observe a
/// concurrent reader mid-way through a register read-modify-write. The critical section nests,
/// so re-entering the same lock from inside a closure panics instead of aliasing the data.
pub struct CriticalSectionLock<T> {
    data: critical_section::Mutex<RefCell<T>>,
}

//--------------------------------------------------------------------------------------------------
// Public code
//--------------------------------------------------------------------------------------------------
impl<T> CriticalSectionLock<T> {
    pub const fn new(data: T) -> Self {
        Self {
            data: critical_section::Mutex::new(RefCell::new(data)),
        }
    }
}

impl<T> Mutex for CriticalSectionLock<T> {
    type Data = T;

    fn lock<R>(&self, f: impl FnOnce(&mut Self::Data) -> R) -> R {
        critical_section::with(|cs| f(&mut *self.data.borrow_ref_mut(cs)))
    }
}

impl<T> ReadWriteEx for CriticalSectionLock<T> {
    type Data = T;

    fn write<R>(&self, f: impl FnOnce(&mut Self::Data) -> R) -> R {
        self.lock(f)
    }

    fn read<R>(&self, f: impl FnOnce(&Self::Data) -> R) -> R {
        critical_section::with(|cs| f(&*self.data.borrow_ref(cs)))
    }
}
