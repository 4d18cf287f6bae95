// SPDX-License-Identifier: MIT
//! A remapper backed by plain memory instead of a register window.
//!
//! Besides the registers it models the two regions: reads through [`SimulatedRemapper::read_u32`]
//! are redirected by whichever entries have their valid bit set, exactly as a bus access behind
//! the real device would be.

use core::array;
use core::cell::Cell;

use crate::driver::interface::RemapRegisters;
use crate::driver::{group_bit, MAX_ENTRIES, MAX_GROUPS};
use crate::platform::PlatformConfig;

//--------------------------------------------------------------------------------------------------
// Public definitions
//--------------------------------------------------------------------------------------------------

/// A run of 32-bit words at a fixed physical address.
pub struct SimWindow<const WORDS: usize> {
    base: u64,
    words: [Cell<u32>; WORDS],
}

pub struct SimulatedRemapper<const WORDS: usize> {
    platform: PlatformConfig,
    version: u32,
    entries: u32,
    from: [Cell<u64>; MAX_ENTRIES],
    to: [Cell<u64>; MAX_ENTRIES],
    valid: [Cell<u32>; MAX_GROUPS],
    register_writes: Cell<usize>,
    from_window: SimWindow<WORDS>,
    to_window: SimWindow<WORDS>,
}

//--------------------------------------------------------------------------------------------------
// Public code
//--------------------------------------------------------------------------------------------------
impl<const WORDS: usize> SimWindow<WORDS> {
    pub fn new(base: u64, words: [u32; WORDS]) -> Self {
        Self {
            base,
            words: words.map(Cell::new),
        }
    }

    pub fn get(&self, address: u64) -> Option<u32> {
        self.slot(address).map(Cell::get)
    }

    pub fn set(&self, address: u64, value: u32) -> Option<()> {
        self.slot(address).map(|word| word.set(value))
    }

    fn slot(&self, address: u64) -> Option<&Cell<u32>> {
        let offset = address.checked_sub(self.base)?;
        if offset % 4 != 0 {
            return None;
        }

        self.words.get(usize::try_from(offset / 4).ok()?)
    }
}

impl<const WORDS: usize> SimulatedRemapper<WORDS> {
    /// Create a remapper implementing every entry of `platform`, with nothing installed.
    pub fn new(
        platform: PlatformConfig,
        version: u32,
        from_window: SimWindow<WORDS>,
        to_window: SimWindow<WORDS>,
    ) -> Self {
        Self {
            platform,
            version,
            entries: platform.capacity().min(MAX_ENTRIES) as u32,
            from: array::from_fn(|_| Cell::new(0)),
            to: array::from_fn(|_| Cell::new(0)),
            valid: array::from_fn(|_| Cell::new(0)),
            register_writes: Cell::new(0),
            from_window,
            to_window,
        }
    }

    /// Report a smaller entry count than the platform describes.
    pub fn with_entries(mut self, entries: u32) -> Self {
        self.entries = entries.min(MAX_ENTRIES as u32);
        self
    }

    /// Number of register writes performed so far.
    pub fn register_writes(&self) -> usize {
        self.register_writes.get()
    }

    /// Read a word as a bus master would, through any enabled remap entry.
    pub fn read_u32(&self, address: u64) -> Option<u32> {
        let target = self.redirect(address).unwrap_or(address);

        self.from_window
            .get(target)
            .or_else(|| self.to_window.get(target))
    }

    /// Read `N` consecutive words starting at `address`.
    pub fn read_words<const N: usize>(&self, address: u64) -> Option<[u32; N]> {
        let mut out = [0; N];
        for (i, word) in out.iter_mut().enumerate() {
            *word = self.read_u32(address + 4 * i as u64)?;
        }

        Some(out)
    }

    /// Write a word directly into whichever window holds `address`, bypassing the remapper.
    pub fn poke_u32(&self, address: u64, value: u32) -> Option<()> {
        self.from_window
            .set(address, value)
            .or_else(|| self.to_window.set(address, value))
    }

    /// Change a valid register behind the controller's back.
    pub fn corrupt_valid(&self, group: usize, mask: u32) {
        self.valid[group].set(mask);
    }

    fn redirect(&self, address: u64) -> Option<u64> {
        let offset = address.checked_sub(self.platform.from_region_base())?;
        let codec = self.platform.codec();

        (0..self.entries as usize).find_map(|index| {
            let (group, bit) = group_bit(index);
            if self.valid[group].get() & bit == 0 {
                return None;
            }

            let packed_from = self.from[index].get();
            let start = codec.decode_from(packed_from);
            let span = self
                .platform
                .size_classes()
                .span(codec.decode_size_class(packed_from))?;
            let delta = offset.checked_sub(start).filter(|delta| *delta < span)?;

            Some(self.platform.to_region_base() + codec.decode_to(self.to[index].get()) + delta)
        })
    }

    fn count_write(&self) {
        self.register_writes.set(self.register_writes.get() + 1);
    }
}

impl<const WORDS: usize> RemapRegisters for SimulatedRemapper<WORDS> {
    fn entries(&self) -> u32 {
        self.entries
    }

    fn version(&self) -> u32 {
        self.version
    }

    fn read_from(&self, index: usize) -> u64 {
        self.from[index].get()
    }

    fn write_from(&self, index: usize, value: u64) {
        self.count_write();
        self.from[index].set(value);
    }

    fn read_to(&self, index: usize) -> u64 {
        self.to[index].get()
    }

    fn write_to(&self, index: usize, value: u64) {
        self.count_write();
        self.to[index].set(value);
    }

    fn read_valid(&self, group: usize) -> u32 {
        self.valid[group].get()
    }

    fn write_valid(&self, group: usize, mask: u32) {
        self.count_write();
        self.valid[group].set(mask);
    }

    fn flush(&self) {
        self.count_write();
        self.valid.iter().for_each(|mask| mask.set(0));
        self.from.iter().for_each(|from| from.set(0));
        self.to.iter().for_each(|to| to.set(0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::reference::PLATFORM;

    const ROM: u64 = PLATFORM.from_region_base() + 0x1_0000;
    const RAM: u64 = PLATFORM.to_region_base() + 0x2000;

    fn simulated() -> SimulatedRemapper<4> {
        SimulatedRemapper::new(
            PLATFORM,
            1,
            SimWindow::new(ROM, [1, 2, 3, 4]),
            SimWindow::new(RAM, [5, 6, 7, 8]),
        )
    }

    #[test]
    fn reads_are_direct_without_valid_entries() {
        let sim = simulated();
        sim.write_from(0, 0x1_0007);
        sim.write_to(0, 0x2000);

        assert_eq!(sim.read_words::<4>(ROM), Some([1, 2, 3, 4]));
        assert_eq!(sim.read_u32(RAM + 4), Some(6));
        assert_eq!(sim.read_u32(ROM + 16), None);
    }

    #[test]
    fn valid_entry_redirects_its_span_only() {
        let sim = simulated();
        // Class 6 spans 32 bytes; only the first 16 are backed by the window.
        sim.write_from(5, 0x1_0006);
        sim.write_to(5, 0x2000);
        sim.write_valid(0, 1 << 5);

        assert_eq!(sim.read_words::<4>(ROM), Some([5, 6, 7, 8]));

        sim.write_from(5, 0x1_0007);
        sim.write_to(5, 0x2004);
        assert_eq!(sim.read_words::<3>(ROM), Some([6, 7, 8]));
        assert_eq!(sim.read_u32(ROM + 12), None);
    }

    #[test]
    fn flush_clears_registers() {
        let sim = simulated();
        sim.write_from(113, 0x1_0007);
        sim.write_to(113, 0x2000);
        sim.write_valid(3, 1 << 17);

        sim.flush();

        assert_eq!(sim.read_valid(3), 0);
        assert_eq!(sim.read_from(113), 0);
        assert_eq!(sim.read_words::<4>(ROM), Some([1, 2, 3, 4]));
        assert_eq!(sim.register_writes(), 4);
    }
}
