// SPDX-License-Identifier: MIT
//! The remap table controller.
//!
//! Each entry moves through `absent -> installed (disabled) <-> installed (enabled)`. `install`
//! from any state lands in the disabled state, and `flush` returns every entry to absent.

use crate::codec::AddressCodec;
use crate::driver::interface::{DeviceDriver, RemapRegisters};
use crate::driver::{group_bit, MAX_ENTRIES};
use crate::error::RemapError;
use crate::platform::PlatformConfig;
use crate::sync::interface::ReadWriteEx;
use crate::sync::CriticalSectionLock;
use crate::validity::{self, ValidityReporter};
use crate::{info, warn};

//--------------------------------------------------------------------------------------------------
// Public definitions
//--------------------------------------------------------------------------------------------------

/// One row of the remap table.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RemapEntry {
    index: usize,
    from_offset: u64,
    to_offset: u64,
    size_class: u8,
    enabled: bool,
}

pub struct RemapTableController<R> {
    registers: R,
    platform: PlatformConfig,
    codec: AddressCodec,
    version: u32,
    capacity: usize,
    pub(crate) table: CriticalSectionLock<RemapTable>,
}

//--------------------------------------------------------------------------------------------------
// Public code
//--------------------------------------------------------------------------------------------------
impl RemapEntry {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn from_offset(&self) -> u64 {
        self.from_offset
    }

    pub fn to_offset(&self) -> u64 {
        self.to_offset
    }

    pub fn size_class(&self) -> u8 {
        self.size_class
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl<R> RemapTableController<R>
where
    R: RemapRegisters,
{
    /// Create a controller with an empty table.
    ///
    /// The capacity is the smaller of what the platform describes and what the hardware reports.
    /// The hardware is left untouched; [`DeviceDriver::init`] flushes it.
    pub fn new(registers: R, platform: PlatformConfig) -> Self {
        let version = registers.version();
        let implemented = registers.entries() as usize;
        let capacity = platform.capacity().min(implemented).min(MAX_ENTRIES);

        if capacity < platform.capacity() {
            warn!(
                "remapper implements {} entries, platform describes {}",
                capacity,
                platform.capacity()
            );
        }
        info!("remapper version {}, {} entries", version, capacity);

        Self {
            registers,
            platform,
            codec: platform.codec(),
            version,
            capacity,
            table: CriticalSectionLock::new(RemapTable::new()),
        }
    }

    /// Store an entry at `index`, replacing whatever was there. The entry starts disabled.
    ///
    /// Both offsets are relative to their region base and must be aligned to the larger of the
    /// platform granularity and the span of `size_class`.
    pub fn install(
        &self,
        index: usize,
        from_offset: u64,
        to_offset: u64,
        size_class: u8,
    ) -> Result<(), RemapError> {
        self.check_index(index)?;

        let required = self.platform.required_alignment(size_class)?;
        self.codec.check_alignment(from_offset, required)?;
        self.codec.check_alignment(to_offset, required)?;
        let packed_from = self.codec.encode_from(from_offset, size_class)?;
        let packed_to = self.codec.encode_to(to_offset)?;

        let entry = RemapEntry {
            index,
            from_offset,
            to_offset,
            size_class,
            enabled: false,
        };

        self.table.write(|table| {
            // The hardware must never redirect through a half-written entry.
            if table.get(index).is_some_and(|old| old.enabled) {
                self.update_valid(index, false);
            }
            self.registers.write_from(index, packed_from);
            self.registers.write_to(index, packed_to);
            table.entries[index] = Some(entry);
        });

        info!(
            "entry {}: from {:#x} -> to {:#x}, class {}",
            index,
            from_offset,
            to_offset,
            size_class
        );
        Ok(())
    }

    /// Like [`install`](Self::install), with absolute addresses inside the two regions.
    pub fn install_region(
        &self,
        index: usize,
        from_addr: u64,
        to_addr: u64,
        size_class: u8,
    ) -> Result<(), RemapError> {
        let from_offset = self.platform.from_offset(from_addr)?;
        let to_offset = self.platform.to_offset(to_addr)?;

        self.install(index, from_offset, to_offset, size_class)
    }

    pub fn enable(&self, index: usize) -> Result<(), RemapError> {
        self.set_enabled(index, true)
    }

    /// Stop honoring the entry at `index`. Disabling a disabled entry succeeds.
    pub fn disable(&self, index: usize) -> Result<(), RemapError> {
        self.set_enabled(index, false)
    }

    /// Invalidate every entry.
    pub fn flush(&self) {
        self.table.write(|table| {
            self.registers.flush();
            table.clear();
        });

        info!("flushed all remap entries");
    }

    /// The packed from-field of the entry at `index`, as the hardware holds it.
    pub fn read_from(&self, index: usize) -> Result<u64, RemapError> {
        self.read_installed(index, |registers| registers.read_from(index))
    }

    /// The packed to-field of the entry at `index`, as the hardware holds it.
    pub fn read_to(&self, index: usize) -> Result<u64, RemapError> {
        self.read_installed(index, |registers| registers.read_to(index))
    }

    pub fn entry(&self, index: usize) -> Result<RemapEntry, RemapError> {
        self.check_index(index)?;

        self.table
            .read(|table| table.get(index).copied())
            .ok_or(RemapError::NotInstalled(index))
    }

    pub fn is_enabled(&self, index: usize) -> Result<bool, RemapError> {
        self.entry(index).map(|entry| entry.enabled)
    }

    /// Hardware version, read once when the controller was created.
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn platform(&self) -> &PlatformConfig {
        &self.platform
    }

    pub fn codec(&self) -> &AddressCodec {
        &self.codec
    }

    pub fn from_region_base(&self) -> u64 {
        self.platform.from_region_base()
    }

    pub fn to_region_base(&self) -> u64 {
        self.platform.to_region_base()
    }

    pub fn registers(&self) -> &R {
        &self.registers
    }

    pub fn validity(&self) -> ValidityReporter<'_, R> {
        ValidityReporter::new(self)
    }

    /// Enabled entries of validity group `group`, one bit per entry.
    pub fn group_mask(&self, group: usize) -> u32 {
        self.validity().group_mask(group)
    }

    /// Check that the hardware valid registers agree with the table.
    pub fn verify(&self) -> Result<(), RemapError> {
        let groups = self.validity().groups();
        let result = self.table.read(|table| {
            (0..groups).try_for_each(|group| {
                let expected = validity::group_mask(table, self.capacity, group);
                let actual = self.registers.read_valid(group);
                if expected != actual {
                    return Err(RemapError::StateMismatch {
                        group,
                        expected,
                        actual,
                    });
                }

                Ok(())
            })
        });

        if let Err(err) = &result {
            warn!("{}", err);
        }
        result
    }
}

impl<R> DeviceDriver for RemapTableController<R>
where
    R: RemapRegisters,
{
    fn compatible(&self) -> &'static str {
        "sifive,remapper2"
    }

    /// Start from a known state: nothing installed, nothing valid.
    fn init(&self) -> Result<(), &'static str> {
        self.flush();
        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Private definitions
//--------------------------------------------------------------------------------------------------

/// Installed entries by index. Absent slots are `None`, never a zeroed entry.
pub(crate) struct RemapTable {
    entries: [Option<RemapEntry>; MAX_ENTRIES],
}

//--------------------------------------------------------------------------------------------------
// Private code
//--------------------------------------------------------------------------------------------------
impl RemapTable {
    const fn new() -> Self {
        Self {
            entries: [None; MAX_ENTRIES],
        }
    }

    pub(crate) fn get(&self, index: usize) -> Option<&RemapEntry> {
        self.entries.get(index).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut RemapEntry> {
        self.entries.get_mut(index).and_then(Option::as_mut)
    }

    fn clear(&mut self) {
        self.entries.iter_mut().for_each(|slot| *slot = None);
    }
}

impl<R> RemapTableController<R>
where
    R: RemapRegisters,
{
    fn check_index(&self, index: usize) -> Result<(), RemapError> {
        if index >= self.capacity {
            return Err(RemapError::IndexOutOfRange {
                index,
                capacity: self.capacity,
            });
        }

        Ok(())
    }

    fn set_enabled(&self, index: usize, enabled: bool) -> Result<(), RemapError> {
        self.check_index(index)?;

        self.table.write(|table| {
            let entry = table
                .get_mut(index)
                .ok_or(RemapError::NotInstalled(index))?;
            self.update_valid(index, enabled);
            entry.enabled = enabled;

            Ok(())
        })
    }

    /// Read-modify-write of the entry's valid bit. Callers hold the table lock.
    fn update_valid(&self, index: usize, enabled: bool) {
        let (group, bit) = group_bit(index);
        let mask = self.registers.read_valid(group);
        let mask = if enabled { mask | bit } else { mask & !bit };

        self.registers.write_valid(group, mask);
    }

    fn read_installed(
        &self,
        index: usize,
        read: impl FnOnce(&R) -> u64,
    ) -> Result<u64, RemapError> {
        self.check_index(index)?;

        self.table.read(|table| match table.get(index) {
            Some(_) => Ok(read(&self.registers)),
            None => Err(RemapError::NotInstalled(index)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::reference::PLATFORM;
    use crate::codec::MAX_SIZE_CLASS;
    use crate::driver::simulated::{SimWindow, SimulatedRemapper};

    const ROM: u64 = PLATFORM.from_region_base() + 0x1_0000;
    const RAM: u64 = PLATFORM.to_region_base() + 0x2000;

    fn simulated() -> SimulatedRemapper<4> {
        SimulatedRemapper::new(
            PLATFORM,
            3,
            SimWindow::new(ROM, [1, 2, 3, 4]),
            SimWindow::new(RAM, [5, 6, 7, 8]),
        )
    }

    #[test]
    fn install_alignment_follows_size_class() {
        let sim = simulated();
        let remapper = RemapTableController::new(&sim, PLATFORM);

        for class in 0..=MAX_SIZE_CLASS {
            let required = PLATFORM.required_alignment(class).unwrap();

            for misalign in [8, 16, required / 2] {
                if misalign % required == 0 {
                    continue;
                }
                assert_eq!(
                    remapper.install(1, required * 3 + misalign, 0, class),
                    Err(RemapError::Alignment {
                        offset: required * 3 + misalign,
                        required
                    })
                );
                assert!(remapper.install(1, 0, required + misalign, class).is_err());
            }

            assert_eq!(remapper.install(1, required * 3, required * 5, class), Ok(()));
        }
    }

    #[test]
    fn invalid_size_class_is_rejected() {
        let sim = simulated();
        let remapper = RemapTableController::new(&sim, PLATFORM);

        assert_eq!(
            remapper.install(0, 0x100, 0x100, 8),
            Err(RemapError::InvalidSizeClass(8))
        );
        assert_eq!(sim.register_writes(), 0);
    }

    #[test]
    fn install_does_not_enable() {
        let sim = simulated();
        let remapper = RemapTableController::new(&sim, PLATFORM);

        remapper.install(40, 0x1_0000, 0x2000, 7).unwrap();

        assert_eq!(remapper.is_enabled(40), Ok(false));
        assert_eq!(remapper.group_mask(1), 0);
        assert_eq!(sim.read_valid(1), 0);
    }

    #[test]
    fn read_back_decodes_to_installed_values() {
        let sim = simulated();
        let remapper = RemapTableController::new(&sim, PLATFORM);
        let codec = remapper.codec();

        remapper.install(9, 0xABC0, 0x1230, 7).unwrap();
        let packed_from = remapper.read_from(9).unwrap();
        let packed_to = remapper.read_to(9).unwrap();

        assert_eq!(codec.decode_from(packed_from), 0xABC0);
        assert_eq!(codec.decode_size_class(packed_from), 7);
        assert_eq!(codec.decode_to(packed_to), 0x1230);
    }

    #[test]
    fn disable_is_idempotent() {
        let sim = simulated();
        let remapper = RemapTableController::new(&sim, PLATFORM);
        remapper.install(2, 0x100, 0x200, 7).unwrap();
        remapper.enable(2).unwrap();

        assert_eq!(remapper.disable(2), Ok(()));
        assert_eq!(remapper.disable(2), Ok(()));
        assert_eq!(remapper.is_enabled(2), Ok(false));
        assert_eq!(sim.read_valid(0), 0);
    }

    #[test]
    fn enable_and_disable_need_an_entry() {
        let sim = simulated();
        let remapper = RemapTableController::new(&sim, PLATFORM);

        assert_eq!(remapper.enable(17), Err(RemapError::NotInstalled(17)));
        assert_eq!(remapper.disable(17), Err(RemapError::NotInstalled(17)));
        assert_eq!(remapper.read_from(17), Err(RemapError::NotInstalled(17)));
        assert_eq!(
            remapper.enable(224),
            Err(RemapError::IndexOutOfRange {
                index: 224,
                capacity: 224
            })
        );
    }

    #[test]
    fn enable_keeps_neighbours_in_group() {
        let sim = simulated();
        let remapper = RemapTableController::new(&sim, PLATFORM);
        for index in [32, 33, 63] {
            remapper.install(index, 0x100 * index as u64, 0x100, 7).unwrap();
            remapper.enable(index).unwrap();
        }
        remapper.disable(33).unwrap();

        assert_eq!(sim.read_valid(1), 1 | 1 << 31);
        assert_eq!(remapper.group_mask(1), 1 | 1 << 31);
    }

    #[test]
    fn reinstall_replaces_and_disables() {
        let sim = simulated();
        let remapper = RemapTableController::new(&sim, PLATFORM);
        remapper.install(113, 0x1_0000, 0x2000, 7).unwrap();
        remapper.enable(113).unwrap();

        remapper.install(113, 0x4_0000, 0x8000, 6).unwrap();

        let entry = remapper.entry(113).unwrap();
        assert_eq!(entry.from_offset(), 0x4_0000);
        assert_eq!(entry.to_offset(), 0x8000);
        assert_eq!(entry.size_class(), 6);
        assert!(!entry.is_enabled());
        assert_eq!(sim.read_valid(3), 0);
        assert_eq!(remapper.read_from(113), Ok(0x4_0006));
    }

    #[test]
    fn flush_removes_every_entry() {
        let sim = simulated();
        let remapper = RemapTableController::new(&sim, PLATFORM);
        for index in [0, 31, 32, 113, 223] {
            remapper.install(index, 0x1000, 0x1000, 7).unwrap();
        }
        remapper.enable(0).unwrap();
        remapper.enable(113).unwrap();
        remapper.enable(223).unwrap();
        remapper.disable(113).unwrap();

        remapper.flush();

        for index in [0, 31, 32, 113, 223] {
            assert_eq!(remapper.read_from(index), Err(RemapError::NotInstalled(index)));
            assert_eq!(remapper.read_to(index), Err(RemapError::NotInstalled(index)));
            assert_eq!(remapper.enable(index), Err(RemapError::NotInstalled(index)));
            assert_eq!(remapper.disable(index), Err(RemapError::NotInstalled(index)));
        }
        assert!(remapper.validity().masks().iter().all(|mask| *mask == 0));
        assert_eq!(remapper.verify(), Ok(()));
    }

    #[test]
    fn install_region_subtracts_bases() {
        let sim = simulated();
        let remapper = RemapTableController::new(&sim, PLATFORM);

        remapper.install_region(4, ROM, RAM, 7).unwrap();
        assert_eq!(remapper.read_from(4), Ok(0x1_0007));
        assert_eq!(remapper.read_to(4), Ok(0x2000));

        assert_eq!(
            remapper.install_region(4, PLATFORM.from_region_base() - 16, RAM, 7),
            Err(RemapError::OutsideRegion {
                address: PLATFORM.from_region_base() - 16,
                base: PLATFORM.from_region_base()
            })
        );
    }

    #[test]
    fn capacity_clamps_to_hardware() {
        let sim = simulated().with_entries(64);
        let remapper = RemapTableController::new(&sim, PLATFORM);

        assert_eq!(remapper.capacity(), 64);
        assert_eq!(remapper.validity().groups(), 2);
        assert_eq!(
            remapper.install(64, 0, 0, 7),
            Err(RemapError::IndexOutOfRange {
                index: 64,
                capacity: 64
            })
        );
    }

    #[test]
    fn verify_catches_register_drift() {
        let sim = simulated();
        let remapper = RemapTableController::new(&sim, PLATFORM);
        remapper.install(113, 0x1_0000, 0x2000, 7).unwrap();
        remapper.enable(113).unwrap();
        assert_eq!(remapper.verify(), Ok(()));

        sim.corrupt_valid(3, 0);

        assert_eq!(
            remapper.verify(),
            Err(RemapError::StateMismatch {
                group: 3,
                expected: 1 << 17,
                actual: 0
            })
        );
    }

    #[test]
    fn driver_init_flushes_hardware() {
        let sim = simulated();
        sim.corrupt_valid(0, 0xFF);
        let remapper = RemapTableController::new(&sim, PLATFORM);

        assert_eq!(remapper.compatible(), "sifive,remapper2");
        assert_eq!(remapper.init(), Ok(()));
        assert_eq!(sim.read_valid(0), 0);
        assert_eq!(remapper.version(), 3);
    }
}
