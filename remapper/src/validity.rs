// SPDX-License-Identifier: MIT
//! Per-group view of which entries are enabled.

use crate::controller::{RemapTable, RemapTableController};
use crate::driver::interface::RemapRegisters;
use crate::driver::{group_bit, ENTRIES_PER_GROUP, MAX_GROUPS};
use crate::sync::interface::ReadWriteEx;

/// Read-only validity queries against a controller.
pub struct ValidityReporter<'a, R> {
    controller: &'a RemapTableController<R>,
}

impl<'a, R> ValidityReporter<'a, R>
where
    R: RemapRegisters,
{
    pub(crate) fn new(controller: &'a RemapTableController<R>) -> Self {
        Self { controller }
    }

    /// Number of groups covering the controller's capacity.
    pub fn groups(&self) -> usize {
        self.controller.capacity().div_ceil(ENTRIES_PER_GROUP)
    }

    /// Bit `k` is set iff entry `32 * group + k` is installed and enabled.
    pub fn group_mask(&self, group: usize) -> u32 {
        let capacity = self.controller.capacity();

        self.controller
            .table
            .read(|table| group_mask(table, capacity, group))
    }

    /// The group's valid register as the hardware reports it.
    pub fn hardware_mask(&self, group: usize) -> u32 {
        if group >= self.groups() {
            return 0;
        }

        self.controller.registers().read_valid(group)
    }

    /// Every group's mask, taken under one lock. Groups past capacity read as zero.
    pub fn masks(&self) -> [u32; MAX_GROUPS] {
        let capacity = self.controller.capacity();

        self.controller.table.read(|table| {
            let mut masks = [0; MAX_GROUPS];
            for (group, mask) in masks.iter_mut().enumerate() {
                *mask = group_mask(table, capacity, group);
            }
            masks
        })
    }

    pub fn enabled_count(&self) -> u32 {
        self.masks().iter().map(|mask| mask.count_ones()).sum()
    }
}

pub(crate) fn group_mask(table: &RemapTable, capacity: usize, group: usize) -> u32 {
    let first = group.saturating_mul(ENTRIES_PER_GROUP);
    let end = first.saturating_add(ENTRIES_PER_GROUP).min(capacity);

    (first..end)
        .filter_map(|index| table.get(index))
        .filter(|entry| entry.is_enabled())
        .fold(0, |mask, entry| mask | group_bit(entry.index()).1)
}
