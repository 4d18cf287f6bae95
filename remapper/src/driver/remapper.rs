// SPDX-License-Identifier: MIT
//! Remapper Driver - memory-mapped register window.

use tock_registers::{
    interfaces::{Readable, Writeable},
    register_bitfields, register_structs,
    registers::{ReadOnly, ReadWrite, WriteOnly},
};

use crate::driver::interface::RemapRegisters;
use crate::driver::MMIODerefWrapper;

//--------------------------------------------------------------------------------------------------
// Private Definitions
//--------------------------------------------------------------------------------------------------

register_bitfields! {
    u32,

    /// Flush Register
    FLUSH [
        Flush OFFSET(0) NUMBITS(1) []
    ],

    /// Write Key Register
    KEY [
        Key OFFSET(0) NUMBITS(24) [
            Unlock = 0x51_F15E
        ]
    ]
}

register_structs! {
    #[allow(non_snake_case)]
    pub EntryRegisterBlock {
        (0x00 => FROM: ReadWrite<u64>),
        (0x08 => TO: ReadWrite<u64>),
        (0x10 => @END),
    }
}

register_structs! {
    #[allow(non_snake_case)]
    pub RegisterBlock {
        (0x000 => VALID: [ReadWrite<u32>; 7]),
        (0x01C => _reserved1),
        (0x020 => FLUSH: WriteOnly<u32, FLUSH::Register>),
        (0x024 => _reserved2),
        (0x1F4 => VERSION: ReadOnly<u32>),
        (0x1F8 => ENTRIES: ReadOnly<u32>),
        (0x1FC => KEY: WriteOnly<u32, KEY::Register>),
        (0x200 => ENTRY: [EntryRegisterBlock; 224]),
        (0x1000 => @END),
    }
}

/// Abstraction for the associated MMIO registers.
type Registers = MMIODerefWrapper<RegisterBlock>;

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Representation of the remapper's register window.
pub struct MmioRemapper {
    registers: Registers,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl MmioRemapper {
    /// Create an instance.
    ///
    /// # Safety
    ///
    /// - The user must ensure to provide a correct MMIO start address.
    pub const unsafe fn new(mmio_start_addr: usize) -> Self {
        Self {
            registers: Registers::new(mmio_start_addr),
        }
    }

    /// Every write to the window must be preceded by the unlock key.
    fn unlock(&self) {
        self.registers.KEY.write(KEY::Key::Unlock);
    }
}

impl RemapRegisters for MmioRemapper {
    fn entries(&self) -> u32 {
        self.registers.ENTRIES.get()
    }

    fn version(&self) -> u32 {
        self.registers.VERSION.get()
    }

    fn read_from(&self, index: usize) -> u64 {
        self.registers.ENTRY[index].FROM.get()
    }

    fn write_from(&self, index: usize, value: u64) {
        self.unlock();
        self.registers.ENTRY[index].FROM.set(value);
    }

    fn read_to(&self, index: usize) -> u64 {
        self.registers.ENTRY[index].TO.get()
    }

    fn write_to(&self, index: usize, value: u64) {
        self.unlock();
        self.registers.ENTRY[index].TO.set(value);
    }

    fn read_valid(&self, group: usize) -> u32 {
        self.registers.VALID[group].get()
    }

    fn write_valid(&self, group: usize, mask: u32) {
        self.unlock();
        self.registers.VALID[group].set(mask);
    }

    fn flush(&self) {
        self.unlock();
        self.registers.FLUSH.write(FLUSH::Flush::SET);
    }
}
