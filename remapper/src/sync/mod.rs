// SPDX-License-Identifier: MIT
mod critical_section_lock;

pub mod interface;

pub use self::critical_section_lock::*;
