// SPDX-License-Identifier: MIT
//! Controller for the address remapper.
//!
//! The remapper holds a fixed table of entries, each redirecting accesses to a span of the
//! "from" region into the "to" region. [`RemapTableController`] owns the logical state of that
//! table and drives the hardware through an injected [`driver::interface::RemapRegisters`]
//! backend.
#![cfg_attr(not(test), no_std)]

#[doc(hidden)]
pub mod print;

pub mod bsp;
pub mod codec;
pub mod console;
pub mod controller;
pub mod driver;
pub mod error;
pub mod platform;
pub mod sync;
pub mod validity;

pub use codec::AddressCodec;
pub use controller::{RemapEntry, RemapTableController};
pub use error::RemapError;
pub use platform::{PlatformConfig, SizeClassTable};
pub use validity::ValidityReporter;
