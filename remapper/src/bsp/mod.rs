// SPDX-License-Identifier: MIT
//! Board support for the platforms the remapper is built into.

pub mod reference;
