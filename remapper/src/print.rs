// SPDX-License-Identifier: MIT
use core::fmt;
use crate::console;

#[doc(hidden)]
pub fn kprint(args: fmt::Arguments) {
    let _ = console::console().write_fmt(args);
}

/// Prints an info, with a newline.
#[macro_export]
macro_rules! info {
    ($string:expr) => ({
        $crate::print::kprint(format_args!(concat!("[  remap] ", $string, "\n")));
    });
    ($format_string:expr, $($arg:tt)*) => ({
        $crate::print::kprint(format_args!(
            concat!("[  remap] ", $format_string, "\n"),
            $($arg)*
        ));
    })
}

/// Prints a warning, with a newline.
#[macro_export]
macro_rules! warn {
    ($string:expr) => ({
        $crate::print::kprint(format_args!(concat!("[W remap] ", $string, "\n")));
    });
    ($format_string:expr, $($arg:tt)*) => ({
        $crate::print::kprint(format_args!(
            concat!("[W remap] ", $format_string, "\n"),
            $($arg)*
        ));
    })
}
