// SPDX-License-Identifier: MIT
use core::fmt::Arguments;

use crate::console::interface::Write;
use crate::sync::interface::Mutex;
use crate::sync::CriticalSectionLock;

pub mod interface {
    use core::fmt;

    /// A sink for the driver's log output.
    pub trait Write {
        fn write_char(&self, c: char);

        fn write_fmt(&self, args: fmt::Arguments) -> fmt::Result;

        fn flush(&self);
    }
}

struct NullConsole;

impl Write for NullConsole {
    fn write_char(&self, _c: char) {}

    fn write_fmt(&self, _args: Arguments) -> core::fmt::Result {
        Ok(())
    }

    fn flush(&self) {}
}

static NULL_CONSOLE: NullConsole = NullConsole;
static CUR_CONSOLE: CriticalSectionLock<&'static (dyn Write + Sync)> =
    CriticalSectionLock::new(&NULL_CONSOLE);

/// Return the currently registered console. Output is discarded until one is registered.
pub fn console() -> &'static (dyn Write + Sync) {
    CUR_CONSOLE.lock(|con| *con)
}

pub fn register_console(con: &'static (dyn Write + Sync)) {
    CUR_CONSOLE.lock(|cur| *cur = con);
}
