// SPDX-License-Identifier: MIT
//! Walks the remapper through enable, disable, re-enable and flush on the simulated reference
//! platform, checking what a read of `rom_data` returns after each step.

use std::fmt;
use std::io::{self, Write as _};
use std::process::ExitCode;

use flow_remapper::bsp::reference::PLATFORM;
use flow_remapper::console::{self, interface::Write};
use flow_remapper::driver::interface::DeviceDriver;
use flow_remapper::driver::simulated::{SimWindow, SimulatedRemapper};
use flow_remapper::{RemapError, RemapTableController};

const ENTRY_IDX: usize = 113;

/// Where the 16-byte buffers sit inside their regions.
const ROM_DATA: u64 = PLATFORM.from_region_base() + 0x0000_3F10;
const RAM_DATA: u64 = PLATFORM.to_region_base() + 0x0000_1020;

type Remapper<'a> = RemapTableController<&'a SimulatedRemapper<4>>;

struct StdoutConsole;

impl Write for StdoutConsole {
    fn write_char(&self, c: char) {
        print!("{}", c);
    }

    fn write_fmt(&self, args: fmt::Arguments) -> fmt::Result {
        io::stdout().write_fmt(args).map_err(|_| fmt::Error)
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

static STDOUT_CONSOLE: StdoutConsole = StdoutConsole;

#[derive(Debug)]
enum DemoError {
    Remap(RemapError),
    Driver(&'static str),
    Unmapped(u64),
    Mismatch { index: usize, actual: u32, expected: u32 },
}

impl From<RemapError> for DemoError {
    fn from(err: RemapError) -> Self {
        Self::Remap(err)
    }
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Remap(err) => write!(f, "{}", err),
            Self::Driver(err) => write!(f, "driver init failed: {}", err),
            Self::Unmapped(address) => write!(f, "nothing backs address {:#x}", address),
            Self::Mismatch {
                index,
                actual,
                expected,
            } => write!(
                f,
                "rom_data[{}] = {}, correct value = {}",
                index, actual, expected
            ),
        }
    }
}

fn rom_data(sim: &SimulatedRemapper<4>) -> Result<[u32; 4], DemoError> {
    sim.read_words(ROM_DATA).ok_or(DemoError::Unmapped(ROM_DATA))
}

fn print_rom_data(sim: &SimulatedRemapper<4>) -> Result<(), DemoError> {
    for (i, word) in rom_data(sim)?.iter().enumerate() {
        println!("rom_data[{}] = {}", i, word);
    }
    Ok(())
}

fn valid_rom_data(sim: &SimulatedRemapper<4>, answers: [u32; 4]) -> Result<(), DemoError> {
    let words = rom_data(sim)?;
    match words.iter().zip(answers).position(|(word, answer)| *word != answer) {
        Some(index) => Err(DemoError::Mismatch {
            index,
            actual: words[index],
            expected: answers[index],
        }),
        None => Ok(()),
    }
}

fn print_remapper_valid(remapper: &Remapper<'_>, group: usize) {
    println!(
        "remappervalid[{}] = {:#010x}",
        group,
        remapper.validity().hardware_mask(group)
    );
}

fn run(sim: &SimulatedRemapper<4>) -> Result<(), DemoError> {
    println!("rom_data address: {:#010x}", ROM_DATA);
    println!("ram_data address: {:#010x}", RAM_DATA);

    let remapper = RemapTableController::new(sim, PLATFORM);
    remapper.init().map_err(DemoError::Driver)?;
    let valid_group = ENTRY_IDX / 32;

    // Remap ram_data onto rom_data, 16 bytes.
    remapper.install_region(ENTRY_IDX, ROM_DATA, RAM_DATA, 7)?;

    println!("Address Remapper version: {}", remapper.version());
    println!("Remap entry - From[]: {:#018x}", remapper.read_from(ENTRY_IDX)?);
    println!("Remap entry - To[]: {:#018x}", remapper.read_to(ENTRY_IDX)?);
    println!(
        "Remap rom_data to ram_data, remap size: {} bytes.",
        PLATFORM.size_classes().span(7).unwrap_or_default()
    );

    println!("Enable remap...");
    remapper.enable(ENTRY_IDX)?;
    print_rom_data(sim)?;
    valid_rom_data(sim, [5, 6, 7, 8])?;
    print_remapper_valid(&remapper, valid_group);
    println!();

    println!("Disable remap...");
    remapper.disable(ENTRY_IDX)?;
    print_rom_data(sim)?;
    valid_rom_data(sim, [1, 2, 3, 4])?;
    print_remapper_valid(&remapper, valid_group);
    println!();

    println!("Enable remap...");
    remapper.enable(ENTRY_IDX)?;
    print_rom_data(sim)?;
    valid_rom_data(sim, [5, 6, 7, 8])?;
    print_remapper_valid(&remapper, valid_group);
    println!();

    println!("Flush all remaps...");
    remapper.flush();
    print_rom_data(sim)?;
    valid_rom_data(sim, [1, 2, 3, 4])?;
    println!();

    for group in 0..remapper.validity().groups() {
        print_remapper_valid(&remapper, group);
    }
    remapper.verify()?;

    Ok(())
}

fn main() -> ExitCode {
    console::register_console(&STDOUT_CONSOLE);

    let sim = SimulatedRemapper::new(
        PLATFORM,
        1,
        SimWindow::new(ROM_DATA, [1, 2, 3, 4]),
        SimWindow::new(RAM_DATA, [5, 6, 7, 8]),
    );

    match run(&sim) {
        Ok(()) => {
            println!("End of example.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("{}", err);
            ExitCode::FAILURE
        }
    }
}
