use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use vip8_core::CLOCK_SPEED;

/// Command line configuration for the driver
#[derive(Parser, Debug, PartialEq)]
#[command(name = "vip8", about = "CHIP-8 interpreter with rewind and fast-forward.")]
pub struct Options {
    /// ROM image to load at 0x200.
    #[arg(value_name = "ROM")]
    pub rom: PathBuf,

    /// Seed for Cxnn; taken from the OS when absent.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Cycles per second (defaults to ~500Hz).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub hz: Option<u64>,
}

impl Options {
    /// Time budget for a single cycle
    pub fn cycle_time(&self) -> Duration {
        match self.hz {
            Some(hz) => Duration::from_nanos(1_000_000_000 / hz),
            None => Duration::from_nanos(CLOCK_SPEED),
        }
    }
}
