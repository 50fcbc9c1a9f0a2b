use std::fs::File;
use std::io::Read;
use std::process;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use vip8_core::Chip8;

mod error;
mod keymap;
mod options;
mod run;

use error::FrontendError;
use options::Options;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match start() {
        Ok(()) => {}
        // clap prints its own usage/help text and exits with the matching status
        Err(FrontendError::Usage(usage)) => usage.exit(),
        Err(e) => {
            error!("{}", e);
            process::exit(e.exit_code());
        }
    }
}

fn start() -> Result<(), FrontendError> {
    let options = Options::try_parse()?;

    let mut chip8 = match options.seed {
        Some(seed) => Chip8::with_seed(seed),
        None => Chip8::new(),
    };

    // Load ROM
    let rom = read_rom(&options)?;
    match chip8.load_rom(&rom) {
        Ok(()) => info!("successfully loaded {:?} ({} bytes)", options.rom, rom.len()),
        Err(e) => warn!("{} but continuing execution", e),
    };

    run::run(chip8, &options)
}

fn read_rom(options: &Options) -> Result<Vec<u8>, FrontendError> {
    let path = &options.rom;
    let mut file = File::open(path).map_err(|source| FrontendError::Open {
        path: path.clone(),
        source,
    })?;
    let mut rom = Vec::new();
    file.read_to_end(&mut rom)
        .map_err(|source| FrontendError::Read {
            path: path.clone(),
            source,
        })?;
    Ok(rom)
}
