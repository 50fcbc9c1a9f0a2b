use std::io;
use std::path::PathBuf;

use thiserror::Error;
use vip8_display::DisplayError;

#[derive(Error, Debug)]
pub enum FrontendError {
    /// Bad arguments, or a request for --help
    #[error(transparent)]
    Usage(#[from] clap::Error),
    #[error("unable to open {path:?}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("unable to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("sdl: {0}")]
    Sdl(String),
    #[error(transparent)]
    Display(#[from] DisplayError),
}

impl FrontendError {
    /// Process exit status for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            FrontendError::Open { .. } => 1,
            // 2 for bad arguments, 0 for --help
            FrontendError::Usage(e) => e.exit_code(),
            FrontendError::Read { .. } => 3,
            FrontendError::Sdl(_) | FrontendError::Display(_) => 4,
        }
    }
}
