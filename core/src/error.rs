use thiserror::Error;

/// Errors surfaced by the interpreter core.
///
/// Bad opcodes are deliberately absent: they are logged and skipped rather than returned.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Chip8Error {
    #[error("ROM is too large ({size} bytes), it must be at most {max} bytes")]
    RomTooLarge { size: usize, max: usize },
}
