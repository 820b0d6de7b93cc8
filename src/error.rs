// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for chip8vm

use std::path::PathBuf;
use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for chip8vm.
#[derive(Debug, Error)]
pub enum Error {
    /// The program does not fit between 0x200 and the end of memory
    #[error("program is {size} bytes, but only {max} bytes fit in program memory")]
    ProgramTooLarge {
        /// The size of the offending program
        size: usize,
        /// The largest program that can be loaded
        max: usize,
    },
    /// The program file does not exist
    #[error("program file {path:?} not found")]
    FileNotFound {
        /// The path that was asked for
        path: PathBuf,
    },
    /// The program file exists, but could not be read
    #[error("program file {path:?} could not be read: {source}")]
    FileUnreadable {
        /// The path that was asked for
        path: PathBuf,
        /// The underlying I/O failure
        source: std::io::Error,
    },
    /// A subroutine call was made with every stack slot in use
    #[error("stack overflow: call at {pc:03x} with a full stack")]
    StackOverflow {
        /// The address of the offending call
        pc: u16,
    },
    /// A return was made with nothing on the stack
    #[error("stack underflow: return at {pc:03x} with an empty stack")]
    StackUnderflow {
        /// The address of the offending return
        pc: u16,
    },
    /// Tried to press a key that doesn't exist
    #[error("tried to press key {key:X} which does not exist")]
    InvalidKey {
        /// The offending key
        key: usize,
    },
    /// Tried to get/set an out-of-bounds register
    #[error("tried to access register v{reg:X} which does not exist")]
    InvalidRegister {
        /// The offending register
        reg: usize,
    },
}

impl Error {
    /// Wraps an I/O failure that happened while reading the program at `path`
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Error::FileNotFound { path },
            _ => Error::FileUnreadable { path, source },
        }
    }
}
