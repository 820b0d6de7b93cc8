// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for chip8-headless

use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for chip8-headless
#[derive(Debug, Error)]
pub enum Error {
    /// Error originated in [chip8vm]
    #[error(transparent)]
    Machine(#[from] chip8vm::error::Error),
    /// Error originated in [sloggers]
    #[error("could not build logger: {0}")]
    Logger(#[from] sloggers::Error),
}
