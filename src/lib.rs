// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! This crate implements the original Chip-8 virtual machine: 4KB of memory,
//! sixteen 8-bit registers, a 16-entry call stack, a 64x32 monochrome
//! framebuffer, and two countdown timers.
//!
//! The [Machine] knows nothing about windows, keyboards, or speakers. A host
//! drives it by calling [Machine::cycle] at a fixed rate, feeds it key state with
//! [Machine::set_key], paints [Machine::buffer] whenever [Machine::draw] says so,
//! and registers an [AudioSink] to hear about beeps.
//!
//! ```rust
//! use chip8vm::*;
//! # fn main() -> Result<()> {
//! let mut vm = Machine::new();
//! vm.load_program_bytes(&[
//!     0x6a, 0x05, // LD  VA, 0x05
//!     0x6b, 0x03, // LD  VB, 0x03
//!     0x8a, 0xb4, // ADD VA, VB
//! ])?;
//! vm.multistep(3)?;
//! assert_eq!(8, vm.v()[0xa]);
//! assert_eq!(0, vm.v()[0xf]);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod machine;

/// Size of the addressable memory, in bytes
pub const MEMORY_SIZE: usize = 0x1000;
/// Where programs are loaded, and where execution starts
pub const PROGRAM_START: usize = 0x200;
/// The largest program that fits in memory
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START;
/// Where the built-in font lives
pub const FONT_START: usize = 0x000;
/// Width of the framebuffer, in pixels
pub const WIDTH: usize = 64;
/// Height of the framebuffer, in pixels
pub const HEIGHT: usize = 32;
/// Number of keys on the hexadecimal keypad
pub const KEY_COUNT: usize = 16;
/// Number of return addresses the stack can hold
pub const STACK_DEPTH: usize = 16;

pub use error::{Error, Result};
pub use machine::{
    audio::AudioSink,
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    quirks::Quirks,
    Machine, ScreenView,
};
