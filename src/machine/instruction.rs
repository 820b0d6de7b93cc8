// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)
#![allow(clippy::bad_bit_mask)]
//! Contains the definition of a Chip-8 [Insn]
//!
//! Field names follow the nibble pattern in each opcode:
//! `A` is a 12-bit address, `B` an immediate byte, `x` and `y` register
//! indices, and `n` a 4-bit sprite height.

pub mod disassembler;

use imperative_rs::InstructionSet;
use std::fmt::Display;

#[allow(non_snake_case, missing_docs)]
#[derive(Clone, Copy, Debug, InstructionSet, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// The original 1977 Chip-8 instruction set, minus the `0nnn` machine-code call
pub enum Insn {
    /// | 00e0 | Clear the framebuffer
    #[opcode = "0x00e0"]
    Cls,
    /// | 00ee | Return from subroutine
    #[opcode = "0x00ee"]
    Ret,
    /// | 1aaa | Jump to an absolute address
    #[opcode = "0x1AAA"]
    Jp { A: u16 },
    /// | 2aaa | Push the return address, then jump to a
    #[opcode = "0x2AAA"]
    Call { A: u16 },
    /// | 3xbb | Skip next instruction if vX == b
    #[opcode = "0x3xBB"]
    SeByte { x: usize, B: u8 },
    /// | 4xbb | Skip next instruction if vX != b
    #[opcode = "0x4xBB"]
    SneByte { x: usize, B: u8 },
    /// | 5xy0 | Skip next instruction if vX == vY
    #[opcode = "0x5xy0"]
    SeReg { x: usize, y: usize },
    /// | 6xbb | vX = b
    #[opcode = "0x6xBB"]
    LdByte { x: usize, B: u8 },
    /// | 7xbb | vX += b, without touching vF
    #[opcode = "0x7xBB"]
    AddByte { x: usize, B: u8 },
    /// | 8xy0 | vX = vY
    #[opcode = "0x8xy0"]
    LdReg { x: usize, y: usize },
    /// | 8xy1 | vX |= vY
    #[opcode = "0x8xy1"]
    Or { x: usize, y: usize },
    /// | 8xy2 | vX &= vY
    #[opcode = "0x8xy2"]
    And { x: usize, y: usize },
    /// | 8xy3 | vX ^= vY
    #[opcode = "0x8xy3"]
    Xor { x: usize, y: usize },
    /// | 8xy4 | vX += vY, vF = carry
    #[opcode = "0x8xy4"]
    AddReg { x: usize, y: usize },
    /// | 8xy5 | vX -= vY, vF = !borrow
    #[opcode = "0x8xy5"]
    Sub { x: usize, y: usize },
    /// | 8xy6 | vX >>= 1, vF = bit shifted out
    #[opcode = "0x8xy6"]
    Shr { x: usize, y: usize },
    /// | 8xy7 | vX = vY - vX, vF = !borrow
    #[opcode = "0x8xy7"]
    Subn { x: usize, y: usize },
    /// | 8xyE | vX <<= 1, vF = bit shifted out
    #[opcode = "0x8xye"]
    Shl { x: usize, y: usize },
    /// | 9xy0 | Skip next instruction if vX != vY
    #[opcode = "0x9xy0"]
    SneReg { x: usize, y: usize },
    /// | Aaaa | I = a
    #[opcode = "0xaAAA"]
    LdI { A: u16 },
    /// | Baaa | Jump to a + v0
    #[opcode = "0xbAAA"]
    JpV0 { A: u16 },
    /// | Cxbb | vX = random byte & b
    #[opcode = "0xcxBB"]
    Rnd { x: usize, B: u8 },
    /// | Dxyn | Draw an n-byte sprite at (vX, vY), vF = collision
    #[opcode = "0xdxyn"]
    Drw { x: usize, y: usize, n: u8 },
    /// | Ex9E | Skip next instruction if key vX is held
    #[opcode = "0xex9e"]
    Skp { x: usize },
    /// | ExA1 | Skip next instruction if key vX is not held
    #[opcode = "0xexa1"]
    Sknp { x: usize },
    /// | Fx07 | vX = DT
    #[opcode = "0xfx07"]
    LdVxDt { x: usize },
    /// | Fx0A | Wait for a key, then vX = key
    #[opcode = "0xfx0a"]
    LdVxK { x: usize },
    /// | Fx15 | DT = vX
    #[opcode = "0xfx15"]
    LdDtVx { x: usize },
    /// | Fx18 | ST = vX
    #[opcode = "0xfx18"]
    LdStVx { x: usize },
    /// | Fx1E | I += vX, vF = address overflow
    #[opcode = "0xfx1e"]
    AddI { x: usize },
    /// | Fx29 | I = address of the font glyph for vX
    #[opcode = "0xfx29"]
    LdF { x: usize },
    /// | Fx33 | BCD convert vX into I[0..3]
    #[opcode = "0xfx33"]
    Bcd { x: usize },
    /// | Fx55 | Store v0..=vX at I
    #[opcode = "0xfx55"]
    StoreRegs { x: usize },
    /// | Fx65 | Load v0..=vX from I
    #[opcode = "0xfx65"]
    LoadRegs { x: usize },
}

impl Insn {
    /// Decodes a big-endian word, returning [None] when it isn't a Chip-8 instruction
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// assert_eq!(Some(Insn::Jp { A: 0x234 }), Insn::from_word(0x1234));
    /// assert_eq!(None, Insn::from_word(0x5121));
    /// ```
    pub fn from_word(word: u16) -> Option<Self> {
        Insn::decode(&word.to_be_bytes())
            .ok()
            .map(|(_, insn)| insn)
    }
}

impl Display for Insn {
    #[rustfmt::skip]
    #[allow(non_snake_case)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Insn::Cls              => write!(f, "CLS"),
            Insn::Ret              => write!(f, "RET"),
            Insn::Jp { A }         => write!(f, "JP   {A:#05x}"),
            Insn::Call { A }       => write!(f, "CALL {A:#05x}"),
            Insn::SeByte { x, B }  => write!(f, "SE   V{x:X}, {B:#04x}"),
            Insn::SneByte { x, B } => write!(f, "SNE  V{x:X}, {B:#04x}"),
            Insn::SeReg { x, y }   => write!(f, "SE   V{x:X}, V{y:X}"),
            Insn::LdByte { x, B }  => write!(f, "LD   V{x:X}, {B:#04x}"),
            Insn::AddByte { x, B } => write!(f, "ADD  V{x:X}, {B:#04x}"),
            Insn::LdReg { x, y }   => write!(f, "LD   V{x:X}, V{y:X}"),
            Insn::Or { x, y }      => write!(f, "OR   V{x:X}, V{y:X}"),
            Insn::And { x, y }     => write!(f, "AND  V{x:X}, V{y:X}"),
            Insn::Xor { x, y }     => write!(f, "XOR  V{x:X}, V{y:X}"),
            Insn::AddReg { x, y }  => write!(f, "ADD  V{x:X}, V{y:X}"),
            Insn::Sub { x, y }     => write!(f, "SUB  V{x:X}, V{y:X}"),
            Insn::Shr { x, y }     => write!(f, "SHR  V{x:X}, V{y:X}"),
            Insn::Subn { x, y }    => write!(f, "SUBN V{x:X}, V{y:X}"),
            Insn::Shl { x, y }     => write!(f, "SHL  V{x:X}, V{y:X}"),
            Insn::SneReg { x, y }  => write!(f, "SNE  V{x:X}, V{y:X}"),
            Insn::LdI { A }        => write!(f, "LD   I, {A:#05x}"),
            Insn::JpV0 { A }       => write!(f, "JP   V0, {A:#05x}"),
            Insn::Rnd { x, B }     => write!(f, "RND  V{x:X}, {B:#04x}"),
            Insn::Drw { x, y, n }  => write!(f, "DRW  V{x:X}, V{y:X}, {n:#x}"),
            Insn::Skp { x }        => write!(f, "SKP  V{x:X}"),
            Insn::Sknp { x }       => write!(f, "SKNP V{x:X}"),
            Insn::LdVxDt { x }     => write!(f, "LD   V{x:X}, DT"),
            Insn::LdVxK { x }      => write!(f, "LD   V{x:X}, K"),
            Insn::LdDtVx { x }     => write!(f, "LD   DT, V{x:X}"),
            Insn::LdStVx { x }     => write!(f, "LD   ST, V{x:X}"),
            Insn::AddI { x }       => write!(f, "ADD  I, V{x:X}"),
            Insn::LdF { x }        => write!(f, "LD   F, V{x:X}"),
            Insn::Bcd { x }        => write!(f, "LD   B, V{x:X}"),
            Insn::StoreRegs { x }  => write!(f, "LD   [I], V{x:X}"),
            Insn::LoadRegs { x }   => write!(f, "LD   V{x:X}, [I]"),
        }
    }
}
