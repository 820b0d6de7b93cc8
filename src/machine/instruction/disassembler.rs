// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! A disassembler for Chip-8 opcodes
use super::Insn;
use owo_colors::{OwoColorize, Style};

/// Disassembles Chip-8 instructions
pub trait Disassembler {
    /// Disassemble a single instruction
    fn once(&self, insn: u16) -> String;
}

/// Disassembles Chip-8 instructions, printing them in the provided [owo_colors::Style]s
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dis {
    /// Styles words which don't decode
    pub invalid: Style,
    /// Styles valid instructions
    pub normal: Style,
}

impl Default for Dis {
    fn default() -> Self {
        Self {
            invalid: Style::new().bold().red(),
            normal: Style::new().green(),
        }
    }
}

impl Disassembler for Dis {
    fn once(&self, insn: u16) -> String {
        match Insn::from_word(insn) {
            Some(insn) => format!("{}", insn.style(self.normal)),
            None => format!("{}", format_args!("???  {insn:04x}").style(self.invalid)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid() {
        let dis = Dis::default();
        assert!(dis.once(0x632a).contains("LD   V3, 0x2a"));
        assert!(dis.once(0xd125).contains("DRW  V1, V2, 0x5"));
    }

    #[test]
    fn invalid() {
        let dis = Dis::default();
        assert!(dis.once(0x0123).contains("???  0123"));
        assert!(dis.once(0xf0ff).contains("???  f0ff"));
    }
}
