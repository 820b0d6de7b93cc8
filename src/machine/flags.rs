//! Represents flags that aid in implementation but aren't a part of the Chip-8 instruction set

use super::Quirks;

/// Represents flags that aid in operation, but aren't inherent to the machine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flags {
    /// Set when debug (live disassembly) mode is enabled
    pub debug: bool,
    /// Set while `Fx0A` is waiting for a keypress
    #[cfg_attr(feature = "serde", serde(skip))]
    pub keypause: bool,
    /// Represents the set of emulator [Quirks] to enable
    pub quirks: Quirks,
}

impl Flags {
    /// Toggles debug mode
    ///
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut vm = Machine::new();
    /// assert_eq!(false, vm.flags.debug);
    /// // Toggle debug mode
    /// vm.flags.debug();
    /// assert_eq!(true, vm.flags.debug);
    /// ```
    pub fn debug(&mut self) {
        self.debug = !self.debug
    }
}
