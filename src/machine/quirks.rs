//! Controls the [Quirks] behavior of the [super::Machine] on a granular level.

/// Toggles behaviors on which historical Chip-8 interpreters disagree.
///
/// `false` everywhere is the behavior documented on [super::Machine::cycle].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quirks {
    /// Cosmac VIP: Shift ops in `8xy`(`6`, `E`) shift vY into vX, instead of shifting vX in place
    pub shift_vy: bool,
    /// Chip-48: DMA instructions `Fx55`/`Fx65` leave I alone, instead of setting it to I + x + 1
    pub dma_keep_index: bool,
    /// XO-Chip: Sprites wrap from right to left and bottom to top, instead of being clipped
    pub screen_wrap: bool,
}

impl Quirks {
    /// Quirks for programs written for Chip-48 and later interpreters
    ///
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let quirks = Quirks::chip48();
    /// assert!(quirks.dma_keep_index);
    /// assert!(!quirks.shift_vy);
    /// ```
    pub fn chip48() -> Self {
        Quirks {
            dma_keep_index: true,
            ..Default::default()
        }
    }

    /// Quirks matching the original Cosmac VIP interpreter
    pub fn vip() -> Self {
        Quirks {
            shift_vy: true,
            ..Default::default()
        }
    }
}
