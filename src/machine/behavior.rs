// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Contains implementations for each Chip-8 [Insn]
//!
//! By the time an instruction executes, pc already points at the next one.

use super::*;
use rand::random;

impl Machine {
    /// Executes a single [Insn]
    #[rustfmt::skip]
    #[allow(non_snake_case)]
    #[inline(always)]
    pub(super) fn execute(&mut self, instruction: Insn) -> Result<()> {
        match instruction {
            Insn::Cls                  => self.clear_screen(),
            Insn::Ret                  => self.ret()?,
            Insn::Jp        {       A } => self.jump(A),
            Insn::Call      {       A } => self.call(A)?,
            Insn::SeByte    { x,    B } => self.skip_equals_immediate(x, B),
            Insn::SneByte   { x,    B } => self.skip_not_equals_immediate(x, B),
            Insn::SeReg     { x, y    } => self.skip_equals(x, y),
            Insn::LdByte    { x,    B } => self.load_immediate(x, B),
            Insn::AddByte   { x,    B } => self.add_immediate(x, B),
            Insn::LdReg     { x, y    } => self.load(x, y),
            Insn::Or        { x, y    } => self.or(x, y),
            Insn::And       { x, y    } => self.and(x, y),
            Insn::Xor       { x, y    } => self.xor(x, y),
            Insn::AddReg    { x, y    } => self.add(x, y),
            Insn::Sub       { x, y    } => self.sub(x, y),
            Insn::Shr       { x, y    } => self.shift_right(x, y),
            Insn::Subn      { x, y    } => self.backwards_sub(x, y),
            Insn::Shl       { x, y    } => self.shift_left(x, y),
            Insn::SneReg    { x, y    } => self.skip_not_equals(x, y),
            Insn::LdI       {       A } => self.load_i_immediate(A),
            Insn::JpV0      {       A } => self.jump_indexed(A),
            Insn::Rnd       { x,    B } => self.rand(x, B),
            Insn::Drw       { x, y, n } => self.draw_sprite(x, y, n),
            Insn::Skp       { x       } => self.skip_key_equals(x),
            Insn::Sknp      { x       } => self.skip_key_not_equals(x),
            Insn::LdVxDt    { x       } => self.load_delay_timer(x),
            Insn::LdVxK     { x       } => self.wait_for_key(x),
            Insn::LdDtVx    { x       } => self.store_delay_timer(x),
            Insn::LdStVx    { x       } => self.store_sound_timer(x),
            Insn::AddI      { x       } => self.add_i(x),
            Insn::LdF       { x       } => self.load_sprite(x),
            Insn::Bcd       { x       } => self.bcd_convert(x),
            Insn::StoreRegs { x       } => self.store_dma(x),
            Insn::LoadRegs  { x       } => self.load_dma(x),
        }
        Ok(())
    }
}

/// |`00nn`| System instructions
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`00e0`| Clear the framebuffer to all 0     |
/// |`00ee`| Return from subroutine             |
impl Machine {
    /// |`00e0`| Clears the framebuffer to 0, and requests a redraw
    #[inline(always)]
    pub(super) fn clear_screen(&mut self) {
        self.screen.fill(0);
        self.redraw = true;
    }
    /// |`00ee`| Returns from subroutine
    ///
    /// Fails with [Error::StackUnderflow] when there's nothing to return to
    #[inline(always)]
    pub(super) fn ret(&mut self) -> Result<()> {
        if self.sp == 0 {
            return Err(Error::StackUnderflow {
                pc: self.pc.wrapping_sub(2),
            });
        }
        self.sp -= 1;
        self.pc = self.stack[self.sp];
        Ok(())
    }
}

/// |`1aaa`| Sets pc to an absolute address
impl Machine {
    /// |`1aaa`| Sets the program counter to an absolute address
    #[inline(always)]
    pub(super) fn jump(&mut self, a: Adr) {
        self.pc = a;
    }
}

/// |`2aaa`| Pushes pc onto the stack, then jumps to a
impl Machine {
    /// |`2aaa`| Pushes the return address onto the stack, then jumps to a
    ///
    /// Fails with [Error::StackOverflow] when all 16 slots are in use
    #[inline(always)]
    pub(super) fn call(&mut self, a: Adr) -> Result<()> {
        let Some(slot) = self.stack.get_mut(self.sp) else {
            return Err(Error::StackOverflow {
                pc: self.pc.wrapping_sub(2),
            });
        };
        *slot = self.pc;
        self.sp += 1;
        self.pc = a;
        Ok(())
    }
}

/// |`3xbb`| Skips next instruction if register X == b
impl Machine {
    /// |`3xbb`| Skips the next instruction if register X == b
    #[inline(always)]
    pub(super) fn skip_equals_immediate(&mut self, x: Reg, b: u8) {
        if self.v[x] == b {
            self.pc = self.pc.wrapping_add(2);
        }
    }
}

/// |`4xbb`| Skips next instruction if register X != b
impl Machine {
    /// |`4xbb`| Skips the next instruction if register X != b
    #[inline(always)]
    pub(super) fn skip_not_equals_immediate(&mut self, x: Reg, b: u8) {
        if self.v[x] != b {
            self.pc = self.pc.wrapping_add(2);
        }
    }
}

/// |`5xy0`| Skips next instruction if register X == register Y
impl Machine {
    /// |`5xy0`| Skips the next instruction if register X == register Y
    #[inline(always)]
    pub(super) fn skip_equals(&mut self, x: Reg, y: Reg) {
        if self.v[x] == self.v[y] {
            self.pc = self.pc.wrapping_add(2);
        }
    }
}

/// |`6xbb`| Loads immediate byte b into register vX
impl Machine {
    /// |`6xbb`| Loads immediate byte b into register vX
    #[inline(always)]
    pub(super) fn load_immediate(&mut self, x: Reg, b: u8) {
        self.v[x] = b;
    }
}

/// |`7xbb`| Adds immediate byte b to register vX
impl Machine {
    /// |`7xbb`| Adds immediate byte b to register vX. Never touches vF.
    #[inline(always)]
    pub(super) fn add_immediate(&mut self, x: Reg, b: u8) {
        self.v[x] = self.v[x].wrapping_add(b);
    }
}

/// |`8xyn`| Performs ALU operation
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`8xy0`| X = Y                              |
/// |`8xy1`| X = X | Y                          |
/// |`8xy2`| X = X & Y                          |
/// |`8xy3`| X = X ^ Y                          |
/// |`8xy4`| X = X + Y; Set vF=carry            |
/// |`8xy5`| X = X - Y; Set vF=!borrow          |
/// |`8xy6`| X = X >> 1; Set vF=shifted bit     |
/// |`8xy7`| X = Y - X; Set vF=!borrow          |
/// |`8xyE`| X = X << 1; Set vF=shifted bit     |
///
/// vF is written last, so when X is vF the flag wins.
impl Machine {
    /// |`8xy0`| Loads the value of y into x
    #[inline(always)]
    pub(super) fn load(&mut self, x: Reg, y: Reg) {
        self.v[x] = self.v[y];
    }
    /// |`8xy1`| Performs bitwise or of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn or(&mut self, x: Reg, y: Reg) {
        self.v[x] |= self.v[y];
    }
    /// |`8xy2`| Performs bitwise and of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn and(&mut self, x: Reg, y: Reg) {
        self.v[x] &= self.v[y];
    }
    /// |`8xy3`| Performs bitwise xor of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn xor(&mut self, x: Reg, y: Reg) {
        self.v[x] ^= self.v[y];
    }
    /// |`8xy4`| Performs addition of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn add(&mut self, x: Reg, y: Reg) {
        let carry;
        (self.v[x], carry) = self.v[x].overflowing_add(self.v[y]);
        self.v[0xf] = carry.into();
    }
    /// |`8xy5`| Performs subtraction of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn sub(&mut self, x: Reg, y: Reg) {
        let borrow;
        (self.v[x], borrow) = self.v[x].overflowing_sub(self.v[y]);
        self.v[0xf] = (!borrow).into();
    }
    /// |`8xy6`| Performs bitwise right shift of vX
    ///
    /// # Quirk
    /// On the Cosmac VIP, this shifts vY and stores the result in vX
    #[inline(always)]
    pub(super) fn shift_right(&mut self, x: Reg, y: Reg) {
        let src: Reg = if self.flags.quirks.shift_vy { y } else { x };
        let shift_out = self.v[src] & 1;
        self.v[x] = self.v[src] >> 1;
        self.v[0xf] = shift_out;
    }
    /// |`8xy7`| Performs subtraction of vY and vX, and stores the result in vX
    #[inline(always)]
    pub(super) fn backwards_sub(&mut self, x: Reg, y: Reg) {
        let borrow;
        (self.v[x], borrow) = self.v[y].overflowing_sub(self.v[x]);
        self.v[0xf] = (!borrow).into();
    }
    /// |`8xyE`| Performs bitwise left shift of vX
    ///
    /// # Quirk
    /// On the Cosmac VIP, this shifts vY and stores the result in vX
    #[inline(always)]
    pub(super) fn shift_left(&mut self, x: Reg, y: Reg) {
        let src: Reg = if self.flags.quirks.shift_vy { y } else { x };
        let shift_out: u8 = self.v[src] >> 7;
        self.v[x] = self.v[src] << 1;
        self.v[0xf] = shift_out;
    }
}

/// |`9xy0`| Skips next instruction if register X != register Y
impl Machine {
    /// |`9xy0`| Skip next instruction if X != y
    #[inline(always)]
    pub(super) fn skip_not_equals(&mut self, x: Reg, y: Reg) {
        if self.v[x] != self.v[y] {
            self.pc = self.pc.wrapping_add(2);
        }
    }
}

/// |`Aaaa`| Load address #a into register I
impl Machine {
    /// |`Aadr`| Load address #adr into register I
    #[inline(always)]
    pub(super) fn load_i_immediate(&mut self, a: Adr) {
        self.i = a;
    }
}

/// |`Baaa`| Jump to &adr + v0
impl Machine {
    /// |`Badr`| Jump to &adr + v0
    #[inline(always)]
    pub(super) fn jump_indexed(&mut self, a: Adr) {
        self.pc = a.wrapping_add(self.v[0] as Adr);
    }
}

/// |`Cxbb`| Stores a random number & the provided byte into vX
impl Machine {
    /// |`Cxbb`| Stores a random number & the provided byte into vX
    #[inline(always)]
    pub(super) fn rand(&mut self, x: Reg, b: u8) {
        self.v[x] = random::<u8>() & b;
    }
}

/// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
impl Machine {
    /// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
    ///
    /// The origin wraps around the screen. Pixels which run off the right or
    /// bottom edge are clipped.
    ///
    /// # Quirk
    /// On the XO-Chip, pixels which run off the edge wrap around instead
    #[inline(always)]
    pub(super) fn draw_sprite(&mut self, x: Reg, y: Reg, n: Nib) {
        let (x, y) = (self.v[x] as usize % WIDTH, self.v[y] as usize % HEIGHT);
        let wrap = self.flags.quirks.screen_wrap;
        let mut collision = false;
        for line in 0..n as usize {
            let sprite = self.read(self.i.wrapping_add(line as Adr));
            let row = match y + line {
                row if row < HEIGHT => row,
                row if wrap => row % HEIGHT,
                _ => break,
            };
            for bit in 0..8 {
                if sprite & (0x80 >> bit) == 0 {
                    continue;
                }
                let col = match x + bit {
                    col if col < WIDTH => col,
                    col if wrap => col % WIDTH,
                    _ => break,
                };
                let pixel = &mut self.screen[row * WIDTH + col];
                collision |= *pixel != 0;
                *pixel ^= 1;
            }
        }
        self.v[0xf] = collision.into();
        self.redraw = true;
    }
}

/// |`Exbb`| Skips instruction on value of keypress
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`eX9e`| Skip next instruction if key vX is held     |
/// |`eXa1`| Skip next instruction if key vX is not held |
impl Machine {
    /// |`Ex9E`| Skip next instruction if key vX is held
    #[inline(always)]
    pub(super) fn skip_key_equals(&mut self, x: Reg) {
        if self.keys[self.v[x] as usize & 0xf] {
            self.pc = self.pc.wrapping_add(2);
        }
    }
    /// |`ExA1`| Skip next instruction if key vX is not held
    #[inline(always)]
    pub(super) fn skip_key_not_equals(&mut self, x: Reg) {
        if !self.keys[self.v[x] as usize & 0xf] {
            self.pc = self.pc.wrapping_add(2);
        }
    }
}

/// |`Fxbb`| Performs IO
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`fX07`| Set vX to value in delay timer     |
/// |`fX0a`| Wait for input, store key in vX    |
/// |`fX15`| Set delay timer to the value in vX |
/// |`fX18`| Set sound timer to the value in vX |
/// |`fX1e`| Add vX to I                        |
/// |`fX29`| Load sprite for character x into I |
/// |`fX33`| BCD convert X into I[0..3]         |
/// |`fX55`| DMA Stor from I to registers 0..=X |
/// |`fX65`| DMA Load from I to registers 0..=X |
impl Machine {
    /// |`Fx07`| Get the current DT, and put it in vX
    /// ```py
    /// vX = DT
    /// ```
    #[inline(always)]
    pub(super) fn load_delay_timer(&mut self, x: Reg) {
        self.v[x] = self.delay;
    }
    /// |`Fx0A`| Wait for key, then vX = K
    ///
    /// Waiting re-runs this instruction every cycle until a key is held.
    /// The lowest-numbered held key wins.
    #[inline(always)]
    pub(super) fn wait_for_key(&mut self, x: Reg) {
        if let Some(key) = self.keys.iter().position(|&held| held) {
            self.v[x] = key as u8;
            self.flags.keypause = false;
        } else {
            self.pc = self.pc.wrapping_sub(2);
            self.flags.keypause = true;
        }
    }
    /// |`Fx15`| Load vX into DT
    /// ```py
    /// DT = vX
    /// ```
    #[inline(always)]
    pub(super) fn store_delay_timer(&mut self, x: Reg) {
        self.delay = self.v[x];
    }
    /// |`Fx18`| Load vX into ST
    /// ```py
    /// ST = vX;
    /// ```
    #[inline(always)]
    pub(super) fn store_sound_timer(&mut self, x: Reg) {
        self.sound = self.v[x];
    }
    /// |`Fx1e`| Add vX to I, and set vF if I leaves the address space
    /// ```py
    /// I += vX;
    /// ```
    #[inline(always)]
    pub(super) fn add_i(&mut self, x: Reg) {
        let sum = (self.i & ADDR_MASK) + self.v[x] as Adr;
        self.i = sum & ADDR_MASK;
        self.v[0xf] = (sum > ADDR_MASK).into();
    }
    /// |`Fx29`| Load sprite for character x into I
    /// ```py
    /// I = sprite(X);
    /// ```
    #[inline(always)]
    pub(super) fn load_sprite(&mut self, x: Reg) {
        self.i = FONT_START as Adr + self.v[x] as Adr * font::GLYPH_SIZE as Adr;
    }
    /// |`Fx33`| BCD convert X into I`[0..3]`
    #[inline(always)]
    pub(super) fn bcd_convert(&mut self, x: Reg) {
        let x = self.v[x];
        self.write(self.i, x / 100 % 10);
        self.write(self.i.wrapping_add(1), x / 10 % 10);
        self.write(self.i.wrapping_add(2), x % 10);
    }
    /// |`Fx55`| DMA Stor from I to registers 0..=X
    ///
    /// # Quirk
    /// The original chip-8 interpreter uses I to directly index memory,
    /// with the side effect of leaving I as I+X+1 after the transfer is done.
    /// Chip-48 leaves I alone.
    #[inline(always)]
    pub(super) fn store_dma(&mut self, x: Reg) {
        for reg in 0..=x {
            self.write(self.i.wrapping_add(reg as Adr), self.v[reg]);
        }
        self.advance_dma_index(x);
    }
    /// |`Fx65`| DMA Load from I to registers 0..=X
    ///
    /// # Quirk
    /// See [Machine::store_dma]
    #[inline(always)]
    pub(super) fn load_dma(&mut self, x: Reg) {
        for reg in 0..=x {
            self.v[reg] = self.read(self.i.wrapping_add(reg as Adr));
        }
        self.advance_dma_index(x);
    }
    #[inline(always)]
    fn advance_dma_index(&mut self, x: Reg) {
        if !self.flags.quirks.dma_keep_index {
            self.i = self.i.wrapping_add(x as Adr + 1) & ADDR_MASK;
        }
    }
}
