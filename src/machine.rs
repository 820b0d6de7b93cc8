// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions


pub mod audio;
pub mod behavior;
pub mod flags;
pub mod font;
pub mod instruction;
pub mod quirks;

use self::{
    audio::AudioSink,
    flags::Flags,
    font::FONT,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    quirks::Quirks,
};
use crate::{
    error::{Error, Result},
    FONT_START, HEIGHT, KEY_COUNT, MAX_PROGRAM_SIZE, MEMORY_SIZE, PROGRAM_START, STACK_DEPTH,
    WIDTH,
};
use slog::{debug, info, o, warn, Discard, Logger};
use std::fmt::{Debug, Display, Formatter};

type Reg = usize;
type Adr = u16;
type Nib = u8;

/// Every address the machine touches is reduced to 12 bits
const ADDR_MASK: Adr = 0xfff;

/// Represents the entire state of a Chip-8 virtual machine
pub struct Machine {
    /// Flags that control how the machine behaves, but which aren't inherent to the
    /// chip-8. Includes [Quirks] and live disassembly.
    pub flags: Flags,
    // memory
    memory: [u8; MEMORY_SIZE],
    stack: [Adr; STACK_DEPTH],
    sp: usize,
    // registers
    pc: Adr,
    i: Adr,
    v: [u8; 16],
    delay: u8,
    sound: u8,
    // I/O
    screen: [u8; WIDTH * HEIGHT],
    redraw: bool,
    keys: [bool; KEY_COUNT],
    beeper: Box<dyn AudioSink>,
    // Execution data
    cycle: usize,
    disassembler: Dis,
    log: Logger,
}

// public interface
impl Machine {
    /// Constructs a freshly initialized machine: zeroed state, the font at
    /// [FONT_START], pc at [PROGRAM_START], and a pending redraw so the host
    /// paints the blank screen once.
    ///
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut vm = Machine::new();
    /// assert_eq!(0x200, vm.pc());
    /// assert!(vm.draw());
    /// assert!(!vm.draw());
    /// ```
    pub fn new() -> Self {
        Self::with_logger(Logger::root(Discard, o!()))
    }

    /// Constructs a new machine which reports to the provided [Logger]
    pub fn with_logger(log: Logger) -> Self {
        let mut memory = [0; MEMORY_SIZE];
        memory[FONT_START..FONT_START + FONT.len()].copy_from_slice(&FONT);
        Machine {
            flags: Flags::default(),
            memory,
            stack: [0; STACK_DEPTH],
            sp: 0,
            pc: PROGRAM_START as Adr,
            i: 0,
            v: [0; 16],
            delay: 0,
            sound: 0,
            screen: [0; WIDTH * HEIGHT],
            redraw: true,
            keys: [false; KEY_COUNT],
            beeper: Box::new(|| {}),
            cycle: 0,
            disassembler: Dis::default(),
            log,
        }
    }

    /// Replaces the machine's [Quirks]
    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.flags.quirks = quirks;
        self
    }

    /// Loads a program file into the machine's program space
    ///
    /// Returns [Error::FileNotFound] or [Error::FileUnreadable] if the file
    /// can't be read, and [Error::ProgramTooLarge] if it doesn't fit.
    pub fn load_program(&mut self, rom: impl AsRef<std::path::Path>) -> Result<&mut Self> {
        let rom = rom.as_ref();
        let bytes = std::fs::read(rom).map_err(|e| Error::from_io(rom, e))?;
        self.load_program_bytes(&bytes)
    }

    /// Copies a program into memory at [PROGRAM_START], touching nothing else
    ///
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut vm = Machine::new();
    /// vm.load_program_bytes(&[0x00, 0xe0]).unwrap();
    /// assert_eq!(&[0x00, 0xe0], &vm.memory()[0x200..0x202]);
    ///
    /// let too_big = vec![0; MAX_PROGRAM_SIZE + 1];
    /// assert!(vm.load_program_bytes(&too_big).is_err());
    /// ```
    pub fn load_program_bytes(&mut self, rom: &[u8]) -> Result<&mut Self> {
        if rom.len() > MAX_PROGRAM_SIZE {
            return Err(Error::ProgramTooLarge {
                size: rom.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        self.memory[PROGRAM_START..PROGRAM_START + rom.len()].copy_from_slice(rom);
        info!(self.log, "loaded program"; "size" => rom.len());
        Ok(self)
    }

    /// Registers the [AudioSink] to notify when the sound timer runs out.
    /// Replaces any previously registered sink.
    pub fn on_beep(&mut self, sink: impl AudioSink + 'static) -> &mut Self {
        self.beeper = Box::new(sink);
        self
    }

    /// Presses or releases a key, and reports whether the key's state changed.
    /// If key is outside range `0..=0xF`, returns [Error::InvalidKey].
    ///
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut vm = Machine::new();
    /// // press key `7`
    /// assert!(vm.set_key(0x7, true).unwrap());
    /// // it was already pressed, so nothing's changed.
    /// assert!(!vm.set_key(0x7, true).unwrap());
    /// // there is no key `10`
    /// assert!(vm.set_key(0x10, true).is_err());
    /// ```
    pub fn set_key(&mut self, key: usize, pressed: bool) -> Result<bool> {
        let keyref = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        let changed = *keyref != pressed;
        *keyref = pressed;
        Ok(changed)
    }

    /// Gets the state of every key on the keypad
    pub fn keys(&self) -> &[bool] {
        self.keys.as_slice()
    }

    /// Reports whether the framebuffer changed since the last call, and
    /// clears the report.
    pub fn draw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    /// Gets the framebuffer: [WIDTH] * [HEIGHT] pixels, row-major, each 0 or 1.
    ///
    /// Does not touch the pending redraw.
    pub fn buffer(&self) -> &[u8] {
        self.screen.as_slice()
    }

    /// Gets a view of the framebuffer which implements [Display]
    pub fn screen(&self) -> ScreenView<'_> {
        ScreenView(self.buffer())
    }

    /// Sets a general purpose register.
    /// If the register doesn't exist, returns [Error::InvalidRegister]
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut vm = Machine::new();
    /// vm.set_v(0x0, 0x41).unwrap();
    /// assert_eq!(
    ///     vm.v(),
    ///     [0x41, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
    /// );
    /// assert!(vm.set_v(0x10, 0).is_err());
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) -> Result<()> {
        let gpr = self.v.get_mut(reg).ok_or(Error::InvalidRegister { reg })?;
        *gpr = value;
        Ok(())
    }

    /// Gets a slice of the entire general purpose registers
    pub fn v(&self) -> &[u8] {
        self.v.as_slice()
    }

    /// Gets the program counter
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// Gets the I register
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Gets the stack pointer, which is also the number of return addresses on the stack
    pub fn sp(&self) -> usize {
        self.sp
    }

    /// Gets the return addresses on the stack, oldest first
    pub fn stack(&self) -> &[Adr] {
        &self.stack[..self.sp]
    }

    /// Gets the value in the Delay Timer register
    pub fn delay(&self) -> u8 {
        self.delay
    }

    /// Gets the value in the Sound Timer register
    pub fn sound(&self) -> u8 {
        self.sound
    }

    /// Gets the entire 4KB memory
    pub fn memory(&self) -> &[u8] {
        self.memory.as_slice()
    }

    /// Gets the number of cycles the machine has executed
    pub fn cycle_count(&self) -> usize {
        self.cycle
    }

    /// Resets the machine to its freshly-constructed state, keeping memory,
    /// [Flags::debug], [Quirks], the audio sink and the logger.
    ///
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut vm = Machine::new();
    /// vm.load_program_bytes(&[0x60, 0x2a]).unwrap();
    /// vm.cycle().unwrap();
    /// assert_eq!(0x2a, vm.v()[0]);
    /// vm.reset();
    /// assert_eq!(0, vm.v()[0]);
    /// assert_eq!(0x200, vm.pc());
    /// assert_eq!(&[0x60, 0x2a], &vm.memory()[0x200..0x202]);
    /// ```
    pub fn reset(&mut self) {
        self.flags.keypause = false;
        self.stack = [0; STACK_DEPTH];
        self.sp = 0;
        self.pc = PROGRAM_START as Adr;
        self.i = 0;
        self.v = [0; 16];
        self.delay = 0;
        self.sound = 0;
        self.screen = [0; WIDTH * HEIGHT];
        self.redraw = true;
        self.keys = [false; KEY_COUNT];
        self.cycle = 0;
    }

    /// Runs `steps` cycles, stopping at the first error
    pub fn multistep(&mut self, steps: usize) -> Result<&mut Self> {
        for _ in 0..steps {
            self.cycle()?;
        }
        Ok(self)
    }

    /// Executes a single instruction, then ticks both timers
    ///
    /// Words which aren't instructions are logged and skipped.
    ///
    /// Returns [Error::StackOverflow] or [Error::StackUnderflow] if a call or
    /// return doesn't fit the stack. A failed cycle leaves the machine untouched.
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut vm = Machine::new();
    /// vm.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// vm.cycle()
    ///     .expect("0x00e0 (cls) should be a valid opcode.");
    /// assert_eq!(0x202, vm.pc());
    /// assert_eq!(1, vm.cycle_count());
    /// ```
    pub fn cycle(&mut self) -> Result<&mut Self> {
        let pc = self.pc;
        // fetch opcode
        let word = u16::from_be_bytes([self.read(pc), self.read(pc.wrapping_add(1))]);

        // Print opcode disassembly:
        if self.flags.debug {
            debug!(
                self.log,
                "{:03x}: {}",
                pc & ADDR_MASK,
                self.disassembler.once(word);
                "cycle" => self.cycle + 1
            );
        }

        // decode and execute opcode
        self.pc = pc.wrapping_add(2);
        match Insn::from_word(word) {
            Some(insn) => {
                if let Err(e) = self.execute(insn) {
                    self.pc = pc;
                    return Err(e);
                }
            }
            None => warn!(
                self.log,
                "unknown opcode, skipping";
                "opcode" => format!("{word:04x}"),
                "pc" => format!("{:03x}", pc & ADDR_MASK)
            ),
        }
        self.cycle += 1;
        self.tick_timers();
        Ok(self)
    }

    /// Dumps the current state of all registers, and the cycle count
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut vm = Machine::new();
    /// vm.dump();
    /// ```
    /// outputs
    /// ```text
    /// PC: 0200, SP: 00, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0, CYC:      0
    /// ```
    pub fn dump(&self) {
        std::println!(
            "PC: {:04x}, SP: {:02x}, I: {:04x}\n{}DLY: {}, SND: {}, CYC: {:6}",
            self.pc,
            self.sp,
            self.i,
            self.v
                .into_iter()
                .enumerate()
                .map(|(i, gpr)| {
                    format!(
                        "v{i:X}: {gpr:02x}{}",
                        match i % 4 {
                            3 => "\n",
                            _ => " ",
                        }
                    )
                })
                .collect::<String>(),
            self.delay,
            self.sound,
            self.cycle,
        );
    }
}

// internal plumbing
impl Machine {
    /// Reads a byte of memory at the 12-bit address `addr`
    #[inline(always)]
    fn read(&self, addr: Adr) -> u8 {
        self.memory[(addr & ADDR_MASK) as usize]
    }

    /// Writes a byte of memory at the 12-bit address `addr`
    #[inline(always)]
    fn write(&mut self, addr: Adr, data: u8) {
        self.memory[(addr & ADDR_MASK) as usize] = data;
    }

    /// Ticks both timers down, notifying the [AudioSink] when the sound timer runs out
    fn tick_timers(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        if self.sound > 0 {
            if self.sound == 1 {
                debug!(self.log, "beep"; "cycle" => self.cycle);
                self.beeper.notify();
            }
            self.sound -= 1;
        }
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Machine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine")
            .field("flags", &self.flags)
            .field("stack", &self.stack())
            .field("pc", &self.pc)
            .field("i", &self.i)
            .field("v", &self.v)
            .field("delay", &self.delay)
            .field("sound", &self.sound)
            .field("redraw", &self.redraw)
            .field("keys", &self.keys)
            .field("cycle", &self.cycle)
            .finish_non_exhaustive()
    }
}

/// Renders the framebuffer as text, one line per row: `█` for set pixels, ` ` for unset ones
///
/// # Examples
/// ```rust
/// # use chip8vm::*;
/// let vm = Machine::new();
/// let text = vm.screen().to_string();
/// assert_eq!(HEIGHT, text.lines().count());
/// assert!(text.lines().all(|row| row == " ".repeat(WIDTH)));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ScreenView<'a>(&'a [u8]);

impl Display for ScreenView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.0.chunks(WIDTH) {
            let row: String = row
                .iter()
                .map(|&px| if px != 0 { '█' } else { ' ' })
                .collect();
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
