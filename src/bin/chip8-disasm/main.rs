// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Prints a colored listing of a Chip-8 program

use chip8vm::{error::{Error, Result}, *};
use gumdrop::*;
use owo_colors::OwoColorize;
use std::{fs::read, path::PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Show help text")]
    help: bool,
    #[options(help = "Load a ROM to disassemble", free, required)]
    pub file: PathBuf,
    #[options(help = "Start disassembling at offset...")]
    pub offset: usize,
}

fn main() -> Result<()> {
    let options = Arguments::parse_args_default_or_exit();
    let contents = read(&options.file).map_err(|e| Error::from_io(&options.file, e))?;
    if contents.len() > MAX_PROGRAM_SIZE {
        return Err(Error::ProgramTooLarge {
            size: contents.len(),
            max: MAX_PROGRAM_SIZE,
        });
    }
    let disassembler = Dis::default();
    let contents = contents.get(options.offset..).unwrap_or_default();
    for (addr, insn) in contents.chunks(2).enumerate() {
        let addr = PROGRAM_START + options.offset + 2 * addr;
        match *insn {
            [hi, lo] => {
                let insn = u16::from_be_bytes([hi, lo]);
                println!(
                    "{addr:03x}: {} {:04x}",
                    disassembler.once(insn),
                    insn.bright_black()
                );
            }
            // odd trailing byte
            [byte] => println!("{addr:03x}: {}", format_args!("db   {byte:#04x}").bright_black()),
            _ => unreachable!("chunks(2) yields one or two bytes"),
        }
    }
    Ok(())
}
