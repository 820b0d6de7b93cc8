// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Runs a Chip-8 program without a window, then prints what it drew

mod error;

use chip8vm::*;
use error::Result;
use gumdrop::*;
use owo_colors::OwoColorize;
use slog::{info, o, Logger};
use sloggers::{
    terminal::{Destination, TerminalLoggerBuilder},
    types::Severity,
    Build,
};
use std::{
    cell::Cell,
    path::PathBuf,
    rc::Rc,
    time::{Duration, Instant},
};

pub fn main() {
    let options = Arguments::parse_args_default_or_exit();
    if let Err(e) = run(options) {
        eprintln!("{}", e.bold().red());
        std::process::exit(1);
    }
}

/// Parses a hexadecimal string into a usize
fn parse_hex(value: &str) -> std::result::Result<usize, std::num::ParseIntError> {
    usize::from_str_radix(value, 16)
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Load a ROM to run.", required, free)]
    pub file: PathBuf,
    #[options(help = "Print this help message.")]
    help: bool,
    #[options(help = "Log a disassembly of every instruction.")]
    pub debug: bool,
    #[options(short = "V", help = "Log at debug level.")]
    pub verbose: bool,

    #[options(short = "n", help = "Number of cycles to run.", default = "1000", meta = "N")]
    pub cycles: usize,
    #[options(help = "Pace cycles at this many per second. If unspecified, run flat out.")]
    pub frame_rate: Option<u64>,

    #[options(
        help = "Hold a key down for the whole run (hex, repeatable).",
        parse(try_from_str = "parse_hex"),
        meta = "KEY"
    )]
    pub key: Vec<usize>,

    #[options(
        short = "v",
        help = "Use Cosmac VIP style bit-shifts, which shift vY into vX."
    )]
    pub shift: bool,
    #[options(
        short = "c",
        help = "Use CHIP-48 style DMA instructions, which don't touch I."
    )]
    pub memory: bool,
    #[options(short = "w", help = "Wrap sprites around the edges of the screen.")]
    pub wrap: bool,

    #[options(short = "F", help = "Print the screen every time it changes.")]
    pub frames: bool,
    #[options(short = "D", help = "Dump the registers when the run ends.")]
    pub dump: bool,
}

fn logger(options: &Arguments) -> Result<Logger> {
    let mut builder = TerminalLoggerBuilder::new();
    builder.destination(Destination::Stderr);
    builder.level(if options.verbose || options.debug {
        Severity::Debug
    } else {
        Severity::Info
    });
    Ok(builder.build()?)
}

fn run(options: Arguments) -> Result<()> {
    let log = logger(&options)?;
    let mut vm = Machine::with_logger(log.new(o!("rom" => options.file.display().to_string())))
        .with_quirks(Quirks {
            shift_vy: options.shift,
            dma_keep_index: options.memory,
            screen_wrap: options.wrap,
        });
    vm.flags.debug = options.debug;
    vm.load_program(&options.file)?;
    for &key in &options.key {
        vm.set_key(key, true)?;
    }

    let beeps = Rc::new(Cell::new(0usize));
    let beep_log = log.clone();
    let counter = Rc::clone(&beeps);
    vm.on_beep(move || {
        counter.set(counter.get() + 1);
        info!(beep_log, "beep"; "count" => counter.get());
    });

    let rate = options
        .frame_rate
        .map(|fr| Duration::from_nanos(1_000_000_000 / fr.max(1)));
    let mut frames = 0usize;
    let mut ft = Instant::now();
    let started = Instant::now();
    for _ in 0..options.cycles {
        vm.cycle()?;
        if vm.draw() {
            frames += 1;
            if options.frames {
                println!("{}", format_args!("frame {frames}, cycle {}", vm.cycle_count()).bold());
                print!("{}", vm.screen());
            }
        }
        if let Some(rate) = rate {
            std::thread::sleep(rate.saturating_sub(ft.elapsed()));
            ft += rate;
        }
    }
    info!(log, "finished";
        "cycles" => vm.cycle_count(),
        "frames" => frames,
        "beeps" => beeps.get(),
        "elapsed" => format!("{:.03?}", started.elapsed())
    );

    print!("{}", vm.screen());
    if options.dump {
        vm.dump();
    }
    Ok(())
}
