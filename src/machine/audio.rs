// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The hook through which the [super::Machine] asks its host to beep

/// Receives a notification whenever the sound timer runs out.
///
/// The machine never synthesizes sound itself; what a notification sounds like
/// (and for how long) is up to the host.
///
/// Any `FnMut()` closure is an [AudioSink]:
/// ```rust
/// # use chip8vm::*;
/// let mut vm = Machine::new();
/// vm.on_beep(|| println!("beep!"));
/// ```
pub trait AudioSink {
    /// Called once per sound timer expiry
    fn notify(&mut self);
}

impl<F: FnMut()> AudioSink for F {
    fn notify(&mut self) {
        self()
    }
}
