// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Exercises the instruction decode logic.
use super::*;
use imperative_rs::InstructionSet;

const INDX: &[u8; 16] = b"\0\x01\x02\x03\x04\x05\x06\x07\x08\x09\x0a\x0b\x0c\x0d\x0e\x0f";

/// runs one arbitrary operation on a brand new machine
/// returns the machine for inspection
fn run_single_op(op: &[u8]) -> Machine {
    let mut vm = Machine::default();
    vm.load_program_bytes(op).unwrap();
    vm.v = *INDX;
    vm.cycle().unwrap(); // will panic on stack errors
    vm
}

/// Words which aren't instructions get skipped, leaving everything but pc alone
fn assert_skipped(op: &[u8]) {
    let vm = run_single_op(op);
    assert_eq!(0x202, vm.pc);
    assert_eq!(INDX, &vm.v);
    assert_eq!(1, vm.cycle);
    assert!(Insn::from_word(u16::from_be_bytes([op[0], op[1]])).is_none());
}

#[rustfmt::skip]
mod sys {
    use super::*;
    #[test]                 fn cls()   { run_single_op(b"\x00\xe0"); }
    #[test] #[should_panic] fn ret()   { run_single_op(b"\x00\xee"); }
    #[test]                 fn u0420() { assert_skipped(b"\x04\x20"); }
    #[test]                 fn u0000() { assert_skipped(b"\x00\x00"); }
}
#[rustfmt::skip]
mod jump {
    use super::*;
    #[test] fn aligned()   { assert_eq!(0x230, run_single_op(b"\x12\x30").pc); }
    #[test] fn unaligned() { assert_eq!(0x231, run_single_op(b"\x12\x31").pc); }
}
#[rustfmt::skip]
mod call {
    use super::*;
    #[test] fn aligned()   { assert_eq!(0x230, run_single_op(b"\x22\x30").pc); }
    #[test] fn unaligned() { assert_eq!(0x231, run_single_op(b"\x22\x31").pc); }
    #[test] fn pushes()    { assert_eq!(&[0x202_u16], run_single_op(b"\x22\x30").stack()); }
}
#[rustfmt::skip]
mod skeb {
    use super::*;
    #[test] fn skip()    { assert_eq!(0x204, run_single_op(b"\x30\x00").pc); }
    #[test] fn no_skip() { assert_eq!(0x202, run_single_op(b"\x30\x01").pc); }
}
#[rustfmt::skip]
mod sneb {
    use super::*;
    #[test] fn skip()   { assert_eq!(0x204, run_single_op(b"\x40\x01").pc); }
    #[test] fn noskip() { assert_eq!(0x202, run_single_op(b"\x40\x00").pc); }
}
#[rustfmt::skip]
mod se {
    use super::*;
    #[test] fn skip()   { assert_eq!(0x204, run_single_op(b"\x50\x00").pc); }
    #[test] fn noskip() { assert_eq!(0x202, run_single_op(b"\x50\x10").pc); }
    #[test] fn u5ff1()  { assert_skipped(b"\x5f\xf1"); }
    #[test] fn u5ff7()  { assert_skipped(b"\x5f\xf7"); }
    #[test] fn u5fff()  { assert_skipped(b"\x5f\xff"); }
}
#[rustfmt::skip]
mod mov {
    use super::*;
    #[test] fn load_immediate() { assert_eq!(0x2a, run_single_op(b"\x6e\x2a").v[0xe]); }
    #[test] fn add_immediate()  { assert_eq!(0x2a + 0xe, run_single_op(b"\x7e\x2a").v[0xe]); }
    #[test] fn add_wraps()      { assert_eq!(0x0d, run_single_op(b"\x7e\xff").v[0xe]); }
}
#[rustfmt::skip]
mod alu {
    use super::*;
    #[test] fn ld()   { assert_eq!(0x5, run_single_op(b"\x83\x50").v[3]); }
    #[test] fn or()   { assert_eq!(0x3 | 0x5, run_single_op(b"\x83\x51").v[3]); }
    #[test] fn and()  { assert_eq!(0x3 & 0x5, run_single_op(b"\x83\x52").v[3]); }
    #[test] fn xor()  { assert_eq!(0x3 ^ 0x5, run_single_op(b"\x83\x53").v[3]); }
    #[test] fn add()  { assert_eq!([0x8, 0], [run_single_op(b"\x83\x54").v[3], run_single_op(b"\x83\x54").v[0xf]]); }
    #[test] fn sub()  { assert_eq!([0xfe, 0], [run_single_op(b"\x83\x55").v[3], run_single_op(b"\x83\x55").v[0xf]]); }
    #[test] fn shr()  { assert_eq!([0x1, 1], [run_single_op(b"\x83\x56").v[3], run_single_op(b"\x83\x56").v[0xf]]); }
    #[test] fn subn() { assert_eq!([0x2, 1], [run_single_op(b"\x83\x57").v[3], run_single_op(b"\x83\x57").v[0xf]]); }
    #[test] fn shl()  { assert_eq!([0x6, 0], [run_single_op(b"\x83\x5e").v[3], run_single_op(b"\x83\x5e").v[0xf]]); }
    #[test] fn u8358() { assert_skipped(b"\x83\x58"); }
    #[test] fn u835f() { assert_skipped(b"\x83\x5f"); }
}
#[rustfmt::skip]
mod sne {
    use super::*;
    #[test] fn skip()   { assert_eq!(0x204, run_single_op(b"\x90\x10").pc); }
    #[test] fn noskip() { assert_eq!(0x202, run_single_op(b"\x90\x00").pc); }
    #[test] fn u9ff1()  { assert_skipped(b"\x9f\xf1"); }
}
#[rustfmt::skip]
mod i {
    use super::*;
    #[test] fn ld_i()     { assert_eq!(0x123, run_single_op(b"\xa1\x23").i); }
    #[test] fn jump_v0()  { assert_eq!(0x123, run_single_op(b"\xb1\x23").pc); }
    #[test] fn add_i()    { assert_eq!(0x00c, run_single_op(b"\xfc\x1e").i); }
    #[test] fn ld_font()  { assert_eq!(5 * 0xc, run_single_op(b"\xfc\x29").i); }
}
#[rustfmt::skip]
mod rnd {
    use super::*;
    #[test] fn zero_mask() { assert_eq!(0, run_single_op(b"\xc5\x00").v[5]); }
}
#[rustfmt::skip]
mod dis {
    use super::*;
    #[test] fn draws()  { assert!(run_single_op(b"\xd0\x15").redraw); }
    #[test] fn zero()   { assert_eq!(0, run_single_op(b"\xd0\x10").v[0xf]); }
}
#[rustfmt::skip]
mod key {
    use super::*;
    #[test] fn skp()   { assert_eq!(0x202, run_single_op(b"\xe0\x9e").pc); }
    #[test] fn sknp()  { assert_eq!(0x204, run_single_op(b"\xe0\xa1").pc); }
    #[test] fn wait()  { assert_eq!(0x200, run_single_op(b"\xf0\x0a").pc); }
    #[test] fn ue09f() { assert_skipped(b"\xe0\x9f"); }
    #[test] fn uf0ff() { assert_skipped(b"\xf0\xff"); }
}
#[rustfmt::skip]
mod timer {
    use super::*;
    // timers tick once at the end of the cycle
    #[test] fn ld_dt() { assert_eq!(0x9, run_single_op(b"\xfa\x15").delay); }
    #[test] fn ld_st() { assert_eq!(0x9, run_single_op(b"\xfa\x18").sound); }
    #[test] fn get_dt() { assert_eq!(0, run_single_op(b"\xfa\x07").v[0xa]); }
}
#[rustfmt::skip]
mod dma {
    use super::*;
    #[test] fn bcd()   { assert_eq!(&[0, 1, 5], &run_single_op(b"\xff\x33").memory[0x000..0x003]); }
    #[test] fn store() { assert_eq!(0x003, run_single_op(b"\xf2\x55").i); }
    #[test] fn load()  { assert_eq!(0x003, run_single_op(b"\xf2\x65").i); }
}

/// Every instruction survives an encode/decode round-trip, and disassembles
#[test]
fn encode_decode() {
    let dis = Dis::default();
    for word in 0..=0xffff_u16 {
        let Some(insn) = Insn::from_word(word) else {
            continue;
        };
        let mut buf = [0u8; 2];
        assert_eq!(Some(2), insn.encode(&mut buf).ok(), "{insn:?}");
        assert_eq!(word, u16::from_be_bytes(buf), "{insn}");
        assert!(dis.once(word).contains(&insn.to_string()));
    }
}
