//! `x0` is hardwired zero, `x31` carries the core id.

use coresim::register_file::RegisterFile;

#[test]
fn x31_preloads_the_core_id() {
    let regs = RegisterFile::new(2);
    assert_eq!(regs.read(31), 2);
}

#[test]
fn writes_to_x0_are_discarded() {
    let mut regs = RegisterFile::new(0);
    regs.write(0, 42);
    assert_eq!(regs.read(0), 0);
}

#[test]
fn writes_to_other_registers_stick() {
    let mut regs = RegisterFile::new(0);
    regs.write(5, 99);
    assert_eq!(regs.read(5), 99);
}

#[test]
fn dump_returns_every_register() {
    let mut regs = RegisterFile::new(3);
    regs.write(1, 11);
    let snapshot = regs.dump();
    assert_eq!(snapshot[1], 11);
    assert_eq!(snapshot[31], 3);
    assert_eq!(snapshot[0], 0);
}
