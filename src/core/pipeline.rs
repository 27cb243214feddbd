//! Pipeline latch shapes: the four registers between IF/ID/EX/MEM/WB.
//!
//! Shaped after the teacher's `src/cpu/pipeline.rs` (`IFID`/`IDEx`/`EXMEM`/
//! `MEMWB`), retargeted to this crate's tagged [`crate::isa::Op`] instead of
//! raw RISC-V instruction words.

use crate::isa::Op;

/// IF→ID latch: which program index is waiting to be decoded.
#[derive(Debug, Clone, Default)]
pub struct IfIdSlot {
    pub valid: bool,
    pub pc: usize,
}

/// ID→EX latch: the decoded instruction, with its own EX-latency countdown.
#[derive(Debug, Clone, Default)]
pub struct IdExSlot {
    pub valid: bool,
    pub pc: usize,
    pub op: Option<Op>,
    pub cycles_remaining: u64,
}

/// EX→MEM latch: the instruction's computed result/effective address, with
/// its own MEM-latency countdown and a flag recording whether the memory
/// side effect has already fired (so a multi-cycle stall doesn't repeat it).
#[derive(Debug, Clone, Default)]
pub struct ExMemSlot {
    pub valid: bool,
    pub pc: usize,
    pub op: Option<Op>,
    pub alu_result: i32,
    pub store_val: i32,
    pub addr: i32,
    pub branch_taken: bool,
    pub branch_target: usize,
    pub cycles_remaining: u64,
    pub mem_issued: bool,
    pub mem_result: i32,
}

/// MEM→WB latch: the value ready to commit this tick.
#[derive(Debug, Clone, Default)]
pub struct MemWbSlot {
    pub valid: bool,
    pub pc: usize,
    pub op: Option<Op>,
    pub result: i32,
    pub branch_taken: bool,
    pub branch_target: usize,
}
