//! Hazard detection and operand forwarding.
//!
//! Grounded on the teacher's `src/cpu/control.rs` (`need_stall_load_use`,
//! `forward_rs`), generalized from RV32 control-signal checks to the tagged
//! [`Op`] enum, and merged with `original_source/.../Phase 3/Core.py`'s
//! non-forwarding RAW check for the base pipeline.

use super::Core;
use crate::isa::{parser::Program, Op};

/// Whether the instruction waiting in IF→ID must stay put this tick.
///
/// Without forwarding: any destination register still live in EX or MEM
/// that the candidate reads. With forwarding: only the load-use case, since
/// every other RAW hazard is resolved by forwarding in EX.
pub fn detect_hazard(core: &Core, program: &Program) -> bool {
    if !core.if_id.valid {
        return false;
    }
    let Some(candidate) = program.ops.get(core.if_id.pc) else {
        return false;
    };
    if candidate.is_control_flow() {
        return false;
    }
    let sources = candidate.sources();
    if sources.is_empty() {
        return false;
    }

    if core.forwarding {
        let Some(ex_op) = core.id_ex.op.as_ref().filter(|_| core.id_ex.valid) else {
            return false;
        };
        if !matches!(ex_op, Op::Lw { .. } | Op::LwSpm { .. }) {
            return false;
        }
        ex_op
            .dest()
            .is_some_and(|d| d != 0 && sources.contains(&d))
    } else {
        for slot_op in [
            core.id_ex.op.as_ref().filter(|_| core.id_ex.valid),
            core.ex_mem.op.as_ref().filter(|_| core.ex_mem.valid),
        ]
        .into_iter()
        .flatten()
        {
            if let Some(d) = slot_op.dest() {
                if d != 0 && sources.contains(&d) {
                    return true;
                }
            }
        }
        false
    }
}

/// Resolves `reg`'s value for use in EX: this tick's MEM result if it
/// matches, else the WB slot's result, else the register file. Spec
/// §4.5's forwarding priority.
///
/// `mem_stage` always runs before `execute_stage` within a tick and moves
/// its result into `mem_wb` (resetting `ex_mem`), so `mem_wb` — not
/// `ex_mem` — is this tick's live MEM-stage value; a load's result is
/// already resolved by the time it lands there, so there is no
/// still-pending case left to guard against.
#[must_use]
pub fn forward(core: &Core, reg: usize) -> i32 {
    if reg == 0 {
        return 0;
    }
    if core.mem_wb.valid {
        if let Some(d) = core.mem_wb.op.as_ref().and_then(Op::dest) {
            if d == reg {
                return core.mem_wb.result;
            }
        }
    }
    if core.wb_latch.valid {
        if let Some(d) = core.wb_latch.op.as_ref().and_then(Op::dest) {
            if d == reg {
                return core.wb_latch.result;
            }
        }
    }
    core.regs.read(reg)
}
