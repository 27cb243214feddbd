//! WB: commits the register write and, for a taken branch, redirects `pc`
//! and flushes the younger in-flight instructions.

use crate::core::{pipeline::{ExMemSlot, IdExSlot, IfIdSlot}, Core};

pub fn wb_stage(core: &mut Core) {
    if !core.mem_wb.valid {
        return;
    }
    let wb = core.mem_wb.clone();
    let op = wb.op.expect("mem_wb valid implies op present");

    core.stats.inst_executed += 1;
    if let Some(rd) = op.dest() {
        core.regs.write(rd, wb.result);
    }

    if wb.branch_taken {
        core.pc = wb.branch_target;
        core.if_id = IfIdSlot::default();
        core.id_ex = IdExSlot::default();
        core.ex_mem = ExMemSlot::default();
        core.stats.pipeline_flush_count += 1;
    }
}
