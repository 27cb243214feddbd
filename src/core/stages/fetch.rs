//! IF: pulls the next instruction through the I-cache, or runs the `sync`
//! barrier protocol in place of a memory access.

use crate::core::{pipeline::IfIdSlot, Core, Env};
use crate::error::SimResult;
use crate::isa::Op;

pub fn fetch_stage(core: &mut Core, env: &mut Env<'_>) -> SimResult<()> {
    if core.if_id.valid {
        return Ok(());
    }
    if core.pc >= env.program.len() {
        return Ok(());
    }

    let op = &env.program.ops[core.pc];
    if matches!(op, Op::Sync) {
        let released = env.barrier.arrive(core.pc, core.id);
        if released {
            tracing::debug!(core_id = core.id, pc = core.pc, "sync barrier released");
            core.if_id = IfIdSlot { valid: true, pc: core.pc };
            core.pc += 1;
        } else {
            core.stats.stall_count += 1;
        }
        return Ok(());
    }

    let addr = env.config.instruction_base + (core.pc as u32) * 4;
    let (_word, latency) = env.hierarchy.read(&mut core.l1i, env.memory, addr)?;
    core.stats.stall_count += latency.saturating_sub(1);
    core.if_id = IfIdSlot { valid: true, pc: core.pc };
    core.pc += 1;
    Ok(())
}
