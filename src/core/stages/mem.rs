//! MEM: the data-cache/scratchpad access for loads and stores, everything
//! else a pass-through. Multi-cycle misses sit in `ex_mem`, performing the
//! actual access only once (`mem_issued`) and then just decrementing.

use crate::core::{pipeline::MemWbSlot, Core, Env};
use crate::error::SimResult;
use crate::isa::Op;

pub fn mem_stage(core: &mut Core, env: &mut Env<'_>) -> SimResult<()> {
    if !core.ex_mem.valid {
        core.mem_wb = MemWbSlot::default();
        return Ok(());
    }
    if core.ex_mem.cycles_remaining > 1 {
        core.ex_mem.cycles_remaining -= 1;
        core.stats.stall_count += 1;
        core.mem_wb = MemWbSlot::default();
        return Ok(());
    }

    let op = core.ex_mem.op.clone().expect("ex_mem valid implies op present");

    if !core.ex_mem.mem_issued {
        let addr = core.ex_mem.addr;
        let extra = match &op {
            Op::Lw { .. } => {
                let (v, cycles) = env.hierarchy.read(&mut core.l1d, env.memory, addr as u32)?;
                core.ex_mem.mem_result = v;
                cycles.saturating_sub(1)
            }
            Op::LwSpm { .. } => {
                core.ex_mem.mem_result = core.scratchpad.read(addr);
                env.config.latencies.scratchpad.saturating_sub(1)
            }
            Op::Sw { .. } => {
                let cycles = env.hierarchy.write(&mut core.l1d, env.memory, addr as u32, core.ex_mem.store_val)?;
                cycles.saturating_sub(1)
            }
            Op::SwSpm { .. } => {
                core.scratchpad.write(addr, core.ex_mem.store_val);
                env.config.latencies.scratchpad.saturating_sub(1)
            }
            _ => {
                core.ex_mem.mem_result = core.ex_mem.alu_result;
                0
            }
        };
        core.ex_mem.mem_issued = true;
        if extra > 0 {
            core.ex_mem.cycles_remaining = extra;
            core.stats.stall_count += 1;
            core.mem_wb = MemWbSlot::default();
            return Ok(());
        }
    }

    core.mem_wb = MemWbSlot {
        valid: true,
        pc: core.ex_mem.pc,
        op: Some(op),
        result: core.ex_mem.mem_result,
        branch_taken: core.ex_mem.branch_taken,
        branch_target: core.ex_mem.branch_target,
    };
    core.ex_mem = Default::default();
    Ok(())
}
