//! ID: reads the next program index out of `if_id` into `id_ex`, with the
//! instruction's own EX-latency countdown attached. Only called by
//! [`crate::core::Core::tick`] when no hazard is stalling this cycle.

use crate::core::{pipeline::IdExSlot, Core, Env};

pub fn decode_stage(core: &mut Core, env: &mut Env<'_>) {
    if !core.if_id.valid {
        return;
    }
    let Some(op) = env.program.ops.get(core.if_id.pc).cloned() else {
        return;
    };
    let cycles_remaining = env.config.op_latency(op.mnemonic());
    core.id_ex = IdExSlot {
        valid: true,
        pc: core.if_id.pc,
        op: Some(op),
        cycles_remaining,
    };
    core.if_id = Default::default();
}
