//! EX: the ALU, effective-address computation, and branch resolution.
//!
//! Multi-cycle ops (per `op_latencies`) sit in `id_ex` for
//! `cycles_remaining` ticks before handing off to `ex_mem`, counting a
//! stall on every cycle but the last — the structural-hazard half of spec
//! §4.4's hazard table.

use crate::core::{control, pipeline::{ExMemSlot, IdExSlot}, Core, Env};
use crate::isa::Op;

pub fn execute_stage(core: &mut Core, env: &mut Env<'_>) {
    if !core.id_ex.valid {
        return;
    }
    if core.id_ex.cycles_remaining > 1 {
        core.id_ex.cycles_remaining -= 1;
        core.stats.stall_count += 1;
        return;
    }

    let op = core.id_ex.op.clone().expect("id_ex valid implies op present");
    let pc = core.id_ex.pc;
    let mut slot = ExMemSlot {
        valid: true,
        pc,
        op: Some(op.clone()),
        ..Default::default()
    };

    match &op {
        Op::Add { rs1, rs2, .. } => {
            slot.alu_result = control::forward(core, *rs1).wrapping_add(control::forward(core, *rs2));
        }
        Op::Addi { rs1, imm, .. } => {
            slot.alu_result = control::forward(core, *rs1).wrapping_add(*imm);
        }
        Op::Sub { rs1, rs2, .. } => {
            slot.alu_result = control::forward(core, *rs1).wrapping_sub(control::forward(core, *rs2));
        }
        Op::Slt { rs1, rs2, .. } => {
            slot.alu_result = i32::from(control::forward(core, *rs1) < control::forward(core, *rs2));
        }
        Op::Li { imm, .. } => slot.alu_result = *imm,
        Op::La { addr, .. } => slot.alu_result = *addr,
        Op::Lw { rs1, off, .. } | Op::LwSpm { rs1, off, .. } => {
            slot.addr = control::forward(core, *rs1).wrapping_add(*off);
        }
        Op::Sw { rs1, rs2, off } | Op::SwSpm { rs1, rs2, off } => {
            slot.addr = control::forward(core, *rs1).wrapping_add(*off);
            slot.store_val = control::forward(core, *rs2);
        }
        Op::Beq { rs1, rs2, target } => {
            slot.branch_taken = control::forward(core, *rs1) == control::forward(core, *rs2);
            slot.branch_target = *target;
        }
        Op::Bne { rs1, rs2, target } => {
            slot.branch_taken = control::forward(core, *rs1) != control::forward(core, *rs2);
            slot.branch_target = *target;
        }
        Op::Ble { rs1, rs2, target } => {
            slot.branch_taken = control::forward(core, *rs1) <= control::forward(core, *rs2);
            slot.branch_target = *target;
        }
        Op::Jal { .. } => {
            slot.alu_result = i32::try_from(pc).unwrap_or(i32::MAX).wrapping_add(1);
            slot.branch_taken = true;
            slot.branch_target = match &op {
                Op::Jal { target, .. } => *target,
                _ => unreachable!(),
            };
        }
        Op::Jr { rs1 } => {
            slot.branch_taken = true;
            slot.branch_target = control::forward(core, *rs1).max(0) as usize;
        }
        Op::J { target } => {
            slot.branch_taken = true;
            slot.branch_target = *target;
        }
        Op::Ecall { rs1 } => {
            tracing::info!(core_id = core.id, value = control::forward(core, *rs1), "ecall");
        }
        Op::Sync => {}
    }

    core.ex_mem = slot;
    core.id_ex = IdExSlot::default();
}
