//! One core: register file, private L1s, scratchpad, and the pipeline
//! latches that carry an instruction through IF/ID/EX/MEM/WB.
//!
//! Collapses the teacher's `Cpu` (RV32 control signals, branch predictor,
//! `unsafe impl Send`) into a single `Core { forwarding: bool }` type per the
//! REDESIGN FLAG "One CPU type, a mode flag" (spec §9): both pipeline
//! variants share every stage function, differing only in
//! [`control::detect_hazard`] and [`control::forward`]'s behavior.

pub mod control;
pub mod pipeline;
pub mod stages;

use pipeline::{ExMemSlot, IdExSlot, IfIdSlot, MemWbSlot};

use crate::cache::CacheSim;
use crate::config::Config;
use crate::error::SimResult;
use crate::hierarchy::CacheHierarchy;
use crate::isa::parser::Program;
use crate::memory::MainMemory;
use crate::register_file::RegisterFile;
use crate::scratchpad::Scratchpad;
use crate::sync::SyncBarrier;

/// Everything a core's stages need but does not itself own: the program
/// text, the shared cache hierarchy, main memory, the sync barrier, and
/// configuration. Mirrors the "Shared-cache ownership" REDESIGN FLAG.
pub struct Env<'a> {
    pub program: &'a Program,
    pub hierarchy: &'a mut CacheHierarchy,
    pub memory: &'a mut MainMemory,
    pub barrier: &'a mut SyncBarrier,
    pub config: &'a Config,
}

/// Per-core counters feeding the IPC formula (spec §7).
#[derive(Debug, Clone, Copy, Default)]
pub struct CoreStats {
    pub inst_executed: u64,
    pub stall_count: u64,
    pub pipeline_flush_count: u64,
}

impl CoreStats {
    /// `inst_executed / (inst_executed + stall_count + pipeline_flush_count)`.
    #[must_use]
    pub fn ipc(&self) -> f64 {
        let denom = self.inst_executed + self.stall_count + self.pipeline_flush_count;
        if denom == 0 {
            0.0
        } else {
            self.inst_executed as f64 / denom as f64
        }
    }
}

/// One in-order 5-stage pipelined core.
pub struct Core {
    pub id: usize,
    pub regs: RegisterFile,
    pub pc: usize,
    pub forwarding: bool,

    pub if_id: IfIdSlot,
    pub id_ex: IdExSlot,
    pub ex_mem: ExMemSlot,
    pub mem_wb: MemWbSlot,
    pub wb_latch: MemWbSlot,

    pub l1i: CacheSim,
    pub l1d: CacheSim,
    pub scratchpad: Scratchpad,

    pub stats: CoreStats,
}

impl Core {
    /// # Errors
    /// Propagates [`crate::error::SimError::Config`] from building the L1s.
    pub fn new(id: usize, forwarding: bool, config: &Config) -> SimResult<Self> {
        Ok(Self {
            id,
            regs: RegisterFile::new(id),
            pc: 0,
            forwarding,
            if_id: IfIdSlot::default(),
            id_ex: IdExSlot::default(),
            ex_mem: ExMemSlot::default(),
            mem_wb: MemWbSlot::default(),
            wb_latch: MemWbSlot::default(),
            l1i: CacheSim::new(&config.l1i)?,
            l1d: CacheSim::new(&config.l1d)?,
            scratchpad: Scratchpad::new(config.scratch_pad.size),
            stats: CoreStats::default(),
        })
    }

    /// Whether this core has nothing left in flight and nothing left to
    /// fetch: the condition the simulator uses to know a core is done.
    #[must_use]
    pub fn is_drained(&self, program: &Program) -> bool {
        self.pc >= program.len()
            && !self.if_id.valid
            && !self.id_ex.valid
            && !self.ex_mem.valid
            && !self.mem_wb.valid
    }

    /// Advances this core by one cycle: WB, MEM, EX in reverse pipeline
    /// order (each stage consumes the latch the previous tick's upstream
    /// stage produced), then a hazard check gating ID and IF.
    ///
    /// # Errors
    /// Propagates memory/cache bounds errors from the MEM stage.
    pub fn tick(&mut self, env: &mut Env<'_>) -> SimResult<()> {
        stages::writeback::wb_stage(self);
        self.wb_latch = self.mem_wb.clone();
        stages::mem::mem_stage(self, env)?;
        stages::execute::execute_stage(self, env);

        // `execute_stage` clears `id_ex` itself once it actually completes an
        // instruction, so if the slot is still valid here it is mid
        // multi-cycle countdown (regardless of how many cycles remain) and
        // must be left untouched.
        let structural = self.id_ex.valid;
        let data_hazard = !structural && control::detect_hazard(self, env.program);

        if data_hazard {
            self.id_ex = IdExSlot::default();
            self.stats.stall_count += 1;
        } else if !structural {
            stages::decode::decode_stage(self, env);
            stages::fetch::fetch_stage(self, env)?;
        }
        self.regs.write(0, 0);
        Ok(())
    }
}
