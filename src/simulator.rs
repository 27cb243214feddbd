//! The top-level driver: owns main memory, the shared L2, the sync
//! barrier, and every core, and steps them in lockstep core-id order.
//!
//! Grounded on `original_source/.../Phase 3/Simulator.py`'s `run()` loop
//! (the core-id ordering for determinism, the tick-budget abort-with-
//! partial-results policy) and the teacher's top-level `Emulator`/`run`
//! shape for how a driver owns its devices.

use crate::cache::CacheSim;
use crate::config::Config;
use crate::core::{Core, Env};
use crate::error::{SimError, SimResult};
use crate::hierarchy::CacheHierarchy;
use crate::isa::parser::Program;
use crate::memory::MainMemory;
use crate::stats::{CoreReport, SimReport};
use crate::sync::SyncBarrier;

/// Owns every shared resource and all four cores.
pub struct Simulator {
    program: Program,
    config: Config,
    memory: MainMemory,
    hierarchy: CacheHierarchy,
    barrier: SyncBarrier,
    cores: Vec<Core>,
    clock: u64,
}

fn preload(memory: &mut MainMemory, program: &Program, config: &Config) -> SimResult<()> {
    for entry in &program.data {
        for (i, &value) in entry.values.iter().enumerate() {
            memory.write_word(entry.base_addr + (i as u32) * 4, value)?;
        }
    }
    for i in 0..program.len() {
        let addr = config.instruction_base + (i as u32) * 4;
        memory.write_word(addr, i as i32)?;
    }
    Ok(())
}

fn memory_size_words(program: &Program, config: &Config) -> usize {
    let data_end = program
        .data
        .iter()
        .map(|d| d.base_addr + (d.values.len() as u32) * 4)
        .max()
        .unwrap_or(0);
    let text_end = config.instruction_base + (program.len() as u32) * 4;
    ((data_end.max(text_end) / 4) as usize) + 1
}

impl Simulator {
    /// # Errors
    /// Propagates [`SimError::Config`] from building caches, or
    /// [`SimError::Bounds`] from preloading the data segment.
    pub fn new(program: Program, config: Config, forwarding: bool) -> SimResult<Self> {
        let mut memory = MainMemory::new(memory_size_words(&program, &config));
        preload(&mut memory, &program, &config)?;

        let l2 = CacheSim::new(&config.l2)?;
        let hierarchy = CacheHierarchy::new(l2, config.latencies);
        let barrier = SyncBarrier::new(config.num_cores);

        let cores = (0..config.num_cores)
            .map(|id| Core::new(id, forwarding, &config))
            .collect::<SimResult<Vec<_>>>()?;

        Ok(Self {
            program,
            config,
            memory,
            hierarchy,
            barrier,
            cores,
            clock: 0,
        })
    }

    /// Advances every core by one cycle, in core-id order (spec §4.1's
    /// determinism rule for shared-resource contention), then the clock.
    ///
    /// # Errors
    /// Propagates the first error any core's stages raise.
    pub fn tick(&mut self) -> SimResult<()> {
        for core in &mut self.cores {
            let mut env = Env {
                program: &self.program,
                hierarchy: &mut self.hierarchy,
                memory: &mut self.memory,
                barrier: &mut self.barrier,
                config: &self.config,
            };
            core.tick(&mut env)?;
        }

        // A barrier that released this tick flushes every core's dirty
        // L1-D to L2, not just the last core to arrive (spec §8 scenario
        // e: every core must observe every other core's writes after the
        // barrier releases).
        let released = self.barrier.drain_ready();
        if !released.is_empty() {
            for core in &mut self.cores {
                let cost = self.hierarchy.flush_l1_dirty_to_l2(&mut core.l1d, &mut self.memory, core.id)?;
                core.stats.stall_count += cost * released.len() as u64;
            }
        }

        self.clock += 1;
        Ok(())
    }

    fn all_drained(&self) -> bool {
        self.cores.iter().all(|c| c.is_drained(&self.program))
    }

    /// Runs until every core drains or `tick_budget` is exceeded.
    ///
    /// # Errors
    /// Returns [`SimError::Timeout`] if the tick budget is exhausted; the
    /// partial report up to that point is still recoverable via
    /// [`Simulator::report`] on the caller's own retained instance.
    pub fn run(&mut self) -> SimResult<SimReport> {
        while !self.all_drained() {
            if self.clock >= self.config.tick_budget {
                tracing::warn!(ticks = self.clock, "tick budget exhausted before all cores drained");
                return Err(SimError::Timeout { ticks: self.clock });
            }
            self.tick()?;
        }
        Ok(self.report())
    }

    /// Reads a single word directly from main memory, bypassing every
    /// cache. Useful for inspecting the final state of a data segment.
    ///
    /// # Errors
    /// Propagates [`SimError::Bounds`] if `addr` is unaligned or out of range.
    pub fn memory_word(&self, addr: u32) -> SimResult<i32> {
        self.memory.read_word(addr)
    }

    /// Builds a snapshot report of every core's stats and final register
    /// state, regardless of whether the run completed or timed out.
    #[must_use]
    pub fn report(&self) -> SimReport {
        SimReport {
            clock: self.clock,
            cores: self
                .cores
                .iter()
                .map(|c| CoreReport {
                    id: c.id,
                    registers: c.regs.dump(),
                    inst_executed: c.stats.inst_executed,
                    stall_count: c.stats.stall_count,
                    pipeline_flush_count: c.stats.pipeline_flush_count,
                    ipc: c.stats.ipc(),
                })
                .collect(),
        }
    }
}
