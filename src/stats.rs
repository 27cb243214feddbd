//! Reporting shapes: a serializable snapshot of one run, and a sectioned
//! human-readable printer in the teacher's `SimStats::print` style.

use serde::Serialize;

/// One core's final state and counters.
#[derive(Debug, Clone, Serialize)]
pub struct CoreReport {
    pub id: usize,
    pub registers: [i32; 32],
    pub inst_executed: u64,
    pub stall_count: u64,
    pub pipeline_flush_count: u64,
    pub ipc: f64,
}

/// A full simulator run's result.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub clock: u64,
    pub cores: Vec<CoreReport>,
}

impl SimReport {
    /// Prints a sectioned summary to stdout, one block per core.
    pub fn print(&self) {
        println!("\n=========================================================");
        println!("\n[General]");
        println!("  Cycles: {}", self.clock);

        for core in &self.cores {
            println!("\n[Core {}]", core.id);
            println!("  Instructions Executed: {}", core.inst_executed);
            println!("  Stall Cycles:          {}", core.stall_count);
            println!("  Pipeline Flushes:      {}", core.pipeline_flush_count);
            println!("  IPC:                   {:.4}", core.ipc);
        }
        println!("\n=========================================================\n");
    }
}
