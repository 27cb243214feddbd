//! The cross-core `sync` barrier.
//!
//! Re-architects the source's process-wide `If_program` globals (§9 REDESIGN
//! FLAG "Shared global pipeline state") into an object owned by the
//! [`crate::simulator::Simulator`] and passed to each core's fetch stage.

use std::collections::HashMap;

/// Per-program-index arrival tracking across all cores.
#[derive(Debug, Default)]
pub struct SyncBarrier {
    num_cores: usize,
    arrived: HashMap<usize, Vec<bool>>,
    /// Program indices whose barrier released this tick but whose
    /// all-core L1-D flush the simulator hasn't yet performed.
    ready: Vec<usize>,
}

impl SyncBarrier {
    #[must_use]
    pub fn new(num_cores: usize) -> Self {
        Self {
            num_cores,
            arrived: HashMap::new(),
            ready: Vec::new(),
        }
    }

    /// Marks `core_id` as having entered the barrier at program index `pc`.
    /// Returns `true` if this arrival released the barrier (every core has
    /// now arrived at `pc`). On release, `pc` is queued for
    /// [`SyncBarrier::drain_ready`] so the simulator can flush every core's
    /// L1-D, not just the releasing core's.
    pub fn arrive(&mut self, pc: usize, core_id: usize) -> bool {
        let mask = self
            .arrived
            .entry(pc)
            .or_insert_with(|| vec![false; self.num_cores]);
        mask[core_id] = true;
        let released = mask.iter().all(|&b| b);
        if released {
            self.ready.push(pc);
        }
        released
    }

    /// Takes every barrier release pending an all-core flush.
    pub fn drain_ready(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.ready)
    }

    /// Whether every core has arrived at `pc` (without recording a new
    /// arrival).
    #[must_use]
    pub fn is_released(&self, pc: usize) -> bool {
        self.arrived
            .get(&pc)
            .is_some_and(|mask| mask.iter().all(|&b| b))
    }
}
