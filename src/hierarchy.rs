//! The two-level cache hierarchy: private L1-I/L1-D, shared L2, main memory.
//!
//! Grounded on `original_source/.../Phase 3/Storage.py`'s `read`/`write`/
//! `flush_l1_dirty_to_l2` methods for the exact latency-accumulation order,
//! reshaped into the REDESIGN FLAG "Shared-cache ownership" from spec §9:
//! the hierarchy never owns L1/scratchpad (those belong to `Core`), only the
//! shared L2 and a reference to main memory passed in by the caller.

use crate::cache::CacheSim;
use crate::config::LatencyConfig;
use crate::error::SimResult;
use crate::memory::MainMemory;

/// Shared second level plus the latency table every access consults.
pub struct CacheHierarchy {
    l2: CacheSim,
    latencies: LatencyConfig,
}

fn read_block(mem: &MainMemory, base_addr: u32, block_words: usize) -> SimResult<Vec<i32>> {
    (0..block_words)
        .map(|i| mem.read_word(base_addr + (i as u32) * 4))
        .collect()
}

fn write_block(mem: &mut MainMemory, writeback: &crate::cache::DirtyWriteback) -> SimResult<()> {
    for (i, &word) in writeback.data.iter().enumerate() {
        mem.write_word(writeback.base_addr + (i as u32) * 4, word)?;
    }
    Ok(())
}

impl CacheHierarchy {
    #[must_use]
    pub fn new(l2: CacheSim, latencies: LatencyConfig) -> Self {
        Self { l2, latencies }
    }

    /// Reads `addr` through `l1` (either I or D), falling back to L2 then
    /// main memory on a miss. Returns `(value, stall_cycles)`.
    ///
    /// # Errors
    /// Propagates [`crate::error::SimError::Bounds`] from main memory.
    pub fn read(
        &mut self,
        l1: &mut CacheSim,
        mem: &mut MainMemory,
        addr: u32,
    ) -> SimResult<(i32, u64)> {
        if let Some(v) = l1.lookup(addr) {
            return Ok((v, self.latencies.l1_hit));
        }
        let mut cycles = self.latencies.l1_miss;

        if let Some(v) = self.l2.lookup(addr) {
            cycles += self.latencies.l2_hit;
            let block = read_block(mem, self.block_base(l1, addr), l1.block_words())?;
            if let Some(wb) = l1.fill(addr, block) {
                write_block(mem, &wb)?;
            }
            return Ok((v, cycles));
        }
        cycles += self.latencies.l2_miss + self.latencies.mem;

        let block = read_block(mem, self.block_base(&self.l2, addr), self.l2.block_words())?;
        if let Some(wb) = self.l2.fill(addr, block) {
            write_block(mem, &wb)?;
        }
        let l1_block = read_block(mem, self.block_base(l1, addr), l1.block_words())?;
        if let Some(wb) = l1.fill(addr, l1_block) {
            write_block(mem, &wb)?;
        }
        let v = l1.lookup(addr).unwrap_or(0);
        Ok((v, cycles))
    }

    /// Write-allocate + write-back store of `value` at `addr` into L1-D then
    /// L2, per spec §4.3's write path.
    ///
    /// # Errors
    /// Propagates [`crate::error::SimError::Bounds`] from main memory.
    pub fn write(
        &mut self,
        l1d: &mut CacheSim,
        mem: &mut MainMemory,
        addr: u32,
        value: i32,
    ) -> SimResult<u64> {
        let mut cycles = 0u64;

        if !l1d.contains(addr) {
            let block = read_block(mem, self.block_base(l1d, addr), l1d.block_words())?;
            if let Some(wb) = l1d.fill(addr, block) {
                write_block(mem, &wb)?;
            }
            cycles += self.latencies.l1_miss;
        }
        l1d.write(addr, value);
        cycles += self.latencies.l1_hit;

        if !self.l2.contains(addr) {
            let block = read_block(mem, self.block_base(&self.l2, addr), self.l2.block_words())?;
            if let Some(wb) = self.l2.fill(addr, block) {
                write_block(mem, &wb)?;
            }
            cycles += self.latencies.l2_miss;
        }
        self.l2.write(addr, value);
        cycles += self.latencies.l2_hit;

        Ok(cycles)
    }

    /// Write back every dirty L1-D block for `core_id` into L2, then reset
    /// that core's L1-D to empty. Returns the nominal barrier cost.
    ///
    /// # Errors
    /// Propagates [`crate::error::SimError::Bounds`] from main memory.
    pub fn flush_l1_dirty_to_l2(
        &mut self,
        l1d: &mut CacheSim,
        mem: &mut MainMemory,
        core_id: usize,
    ) -> SimResult<u64> {
        tracing::debug!(core_id, "flushing L1-D dirty blocks to L2");
        for wb in l1d.flush_dirty_and_reset() {
            if !self.l2.contains(wb.base_addr) {
                let block = read_block(mem, wb.base_addr, self.l2.block_words())?;
                if let Some(evicted) = self.l2.fill(wb.base_addr, block) {
                    write_block(mem, &evicted)?;
                }
            }
            for (i, &word) in wb.data.iter().enumerate() {
                self.l2.write(wb.base_addr + (i as u32) * 4, word);
            }
        }
        Ok(self.latencies.l1_hit + self.latencies.l2_hit)
    }

    fn block_base(&self, cache: &CacheSim, addr: u32) -> u32 {
        let block_bytes = (cache.block_words() * 4) as u32;
        (addr / block_bytes) * block_bytes
    }
}
