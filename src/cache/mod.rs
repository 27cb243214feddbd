//! A single set-associative cache level.
//!
//! Grounded on the teacher's `crates/hardware/src/core/units/cache/mod.rs`
//! (struct shape, `Box<dyn ReplacementPolicy>` field) generalized to the two
//! policies this simulator supports and the write-back/write-allocate
//! contract in spec §4.2.

pub mod policies;

use policies::{ReplacementPolicy, ReplacementPolicyKind, build};

use crate::config::CacheConfig;
use crate::error::{SimError, SimResult};

#[derive(Clone)]
struct Block {
    valid: bool,
    dirty: bool,
    tag: u32,
    data: Vec<i32>,
}

impl Block {
    fn empty(block_words: usize) -> Self {
        Self {
            valid: false,
            dirty: false,
            tag: 0,
            data: vec![0; block_words],
        }
    }
}

/// A block evicted (or flushed) with unwritten-back data.
pub struct DirtyWriteback {
    /// Byte address of the first word in the block.
    pub base_addr: u32,
    /// The block's words, in address order.
    pub data: Vec<i32>,
}

/// One level of a set-associative, write-back cache.
pub struct CacheSim {
    sets: Vec<Vec<Block>>,
    block_words: usize,
    num_sets: usize,
    ways: usize,
    policy: Box<dyn ReplacementPolicy>,
    policy_kind: ReplacementPolicyKind,
    rrpv_bits: u32,
}

struct AddressParts {
    set_index: usize,
    tag: u32,
    word_offset: usize,
}

impl CacheSim {
    /// Builds a cache from `config`.
    ///
    /// # Errors
    /// Returns [`SimError::Config`] if the geometry is not all powers of two
    /// (spec §4.2).
    pub fn new(config: &CacheConfig) -> SimResult<Self> {
        let num_sets = config.num_sets()?;
        let ways = config.associativity;
        let block_words = config.block_size;
        let policy = build(config.policy, num_sets, ways, config.rrpv_bits);
        Ok(Self {
            sets: vec![vec![Block::empty(block_words); ways]; num_sets],
            block_words,
            num_sets,
            ways,
            policy,
            policy_kind: config.policy,
            rrpv_bits: config.rrpv_bits,
        })
    }

    fn split(&self, addr: u32) -> AddressParts {
        let block_bytes = (self.block_words * 4) as u32;
        let block_index = addr / block_bytes;
        let set_index = (block_index as usize) % self.num_sets;
        let tag = block_index / self.num_sets as u32;
        let word_offset = ((addr / 4) as usize) % self.block_words;
        AddressParts {
            set_index,
            tag,
            word_offset,
        }
    }

    fn find_way(&self, set_index: usize, tag: u32) -> Option<usize> {
        self.sets[set_index]
            .iter()
            .position(|b| b.valid && b.tag == tag)
    }

    /// Returns the word at `addr` if a valid block holds it, refreshing
    /// recency metadata on a hit.
    #[must_use]
    pub fn lookup(&mut self, addr: u32) -> Option<i32> {
        let parts = self.split(addr);
        let way = self.find_way(parts.set_index, parts.tag)?;
        self.policy.update(parts.set_index, way, false);
        Some(self.sets[parts.set_index][way].data[parts.word_offset])
    }

    /// True if `addr` currently hits in this cache.
    #[must_use]
    pub fn contains(&self, addr: u32) -> bool {
        let parts = self.split(addr);
        self.find_way(parts.set_index, parts.tag).is_some()
    }

    /// Installs the block containing `addr`, evicting by policy if the set
    /// is full. Returns the evicted block's data if it was dirty, so the
    /// caller can write it back to the next level.
    pub fn fill(&mut self, addr: u32, block_data: Vec<i32>) -> Option<DirtyWriteback> {
        let parts = self.split(addr);
        debug_assert_eq!(block_data.len(), self.block_words);

        if let Some(way) = self.find_way(parts.set_index, parts.tag) {
            self.sets[parts.set_index][way].data = block_data;
            self.sets[parts.set_index][way].dirty = false;
            self.policy.update(parts.set_index, way, true);
            return None;
        }

        let way = if let Some(way) = self.sets[parts.set_index]
            .iter()
            .position(|b| !b.valid)
        {
            way
        } else {
            self.policy.get_victim(parts.set_index)
        };

        let victim = &self.sets[parts.set_index][way];
        let evicted = if victim.valid && victim.dirty {
            let block_bytes = (self.block_words * 4) as u32;
            let base_addr = (victim.tag * self.num_sets as u32 + parts.set_index as u32) * block_bytes;
            Some(DirtyWriteback {
                base_addr,
                data: victim.data.clone(),
            })
        } else {
            None
        };

        self.sets[parts.set_index][way] = Block {
            valid: true,
            dirty: false,
            tag: parts.tag,
            data: block_data,
        };
        self.policy.update(parts.set_index, way, true);
        evicted
    }

    /// Writes `value` into the block already resident at `addr`.
    ///
    /// Returns `false` (and logs a warning) if the block is absent; callers
    /// are required to `fill` first (write-allocate is enforced by the
    /// hierarchy, not here).
    pub fn write(&mut self, addr: u32, value: i32) -> bool {
        let parts = self.split(addr);
        let Some(way) = self.find_way(parts.set_index, parts.tag) else {
            tracing::warn!(address = addr, "write to absent cache block");
            return false;
        };
        self.sets[parts.set_index][way].data[parts.word_offset] = value;
        self.sets[parts.set_index][way].dirty = true;
        self.policy.update(parts.set_index, way, false);
        true
    }

    /// Extracts every dirty block (for a barrier-time flush), then resets
    /// this cache to an all-invalid state with fresh policy metadata.
    pub fn flush_dirty_and_reset(&mut self) -> Vec<DirtyWriteback> {
        let block_bytes = (self.block_words * 4) as u32;
        let mut out = Vec::new();
        for (set_idx, set) in self.sets.iter().enumerate() {
            for block in set {
                if block.valid && block.dirty {
                    let base_addr = (block.tag * self.num_sets as u32 + set_idx as u32) * block_bytes;
                    out.push(DirtyWriteback {
                        base_addr,
                        data: block.data.clone(),
                    });
                }
            }
        }
        self.sets = vec![vec![Block::empty(self.block_words); self.ways]; self.num_sets];
        self.policy = build(self.policy_kind, self.num_sets, self.ways, self.rrpv_bits);
        out
    }

    /// Words per block, exposed so the hierarchy can read/write whole blocks
    /// from main memory.
    #[must_use]
    pub fn block_words(&self) -> usize {
        self.block_words
    }
}
