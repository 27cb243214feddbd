//! Simulator configuration, deserialized from JSON.
//!
//! Structured the way the teacher's own `config.rs` is: a `defaults` module
//! of named constants, small nested `Deserialize` structs, and `#[serde(default
//! = "...")]` on every field so a caller's config file only has to mention
//! what it wants to override.

use std::collections::HashMap;

use serde::Deserialize;

use crate::cache::policies::ReplacementPolicyKind;
use crate::error::{SimError, SimResult};

/// Named constants used when a config omits a field.
pub mod defaults {
    /// Number of cores the simulator always creates.
    pub const NUM_CORES: usize = 4;
    /// Hard cap on ticks before a run is declared deadlocked.
    pub const TICK_BUDGET: u64 = 10_000;
    /// Byte offset where the instruction stream begins in main memory.
    ///
    /// Matches the literal constant used by the program this simulator is
    /// modeled on (`pc*4 + 320`).
    pub const INSTRUCTION_BASE: u32 = 320;

    pub const L1_HIT: u64 = 1;
    pub const L1_MISS: u64 = 3;
    pub const L2_HIT: u64 = 4;
    pub const L2_MISS: u64 = 6;
    pub const MEM: u64 = 10;
    pub const SCRATCHPAD: u64 = 1;

    pub const CACHE_SIZE: usize = 1024;
    pub const BLOCK_SIZE: usize = 4;
    pub const ASSOCIATIVITY: usize = 2;
    pub const RRPV_BITS: u32 = 2;

    pub const SCRATCHPAD_SIZE: usize = 256;
}

fn default_num_cores() -> usize {
    defaults::NUM_CORES
}
fn default_tick_budget() -> u64 {
    defaults::TICK_BUDGET
}
fn default_instruction_base() -> u32 {
    defaults::INSTRUCTION_BASE
}

/// Geometry and replacement policy for one cache level.
///
/// ```
/// # use coresim::config::CacheConfig;
/// let cfg: CacheConfig = serde_json::from_str(
///     r#"{"cache_size": 1024, "block_size": 4, "associativity": 2, "policy": "lru"}"#
/// ).unwrap();
/// assert_eq!(cfg.cache_size, 1024);
/// ```
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CacheConfig {
    /// Total cache capacity in words.
    #[serde(default = "default_cache_size")]
    pub cache_size: usize,
    /// Block (line) size in words.
    #[serde(default = "default_block_size")]
    pub block_size: usize,
    /// Number of ways per set.
    #[serde(default = "default_associativity")]
    pub associativity: usize,
    /// Which replacement policy governs eviction in this cache.
    #[serde(default)]
    pub policy: ReplacementPolicyKind,
    /// Width of the RRPV counter, only meaningful for `policy = "srrip"`.
    #[serde(default = "default_rrpv_bits")]
    pub rrpv_bits: u32,
}

fn default_cache_size() -> usize {
    defaults::CACHE_SIZE
}
fn default_block_size() -> usize {
    defaults::BLOCK_SIZE
}
fn default_associativity() -> usize {
    defaults::ASSOCIATIVITY
}
fn default_rrpv_bits() -> u32 {
    defaults::RRPV_BITS
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_size: defaults::CACHE_SIZE,
            block_size: defaults::BLOCK_SIZE,
            associativity: defaults::ASSOCIATIVITY,
            policy: ReplacementPolicyKind::default(),
            rrpv_bits: defaults::RRPV_BITS,
        }
    }
}

impl CacheConfig {
    /// Number of sets implied by this geometry.
    ///
    /// # Errors
    /// Returns [`SimError::Config`] if any of `cache_size`, `block_size`, or
    /// `associativity` is not a power of two, or if `cache_size` is not an
    /// exact multiple of `block_size * associativity`.
    pub fn num_sets(&self) -> SimResult<usize> {
        for (name, v) in [
            ("cache_size", self.cache_size),
            ("block_size", self.block_size),
            ("associativity", self.associativity),
        ] {
            if v == 0 || !v.is_power_of_two() {
                return Err(SimError::Config(format!(
                    "{name} must be a power of two, got {v}"
                )));
            }
        }
        let denom = self.block_size * self.associativity;
        if self.cache_size % denom != 0 {
            return Err(SimError::Config(format!(
                "cache_size {} is not a multiple of block_size*associativity {}",
                self.cache_size, denom
            )));
        }
        let sets = self.cache_size / denom;
        if !sets.is_power_of_two() {
            return Err(SimError::Config(format!(
                "derived num_sets {sets} is not a power of two"
            )));
        }
        Ok(sets)
    }
}

/// Per-core scratchpad geometry.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScratchpadConfig {
    /// Size in words.
    #[serde(default = "default_scratchpad_size")]
    pub size: usize,
}

fn default_scratchpad_size() -> usize {
    defaults::SCRATCHPAD_SIZE
}

impl Default for ScratchpadConfig {
    fn default() -> Self {
        Self {
            size: defaults::SCRATCHPAD_SIZE,
        }
    }
}

/// Stall-cycle costs for each hierarchy level.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatencyConfig {
    #[serde(default = "default_l1_hit")]
    pub l1_hit: u64,
    #[serde(default = "default_l1_miss")]
    pub l1_miss: u64,
    #[serde(default = "default_l2_hit")]
    pub l2_hit: u64,
    #[serde(default = "default_l2_miss")]
    pub l2_miss: u64,
    #[serde(default = "default_mem")]
    pub mem: u64,
    #[serde(default = "default_scratchpad_latency")]
    pub scratchpad: u64,
}

fn default_l1_hit() -> u64 {
    defaults::L1_HIT
}
fn default_l1_miss() -> u64 {
    defaults::L1_MISS
}
fn default_l2_hit() -> u64 {
    defaults::L2_HIT
}
fn default_l2_miss() -> u64 {
    defaults::L2_MISS
}
fn default_mem() -> u64 {
    defaults::MEM
}
fn default_scratchpad_latency() -> u64 {
    defaults::SCRATCHPAD
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            l1_hit: defaults::L1_HIT,
            l1_miss: defaults::L1_MISS,
            l2_hit: defaults::L2_HIT,
            l2_miss: defaults::L2_MISS,
            mem: defaults::MEM,
            scratchpad: defaults::SCRATCHPAD,
        }
    }
}

/// Root configuration object.
///
/// ```
/// # use coresim::config::Config;
/// let cfg: Config = serde_json::from_str("{}").unwrap();
/// assert_eq!(cfg.num_cores, 4);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub l1i: CacheConfig,
    #[serde(default)]
    pub l1d: CacheConfig,
    #[serde(default)]
    pub l2: CacheConfig,
    #[serde(default)]
    pub scratch_pad: ScratchpadConfig,
    #[serde(default)]
    pub latencies: LatencyConfig,
    /// Per-mnemonic EX latency overrides; anything absent defaults to 1.
    #[serde(default)]
    pub op_latencies: HashMap<String, u64>,
    #[serde(default = "default_num_cores")]
    pub num_cores: usize,
    #[serde(default = "default_tick_budget")]
    pub tick_budget: u64,
    #[serde(default = "default_instruction_base")]
    pub instruction_base: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            l1i: CacheConfig::default(),
            l1d: CacheConfig::default(),
            l2: CacheConfig::default(),
            scratch_pad: ScratchpadConfig::default(),
            latencies: LatencyConfig::default(),
            op_latencies: HashMap::new(),
            num_cores: defaults::NUM_CORES,
            tick_budget: defaults::TICK_BUDGET,
            instruction_base: defaults::INSTRUCTION_BASE,
        }
    }
}

impl Config {
    /// Look up the EX latency for a mnemonic, falling back to 1 cycle.
    #[must_use]
    pub fn op_latency(&self, mnemonic: &str) -> u64 {
        self.op_latencies.get(mnemonic).copied().unwrap_or(1)
    }
}
