//! Config defaults and JSON deserialization.

use coresim::cache::policies::ReplacementPolicyKind;
use coresim::config::{defaults, CacheConfig, Config, LatencyConfig, ScratchpadConfig};

#[test]
fn config_default_matches_named_constants() {
    let config = Config::default();
    assert_eq!(config.num_cores, defaults::NUM_CORES);
    assert_eq!(config.tick_budget, defaults::TICK_BUDGET);
    assert_eq!(config.instruction_base, defaults::INSTRUCTION_BASE);
    assert!(config.op_latencies.is_empty());
}

#[test]
fn cache_config_default_is_lru() {
    let cache = CacheConfig::default();
    assert_eq!(cache.cache_size, defaults::CACHE_SIZE);
    assert_eq!(cache.block_size, defaults::BLOCK_SIZE);
    assert_eq!(cache.associativity, defaults::ASSOCIATIVITY);
    assert_eq!(cache.policy, ReplacementPolicyKind::Lru);
}

#[test]
fn scratchpad_config_default_size() {
    assert_eq!(ScratchpadConfig::default().size, defaults::SCRATCHPAD_SIZE);
}

#[test]
fn latency_config_defaults() {
    let latencies = LatencyConfig::default();
    assert_eq!(latencies.l1_hit, defaults::L1_HIT);
    assert_eq!(latencies.l1_miss, defaults::L1_MISS);
    assert_eq!(latencies.l2_hit, defaults::L2_HIT);
    assert_eq!(latencies.l2_miss, defaults::L2_MISS);
    assert_eq!(latencies.mem, defaults::MEM);
    assert_eq!(latencies.scratchpad, defaults::SCRATCHPAD);
}

#[test]
fn empty_json_object_uses_every_default() {
    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config.num_cores, defaults::NUM_CORES);
    assert_eq!(config.l1d.cache_size, defaults::CACHE_SIZE);
}

#[test]
fn json_overrides_only_named_fields() {
    let json = r#"{
        "num_cores": 2,
        "tick_budget": 500,
        "l1d": { "cache_size": 64, "block_size": 4, "associativity": 2, "policy": "srrip" },
        "op_latencies": { "sw": 3, "lw": 3 }
    }"#;
    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(config.num_cores, 2);
    assert_eq!(config.tick_budget, 500);
    assert_eq!(config.l1d.cache_size, 64);
    assert_eq!(config.l1d.policy, ReplacementPolicyKind::Srrip);
    // untouched sections keep their defaults
    assert_eq!(config.l1i.cache_size, defaults::CACHE_SIZE);
    assert_eq!(config.op_latency("sw"), 3);
    assert_eq!(config.op_latency("add"), 1);
}

#[test]
fn cache_config_rejects_non_power_of_two_size() {
    let cfg = CacheConfig {
        cache_size: 100,
        block_size: 4,
        associativity: 2,
        policy: ReplacementPolicyKind::Lru,
        rrpv_bits: 2,
    };
    assert!(cfg.num_sets().is_err());
}

#[test]
fn cache_config_rejects_size_not_multiple_of_block_times_ways() {
    let cfg = CacheConfig {
        cache_size: 32,
        block_size: 8,
        associativity: 8,
        policy: ReplacementPolicyKind::Lru,
        rrpv_bits: 2,
    };
    assert!(cfg.num_sets().is_err());
}

#[test]
fn cache_config_accepts_valid_power_of_two_geometry() {
    let cfg = CacheConfig {
        cache_size: 1024,
        block_size: 4,
        associativity: 2,
        policy: ReplacementPolicyKind::Lru,
        rrpv_bits: 2,
    };
    assert_eq!(cfg.num_sets().unwrap(), 128);
}
