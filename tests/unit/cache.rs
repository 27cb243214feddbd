//! Single-level `CacheSim` eviction policy tests, and a hierarchy-level
//! write-back + write-allocate round trip through L1-D, L2, and memory.

use coresim::cache::policies::ReplacementPolicyKind;
use coresim::cache::CacheSim;
use coresim::config::{CacheConfig, LatencyConfig};
use coresim::hierarchy::CacheHierarchy;
use coresim::memory::MainMemory;

fn cfg(cache_size: usize, block_size: usize, associativity: usize, policy: ReplacementPolicyKind) -> CacheConfig {
    CacheConfig {
        cache_size,
        block_size,
        associativity,
        policy,
        rrpv_bits: 2,
    }
}

#[test]
fn lru_evicts_the_least_recently_touched_way() {
    let mut cache = CacheSim::new(&cfg(2, 1, 2, ReplacementPolicyKind::Lru)).unwrap();
    assert!(cache.fill(0, vec![100]).is_none());
    assert!(cache.fill(4, vec![200]).is_none());
    assert_eq!(cache.lookup(0), Some(100)); // touches way 0, way 1 is now LRU
    assert!(cache.fill(8, vec![300]).is_none()); // evicts way 1 (addr 4's block)
    assert!(cache.contains(0));
    assert!(!cache.contains(4));
    assert!(cache.contains(8));
}

#[test]
fn evicting_a_dirty_block_returns_its_data_for_write_back() {
    let mut cache = CacheSim::new(&cfg(1, 1, 1, ReplacementPolicyKind::Lru)).unwrap();
    assert!(cache.fill(0, vec![1]).is_none());
    assert!(cache.write(0, 55));

    let evicted = cache.fill(4, vec![0]).expect("single-way cache must evict");
    assert_eq!(evicted.base_addr, 0);
    assert_eq!(evicted.data, vec![55]);
}

#[test]
fn fill_on_a_clean_block_does_not_report_a_write_back() {
    let mut cache = CacheSim::new(&cfg(1, 1, 1, ReplacementPolicyKind::Lru)).unwrap();
    assert!(cache.fill(0, vec![1]).is_none());
    assert!(cache.fill(4, vec![2]).is_none());
}

#[test]
fn srrip_prefers_evicting_a_block_at_max_rrpv() {
    let mut cache = CacheSim::new(&cfg(2, 1, 2, ReplacementPolicyKind::Srrip)).unwrap();
    assert!(cache.fill(0, vec![10]).is_none()); // inserted at max_rrpv - 1
    assert!(cache.fill(4, vec![20]).is_none()); // inserted at max_rrpv - 1
    assert_eq!(cache.lookup(0), Some(10)); // resets way 0's rrpv to 0
    // way 1 ages toward max_rrpv fastest; it is the one evicted.
    assert!(cache.fill(8, vec![30]).is_none());
    assert!(cache.contains(0));
    assert!(!cache.contains(4));
}

#[test]
fn write_to_an_absent_block_is_rejected() {
    let mut cache = CacheSim::new(&cfg(1, 1, 1, ReplacementPolicyKind::Lru)).unwrap();
    assert!(!cache.write(0, 1));
}

#[test]
fn flush_dirty_and_reset_drains_only_dirty_blocks_and_empties_the_cache() {
    let mut cache = CacheSim::new(&cfg(2, 1, 2, ReplacementPolicyKind::Lru)).unwrap();
    cache.fill(0, vec![1]);
    cache.write(0, 99); // dirty
    cache.fill(4, vec![2]); // clean

    let flushed = cache.flush_dirty_and_reset();
    assert_eq!(flushed.len(), 1);
    assert_eq!(flushed[0].base_addr, 0);
    assert_eq!(flushed[0].data, vec![99]);
    assert!(!cache.contains(0));
    assert!(!cache.contains(4));
}

#[test]
fn hierarchy_write_propagates_to_l2_before_memory_is_touched() {
    let l1_cfg = cfg(1, 1, 1, ReplacementPolicyKind::Lru);
    let l2_cfg = cfg(1, 1, 1, ReplacementPolicyKind::Lru);
    let mut l1d = CacheSim::new(&l1_cfg).unwrap();
    let l2 = CacheSim::new(&l2_cfg).unwrap();
    let mut hierarchy = CacheHierarchy::new(l2, LatencyConfig::default());
    let mut mem = MainMemory::new(4);

    let _ = hierarchy.write(&mut l1d, &mut mem, 0, 77).unwrap();
    // L2 now holds the written value (write-allocate, eager L1<->L2 sync),
    // but the write-back to memory is still deferred.
    assert_eq!(mem.read_word(0).unwrap(), 0);

    // A second write that maps into the same (single) L1-D set evicts the
    // dirty block holding address 0, which is when memory finally updates.
    let _ = hierarchy.write(&mut l1d, &mut mem, 4, 88).unwrap();
    assert_eq!(mem.read_word(0).unwrap(), 77);
}

#[test]
fn barrier_style_flush_makes_a_core_write_visible_through_l2() {
    let l1_cfg = cfg(1, 1, 1, ReplacementPolicyKind::Lru);
    let l2_cfg = cfg(2, 1, 2, ReplacementPolicyKind::Lru);
    let mut writer_l1d = CacheSim::new(&l1_cfg).unwrap();
    let mut reader_l1d = CacheSim::new(&l1_cfg).unwrap();
    let l2 = CacheSim::new(&l2_cfg).unwrap();
    let mut hierarchy = CacheHierarchy::new(l2, LatencyConfig::default());
    let mut mem = MainMemory::new(4);

    let _ = hierarchy.write(&mut writer_l1d, &mut mem, 0, 42).unwrap();
    let _ = hierarchy.flush_l1_dirty_to_l2(&mut writer_l1d, &mut mem, 0).unwrap();

    let (value, _cycles) = hierarchy.read(&mut reader_l1d, &mut mem, 0).unwrap();
    assert_eq!(value, 42);
}
