//! Pluggable cache replacement policies.

mod lru;
mod srrip;

pub use lru::LruPolicy;
pub use srrip::SrripPolicy;

use serde::Deserialize;

/// Which policy a [`crate::config::CacheConfig`] selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplacementPolicyKind {
    #[default]
    Lru,
    Srrip,
}

/// Shared interface for cache eviction policies.
///
/// A policy tracks per-`(set, way)` recency/age state external to the cache
/// blocks themselves, exactly as the teacher's `ReplacementPolicy` trait
/// does; `is_insertion` distinguishes a fresh fill (which may seed different
/// state than a hit, as SRRIP's `max_rrpv - 1` does) from a touch on an
/// existing block.
pub trait ReplacementPolicy {
    /// Records that `way` within `set` was just accessed.
    fn update(&mut self, set: usize, way: usize, is_insertion: bool);

    /// Selects the way to evict within `set`.
    fn get_victim(&mut self, set: usize) -> usize;
}

/// Builds the policy named by `kind` for a cache with `num_sets` sets and
/// `ways` ways per set.
#[must_use]
pub fn build(
    kind: ReplacementPolicyKind,
    num_sets: usize,
    ways: usize,
    rrpv_bits: u32,
) -> Box<dyn ReplacementPolicy> {
    match kind {
        ReplacementPolicyKind::Lru => Box::new(LruPolicy::new(num_sets, ways)),
        ReplacementPolicyKind::Srrip => Box::new(SrripPolicy::new(num_sets, ways, rrpv_bits)),
    }
}
