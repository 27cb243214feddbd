//! Error types surfaced by every layer of the simulator.
//!
//! Mirrors the shape of a RISC-V `Trap` enum from the teacher codebase, but
//! expressed with `thiserror` rather than a hand-written `Display` impl.

use thiserror::Error;

/// Any failure the simulator can report to a caller.
#[derive(Debug, Error)]
pub enum SimError {
    /// A configuration value violates an invariant (e.g. a cache geometry
    /// that is not a power of two).
    #[error("configuration error: {0}")]
    Config(String),

    /// A program line could not be parsed into a known directive or
    /// mnemonic.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based source line the error was found on.
        line: usize,
        /// Human-readable description of what went wrong.
        message: String,
    },

    /// A memory or scratchpad access fell outside the addressable range, or
    /// was not word-aligned.
    #[error("bounds error: address {address:#x}: {detail}")]
    Bounds {
        /// The offending address.
        address: u32,
        /// What constraint was violated.
        detail: String,
    },

    /// The simulator ran for `ticks` cycles without every core draining.
    #[error("timeout after {ticks} ticks without all cores draining")]
    Timeout {
        /// The configured tick budget that was exhausted.
        ticks: u64,
    },
}

/// Convenience alias used throughout the crate.
pub type SimResult<T> = Result<T, SimError>;
