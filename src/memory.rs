//! Flat, word-addressable main memory shared by every core.

use tracing::warn;

use crate::error::{SimError, SimResult};

/// Main memory: an ordered sequence of 32-bit signed words.
#[derive(Debug, Clone)]
pub struct MainMemory {
    words: Vec<i32>,
}

impl MainMemory {
    /// Creates a zero-filled memory of `num_words` words.
    #[must_use]
    pub fn new(num_words: usize) -> Self {
        Self {
            words: vec![0; num_words],
        }
    }

    fn word_index(&self, addr: u32) -> SimResult<usize> {
        if addr % 4 != 0 {
            warn!(address = addr, "unaligned memory access");
            return Err(SimError::Bounds {
                address: addr,
                detail: "address is not word-aligned".to_string(),
            });
        }
        let idx = (addr / 4) as usize;
        if idx >= self.words.len() {
            warn!(address = addr, "out-of-range memory access");
            return Err(SimError::Bounds {
                address: addr,
                detail: format!("out of range for a {}-word memory", self.words.len()),
            });
        }
        Ok(idx)
    }

    /// Reads the word at `addr`.
    ///
    /// # Errors
    /// Returns [`SimError::Bounds`] if `addr` is unaligned or out of range.
    pub fn read_word(&self, addr: u32) -> SimResult<i32> {
        let idx = self.word_index(addr)?;
        Ok(self.words[idx])
    }

    /// Writes `value` to the word at `addr`.
    ///
    /// # Errors
    /// Returns [`SimError::Bounds`] if `addr` is unaligned or out of range.
    pub fn write_word(&mut self, addr: u32, value: i32) -> SimResult<()> {
        let idx = self.word_index(addr)?;
        self.words[idx] = value;
        Ok(())
    }

    /// Total addressable words.
    #[must_use]
    pub fn len_words(&self) -> usize {
        self.words.len()
    }

    /// A reporting aid: groups every word by `word_index mod num_cores`,
    /// returning one stripe of words per core in index order.
    #[must_use]
    pub fn view_by_core_stripe(&self, num_cores: usize) -> Vec<Vec<i32>> {
        let mut stripes = vec![Vec::new(); num_cores];
        for (i, &w) in self.words.iter().enumerate() {
            stripes[i % num_cores].push(w);
        }
        stripes
    }
}
