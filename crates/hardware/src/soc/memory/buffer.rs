//! Sparse Word Buffer.
//!
//! Backing storage for main memory. Addresses span up to 64 bits, so words
//! are allocated lazily on first write; unwritten words read as zero.

use std::collections::HashMap;

/// Lazily allocated word-addressed storage.
#[derive(Clone, Debug, Default)]
pub struct WordBuffer {
    words: HashMap<u64, u64>,
}

impl WordBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the word at `addr`, zero if never written.
    #[inline]
    pub fn read(&self, addr: u64) -> u64 {
        self.words.get(&addr).copied().unwrap_or(0)
    }

    /// Writes the word at `addr`.
    ///
    /// Writing zero releases the entry.
    #[inline]
    pub fn write(&mut self, addr: u64, val: u64) {
        if val == 0 {
            let _ = self.words.remove(&addr);
        } else {
            let _ = self.words.insert(addr, val);
        }
    }

    /// Number of non-zero words held.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if every word reads as zero.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Resets every word to zero.
    pub fn clear(&mut self) {
        self.words.clear();
    }
}
