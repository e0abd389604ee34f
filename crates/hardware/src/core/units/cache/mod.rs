//! Set-Associative Line Storage.
//!
//! This module holds the tag, valid, dirty, and data arrays of the cache.
//! Every access is addressed by a `(way, index)` pair and bounds-checked at
//! this boundary; the controller never indexes the arrays directly.
//!
//! Refills are staged in a separate buffer and become visible only when
//! committed, so an observer never sees a half-filled line.

/// Cache replacement policy implementations (direct-mapped, two-way LRU).
pub mod policies;

use crate::common::InvariantViolation;
use crate::config::Geometry;

/// Cache line metadata: tag, validity, and dirty bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct CacheLine {
    tag: u64,
    valid: bool,
    dirty: bool,
}

/// Block being assembled from memory.
#[derive(Clone, Debug)]
struct RefillBuffer {
    way: usize,
    index: usize,
    words: Vec<u64>,
    filled: usize,
}

/// Snapshot of one line for inspection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineView {
    /// Line holds a block.
    pub valid: bool,
    /// Line differs from memory.
    pub dirty: bool,
    /// Tag of the held block.
    pub tag: u64,
    /// Block contents, slot 0 first.
    pub words: Vec<u64>,
}

/// Tag/valid/dirty/data storage for `ways × lines` cache lines.
#[derive(Clone, Debug)]
pub struct SetStorage {
    lines: Vec<CacheLine>,
    data: Vec<u64>,
    sets: usize,
    ways: usize,
    words_per_block: usize,
    write_back: bool,
    refill: Option<RefillBuffer>,
}

impl SetStorage {
    /// Creates storage with every line invalid and zeroed.
    pub fn new(geometry: &Geometry) -> Self {
        let count = geometry.lines * geometry.ways;
        Self {
            lines: vec![CacheLine::default(); count],
            data: vec![0; count * geometry.words_per_block],
            sets: geometry.lines,
            ways: geometry.ways,
            words_per_block: geometry.words_per_block,
            write_back: geometry.write_back,
            refill: None,
        }
    }

    /// Flat line position of `(way, index)`.
    ///
    /// # Panics
    ///
    /// Panics if `way` or `index` is out of range.
    #[inline]
    fn position(&self, way: usize, index: usize) -> usize {
        assert!(
            way < self.ways && index < self.sets,
            "line (way {way}, set {index}) outside {}x{} storage",
            self.ways,
            self.sets
        );
        index * self.ways + way
    }

    /// Flat data position of a word.
    ///
    /// # Panics
    ///
    /// Panics if any coordinate is out of range.
    #[inline]
    fn word_position(&self, way: usize, index: usize, offset: usize) -> usize {
        assert!(
            offset < self.words_per_block,
            "offset {offset} outside {}-word block",
            self.words_per_block
        );
        self.position(way, index) * self.words_per_block + offset
    }

    /// Looks up `tag` in set `index`.
    ///
    /// # Returns
    ///
    /// `Some(way)` on a hit, `None` on a miss.
    ///
    /// # Errors
    ///
    /// [`InvariantViolation::MultipleHits`] when more than one valid way
    /// carries `tag`.
    pub fn probe(&self, index: usize, tag: u64) -> Result<Option<usize>, InvariantViolation> {
        let mut hit = None;
        for way in 0..self.ways {
            let line = &self.lines[self.position(way, index)];
            if line.valid && line.tag == tag {
                if hit.is_some() {
                    return Err(InvariantViolation::MultipleHits { index, tag });
                }
                hit = Some(way);
            }
        }
        Ok(hit)
    }

    /// Reads one word of a line.
    pub fn read_word(&self, way: usize, index: usize, offset: usize) -> u64 {
        self.data[self.word_position(way, index, offset)]
    }

    /// Writes one word of a valid line, marking it dirty under write-back.
    pub fn write_word(&mut self, way: usize, index: usize, offset: usize, data: u64) {
        let pos = self.word_position(way, index, offset);
        self.data[pos] = data;
        let write_back = self.write_back;
        let pos = self.position(way, index);
        let line = &mut self.lines[pos];
        debug_assert!(line.valid, "write to invalid line (way {way}, set {index})");
        if write_back {
            line.dirty = true;
        }
    }

    /// Returns `true` if the line holds a block.
    pub fn is_valid(&self, way: usize, index: usize) -> bool {
        self.lines[self.position(way, index)].valid
    }

    /// Returns `true` if the line is valid and modified.
    pub fn is_dirty(&self, way: usize, index: usize) -> bool {
        self.lines[self.position(way, index)].dirty
    }

    /// Tag of the block held by the line; meaningless when invalid.
    pub fn tag(&self, way: usize, index: usize) -> u64 {
        self.lines[self.position(way, index)].tag
    }

    /// Opens a refill of `(way, index)`. Any previous staged refill is dropped.
    pub fn begin_refill(&mut self, way: usize, index: usize) {
        assert!(
            way < self.ways && index < self.sets,
            "refill of line (way {way}, set {index}) outside {}x{} storage",
            self.ways,
            self.sets
        );
        self.refill = Some(RefillBuffer {
            way,
            index,
            words: vec![0; self.words_per_block],
            filled: 0,
        });
    }

    /// Stores the next word of the open refill.
    ///
    /// # Errors
    ///
    /// [`InvariantViolation::NoRefillInProgress`] when no refill of
    /// `(way, index)` is open, [`InvariantViolation::RefillOutOfOrder`] when
    /// `slot` is not the next expected slot.
    pub fn supply_refill_word(
        &mut self,
        way: usize,
        index: usize,
        slot: usize,
        data: u64,
    ) -> Result<(), InvariantViolation> {
        let buf = match self.refill.as_mut() {
            Some(buf) if buf.way == way && buf.index == index => buf,
            _ => return Err(InvariantViolation::NoRefillInProgress { way, index }),
        };
        if slot != buf.filled || slot >= buf.words.len() {
            return Err(InvariantViolation::RefillOutOfOrder {
                expected: buf.filled,
                got: slot,
            });
        }
        buf.words[slot] = data;
        buf.filled += 1;
        Ok(())
    }

    /// Publishes the staged block: valid, clean, tagged with `tag`.
    ///
    /// # Errors
    ///
    /// [`InvariantViolation::NoRefillInProgress`] when no refill of
    /// `(way, index)` is open, [`InvariantViolation::IncompleteRefill`] when
    /// fewer than `words_per_block` words were supplied. The staged refill is
    /// left in place on error.
    pub fn commit_refill(
        &mut self,
        way: usize,
        index: usize,
        tag: u64,
    ) -> Result<(), InvariantViolation> {
        let buf = match self.refill.take() {
            Some(buf) if buf.way == way && buf.index == index => buf,
            other => {
                self.refill = other;
                return Err(InvariantViolation::NoRefillInProgress { way, index });
            }
        };
        if buf.filled != buf.words.len() {
            let err = InvariantViolation::IncompleteRefill {
                filled: buf.filled,
                words: buf.words.len(),
            };
            self.refill = Some(buf);
            return Err(err);
        }

        let base = self.word_position(way, index, 0);
        self.data[base..base + self.words_per_block].copy_from_slice(&buf.words);
        let pos = self.position(way, index);
        self.lines[pos] = CacheLine {
            tag,
            valid: true,
            dirty: false,
        };
        Ok(())
    }

    /// Clears the dirty bit after the line has been written back.
    pub fn mark_clean(&mut self, way: usize, index: usize) {
        let pos = self.position(way, index);
        self.lines[pos].dirty = false;
    }

    /// Invalidates every line, zeroes the data, and drops any staged refill.
    pub fn invalidate_all(&mut self) {
        self.lines.fill(CacheLine::default());
        self.data.fill(0);
        self.refill = None;
    }

    /// Returns `true` while a refill is staged.
    pub fn refill_in_progress(&self) -> bool {
        self.refill.is_some()
    }

    /// Snapshot of a line.
    pub fn line(&self, way: usize, index: usize) -> LineView {
        let meta = self.lines[self.position(way, index)];
        let base = self.word_position(way, index, 0);
        LineView {
            valid: meta.valid,
            dirty: meta.dirty,
            tag: meta.tag,
            words: self.data[base..base + self.words_per_block].to_vec(),
        }
    }

    /// Number of ways.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Number of sets.
    pub const fn sets(&self) -> usize {
        self.sets
    }
}
