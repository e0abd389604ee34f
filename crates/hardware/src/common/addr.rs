//! Word address decomposition.
//!
//! This module splits word addresses into the three fields a cache indexes by. It provides:
//! 1. **Decoding:** `tag` (high bits), `index` (middle bits), and `offset` (low bits).
//! 2. **Composition:** The inverse mapping, used to address writeback and refill transfers.
//! 3. **Masking:** Truncation of raw addresses to the configured address width.

/// A word address split into its cache fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecodedAddr {
    /// High-order bits identifying the block within its set.
    pub tag: u64,
    /// Set (line) selector.
    pub index: usize,
    /// Word selector within the block.
    pub offset: usize,
}

/// Splits addresses into `{tag, index, offset}` using fixed field widths.
///
/// The decoder is total: every input is masked to `addr_width` first, so no
/// address can produce an out-of-range index or offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressDecoder {
    offset_bits: u32,
    index_bits: u32,
    tag_bits: u32,
}

/// Returns a mask with the low `bits` bits set. Saturates at 64 bits.
#[inline(always)]
pub const fn low_mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

impl AddressDecoder {
    /// Creates a decoder from field widths.
    ///
    /// Callers are expected to have validated that the three widths sum to at
    /// most 64; `CacheConfig::validate` guarantees this.
    pub const fn new(offset_bits: u32, index_bits: u32, tag_bits: u32) -> Self {
        Self {
            offset_bits,
            index_bits,
            tag_bits,
        }
    }

    /// Width of the offset field in bits.
    #[inline(always)]
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Width of the index field in bits.
    #[inline(always)]
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Width of the tag field in bits.
    #[inline(always)]
    pub const fn tag_bits(&self) -> u32 {
        self.tag_bits
    }

    /// Total decoded address width in bits.
    #[inline(always)]
    pub const fn addr_bits(&self) -> u32 {
        self.offset_bits + self.index_bits + self.tag_bits
    }

    /// Truncates a raw address to the decoded address width.
    #[inline(always)]
    pub const fn mask(&self, addr: u64) -> u64 {
        addr & low_mask(self.addr_bits())
    }

    /// Splits `addr` into tag, index, and offset.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachectl_core::common::AddressDecoder;
    ///
    /// // 8-bit addresses, 4 lines, 2 words per block.
    /// let dec = AddressDecoder::new(1, 2, 5);
    /// let d = dec.decode(0b1011_0101);
    /// assert_eq!(d.offset, 1);
    /// assert_eq!(d.index, 0b10);
    /// assert_eq!(d.tag, 0b10110);
    /// ```
    #[inline]
    pub const fn decode(&self, addr: u64) -> DecodedAddr {
        let addr = self.mask(addr);
        let offset = addr & low_mask(self.offset_bits);
        let index = (addr >> self.offset_bits) & low_mask(self.index_bits);
        let tag = if self.offset_bits + self.index_bits >= u64::BITS {
            0
        } else {
            (addr >> (self.offset_bits + self.index_bits)) & low_mask(self.tag_bits)
        };
        DecodedAddr {
            tag,
            index: index as usize,
            offset: offset as usize,
        }
    }

    /// Reassembles an address from its fields.
    ///
    /// Out-of-range fields are truncated to their widths, so
    /// `compose(decode(a)) == mask(a)` for every `a`.
    #[inline]
    pub const fn compose(&self, tag: u64, index: usize, offset: usize) -> u64 {
        let offset = (offset as u64) & low_mask(self.offset_bits);
        let index = (index as u64) & low_mask(self.index_bits);
        let tag = tag & low_mask(self.tag_bits);
        let low = offset | (index << self.offset_bits);
        if self.offset_bits + self.index_bits >= u64::BITS {
            low
        } else {
            low | (tag << (self.offset_bits + self.index_bits))
        }
    }
}
