//! Configuration system for the cache simulator.
//!
//! This module defines the configuration structures used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Baseline cache geometry and memory timing constants.
//! 2. **Structures:** Cache, memory, and root configuration, deserializable from JSON.
//! 3. **Validation:** Construction-time checks producing the derived [`Geometry`].
//!
//! Configuration is immutable once a controller has been built from it.

use serde::Deserialize;

use crate::common::{AddressDecoder, ConfigError, low_mask};

/// Default configuration constants for the simulator.
mod defaults {
    /// Default word address width in bits.
    pub const ADDR_WIDTH: u32 = 32;

    /// Default data word width in bits.
    pub const DATA_WIDTH: u32 = 32;

    /// Default number of lines (sets) per way.
    pub const LINES: usize = 64;

    /// Default block size in words.
    pub const WORDS_PER_BLOCK: usize = 4;

    /// Default associativity (1 way = direct-mapped).
    pub const WAYS: usize = 1;

    /// Default fixed memory latency in cycles before `ready`.
    pub const MEM_LATENCY: u64 = 2;

    /// CAS (Column Access Strobe) latency in cycles.
    ///
    /// Time from column address assertion to data availability.
    pub const T_CAS: u64 = 14;

    /// RAS (Row Access Strobe) latency in cycles.
    ///
    /// Time required to activate a row before column access.
    pub const T_RAS: u64 = 14;

    /// Precharge latency in cycles.
    ///
    /// Time required to close an active row before opening a new one.
    pub const T_PRE: u64 = 14;

    /// Words per DRAM row.
    pub const ROW_WORDS: u64 = 256;

    /// Largest cache data array, in words, accepted by validation.
    pub const MAX_STORAGE_WORDS: usize = 1 << 24;
}

/// Memory latency model used by the reference main memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum MemoryController {
    /// Every transfer waits the same number of cycles.
    #[default]
    Simple,
    /// Row-buffer model: CAS on an open-row hit, RAS+CAS when no row is
    /// open, PRE+RAS+CAS on a row change.
    #[serde(alias = "DRAM")]
    Dram,
}

/// Cache controller parameters.
///
/// Every field has a default, so a partial JSON object is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Word address width in bits.
    pub addr_width: u32,
    /// Data word width in bits.
    pub data_width: u32,
    /// Lines (sets) per way; must be a power of two.
    pub lines: usize,
    /// Words per block; must be a power of two.
    pub words_per_block: usize,
    /// Associativity, 1 or 2.
    pub ways: usize,
    /// Write-back (`true`) or write-through (`false`).
    pub write_back: bool,
    /// Write-allocate (`true`) or write-no-allocate (`false`).
    pub write_allocate: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            addr_width: defaults::ADDR_WIDTH,
            data_width: defaults::DATA_WIDTH,
            lines: defaults::LINES,
            words_per_block: defaults::WORDS_PER_BLOCK,
            ways: defaults::WAYS,
            write_back: true,
            write_allocate: true,
        }
    }
}

impl CacheConfig {
    /// Checks every construction-time constraint and derives the field widths.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when `ways` is not 1 or 2, when `lines` or
    /// `words_per_block` is not a power of two, when the data array would
    /// exceed 2^24 words, when either width is outside `1..=64`, or when
    /// index and offset do not fit in the address.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachectl_core::config::CacheConfig;
    ///
    /// let cfg = CacheConfig {
    ///     addr_width: 8,
    ///     lines: 4,
    ///     words_per_block: 2,
    ///     ..CacheConfig::default()
    /// };
    /// let geo = cfg.validate().unwrap();
    /// assert_eq!(geo.decoder().offset_bits(), 1);
    /// assert_eq!(geo.decoder().index_bits(), 2);
    /// assert_eq!(geo.decoder().tag_bits(), 5);
    /// ```
    pub fn validate(&self) -> Result<Geometry, ConfigError> {
        if !matches!(self.ways, 1 | 2) {
            return Err(ConfigError::UnsupportedWays(self.ways));
        }
        if !self.lines.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                field: "lines",
                value: self.lines,
            });
        }
        if !self.words_per_block.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                field: "words_per_block",
                value: self.words_per_block,
            });
        }
        let words = self
            .lines
            .checked_mul(self.ways)
            .and_then(|n| n.checked_mul(self.words_per_block));
        if words.is_none_or(|w| w > defaults::MAX_STORAGE_WORDS) {
            return Err(ConfigError::StorageTooLarge {
                lines: self.lines,
                ways: self.ways,
                words_per_block: self.words_per_block,
                limit: defaults::MAX_STORAGE_WORDS,
            });
        }
        if !(1..=u64::BITS).contains(&self.addr_width) {
            return Err(ConfigError::AddrWidth(self.addr_width));
        }
        if !(1..=u64::BITS).contains(&self.data_width) {
            return Err(ConfigError::DataWidth(self.data_width));
        }

        let offset_bits = self.words_per_block.trailing_zeros();
        let index_bits = self.lines.trailing_zeros();
        if index_bits + offset_bits > self.addr_width {
            return Err(ConfigError::FieldsExceedAddress {
                addr_width: self.addr_width,
                index_bits,
                offset_bits,
            });
        }
        let tag_bits = self.addr_width - index_bits - offset_bits;

        Ok(Geometry {
            lines: self.lines,
            words_per_block: self.words_per_block,
            ways: self.ways,
            write_back: self.write_back,
            write_allocate: self.write_allocate,
            decoder: AddressDecoder::new(offset_bits, index_bits, tag_bits),
            data_mask: low_mask(self.data_width),
        })
    }
}

/// Validated cache shape with every derived width computed once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Lines (sets) per way.
    pub lines: usize,
    /// Words per block.
    pub words_per_block: usize,
    /// Associativity.
    pub ways: usize,
    /// Write-back policy.
    pub write_back: bool,
    /// Write-allocate policy.
    pub write_allocate: bool,
    decoder: AddressDecoder,
    data_mask: u64,
}

impl Geometry {
    /// Address decoder for this geometry.
    #[inline(always)]
    pub const fn decoder(&self) -> &AddressDecoder {
        &self.decoder
    }

    /// Truncates a data word to the configured data width.
    #[inline(always)]
    pub const fn mask_data(&self, data: u64) -> u64 {
        data & self.data_mask
    }

    /// Word address of slot `offset` in the block `(tag, index)`.
    #[inline]
    pub const fn block_word_addr(&self, tag: u64, index: usize, offset: usize) -> u64 {
        self.decoder.compose(tag, index, offset)
    }
}

/// Reference main memory parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Latency model.
    pub controller: MemoryController,
    /// Fixed latency for the `Simple` model.
    pub latency: u64,
    /// Column access latency for the `Dram` model.
    pub t_cas: u64,
    /// Row activation latency for the `Dram` model.
    pub t_ras: u64,
    /// Precharge latency for the `Dram` model.
    pub t_pre: u64,
    /// Words per row for the `Dram` model; must be a power of two.
    pub row_words: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            controller: MemoryController::default(),
            latency: defaults::MEM_LATENCY,
            t_cas: defaults::T_CAS,
            t_ras: defaults::T_RAS,
            t_pre: defaults::T_PRE,
            row_words: defaults::ROW_WORDS,
        }
    }
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use cachectl_core::config::{Config, MemoryController};
///
/// let json = r#"{
///     "cache": { "addr_width": 16, "lines": 8, "ways": 2, "write_back": false },
///     "memory": { "controller": "Dram", "t_cas": 3 }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.cache.ways, 2);
/// assert!(!config.cache.write_back);
/// assert!(config.cache.write_allocate);
/// assert_eq!(config.memory.controller, MemoryController::Dram);
/// assert_eq!(config.memory.t_cas, 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cache controller parameters.
    pub cache: CacheConfig,
    /// Main memory parameters.
    pub memory: MemoryConfig,
}
