//! Configuration Tests.
//!
//! Defaults, construction-time validation, and JSON deserialization.

use cachectl_core::CacheController;
use cachectl_core::common::ConfigError;
use cachectl_core::config::{CacheConfig, Config, MemoryConfig, MemoryController};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::small_config;

// ══════════════════════════════════════════════════════════
// 1. Defaults
// ══════════════════════════════════════════════════════════

#[test]
fn default_cache_is_valid() {
    let cfg = CacheConfig::default();
    assert_eq!(cfg.ways, 1);
    assert!(cfg.write_back);
    assert!(cfg.write_allocate);

    let geo = cfg.validate().unwrap();
    assert_eq!(geo.lines, 64);
    assert_eq!(geo.words_per_block, 4);
    assert_eq!(geo.decoder().offset_bits(), 2);
    assert_eq!(geo.decoder().index_bits(), 6);
    assert_eq!(geo.decoder().tag_bits(), 24);
}

#[test]
fn default_memory_is_simple() {
    let mem = MemoryConfig::default();
    assert_eq!(mem.controller, MemoryController::Simple);
    assert_eq!(mem.latency, 2);
}

// ══════════════════════════════════════════════════════════
// 2. Validation
// ══════════════════════════════════════════════════════════

#[rstest]
#[case::four_ways(CacheConfig { ways: 4, ..CacheConfig::default() }, ConfigError::UnsupportedWays(4))]
#[case::zero_ways(CacheConfig { ways: 0, ..CacheConfig::default() }, ConfigError::UnsupportedWays(0))]
#[case::lines_not_pow2(
    CacheConfig { lines: 6, ..CacheConfig::default() },
    ConfigError::NotPowerOfTwo { field: "lines", value: 6 }
)]
#[case::zero_lines(
    CacheConfig { lines: 0, ..CacheConfig::default() },
    ConfigError::NotPowerOfTwo { field: "lines", value: 0 }
)]
#[case::block_not_pow2(
    CacheConfig { words_per_block: 3, ..CacheConfig::default() },
    ConfigError::NotPowerOfTwo { field: "words_per_block", value: 3 }
)]
#[case::zero_addr_width(CacheConfig { addr_width: 0, ..CacheConfig::default() }, ConfigError::AddrWidth(0))]
#[case::wide_addr(CacheConfig { addr_width: 65, ..CacheConfig::default() }, ConfigError::AddrWidth(65))]
#[case::zero_data_width(CacheConfig { data_width: 0, ..CacheConfig::default() }, ConfigError::DataWidth(0))]
#[case::fields_exceed(
    CacheConfig { addr_width: 4, lines: 8, words_per_block: 4, ..CacheConfig::default() },
    ConfigError::FieldsExceedAddress { addr_width: 4, index_bits: 3, offset_bits: 2 }
)]
fn invalid_configs_rejected(#[case] cfg: CacheConfig, #[case] expected: ConfigError) {
    assert_eq!(cfg.validate().unwrap_err(), expected);
}

#[test]
fn oversized_storage_rejected() {
    // 2 * 2^63 words overflows the data array size.
    let overflow = CacheConfig {
        addr_width: 64,
        lines: 2,
        words_per_block: 1 << 63,
        ..CacheConfig::default()
    };
    assert!(matches!(
        overflow.validate(),
        Err(ConfigError::StorageTooLarge { lines: 2, .. })
    ));
    assert!(CacheController::new(&overflow).is_err());

    // Fits in usize but not in the storage limit.
    let huge = CacheConfig {
        addr_width: 64,
        lines: 1 << 20,
        ways: 2,
        words_per_block: 1 << 10,
        ..CacheConfig::default()
    };
    assert!(matches!(
        huge.validate(),
        Err(ConfigError::StorageTooLarge { ways: 2, .. })
    ));
}

#[test]
fn storage_limit_is_inclusive() {
    let cfg = CacheConfig {
        lines: 1 << 12,
        words_per_block: 1 << 12,
        ..CacheConfig::default()
    };
    assert!(cfg.validate().is_ok());
}

#[test]
fn ways_checked_before_sizes() {
    let cfg = CacheConfig {
        ways: 3,
        lines: 5,
        ..CacheConfig::default()
    };
    assert_eq!(cfg.validate().unwrap_err(), ConfigError::UnsupportedWays(3));
}

#[test]
fn fields_may_fill_the_address() {
    // index + offset == addr_width leaves a zero-width tag.
    let cfg = CacheConfig {
        addr_width: 5,
        lines: 8,
        words_per_block: 4,
        ..CacheConfig::default()
    };
    let geo = cfg.validate().unwrap();
    assert_eq!(geo.decoder().tag_bits(), 0);
}

#[test]
fn geometry_masks_data_and_composes_addresses() {
    let cfg = CacheConfig {
        data_width: 8,
        ..small_config(1, true, true)
    };
    let geo = cfg.validate().unwrap();
    assert_eq!(geo.mask_data(0x1234), 0x34);
    assert_eq!(geo.block_word_addr(2, 0, 1), 17);
}

// ══════════════════════════════════════════════════════════
// 3. Deserialization
// ══════════════════════════════════════════════════════════

#[test]
fn empty_json_gives_defaults() {
    let cfg: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, Config::default());
}

#[test]
fn partial_json_fills_defaults() {
    let json = r#"{ "cache": { "ways": 2, "write_allocate": false } }"#;
    let cfg: Config = serde_json::from_str(json).unwrap();
    assert_eq!(cfg.cache.ways, 2);
    assert!(!cfg.cache.write_allocate);
    assert_eq!(cfg.cache.lines, CacheConfig::default().lines);
    assert_eq!(cfg.memory, MemoryConfig::default());
}

#[rstest]
#[case("\"Simple\"", MemoryController::Simple)]
#[case("\"Dram\"", MemoryController::Dram)]
#[case("\"DRAM\"", MemoryController::Dram)]
fn memory_controller_names(#[case] json: &str, #[case] expected: MemoryController) {
    let parsed: MemoryController = serde_json::from_str(json).unwrap();
    assert_eq!(parsed, expected);
}

#[test]
fn unknown_controller_rejected() {
    let json = r#"{ "memory": { "controller": "Sram" } }"#;
    assert!(serde_json::from_str::<Config>(json).is_err());
}
