//! Simulator Tests.
//!
//! The controller paired with the reference main memory.

use cachectl_core::Simulator;
use cachectl_core::config::{Config, MemoryConfig, MemoryController};
use cachectl_core::core::controller::fsm::State;
use cachectl_core::core::controller::signals::CpuRequest;
use pretty_assertions::assert_eq;

use crate::common::harness::small_config;

fn sim(ways: usize, write_back: bool, write_allocate: bool, latency: u64) -> Simulator {
    Simulator::new(&Config {
        cache: small_config(ways, write_back, write_allocate),
        memory: MemoryConfig {
            latency,
            ..MemoryConfig::default()
        },
    })
    .unwrap()
}

#[test]
fn invalid_config_rejected() {
    let mut cfg = Config::default();
    cfg.cache.ways = 8;
    assert!(Simulator::new(&cfg).is_err());
}

#[test]
fn dirty_eviction_writes_back_to_main_memory() {
    let mut s = sim(1, true, true, 0);

    s.write(0, 0xAA).unwrap();
    assert_eq!(s.memory.peek(0), 0);
    assert_eq!(s.read(0).unwrap(), 0xAA);

    s.write(16, 0xBB).unwrap();
    assert_eq!(s.memory.peek(0), 0xAA);
    assert_eq!(s.memory.peek(16), 0);

    // Real memory returns the written-back copy.
    assert_eq!(s.read(0).unwrap(), 0xAA);
    assert_eq!(s.memory.peek(16), 0xBB);
}

#[test]
fn access_reports_cycles() {
    let mut s = sim(1, true, true, 2);
    let miss = s.access(CpuRequest::read(3)).unwrap();
    assert_eq!(miss.cycles, 6 + 2 * 2);
    let hit = s.access(CpuRequest::read(2)).unwrap();
    assert_eq!(hit.cycles, 3);
}

#[test]
fn access_finishes_manual_request_first() {
    let mut s = sim(1, true, true, 1);
    s.memory.poke(4, 0x44);
    let _ = s.tick(Some(CpuRequest::read(4))).unwrap();
    assert_eq!(s.controller.state(), State::Lookup);

    let out = s.access(CpuRequest::read(5)).unwrap();
    assert_eq!(out.cycles, 3);
    assert_eq!(s.controller.stats().requests, 2);
    assert_eq!(s.read(4).unwrap(), 0x44);
}

#[test]
fn write_through_keeps_memory_current() {
    let mut s = sim(2, false, true, 1);
    for addr in 0..8 {
        s.write(addr, addr * 3).unwrap();
        assert_eq!(s.memory.peek(addr), addr * 3);
    }
    assert_eq!(s.controller.stats().writebacks, 0);
}

#[test]
fn idle_advances_clock() {
    let mut s = sim(1, true, true, 0);
    s.idle(10).unwrap();
    assert_eq!(s.controller.stats().cycles, 10);
}

#[test]
fn reset_keeps_memory() {
    let mut s = sim(1, false, true, 0);
    s.write(1, 0x11).unwrap();
    s.reset();
    assert!(!s.controller.line(0, 0).valid);
    assert_eq!(s.memory.peek(1), 0x11);
    assert_eq!(s.read(1).unwrap(), 0x11);
}

#[test]
fn dram_timing_applies() {
    let mut s = Simulator::new(&Config {
        cache: small_config(1, true, true),
        memory: MemoryConfig {
            controller: MemoryController::Dram,
            t_cas: 1,
            t_ras: 2,
            t_pre: 3,
            row_words: 4,
            ..MemoryConfig::default()
        },
    })
    .unwrap();
    // Cold row (3) then open-row hit (1): 3 + (3 + 1) + (1 + 1) + 1.
    let out = s.access(CpuRequest::read(0)).unwrap();
    assert_eq!(out.cycles, 10);
}
