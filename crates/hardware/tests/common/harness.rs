//! Test harness: small configurations and a CPU-side request driver.

use cachectl_core::CacheController;
use cachectl_core::config::CacheConfig;
use cachectl_core::core::controller::signals::{CpuRequest, CpuResponse};
use cachectl_core::soc::MemoryPort;

/// Upper bound on cycles for one request before a test is declared hung.
pub const MAX_CYCLES: u64 = 10_000;

/// 8-bit word addresses, 4 lines, 2 words per block.
///
/// With these parameters:
///   - offset = addr & 1
///   - index  = (addr >> 1) & 3
///   - tag    = addr >> 3
pub fn small_config(ways: usize, write_back: bool, write_allocate: bool) -> CacheConfig {
    CacheConfig {
        addr_width: 8,
        data_width: 32,
        lines: 4,
        words_per_block: 2,
        ways,
        write_back,
        write_allocate,
    }
}

/// Builds a controller, panicking on an invalid configuration.
pub fn controller(config: &CacheConfig) -> CacheController {
    CacheController::new(config).unwrap()
}

/// Presents `req` for one cycle, then ticks idle until `ready`.
///
/// Returns the completing response and the number of cycles taken.
pub fn run<M: MemoryPort>(
    ctrl: &mut CacheController,
    mem: &mut M,
    req: CpuRequest,
) -> (CpuResponse, u64) {
    let mut present = Some(req);
    for cycle in 1..=MAX_CYCLES {
        let resp = ctrl.tick(present.take(), mem).unwrap();
        if resp.ready {
            return (resp, cycle);
        }
    }
    panic!("request {req:?} did not complete within {MAX_CYCLES} cycles");
}

/// Loads `addr`, returning the data.
pub fn read<M: MemoryPort>(ctrl: &mut CacheController, mem: &mut M, addr: u64) -> u64 {
    run(ctrl, mem, CpuRequest::read(addr)).0.read_data
}

/// Stores `data` at `addr`.
pub fn write<M: MemoryPort>(ctrl: &mut CacheController, mem: &mut M, addr: u64, data: u64) {
    let _ = run(ctrl, mem, CpuRequest::write(addr, data));
}

/// Installs a test-writer tracing subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("trace"))
        .with_test_writer()
        .try_init();
}
