//! Statistics Tests.

use cachectl_core::stats::CacheStats;

#[test]
fn rates_are_zero_without_lookups() {
    let s = CacheStats::default();
    assert_eq!(s.hit_rate(), 0.0);
    assert_eq!(s.miss_rate(), 0.0);
}

#[test]
fn rates_sum_to_one() {
    let s = CacheStats {
        hits: 3,
        misses: 1,
        ..CacheStats::default()
    };
    assert!((s.hit_rate() - 0.75).abs() < f64::EPSILON);
    assert!((s.miss_rate() - 0.25).abs() < f64::EPSILON);
}

#[test]
fn print_does_not_panic_on_empty_stats() {
    CacheStats::default().print();
}
