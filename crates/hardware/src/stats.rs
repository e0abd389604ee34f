//! Cache controller statistics collection and reporting.
//!
//! This module tracks performance metrics for the cache controller. It provides:
//! 1. **Requests:** Accepted CPU loads and stores.
//! 2. **Lookups:** Hit and miss counts with derived rates.
//! 3. **Memory traffic:** Block writebacks, refills, write-throughs, and words moved.
//! 4. **Stalls:** Cycles spent waiting for memory `ready`.

/// Counters updated by the controller on every tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Total controller cycles elapsed.
    pub cycles: u64,
    /// CPU requests latched.
    pub requests: u64,
    /// Latched loads.
    pub reads: u64,
    /// Latched stores.
    pub writes: u64,
    /// Lookups that found the block.
    pub hits: u64,
    /// Lookups that missed.
    pub misses: u64,
    /// Dirty blocks written back.
    pub writebacks: u64,
    /// Blocks refilled from memory.
    pub refills: u64,
    /// Stores forwarded to memory (write-through or no-allocate).
    pub write_throughs: u64,
    /// Words read from memory.
    pub mem_words_read: u64,
    /// Words written to memory.
    pub mem_words_written: u64,
    /// Cycles with a memory request outstanding and no `ready`.
    pub mem_stall_cycles: u64,
}

impl CacheStats {
    /// Fraction of lookups that hit, or 0 when there were none.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Fraction of lookups that missed, or 0 when there were none.
    pub fn miss_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.misses as f64 / total as f64
        }
    }

    /// Prints the statistics report to stdout.
    pub fn print(&self) {
        let cyc = self.cycles.max(1);
        println!("\n==========================================================");
        println!("CACHE CONTROLLER STATISTICS");
        println!("==========================================================");
        println!("sim_cycles               {}", self.cycles);
        println!("requests                 {}", self.requests);
        println!("  op.read                {}", self.reads);
        println!("  op.write               {}", self.writes);
        println!("----------------------------------------------------------");
        println!("LOOKUP");
        println!(
            "  hits                   {} ({:.2}%)",
            self.hits,
            self.hit_rate() * 100.0
        );
        println!(
            "  misses                 {} ({:.2}%)",
            self.misses,
            self.miss_rate() * 100.0
        );
        println!("----------------------------------------------------------");
        println!("MEMORY");
        println!("  blocks.writeback       {}", self.writebacks);
        println!("  blocks.refill          {}", self.refills);
        println!("  stores.write_through   {}", self.write_throughs);
        println!("  words.read             {}", self.mem_words_read);
        println!("  words.written          {}", self.mem_words_written);
        println!(
            "  stalls.memory          {} ({:.2}%)",
            self.mem_stall_cycles,
            (self.mem_stall_cycles as f64 / cyc as f64) * 100.0
        );
        println!("==========================================================");
    }
}
