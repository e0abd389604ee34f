//! Cache controller simulator CLI.
//!
//! This binary provides a single entry point for trace-driven simulation. It performs:
//! 1. **Trace run:** Execute a JSON trace of loads and stores and print statistics.
//! 2. **Config check:** Validate a configuration file and print the derived geometry.

use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::{fs, process};
use tracing_subscriber::EnvFilter;

use cachectl_core::config::Config;
use cachectl_core::sim::trace;

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Cycle-accurate cache controller simulator",
    long_about = "Run a JSON trace of CPU loads and stores through a configurable cache controller.\n\nExamples:\n  cachesim run traces/writeback.json\n  cachesim run traces/lru.json --config configs/two_way.json -v\n  cachesim check-config configs/two_way.json"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a trace file and print statistics.
    Run {
        /// Trace file (JSON).
        trace: PathBuf,

        /// Configuration file (JSON); overrides any config embedded in the trace.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print every load result.
        #[arg(long)]
        show_reads: bool,
    },

    /// Validate a configuration file.
    CheckConfig {
        /// Configuration file (JSON).
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match cli.command {
        Commands::Run {
            trace,
            config,
            show_reads,
        } => cmd_run(&trace, config.as_deref(), show_reads),
        Commands::CheckConfig { path } => cmd_check_config(&path),
    };
    process::exit(code);
}

/// Installs the `fmt` subscriber; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads and parses a configuration file, exiting on failure.
fn load_config(path: &Path) -> Config {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading config {}: {}", path.display(), e);
        process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("Error parsing config {}: {}", path.display(), e);
        process::exit(1);
    })
}

/// Runs a trace; returns the process exit code.
fn cmd_run(trace_path: &Path, config_path: Option<&Path>, show_reads: bool) -> i32 {
    let config = config_path.map(load_config);

    let (sim, report) = match trace::run_file(trace_path, config.as_ref()) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("\n[!] FATAL: {}", e);
            return 1;
        }
    };

    if show_reads {
        for r in &report.reads {
            println!(
                "[{:>5}] read {:#010x} -> {:#x} ({} cycles)",
                r.op_index, r.addr, r.data, r.cycles
            );
        }
    }

    println!("[*] Trace cycles {}", report.cycles);
    sim.controller.stats().print();

    if report.passed() {
        0
    } else {
        for m in &report.mismatches {
            eprintln!(
                "[!] op {}: read {:#x} returned {:#x}, expected {:#x}",
                m.op_index, m.addr, m.actual, m.expected
            );
        }
        2
    }
}

/// Validates a configuration file; returns the process exit code.
fn cmd_check_config(path: &Path) -> i32 {
    let config = load_config(path);
    match config.cache.validate() {
        Ok(geo) => {
            let dec = geo.decoder();
            println!("Configuration: {}", path.display());
            println!(
                "  {} way(s) x {} lines x {} words  write-{}  write-{}",
                geo.ways,
                geo.lines,
                geo.words_per_block,
                if geo.write_back { "back" } else { "through" },
                if geo.write_allocate { "allocate" } else { "no-allocate" }
            );
            println!(
                "  address fields: tag {} | index {} | offset {} bits",
                dec.tag_bits(),
                dec.index_bits(),
                dec.offset_bits()
            );
            0
        }
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            1
        }
    }
}
