//! Enumerate union-closed families and write their statistics as CSV.
//!
//! Run with: `cargo run --release --example explore -- --n 4`
//!
//! Pass `--dreadnaut dreadnaut` to cross-check the kept families with nauty.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use ucf_rs::config::ExploreConfig;
use ucf_rs::explore::run_with_config;
use ucf_rs::oracle::{cross_check, Dreadnaut};
use ucf_rs::record::write_csv;

#[derive(Parser)]
#[command(author, version, about = "Union-closed family explorer")]
struct Cli {
    /// Size of the ground set
    #[arg(long, default_value_t = 4)]
    n: usize,

    /// Stop after this many non-isomorphic families (0 means no cap)
    #[arg(long = "max", value_name = "INT")]
    max_families: Option<usize>,

    /// Output CSV file (default: uc_results_n<N>.csv)
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Cap on full compression passes per family
    #[arg(long, default_value_t = 20)]
    max_passes: usize,

    /// Path to nauty's dreadnaut, enables the cross-check
    #[arg(long, value_name = "PATH")]
    dreadnaut: Option<PathBuf>,

    /// Per-invocation timeout for dreadnaut, in seconds
    #[arg(long, default_value_t = 30)]
    oracle_timeout: u64,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    simplelog::TermLogger::init(
        if cli.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let config = ExploreConfig::new(cli.n)
        .with_max_families(cli.max_families)
        .with_max_compression_passes(cli.max_passes);
    let exploration = run_with_config(&config)?;

    let out = cli
        .out
        .unwrap_or_else(|| PathBuf::from(format!("uc_results_n{}.csv", cli.n)));
    let file = File::create(&out)?;
    write_csv(BufWriter::new(file), &exploration.records)?;
    println!("Wrote {} canonical families to {}", exploration.records.len(), out.display());

    if exploration.unconverged > 0 {
        log::warn!(
            "{} families did not reach a compression fixed point within {} passes",
            exploration.unconverged,
            cli.max_passes
        );
    }

    if let Some(program) = cli.dreadnaut {
        let oracle = Dreadnaut::new(program).with_timeout(Duration::from_secs(cli.oracle_timeout));
        log::info!("Cross-checking {} families with {:?}...", exploration.families.len(), oracle.program);
        let report = cross_check(&exploration.families, exploration.n, &oracle);
        println!("Oracle cross-check: {}", report);
    }

    Ok(())
}
