//! Parameter sweep: every family for `n = 4`, the first 200 for `n = 5`.
//!
//! Run with: `cargo run --release --example sweep`

use std::fs::File;
use std::io::BufWriter;

use color_eyre::Result;
use ucf_rs::config::ExploreConfig;
use ucf_rs::explore::run_with_config;
use ucf_rs::record::write_csv;

fn main() -> Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let params = [
        (ExploreConfig::new(4), "uc_n4.csv"),
        (ExploreConfig::new(5).with_max_families(Some(200)), "uc_n5_sample.csv"),
    ];

    for (config, out) in params {
        println!("Running n = {}", config.n);
        let exploration = run_with_config(&config)?;
        write_csv(BufWriter::new(File::create(out)?), &exploration.records)?;
        println!("Finished {} ({} families)", out, exploration.records.len());
    }

    Ok(())
}
