//! hashshard: splits address CSV files into two shards by HASH parity.
//!
//! Thin binary entry point. All logic lives in the `hashshard-core` crate.

use anyhow::Context;
use clap::Parser;
use hashshard_core::config::DEFAULT_OUTPUT_DIR;
use hashshard_core::ShardConfig;
use std::path::PathBuf;

/// Route every row of every `.csv` file under ROOT_DIR into
/// shard_0_data.csv or shard_1_data.csv by the parity of the last hex
/// digit of its HASH field.
#[derive(Parser, Debug)]
#[command(name = "hashshard")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory searched recursively for input CSV files.
    root_dir: PathBuf,

    /// Directory that receives the two shard files. Created if absent.
    #[arg(default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Status messages go to stderr so stdout carries only the summary.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let config = ShardConfig::new(args.root_dir).output_dir(args.output_dir);
    let summary = hashshard_core::run(&config).with_context(|| {
        format!(
            "could not shard {} into {}",
            config.root().display(),
            config.output_dir.display()
        )
    })?;

    println!("--- Task Complete ---");
    println!("Total rows written: {}.", summary.rows_written);
    println!("Results saved to directory: {}", summary.output_dir.display());

    Ok(())
}
