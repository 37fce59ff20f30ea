mod bench;

use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use chainforge_core::{
    ChainWalkerCtxBuilder, GenerateParams, Outcome, TableGenerator,
};
use clap::Parser;
use log::info;

/// Chainforge precomputes rainbow tables for reversing password hashes.
///
/// A table is a file of compressed hash chains over a plaintext space
/// described by a charset and a length range. Generation can be
/// interrupted at any time and resumed by re-running the same command.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The hash algorithm of the table (md5 or sha1).
    #[arg(long, default_value = "md5")]
    hashtype: String,

    /// The charset of the plaintext space.
    #[arg(long, default_value = "loweralpha")]
    charset: String,

    /// The minimum plaintext length.
    #[arg(long, default_value_t = 1)]
    minlength: u8,

    /// The maximum plaintext length.
    #[arg(long, default_value_t = 7)]
    maxlength: u8,

    /// The table index, which offsets every reduction.
    #[arg(long, default_value_t = 0)]
    tableindex: u32,

    /// The number of reduction columns in a chain.
    #[arg(long, default_value_t = 10_000)]
    chainlength: u32,

    /// The number of chains to generate.
    #[arg(long, required_unless_present = "benchmark")]
    numchains: Option<u64>,

    /// Free-form suffix embedded in the table file name.
    #[arg(long, default_value = "")]
    part: String,

    /// The directory where the table file is stored.
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Seed of the start index generator, for reproducible tables.
    #[arg(long)]
    seed: Option<u64>,

    /// Measure chain-walking throughput instead of generating a table.
    #[arg(long)]
    benchmark: bool,
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err:?}");
        process::exit(1);
    }
}

fn try_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let ctx = ChainWalkerCtxBuilder::new()
        .hash_routine(&cli.hashtype)
        .charset(&cli.charset)
        .min_length(cli.minlength)
        .max_length(cli.maxlength)
        .table_index(cli.tableindex)
        .build()
        .context("Invalid table parameters")?;

    if cli.benchmark {
        bench::run(&ctx, cli.chainlength);
        return Ok(());
    }

    let Some(num_chains) = cli.numchains else {
        bail!("--numchains is required unless --benchmark is set");
    };

    let mut params = GenerateParams::new(cli.chainlength, num_chains, cli.part)
        .context("Invalid generation parameters")?;
    if let Some(seed) = cli.seed {
        params = params.seed(seed);
    }

    let generator = TableGenerator::new(ctx, params, cli.dir);
    info!("writing table {}", generator.path().display());

    match generator.run().context("Generation failed")? {
        Outcome::Completed { written } => info!("table complete, {written} chains"),
        Outcome::AlreadyFinished => info!("table already finished, nothing to do"),
    }

    Ok(())
}
