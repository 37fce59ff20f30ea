//! Benchmark mode: measures raw chain-walking throughput on one core.
//!
//! Hashes per second dominate the feasibility of a table, so this is the
//! number to look at before committing to a chain length and chain count.

use std::time::{Duration, Instant};

use chainforge_core::{ChainWalker, ChainWalkerCtx};

/// Chains walked per measurement round.
const ROUND_CHAINS: u64 = 64;

/// How long the measurement runs.
const MEASURE_FOR: Duration = Duration::from_secs(2);

pub fn run(ctx: &ChainWalkerCtx, chain_length: u32) {
    let mut walker = ChainWalker::default();
    let mut rounds = 0u64;

    let started = Instant::now();
    while started.elapsed() < MEASURE_FOR {
        for i in 0..ROUND_CHAINS {
            walker.index = (rounds * ROUND_CHAINS + i) % ctx.plain_space_total;
            walker.step(ctx, chain_length);
        }
        rounds += 1;
    }
    let elapsed = started.elapsed();

    let links = rounds * ROUND_CHAINS * chain_length as u64;
    let per_second = links as f64 / elapsed.as_secs_f64();

    println!(
        "{} chains of length {chain_length} in {elapsed:.2?}",
        rounds * ROUND_CHAINS
    );
    println!("{per_second:.0} hashes/s per core");
}
