use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use byteorder::{LittleEndian, WriteBytesExt};
use crossbeam_channel::{bounded, unbounded, RecvTimeoutError, Sender};
use log::info;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::ctx::ChainWalkerCtx;
use crate::error::{ChainforgeError, ChainforgeResult};
use crate::event::{Event, GeneratorHandle};
use crate::filename::table_file_name;
use crate::walker::ChainWalker;
use crate::{FLUSH_INTERVAL, MAX_TABLE_CHAINS, RECORD_SIZE};

/// How many chains may be dispatched ahead of the writer. Bounds the memory
/// of the in-order output buffer under skewed scheduling.
const PIPELINE_DEPTH: usize = 1024;

/// Parameters of one generation run, validated up front.
#[derive(Clone, Debug)]
pub struct GenerateParams {
    /// The number of reduction columns in a chain.
    pub chain_length: u32,
    /// The number of chains to generate.
    pub num_chains: u64,
    /// Free-form suffix embedded in the table file name. May be empty.
    pub part: String,
    /// Seed of the start index generator. Defaults to OS entropy; a fixed
    /// seed makes runs (and resumed runs) reproducible.
    pub seed: Option<u64>,
    /// Worker thread count. Defaults to one per logical CPU.
    pub workers: Option<usize>,
}

impl GenerateParams {
    /// Creates validated generation parameters.
    ///
    /// Fails fast, before any file is opened: the chain length and chain
    /// count must be positive and the chain count must stay under the
    /// 2 GiB file limit.
    pub fn new(
        chain_length: u32,
        num_chains: u64,
        part: impl Into<String>,
    ) -> ChainforgeResult<Self> {
        if chain_length == 0 {
            return Err(ChainforgeError::ChainLengthZero);
        }
        if num_chains == 0 {
            return Err(ChainforgeError::ChainCountZero);
        }
        if num_chains >= MAX_TABLE_CHAINS {
            return Err(ChainforgeError::TableTooLarge(num_chains));
        }

        Ok(Self {
            chain_length,
            num_chains,
            part: part.into(),
            seed: None,
            workers: None,
        })
    }

    /// Sets the seed of the start index generator.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);

        self
    }

    /// Sets the worker thread count.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);

        self
    }
}

/// How a generation run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// All requested chains are now on disk.
    Completed { written: u64 },
    /// The table file already held every requested chain.
    AlreadyFinished,
}

/// Drives the generation of one rainbow table file.
///
/// The generator owns the single writer of the table file. Chains are
/// walked by a pool of workers and written back in chain-index order, so
/// the record of chain `i` always sits at offset `i * 16` and a partial
/// file can be resumed deterministically.
pub struct TableGenerator {
    ctx: ChainWalkerCtx,
    params: GenerateParams,
    dir: PathBuf,
}

impl TableGenerator {
    /// Creates a generator writing into the given directory.
    pub fn new(ctx: ChainWalkerCtx, params: GenerateParams, dir: impl Into<PathBuf>) -> Self {
        Self {
            ctx,
            params,
            dir: dir.into(),
        }
    }

    /// The canonical path of the table file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(table_file_name(&self.ctx, &self.params))
    }

    /// Runs the generation on the current thread, blocking until the table
    /// is finished.
    pub fn run(self) -> ChainforgeResult<Outcome> {
        self.generate(None, &AtomicBool::new(false))
    }

    /// Runs the generation on a background thread.
    /// Returns a handle to receive progress events, cancel the run and get
    /// the outcome.
    pub fn spawn(self) -> GeneratorHandle {
        let (sender, receiver) = unbounded();
        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_flag = Arc::clone(&cancel);
        let thread_handle = thread::spawn(move || self.generate(Some(sender), &cancel_flag));

        GeneratorHandle {
            thread_handle,
            receiver,
            cancel,
        }
    }

    fn generate(
        self,
        events: Option<Sender<Event>>,
        cancel: &AtomicBool,
    ) -> ChainforgeResult<Outcome> {
        let total = self.params.num_chains;
        let chain_length = self.params.chain_length;
        let path = self.path();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)?;

        let completed = file.metadata()?.len() / RECORD_SIZE as u64;
        if completed >= total {
            info!("{} already holds {total} chains", path.display());
            return Ok(Outcome::AlreadyFinished);
        }

        // drop any trailing partial record so every write below starts on a
        // record boundary
        file.set_len(completed * RECORD_SIZE as u64)?;

        if completed > 0 {
            info!("resuming {} at chain {completed}/{total}", path.display());
            if let Some(events) = &events {
                let _ = events.send(Event::Resumed { completed });
            }
        }

        let mut rng = match self.params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        // replay the draws of the chains already on disk so the remaining
        // chains get the same start indices an uninterrupted run would have
        // given them
        for _ in 0..completed {
            rng.next_u64();
        }

        let workers = self.params.workers.unwrap_or_else(|| {
            thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        });

        let mut writer = BufWriter::new(file);
        writer.seek(SeekFrom::Start(completed * RECORD_SIZE as u64))?;

        let ctx = &self.ctx;
        let started = Instant::now();
        let progress = |written: u64| {
            let elapsed = started.elapsed();
            info!("generated {written}/{total} chains in {elapsed:.2?}");
            if let Some(events) = &events {
                let _ = events.send(Event::Progress {
                    written,
                    total,
                    elapsed,
                });
            }
        };

        let (job_tx, job_rx) = bounded::<(u64, u64)>(PIPELINE_DEPTH);
        let (result_tx, result_rx) = bounded::<(u64, u64, u64)>(PIPELINE_DEPTH);

        let written = thread::scope(|scope| -> ChainforgeResult<u64> {
            // moved into the scope so an early return closes the channels
            // and lets every worker wind down before the scope joins
            let job_tx = job_tx;
            let result_rx = result_rx;

            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    let job_rx = job_rx.clone();
                    let result_tx = result_tx.clone();
                    scope.spawn(move || {
                        let mut walker = ChainWalker::default();
                        for (chain_no, start) in job_rx.iter() {
                            if cancel.load(Ordering::Relaxed) {
                                break;
                            }
                            walker.index = start;
                            let end = walker.step(ctx, chain_length);
                            if result_tx.send((chain_no, start, end)).is_err() {
                                break;
                            }
                        }
                    })
                })
                .collect();
            drop(job_rx);
            drop(result_tx);

            let mut next = completed;

            'windows: while next < total && !cancel.load(Ordering::Relaxed) {
                let base = next;
                let len = PIPELINE_DEPTH.min((total - base) as usize);

                // start indices are drawn in chain order, which is what
                // keeps resumed runs byte-identical to uninterrupted ones
                for chain_no in base..base + len as u64 {
                    let start = rng.next_u64() % ctx.plain_space_total;
                    if job_tx.send((chain_no, start)).is_err() {
                        break 'windows;
                    }
                }

                // in-order output buffer keyed by chain index
                let mut window = BTreeMap::new();
                while window.len() < len {
                    match result_rx.recv_timeout(Duration::from_millis(100)) {
                        Ok((chain_no, start, end)) => {
                            window.insert(chain_no, (start, end));
                        }
                        Err(RecvTimeoutError::Timeout) => {
                            // a worker ending while jobs are outstanding has
                            // panicked; the panic resurfaces when the scope
                            // joins
                            if cancel.load(Ordering::Relaxed)
                                || handles.iter().any(|handle| handle.is_finished())
                            {
                                break 'windows;
                            }
                        }
                        Err(RecvTimeoutError::Disconnected) => break 'windows,
                    }
                }

                for &(start, end) in window.values() {
                    writer.write_u64::<LittleEndian>(start)?;
                    writer.write_u64::<LittleEndian>(end)?;
                    next += 1;

                    if next % FLUSH_INTERVAL == 0 || next == total {
                        writer.flush()?;
                        writer.get_ref().sync_data()?;
                        progress(next);
                    }
                }
            }

            // fully written records survive a cancellation
            writer.flush()?;
            writer.get_ref().sync_data()?;

            Ok(next)
        })?;

        if written < total {
            return Err(ChainforgeError::Cancelled);
        }

        Ok(Outcome::Completed { written })
    }
}
