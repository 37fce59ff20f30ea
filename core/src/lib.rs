//! Chain-walker engine for rainbow table generation.
//!
//! A rainbow table is a flat file of compressed hash chains. Each chain is
//! walked by composing three deterministic steps: resolve an index of the
//! plaintext space into a plaintext, hash it, and reduce the digest back
//! into an index with a column-dependent reduction function. Only the
//! start and end index of every chain are stored.

pub mod charset;

mod ctx;
mod error;
mod event;
mod filename;
mod hash;
mod table;
mod walker;

pub use {
    ctx::{ChainWalkerCtx, ChainWalkerCtxBuilder},
    error::{ChainforgeError, ChainforgeResult},
    event::{Event, GeneratorHandle},
    filename::table_file_name,
    hash::HashRoutine,
    table::{GenerateParams, Outcome, TableGenerator},
    tinyvec::ArrayVec,
    walker::{plain_to_index, ChainWalker},
};

use core::fmt::{Debug, Display};
use core::ops::{Deref, DerefMut};

/// The maximum plaintext length allowed.
pub const MAX_PLAIN_LENGTH: usize = 9;

/// The maximum digest size allowed.
pub const MAX_DIGEST_LENGTH: usize = 20;

/// The size in bytes of one on-disk chain record, two little-endian u64.
pub const RECORD_SIZE: usize = 16;

/// The chain count at which a table file would reach 2 GiB.
pub const MAX_TABLE_CHAINS: u64 = 134_217_728;

/// Records are flushed to disk and progress is reported at least this often.
pub const FLUSH_INTERVAL: u64 = 100_000;

/// The multiplier turning a table index into its reduction offset.
pub const REDUCE_OFFSET_STEP: u64 = 65_536;

/// A plaintext stored in a stack-allocated vector.
#[repr(transparent)]
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Plaintext(ArrayVec<[u8; MAX_PLAIN_LENGTH]>);

impl Plaintext {
    /// Creates a new plaintext.
    pub fn new(text: &[u8]) -> Self {
        let mut inner = ArrayVec::default();
        inner.extend_from_slice(text);
        Plaintext(inner)
    }
}

impl AsRef<[u8]> for Plaintext {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Deref for Plaintext {
    type Target = ArrayVec<[u8; MAX_PLAIN_LENGTH]>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Plaintext {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Display for Plaintext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl Debug for Plaintext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        <Plaintext as Display>::fmt(self, f)
    }
}

/// A raw digest stored in a stack-allocated vector.
pub type Digest = ArrayVec<[u8; MAX_DIGEST_LENGTH]>;
