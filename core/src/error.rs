use std::io;

use thiserror::Error;

pub type ChainforgeResult<T> = std::result::Result<T, ChainforgeError>;

#[derive(Error, Debug)]
pub enum ChainforgeError {
    #[error("unsupported hash routine `{0}`, expected one of: md5, sha1")]
    UnsupportedHash(String),

    #[error("unsupported charset `{0}`")]
    UnsupportedCharset(String),

    #[error("plaintext lengths must satisfy 1 <= min <= max <= 9, got {min}-{max}")]
    LengthOutOfRange { min: u8, max: u8 },

    #[error("a table file holds at most 134217727 chains (2 GiB), {0} requested")]
    TableTooLarge(u64),

    #[error("the chain length must be greater than 0")]
    ChainLengthZero,

    #[error("the number of chains must be greater than 0")]
    ChainCountZero,

    #[error("the plaintext space needs {0} bits but only spaces up to 2^64 are supported")]
    PlainSpaceOverflow(u32),

    #[error("unable to access the table file")]
    Io(#[from] io::Error),

    #[error("generation cancelled")]
    Cancelled,
}
