//! The static charset catalog.
//!
//! Order is load-bearing: an index is resolved into characters by position,
//! so two tables built over differently ordered charsets are incompatible.

use crate::error::ChainforgeError;

pub const ALPHA: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LOWERALPHA: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
pub const NUMERIC: &[u8] = b"0123456789";
pub const ALPHA_NUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const LOWERALPHA_NUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
pub const ALPHA_NUMERIC_SYMBOL14: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()-_+=";
pub const ALL: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()-_+=~`[]{}|\\:;\"'<>,.?/ ";

const CATALOG: &[(&str, &[u8])] = &[
    ("alpha", ALPHA),
    ("loweralpha", LOWERALPHA),
    ("numeric", NUMERIC),
    ("alpha-numeric", ALPHA_NUMERIC),
    ("loweralpha-numeric", LOWERALPHA_NUMERIC),
    ("alpha-numeric-symbol14", ALPHA_NUMERIC_SYMBOL14),
    ("all", ALL),
];

/// Resolves a charset name into its ordered byte sequence.
///
/// `byte` selects all 256 byte values in natural order.
pub fn lookup(name: &str) -> Result<Vec<u8>, ChainforgeError> {
    if name == "byte" {
        return Ok((0..=u8::MAX).collect());
    }

    CATALOG
        .iter()
        .find(|(catalog_name, _)| *catalog_name == name)
        .map(|(_, bytes)| bytes.to_vec())
        .ok_or_else(|| ChainforgeError::UnsupportedCharset(name.to_owned()))
}

/// Converts a charset position to its character.
#[inline]
pub fn charset_to_ascii(n: u64, charset: &[u8]) -> u8 {
    charset[n as usize]
}

/// Converts a character to its charset position.
#[inline]
pub fn ascii_to_charset(c: u8, charset: &[u8]) -> u8 {
    charset.iter().position(|x| *x == c).unwrap() as u8
}
