use std::fmt::Display;
use std::str::FromStr;

use digest::Digest as _;
use md5::Md5;
use sha1::Sha1;

use crate::error::ChainforgeError;
use crate::Digest;

/// All the supported hash routines.
///
/// Names are matched case-insensitively, digests are returned as raw bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashRoutine {
    Md5,
    Sha1,
}

impl HashRoutine {
    /// Hashes a byte slice using the right hash function.
    #[inline]
    pub fn digest(&self, plain: &[u8]) -> Digest {
        let mut digest = Digest::default();
        match self {
            HashRoutine::Md5 => digest.extend_from_slice(Md5::digest(plain).as_slice()),
            HashRoutine::Sha1 => digest.extend_from_slice(Sha1::digest(plain).as_slice()),
        }
        digest
    }

    /// Gets the full digest size in bytes.
    pub fn digest_size(&self) -> usize {
        match self {
            HashRoutine::Md5 => Md5::output_size(),
            HashRoutine::Sha1 => Sha1::output_size(),
        }
    }

    /// The canonical lowercase name, as embedded in table file names.
    pub fn name(&self) -> &'static str {
        match self {
            HashRoutine::Md5 => "md5",
            HashRoutine::Sha1 => "sha1",
        }
    }
}

impl FromStr for HashRoutine {
    type Err = ChainforgeError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "md5" => Ok(HashRoutine::Md5),
            "sha1" => Ok(HashRoutine::Sha1),
            _ => Err(ChainforgeError::UnsupportedHash(name.to_owned())),
        }
    }
}

impl Display for HashRoutine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(HashRoutine::Md5, "md5".parse().unwrap());
        assert_eq!(HashRoutine::Md5, "MD5".parse().unwrap());
        assert_eq!(HashRoutine::Sha1, "Sha1".parse().unwrap());
    }

    #[test]
    fn test_unknown_routine_is_rejected() {
        assert!(matches!(
            "ntlm".parse::<HashRoutine>(),
            Err(ChainforgeError::UnsupportedHash(_))
        ));
    }

    #[test]
    fn test_digest_sizes() {
        assert_eq!(16, HashRoutine::Md5.digest_size());
        assert_eq!(20, HashRoutine::Sha1.digest_size());
    }

    #[test]
    fn test_md5_digest() {
        let digest = HashRoutine::Md5.digest(b"a");
        let expected = [
            0x0c, 0xc1, 0x75, 0xb9, 0xc0, 0xf1, 0xb6, 0xa8, 0x31, 0xc3, 0x99, 0xe2, 0x69, 0x77,
            0x26, 0x61,
        ];
        assert_eq!(&expected, digest.as_slice());
    }

    #[test]
    fn test_sha1_digest() {
        let digest = HashRoutine::Sha1.digest(b"abc");
        let expected = [
            0xa9, 0x99, 0x3e, 0x36, 0x47, 0x06, 0x81, 0x6a, 0xba, 0x3e, 0x25, 0x71, 0x78, 0x50,
            0xc2, 0x6c, 0x9c, 0xd0, 0xd8, 0x9d,
        ];
        assert_eq!(&expected, digest.as_slice());
    }
}
