use crate::charset::{ascii_to_charset, charset_to_ascii};
use crate::ctx::ChainWalkerCtx;
use crate::{Digest, Plaintext};

/// The mutable companion of a [`ChainWalkerCtx`].
///
/// Holds the current index, plaintext and digest of one chain. Every worker
/// owns its walker; the context itself is shared read-only.
#[derive(Clone, Default, Debug)]
pub struct ChainWalker {
    /// The current index, in `[0, plain_space_total)`.
    pub index: u64,
    /// The plaintext the index resolves to. Its length is the plain length.
    pub plain: Plaintext,
    /// The raw digest of the plaintext.
    pub digest: Digest,
}

impl ChainWalker {
    /// Creates a new walker positioned on the given start index.
    pub fn new(index: u64) -> Self {
        ChainWalker {
            index,
            ..Default::default()
        }
    }

    /// Resolves the current index into a plaintext.
    ///
    /// The index space partitions by length: indices in
    /// `[upto[i-1], upto[i])` name plaintexts of length `i`, enumerated in
    /// lexicographic charset order (the last position is least significant).
    pub fn index_to_plain(&mut self, ctx: &ChainWalkerCtx) {
        let c = ctx.charset.len() as u64;
        let len = ctx
            .plain_space_upto
            .iter()
            .position(|&space| self.index < space)
            .unwrap();

        let mut rest = self.index - ctx.plain_space_upto[len - 1];

        self.plain.set_len(len);
        for k in (0..len).rev() {
            self.plain[k] = charset_to_ascii(rest % c, &ctx.charset);
            rest /= c;
        }
    }

    /// Hashes the current plaintext into a raw digest.
    #[inline]
    pub fn plain_to_hash(&mut self, ctx: &ChainWalkerCtx) {
        self.digest = ctx.hash_routine.digest(&self.plain);
    }

    /// Reduces the current digest back into an index.
    ///
    /// Only the first 4 digest bytes are consumed, read as a little-endian
    /// u32; `pos` is the 0-based column number, which makes the reduction
    /// different in every column.
    #[inline]
    pub fn hash_to_index(&mut self, ctx: &ChainWalkerCtx, pos: u64) {
        let r = u32::from_le_bytes(self.digest[0..4].try_into().unwrap()) as u64;
        self.index = r
            .wrapping_add(ctx.reduce_offset)
            .wrapping_add(pos)
            % ctx.plain_space_total;
    }

    /// Walks the chain through `chain_length` reduction columns and returns
    /// the end index. The start index is whatever `self.index` holds on
    /// entry. Deterministic over the start index for fixed parameters.
    pub fn step(&mut self, ctx: &ChainWalkerCtx, chain_length: u32) -> u64 {
        for pos in 0..chain_length as u64 {
            self.index_to_plain(ctx);
            self.plain_to_hash(ctx);
            self.hash_to_index(ctx, pos);
        }

        self.index
    }
}

/// Re-encodes a plaintext into its index, the inverse of
/// [`ChainWalker::index_to_plain`].
pub fn plain_to_index(ctx: &ChainWalkerCtx, plain: &[u8]) -> u64 {
    let c = ctx.charset.len() as u64;
    let mut rest = 0;
    for &ch in plain {
        rest = rest * c + ascii_to_charset(ch, &ctx.charset) as u64;
    }

    ctx.plain_space_upto[plain.len() - 1] + rest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ctx::build_test_ctx;

    fn resolve(ctx: &ChainWalkerCtx, index: u64) -> Plaintext {
        let mut walker = ChainWalker::new(index);
        walker.index_to_plain(ctx);
        walker.plain
    }

    #[test]
    fn test_index_to_plain_single_length() {
        let ctx = build_test_ctx("md5", "loweralpha", 1, 1);

        assert_eq!(26, ctx.plain_space_total);
        assert_eq!(Plaintext::new(b"a"), resolve(&ctx, 0));
        assert_eq!(Plaintext::new(b"z"), resolve(&ctx, 25));
    }

    #[test]
    fn test_index_to_plain_enumerates_lexicographically() {
        let ctx = build_test_ctx("md5", "loweralpha", 1, 3);

        let expected: &[&[u8]] = &[
            b"a", b"b", b"c", b"d", b"e", b"f", b"g", b"h", b"i", b"j", b"k", b"l", b"m", b"n",
            b"o", b"p", b"q", b"r", b"s", b"t", b"u", b"v", b"w", b"x", b"y", b"z", b"aa", b"ab",
            b"ac",
        ];

        for (index, plain) in expected.iter().enumerate() {
            assert_eq!(Plaintext::new(plain), resolve(&ctx, index as u64));
        }
    }

    #[test]
    fn test_index_to_plain_length_buckets() {
        let ctx = build_test_ctx("sha1", "numeric", 1, 3);

        assert_eq!(Plaintext::new(b"9"), resolve(&ctx, 9));
        assert_eq!(Plaintext::new(b"00"), resolve(&ctx, 10));
        assert_eq!(Plaintext::new(b"95"), resolve(&ctx, 105));
        assert_eq!(Plaintext::new(b"000"), resolve(&ctx, 110));
        assert_eq!(Plaintext::new(b"999"), resolve(&ctx, 1109));
    }

    #[test]
    fn test_index_to_plain_skips_short_lengths() {
        let ctx = build_test_ctx("md5", "loweralpha", 2, 3);

        assert_eq!(Plaintext::new(b"aa"), resolve(&ctx, 0));
        assert_eq!(Plaintext::new(b"zz"), resolve(&ctx, 675));
        assert_eq!(Plaintext::new(b"aaa"), resolve(&ctx, 676));
    }

    #[test]
    fn test_index_round_trip() {
        for ctx in [
            build_test_ctx("md5", "loweralpha", 1, 2),
            build_test_ctx("sha1", "numeric", 1, 3),
            build_test_ctx("md5", "loweralpha", 2, 3),
        ] {
            for index in 0..ctx.plain_space_total {
                let plain = resolve(&ctx, index);
                assert_eq!(index, plain_to_index(&ctx, &plain));
            }
        }
    }

    #[test]
    fn test_reduction_consumes_first_four_bytes_little_endian() {
        let ctx = build_test_ctx("md5", "loweralpha", 1, 1);
        let mut walker = ChainWalker::new(0);

        walker.index_to_plain(&ctx);
        walker.plain_to_hash(&ctx);
        // md5("a") starts with 0c c1 75 b9 -> 0xb975c10c
        walker.hash_to_index(&ctx, 0);

        assert_eq!(0xb975c10c_u64 % 26, walker.index);
        walker.index_to_plain(&ctx);
        assert_eq!(Plaintext::new(b"k"), walker.plain);
    }

    #[test]
    fn test_reduction_shifts_with_column_and_table_index() {
        let ctx = build_test_ctx("md5", "loweralpha", 1, 1);
        let mut walker = ChainWalker::new(0);

        walker.index_to_plain(&ctx);
        walker.plain_to_hash(&ctx);
        walker.hash_to_index(&ctx, 3);
        assert_eq!((0xb975c10c_u64 + 3) % 26, walker.index);

        let ctx7 = crate::ChainWalkerCtxBuilder::new()
            .charset("loweralpha")
            .min_length(1)
            .max_length(1)
            .table_index(7)
            .build()
            .unwrap();
        walker.index = 0;
        walker.index_to_plain(&ctx7);
        walker.plain_to_hash(&ctx7);
        walker.hash_to_index(&ctx7, 0);
        assert_eq!((0xb975c10c_u64 + 458_752) % 26, walker.index);
    }

    #[test]
    fn test_step_is_deterministic_and_stays_in_range() {
        let ctx = crate::ChainWalkerCtxBuilder::new()
            .charset("alpha")
            .min_length(1)
            .max_length(5)
            .table_index(7)
            .build()
            .unwrap();

        for start in [0, 1, 12_345, ctx.plain_space_total - 1] {
            let end = ChainWalker::new(start).step(&ctx, 100);
            assert!(end < ctx.plain_space_total);
            assert_eq!(end, ChainWalker::new(start).step(&ctx, 100));
        }
    }

    #[test]
    fn test_single_column_step_matches_manual_walk() {
        let ctx = build_test_ctx("md5", "loweralpha", 1, 1);

        let end = ChainWalker::new(0).step(&ctx, 1);
        assert_eq!(10, end);
    }

    #[test]
    fn test_reduction_spread_is_roughly_uniform() {
        const BUCKETS: usize = 16;
        const SAMPLES: u64 = 50_000;

        let ctx = build_test_ctx("md5", "loweralpha", 1, 4);
        let mut histogram = [0u64; BUCKETS];
        let mut walker = ChainWalker::default();

        for i in 0..SAMPLES {
            walker.index = i;
            walker.index_to_plain(&ctx);
            walker.plain_to_hash(&ctx);
            walker.hash_to_index(&ctx, 0);

            let bucket = (walker.index as u128 * BUCKETS as u128
                / ctx.plain_space_total as u128) as usize;
            histogram[bucket] += 1;
        }

        let expected = SAMPLES as f64 / BUCKETS as f64;
        let chi_square: f64 = histogram
            .iter()
            .map(|&observed| {
                let delta = observed as f64 - expected;
                delta * delta / expected
            })
            .sum();

        // 1% critical value of the chi-square distribution with 15 degrees
        // of freedom
        assert!(
            chi_square < 30.58,
            "chi-square {chi_square} over {histogram:?}"
        );
    }
}
