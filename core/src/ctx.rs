use crate::charset;
use crate::error::{ChainforgeError, ChainforgeResult};
use crate::hash::HashRoutine;
use crate::{MAX_PLAIN_LENGTH, REDUCE_OFFSET_STEP};

/// A builder for a chain walker context.
///
/// Setters are total; all validation happens in [`ChainWalkerCtxBuilder::build`].
#[derive(Clone, Debug)]
pub struct ChainWalkerCtxBuilder {
    hash_name: String,
    charset_name: String,
    min_length: u8,
    max_length: u8,
    table_index: u32,
}

impl Default for ChainWalkerCtxBuilder {
    fn default() -> Self {
        Self {
            hash_name: "md5".to_owned(),
            charset_name: "loweralpha".to_owned(),
            min_length: 1,
            max_length: 7,
            table_index: 0,
        }
    }
}

impl ChainWalkerCtxBuilder {
    /// Creates a new ChainWalkerCtxBuilder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the hash routine of the context, by name.
    pub fn hash_routine(mut self, name: &str) -> Self {
        self.hash_name = name.to_owned();

        self
    }

    /// Sets the charset of the context, by catalog name.
    pub fn charset(mut self, name: &str) -> Self {
        self.charset_name = name.to_owned();

        self
    }

    /// Sets the minimum plaintext length of the context.
    pub fn min_length(mut self, min_length: u8) -> Self {
        self.min_length = min_length;

        self
    }

    /// Sets the maximum plaintext length of the context.
    pub fn max_length(mut self, max_length: u8) -> Self {
        self.max_length = max_length;

        self
    }

    /// Sets the table index of the context.
    ///
    /// Tables generated with different indices shift every reduction by a
    /// different offset and therefore provide independent coverage.
    pub fn table_index(mut self, table_index: u32) -> Self {
        self.table_index = table_index;

        self
    }

    /// Builds a ChainWalkerCtx with the specified parameters.
    pub fn build(self) -> ChainforgeResult<ChainWalkerCtx> {
        let hash_routine: HashRoutine = self.hash_name.parse()?;
        let charset = charset::lookup(&self.charset_name)?;

        if self.min_length == 0
            || self.max_length as usize > MAX_PLAIN_LENGTH
            || self.min_length > self.max_length
        {
            return Err(ChainforgeError::LengthOutOfRange {
                min: self.min_length,
                max: self.max_length,
            });
        }

        // cumulative counts of the enumerable plaintext space, per length.
        // lengths below the minimum contribute nothing but keep their slot.
        let c = charset.len() as u128;
        let mut total: u128 = 0;
        let mut plain_space_upto = Vec::with_capacity(self.max_length as usize + 1);

        plain_space_upto.push(0);
        for i in 1..=self.max_length {
            if i >= self.min_length {
                total += c.pow(i as u32);
            }
            if total > u64::MAX as u128 {
                return Err(ChainforgeError::PlainSpaceOverflow(
                    (total as f64).log2().ceil() as u32,
                ));
            }
            plain_space_upto.push(total as u64);
        }

        Ok(ChainWalkerCtx {
            hash_routine,
            charset_name: self.charset_name,
            charset,
            min_length: self.min_length,
            max_length: self.max_length,
            plain_space_total: total as u64,
            plain_space_upto,
            reduce_offset: REDUCE_OFFSET_STEP * self.table_index as u64,
            table_index: self.table_index,
        })
    }
}

/// The immutable parameter bundle shared by every chain of a table.
///
/// Built once per generator run; workers walk chains against a shared
/// reference and keep their mutable state in a [`crate::ChainWalker`].
#[derive(Clone, Debug)]
pub struct ChainWalkerCtx {
    /// The hash routine used.
    pub hash_routine: HashRoutine,
    /// The catalog name of the charset, as embedded in table file names.
    pub charset_name: String,
    /// The ordered charset bytes.
    pub charset: Vec<u8>,
    /// The minimum plaintext length.
    pub min_length: u8,
    /// The maximum plaintext length.
    pub max_length: u8,
    /// Cumulative plaintext counts: `plain_space_upto[i]` is the number of
    /// enumerable plaintexts of length `i` or shorter.
    pub plain_space_upto: Vec<u64>,
    /// The size of the total search space.
    pub plain_space_total: u64,
    /// The table index.
    pub table_index: u32,
    /// The constant added to every reduction, `65536 * table_index`.
    pub reduce_offset: u64,
}

#[cfg(test)]
pub fn build_test_ctx(hash: &str, charset: &str, min: u8, max: u8) -> ChainWalkerCtx {
    ChainWalkerCtxBuilder::new()
        .hash_routine(hash)
        .charset(charset)
        .min_length(min)
        .max_length(max)
        .build()
        .unwrap()
}
