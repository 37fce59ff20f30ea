use crate::ctx::ChainWalkerCtx;
use crate::table::GenerateParams;

/// The canonical table file name, embedding every generation parameter:
///
/// `<hashtype>_<charset>#<min>-<max>_<tableindex>_<chainlength>x<numchains>_<part>.rt`
///
/// Two runs over the same parameters always target the same file, which is
/// what makes interrupt/resume possible.
pub fn table_file_name(ctx: &ChainWalkerCtx, params: &GenerateParams) -> String {
    format!(
        "{}_{}#{}-{}_{}_{}x{}_{}.rt",
        ctx.hash_routine,
        ctx.charset_name,
        ctx.min_length,
        ctx.max_length,
        ctx.table_index,
        params.chain_length,
        params.num_chains,
        params.part,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ctx::ChainWalkerCtxBuilder;

    #[test]
    fn test_table_file_name() {
        let ctx = ChainWalkerCtxBuilder::new()
            .hash_routine("md5")
            .charset("loweralpha")
            .min_length(1)
            .max_length(7)
            .table_index(0)
            .build()
            .unwrap();
        let params = GenerateParams::new(3800, 10_000, "run1").unwrap();

        assert_eq!(
            "md5_loweralpha#1-7_0_3800x10000_run1.rt",
            table_file_name(&ctx, &params)
        );
    }

    #[test]
    fn test_table_file_name_with_empty_part() {
        let ctx = ChainWalkerCtxBuilder::new()
            .hash_routine("sha1")
            .charset("alpha-numeric")
            .min_length(2)
            .max_length(6)
            .table_index(3)
            .build()
            .unwrap();
        let params = GenerateParams::new(100, 500, "").unwrap();

        assert_eq!(
            "sha1_alpha-numeric#2-6_3_100x500_.rt",
            table_file_name(&ctx, &params)
        );
    }
}
