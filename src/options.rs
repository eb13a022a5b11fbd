use anyhow::bail;
use std::collections::HashSet;

#[derive(Debug, Clone)]
/// Options controlling gene interval extraction from the annotation file.
///
/// # Fields
///
/// * `feature_type`: Only annotation rows whose feature-type field equals
///   this value yield a [crate::GeneInterval]. Defaults to `"gene"`, the
///   feature type the reference pipeline extracts.
///
/// # Examples
///
/// ```rust
/// use fusanno::options::ExtractOptions;
///
/// let opts = ExtractOptions::default();
/// assert_eq!(opts.feature_type, "gene");
///
/// let opts = ExtractOptions::new("transcript");
/// assert_eq!(opts.feature_type, "transcript");
/// ```
pub struct ExtractOptions {
    pub feature_type: String,
}

impl Default for ExtractOptions {
    fn default() -> ExtractOptions {
        ExtractOptions {
            feature_type: String::from("gene"),
        }
    }
}

impl ExtractOptions {
    pub fn new<T: ToString>(feature_type: T) -> ExtractOptions {
        ExtractOptions {
            feature_type: feature_type.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
/// Names of the required columns of the fusion breakpoint table.
///
/// The fusion table is free-form apart from these four columns, which hold
/// the chromosome and position of each breakpoint. All other columns are
/// passed through to the output untouched.
///
/// # Fields
///
/// * `chrom_1` / `breakpoint_1`: Column names for the first breakpoint.
///   Default to `"chr1"` and `"bpt1"`.
/// * `chrom_2` / `breakpoint_2`: Column names for the second breakpoint.
///   Default to `"chr2"` and `"bpt2"`.
pub struct FusionColumns {
    pub chrom_1: String,
    pub breakpoint_1: String,
    pub chrom_2: String,
    pub breakpoint_2: String,
}

impl Default for FusionColumns {
    fn default() -> FusionColumns {
        FusionColumns {
            chrom_1: String::from("chr1"),
            breakpoint_1: String::from("bpt1"),
            chrom_2: String::from("chr2"),
            breakpoint_2: String::from("bpt2"),
        }
    }
}

impl FusionColumns {
    /// Creates a `FusionColumns` from the four column names.
    ///
    /// Returns an error if any name is empty or if two names collide, as the
    /// columns could then not be located unambiguously in the header.
    pub fn new<T: ToString>(
        chrom_1: T,
        breakpoint_1: T,
        chrom_2: T,
        breakpoint_2: T,
    ) -> anyhow::Result<FusionColumns> {
        let columns = FusionColumns {
            chrom_1: chrom_1.to_string(),
            breakpoint_1: breakpoint_1.to_string(),
            chrom_2: chrom_2.to_string(),
            breakpoint_2: breakpoint_2.to_string(),
        };

        let names = [
            columns.chrom_1.as_str(),
            columns.breakpoint_1.as_str(),
            columns.chrom_2.as_str(),
            columns.breakpoint_2.as_str(),
        ];
        if names.iter().any(|name| name.is_empty()) {
            bail!("fusion column names cannot be empty");
        }
        if names.iter().collect::<HashSet<_>>().len() != names.len() {
            bail!("fusion column names must be distinct; got {:?}", names);
        }

        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fusion_columns_default() {
        let columns = FusionColumns::default();
        assert_eq!(columns.chrom_1, "chr1");
        assert_eq!(columns.breakpoint_1, "bpt1");
        assert_eq!(columns.chrom_2, "chr2");
        assert_eq!(columns.breakpoint_2, "bpt2");
    }

    #[test]
    fn test_fusion_columns_rejects_invalid_names() {
        assert!(FusionColumns::new("chrA", "posA", "chrA", "posB").is_err());
        assert!(FusionColumns::new("chrA", "", "chrB", "posB").is_err());
        assert!(FusionColumns::new("chrA", "posA", "chrB", "posB").is_ok());
    }
}
