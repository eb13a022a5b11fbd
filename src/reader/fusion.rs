use crate::annotate::FusionRecord;
use crate::options::FusionColumns;
use anyhow::{anyhow, Context};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// A parsed fusion breakpoint table: the input header plus one
/// [FusionRecord] per data row, in input row order.
pub struct FusionTable {
    pub header: Vec<String>,
    pub records: Vec<FusionRecord>,
}

impl FusionTable {
    /// Reads a fusion table from a delimited text file on disk.
    pub fn from_path<T: AsRef<Path>>(
        file_path: T,
        delimiter: u8,
        columns: &FusionColumns,
    ) -> anyhow::Result<FusionTable> {
        let file = File::open(file_path.as_ref())
            .with_context(|| format!("Could not open the fusion table {:?}", file_path.as_ref()))?;
        FusionTable::from_reader(file, delimiter, columns)
    }

    /// Reads a fusion table from any [Read] over delimited text.
    ///
    /// The first row must be a header naming, among others, the four columns
    /// of [FusionColumns]. A missing required column, a ragged row, or a
    /// non-integer breakpoint is a boundary validation failure that fails
    /// the run; such a record cannot be resolved meaningfully and silent
    /// coercion would corrupt the output.
    pub fn from_reader<T: Read>(
        rdr: T,
        delimiter: u8,
        columns: &FusionColumns,
    ) -> anyhow::Result<FusionTable> {
        let mut csv_rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .from_reader(rdr);

        let header: Vec<String> = csv_rdr
            .headers()
            .context("Could not read the fusion table header")?
            .iter()
            .map(String::from)
            .collect();

        let position = |name: &String| {
            header
                .iter()
                .position(|column| column == name)
                .ok_or_else(|| anyhow!("The fusion table has no {:?} column", name))
        };
        let chrom_1_idx = position(&columns.chrom_1)?;
        let breakpoint_1_idx = position(&columns.breakpoint_1)?;
        let chrom_2_idx = position(&columns.chrom_2)?;
        let breakpoint_2_idx = position(&columns.breakpoint_2)?;

        let mut records = Vec::new();
        for (idx, row) in csv_rdr.records().enumerate() {
            let row = row.with_context(|| format!("Could not parse fusion record {}", idx + 1))?;
            let fields: Vec<String> = row.iter().map(String::from).collect();

            let breakpoint_1: i64 = fields[breakpoint_1_idx].parse().with_context(|| {
                format!(
                    "Invalid breakpoint {:?} in column {:?} of fusion record {}",
                    fields[breakpoint_1_idx],
                    columns.breakpoint_1,
                    idx + 1
                )
            })?;
            let breakpoint_2: i64 = fields[breakpoint_2_idx].parse().with_context(|| {
                format!(
                    "Invalid breakpoint {:?} in column {:?} of fusion record {}",
                    fields[breakpoint_2_idx],
                    columns.breakpoint_2,
                    idx + 1
                )
            })?;

            records.push(FusionRecord {
                chrom_1: fields[chrom_1_idx].clone(),
                breakpoint_1,
                chrom_2: fields[chrom_2_idx].clone(),
                breakpoint_2,
                fields,
                ..FusionRecord::default()
            });
        }

        info!("Parsed {} fusion records.", records.len());
        Ok(FusionTable { header, records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FUSION_TABLE: &[u8] =
        b"sample,chr1,bpt1,chr2,bpt2,score\ns1,1,150,2,350,0.9\ns2,chrX,42,chrX,77,0.1\n";

    #[test]
    fn test_from_reader() {
        let table =
            FusionTable::from_reader(FUSION_TABLE, b',', &FusionColumns::default()).unwrap();
        assert_eq!(
            table.header,
            vec!["sample", "chr1", "bpt1", "chr2", "bpt2", "score"]
        );
        assert_eq!(table.records.len(), 2);

        let first = &table.records[0];
        assert_eq!(first.chrom_1, "1");
        assert_eq!(first.breakpoint_1, 150);
        assert_eq!(first.chrom_2, "2");
        assert_eq!(first.breakpoint_2, 350);
        // pass-through fields keep the whole row verbatim
        assert_eq!(first.fields, vec!["s1", "1", "150", "2", "350", "0.9"]);
        assert_eq!(first.gene_1, None);
        assert_eq!(first.feature, None);

        let second = &table.records[1];
        assert_eq!(second.chrom_1, "chrX");
        assert_eq!(second.breakpoint_2, 77);
    }

    #[test]
    fn test_from_reader_missing_column() {
        let missing: &[u8] = b"sample,chr1,bpt1,chr2\ns1,1,150,2\n";
        assert!(FusionTable::from_reader(missing, b',', &FusionColumns::default()).is_err());
    }

    #[test]
    fn test_from_reader_non_integer_breakpoint() {
        let bad: &[u8] = b"chr1,bpt1,chr2,bpt2\n1,abc,2,350\n";
        assert!(FusionTable::from_reader(bad, b',', &FusionColumns::default()).is_err());
    }

    #[test]
    fn test_from_reader_custom_columns_and_delimiter() {
        let tsv: &[u8] = b"chromA\tposA\tchromB\tposB\n5\t10\t6\t20\n";
        let columns = FusionColumns::new("chromA", "posA", "chromB", "posB").unwrap();
        let table = FusionTable::from_reader(tsv, b'\t', &columns).unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].chrom_1, "5");
        assert_eq!(table.records[0].breakpoint_2, 20);
    }
}
