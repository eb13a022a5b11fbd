use crate::annotate::FusionRecord;
use crate::reader::fusion::FusionTable;
use anyhow::Context;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// The annotation columns appended after the original fusion table columns.
pub const ANNOTATION_COLUMNS: [&str; 7] = [
    "gene_1", "start_1", "end_1", "gene_2", "start_2", "end_2", "feature",
];

/// Writes the annotated fusion table to a file on disk.
pub fn write_table_to_path<T: AsRef<Path>>(
    file_path: T,
    table: &FusionTable,
    delimiter: u8,
) -> anyhow::Result<()> {
    let file = File::create(file_path.as_ref())
        .with_context(|| format!("Could not create the output file {:?}", file_path.as_ref()))?;
    write_table(file, table, delimiter)
}

/// Writes the annotated fusion table to any [Write].
///
/// The output carries the original columns verbatim, followed by the
/// [ANNOTATION_COLUMNS]. An unset annotation slot serializes as an empty
/// field, so unmatched records pass through with their original content
/// intact.
pub fn write_table<T: Write>(wtr: T, table: &FusionTable, delimiter: u8) -> anyhow::Result<()> {
    let mut csv_wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(wtr);

    let mut header = table.header.clone();
    header.extend(ANNOTATION_COLUMNS.iter().map(|c| c.to_string()));
    csv_wtr
        .write_record(&header)
        .context("Could not write the output header")?;

    for record in &table.records {
        csv_wtr
            .write_record(annotated_row(record))
            .context("Could not write an output record")?;
    }

    csv_wtr.flush()?;
    Ok(())
}

fn annotated_row(record: &FusionRecord) -> Vec<String> {
    let mut row = record.fields.clone();
    row.push(record.gene_1.clone().unwrap_or_default());
    row.push(record.start_1.map(|v| v.to_string()).unwrap_or_default());
    row.push(record.end_1.map(|v| v.to_string()).unwrap_or_default());
    row.push(record.gene_2.clone().unwrap_or_default());
    row.push(record.start_2.map(|v| v.to_string()).unwrap_or_default());
    row.push(record.end_2.map(|v| v.to_string()).unwrap_or_default());
    row.push(record.feature.clone().unwrap_or_default());
    row
}
