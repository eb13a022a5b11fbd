use crate::annotate::GeneInterval;
use crate::options::ExtractOptions;
use crate::utils::is_gzipped;
use anyhow::{bail, Context};
use flate2::bufread::MultiGzDecoder;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// Sentinel value assigned to every recognized attribute key that is absent
/// from a record's attribute string.
pub const NA: &str = "NA";

/// The attribute keys extracted from the GTF attribute column. Any other key
/// encountered in the attribute string is ignored.
pub const RECOGNIZED_ATTRIBUTES: [&str; 14] = [
    "gene_id",
    "gene_version",
    "transcript_id",
    "transcript_version",
    "gene_name",
    "gene_source",
    "gene_biotype",
    "transcript_name",
    "transcript_source",
    "transcript_biotype",
    "exon_number",
    "exon_version",
    "exon_id",
    "tag",
];

/// Combines a base identifier with its version field, following the Ensembl
/// versioned-identifier convention: the version is appended after a dot, and
/// an absent ([NA]) version leaves the base identifier untouched.
///
/// # Examples
///
/// ```rust
/// use fusanno::reader::gtf::id_version;
///
/// assert_eq!(id_version("ENSG00000243485", "5"), "ENSG00000243485.5");
/// assert_eq!(id_version("ENSG00000243485", "NA"), "ENSG00000243485");
/// ```
pub fn id_version(base_id: &str, version: &str) -> String {
    if version == NA {
        base_id.to_string()
    } else {
        format!("{}.{}", base_id, version)
    }
}

#[derive(Debug, Clone)]
/// The recognized attributes of one GTF record.
///
/// Built by tokenizing the semicolon-delimited attribute column
/// (`key1 "value1"; key2 "value2"; ...`). Parsing is best-effort by design:
/// a token that cannot be split into a key and a value is skipped silently,
/// an unrecognized key is ignored, and every recognized key that never
/// appears keeps the [NA] sentinel. A malformed pair therefore degrades one
/// attribute, never the whole record.
pub struct GtfAttributes {
    values: HashMap<&'static str, String>,
}

impl GtfAttributes {
    /// Tokenizes a raw attribute string into recognized key/value pairs.
    pub fn parse(raw: &str) -> GtfAttributes {
        let mut values: HashMap<&'static str, String> = RECOGNIZED_ATTRIBUTES
            .iter()
            .map(|&key| (key, String::from(NA)))
            .collect();

        for token in raw.split(';') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            // a token without a key/value split is malformed; skip it
            let Some((key, value)) = token.split_once(' ') else {
                continue;
            };
            if let Some(slot) = values.get_mut(key) {
                *slot = value.trim().trim_matches('"').to_string();
            }
        }

        GtfAttributes { values }
    }

    /// The value of a recognized key, or [NA] if the key is not recognized
    /// or was absent from the attribute string.
    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map_or(NA, |value| value.as_str())
    }

    /// The versioned gene identifier, e.g. `ENSG00000243485.5`.
    pub fn gene_id(&self) -> String {
        id_version(self.get("gene_id"), self.get("gene_version"))
    }

    /// The versioned transcript identifier.
    pub fn transcript_id(&self) -> String {
        id_version(self.get("transcript_id"), self.get("transcript_version"))
    }

    /// The versioned exon identifier.
    pub fn exon_id(&self) -> String {
        id_version(self.get("exon_id"), self.get("exon_version"))
    }
}

/// Extracts gene intervals from a GTF file on disk.
///
/// Supports both plain text and gzipped input, automatically detecting the
/// compression from the gzip magic number.
///
/// # Arguments
///
/// * `file_path`: The path of the GTF file to read.
/// * `opts`: Extraction options; see [ExtractOptions].
///
/// # Returns
///
/// Returns `anyhow::Result<Vec<GeneInterval>>`:
/// * `Ok(Vec<GeneInterval>)`: One interval per row whose feature type equals
///   `opts.feature_type`, in input row order.
/// * `Err(anyhow::Error)`: If the file cannot be opened or a row fails the
///   structural checks described in [extract_genes_from_reader].
pub fn extract_genes<T: AsRef<Path>>(
    file_path: T,
    opts: &ExtractOptions,
) -> anyhow::Result<Vec<GeneInterval>> {
    let file = File::open(file_path.as_ref())
        .with_context(|| format!("Could not open the annotation file {:?}", file_path.as_ref()))?;
    let mut inner_rdr = BufReader::new(file);

    if is_gzipped(&mut inner_rdr)? {
        info!("auto-detected gzipped file - reading via decompression");
        extract_genes_from_reader(BufReader::new(MultiGzDecoder::new(inner_rdr)), opts)
    } else {
        extract_genes_from_reader(inner_rdr, opts)
    }
}

/// Extracts gene intervals from any [BufRead] over GTF text.
///
/// Comment lines (starting with `#`) and blank lines are skipped. Every
/// other line must carry at least 9 tab-separated fields with integer start
/// and end coordinates; a line violating this fails the whole run, as the
/// offending record cannot be matched meaningfully downstream. Attribute
/// parsing, in contrast, stays best-effort (see [GtfAttributes::parse]).
///
/// The chromosome, start, and end of each interval come verbatim from
/// fields 0, 3 and 4 of the row; the gene identifier is the versioned
/// `gene_id` from the attribute column.
pub fn extract_genes_from_reader<T: BufRead>(
    rdr: T,
    opts: &ExtractOptions,
) -> anyhow::Result<Vec<GeneInterval>> {
    let mut intervals = Vec::new();
    let mut n_comments = 0usize;
    let mut n_records = 0usize;

    for (idx, l) in rdr.lines().enumerate() {
        let line = l?;
        if line.starts_with('#') {
            n_comments += 1;
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        n_records += 1;

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 9 {
            bail!(
                "Invalid record at line {}: expected at least 9 tab-separated fields, found {}",
                idx + 1,
                fields.len()
            );
        }
        if fields[2] != opts.feature_type {
            continue;
        }

        let start: i64 = fields[3].parse().with_context(|| {
            format!("Invalid start coordinate {:?} at line {}", fields[3], idx + 1)
        })?;
        let end: i64 = fields[4].parse().with_context(|| {
            format!("Invalid end coordinate {:?} at line {}", fields[4], idx + 1)
        })?;

        let attributes = GtfAttributes::parse(fields[8]);
        intervals.push(GeneInterval {
            seqname: fields[0].to_string(),
            start,
            end,
            gene_id: attributes.gene_id(),
        });
    }

    info!(
        "Finished parsing the annotation file. Found {} comments and {} records; extracted {} {:?} intervals.",
        n_comments,
        n_records,
        intervals.len(),
        opts.feature_type
    );
    Ok(intervals)
}
