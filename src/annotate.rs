use crate::reader::fusion::FusionTable;
use std::collections::HashMap;
use tracing::info;

/// Label assigned to a fusion whose two breakpoints lie on the same chromosome.
pub const INTRACHROMOSOMAL: &str = "Intrachromosomal";
/// Label assigned to a fusion whose two breakpoints lie on different chromosomes.
pub const INTERCHROMOSOMAL: &str = "Interchromosomal";

#[derive(Debug, Clone, PartialEq, Eq)]
/// A gene annotation reduced to its genomic span.
///
/// One `GeneInterval` is extracted per qualifying row of the annotation file
/// (see [crate::reader::gtf]). The span is 1-based and inclusive on both ends,
/// following the GTF coordinate convention.
///
/// # Fields
///
/// * `seqname`: The chromosome (or contig) name, kept verbatim from the
///   annotation file. Chromosome names are compared by exact string equality
///   during matching; no normalization between e.g. "chr1" and "1" is applied.
/// * `start`: The first position of the gene span (inclusive).
/// * `end`: The last position of the gene span (inclusive).
/// * `gene_id`: The versioned gene identifier, e.g. `ENSG00000243485.5`.
///
/// An interval with `start > end` is not rejected; it simply can never
/// contain a position.
pub struct GeneInterval {
    pub seqname: String,
    pub start: i64,
    pub end: i64,
    pub gene_id: String,
}

impl GeneInterval {
    /// Returns `true` if `position` falls within this interval,
    /// inclusive on both ends.
    pub fn contains(&self, position: i64) -> bool {
        self.start <= position && position <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The outcome of resolving one breakpoint against the gene intervals.
///
/// A `MatchResult` borrows from the index it was resolved against and is
/// consumed immediately to fill in one side of a [FusionRecord]; it is never
/// persisted on its own. `NotFound` is an expected outcome, not an error.
pub enum MatchResult<'a> {
    Found(&'a GeneInterval),
    NotFound,
}

impl<'a> MatchResult<'a> {
    /// Returns the matched interval, or [None] for [MatchResult::NotFound].
    pub fn found(&self) -> Option<&'a GeneInterval> {
        match *self {
            MatchResult::Found(interval) => Some(interval),
            MatchResult::NotFound => None,
        }
    }
}

/// The lookup capability used to resolve a breakpoint to a containing gene.
///
/// Implementations must return the first interval, in original annotation
/// input order, whose `seqname` equals the query chromosome and whose span
/// contains the query position. Keeping the tie-break tied to input order is
/// part of the contract: when overlapping gene annotations both contain a
/// position, the one that appeared earliest in the annotation file wins.
pub trait Resolve {
    fn resolve(&self, seqname: &str, position: i64) -> MatchResult<'_>;
}

/// The gene intervals of one annotation file, bucketed by chromosome.
///
/// Buckets preserve the relative input order of the intervals they hold, so
/// resolving against a `GeneIndex` is observably identical to a linear scan
/// over the original extraction order. The index is built once per run and is
/// read-only afterwards.
pub struct GeneIndex {
    by_seqname: HashMap<String, Vec<GeneInterval>>,
    num_intervals: usize,
}

impl GeneIndex {
    /// Builds an index from intervals in annotation input order.
    pub fn from_intervals(intervals: Vec<GeneInterval>) -> GeneIndex {
        let num_intervals = intervals.len();
        let mut by_seqname: HashMap<String, Vec<GeneInterval>> = HashMap::new();
        for interval in intervals {
            by_seqname
                .entry(interval.seqname.clone())
                .or_default()
                .push(interval);
        }
        GeneIndex {
            by_seqname,
            num_intervals,
        }
    }

    /// The total number of indexed intervals.
    pub fn len(&self) -> usize {
        self.num_intervals
    }

    /// Returns `true` if the index holds no intervals.
    pub fn is_empty(&self) -> bool {
        self.num_intervals == 0
    }
}

impl Resolve for GeneIndex {
    fn resolve(&self, seqname: &str, position: i64) -> MatchResult<'_> {
        match self.by_seqname.get(seqname) {
            Some(bucket) => bucket
                .iter()
                .find(|interval| interval.contains(position))
                .map_or(MatchResult::NotFound, MatchResult::Found),
            None => MatchResult::NotFound,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// One row of the fusion breakpoint table, before or after annotation.
///
/// # Fields
///
/// * `chrom_1` / `breakpoint_1`: The chromosome and position of the first
///   breakpoint of the fusion.
/// * `chrom_2` / `breakpoint_2`: The chromosome and position of the second
///   breakpoint.
/// * `fields`: Every column of the original input row, verbatim and in input
///   column order, carried through to the output unchanged.
/// * `gene_1`, `start_1`, `end_1`: Set when the first breakpoint resolves to
///   a gene interval; left [None] otherwise.
/// * `gene_2`, `start_2`, `end_2`: Likewise for the second breakpoint. The
///   two sides are resolved independently.
/// * `feature`: The intra-/inter-chromosomal classification label. Only set
///   when the first breakpoint resolves to a gene (see [Annotator::annotate]).
pub struct FusionRecord {
    pub chrom_1: String,
    pub breakpoint_1: i64,
    pub chrom_2: String,
    pub breakpoint_2: i64,
    pub fields: Vec<String>,
    pub gene_1: Option<String>,
    pub start_1: Option<i64>,
    pub end_1: Option<i64>,
    pub gene_2: Option<String>,
    pub start_2: Option<i64>,
    pub end_2: Option<i64>,
    pub feature: Option<String>,
}

impl FusionRecord {
    /// Creates an unannotated record from its two breakpoints. The
    /// pass-through `fields` start empty; readers populate them from the
    /// input row.
    pub fn new<T: ToString>(
        chrom_1: T,
        breakpoint_1: i64,
        chrom_2: T,
        breakpoint_2: i64,
    ) -> FusionRecord {
        FusionRecord {
            chrom_1: chrom_1.to_string(),
            breakpoint_1,
            chrom_2: chrom_2.to_string(),
            breakpoint_2,
            ..FusionRecord::default()
        }
    }
}

/// Annotates fusion records against an immutable [GeneIndex].
///
/// The annotator owns the index for the duration of the batch run. Each
/// record is annotated as a pure transform: the input record is consumed and
/// a new annotated record is returned; no shared table is mutated in place.
pub struct Annotator {
    index: GeneIndex,
}

impl Annotator {
    pub fn new(index: GeneIndex) -> Annotator {
        Annotator { index }
    }

    /// Builds the index from intervals in annotation input order and wraps it.
    pub fn from_intervals(intervals: Vec<GeneInterval>) -> Annotator {
        Annotator::new(GeneIndex::from_intervals(intervals))
    }

    pub fn index(&self) -> &GeneIndex {
        &self.index
    }

    /// Resolves both breakpoints of `record` and returns the annotated record.
    ///
    /// On a match for breakpoint 1, `gene_1`/`start_1`/`end_1` are set from
    /// the matched interval and `feature` is set to [INTRACHROMOSOMAL] when
    /// `chrom_1 == chrom_2`, [INTERCHROMOSOMAL] otherwise. On a match for
    /// breakpoint 2, `gene_2`/`start_2`/`end_2` are set. An unmatched side
    /// leaves its slots untouched.
    ///
    /// Note the asymmetry: `feature` is assigned only when breakpoint 1
    /// matches, regardless of what happens on the second side. This mirrors
    /// the reference pipeline this tool replaces and is kept for output
    /// compatibility.
    pub fn annotate(&self, mut record: FusionRecord) -> FusionRecord {
        if let MatchResult::Found(hit) = self.index.resolve(&record.chrom_1, record.breakpoint_1) {
            record.gene_1 = Some(hit.gene_id.clone());
            record.start_1 = Some(hit.start);
            record.end_1 = Some(hit.end);
            record.feature = Some(String::from(if record.chrom_1 == record.chrom_2 {
                INTRACHROMOSOMAL
            } else {
                INTERCHROMOSOMAL
            }));
        }

        if let MatchResult::Found(hit) = self.index.resolve(&record.chrom_2, record.breakpoint_2) {
            record.gene_2 = Some(hit.gene_id.clone());
            record.start_2 = Some(hit.start);
            record.end_2 = Some(hit.end);
        }

        record
    }

    /// Annotates every record of `table`, reporting per-side match tallies.
    pub fn annotate_table(&self, table: FusionTable) -> FusionTable {
        let FusionTable { header, records } = table;
        let records: Vec<FusionRecord> = records
            .into_iter()
            .map(|record| self.annotate(record))
            .collect();

        let n_matched_1 = records.iter().filter(|r| r.gene_1.is_some()).count();
        let n_matched_2 = records.iter().filter(|r| r.gene_2.is_some()).count();
        info!(
            "Annotated {} fusion records against {} gene intervals; {} matched on breakpoint 1, {} on breakpoint 2.",
            records.len(),
            self.index.len(),
            n_matched_1,
            n_matched_2
        );

        FusionTable { header, records }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(seqname: &str, start: i64, end: i64, gene_id: &str) -> GeneInterval {
        GeneInterval {
            seqname: seqname.to_string(),
            start,
            end,
            gene_id: gene_id.to_string(),
        }
    }

    #[test]
    fn test_resolve_containment() {
        let index = GeneIndex::from_intervals(vec![interval("1", 100, 200, "G1")]);
        assert_eq!(
            index.resolve("1", 150).found().map(|g| g.gene_id.as_str()),
            Some("G1")
        );
        assert_eq!(index.resolve("1", 99), MatchResult::NotFound);
        assert_eq!(index.resolve("1", 201), MatchResult::NotFound);
        // chromosome comparison is an exact string match
        assert_eq!(index.resolve("chr1", 150), MatchResult::NotFound);
    }

    #[test]
    fn test_resolve_boundary_inclusive() {
        let index = GeneIndex::from_intervals(vec![interval("1", 100, 200, "G1")]);
        assert_eq!(
            index.resolve("1", 100).found().map(|g| g.start),
            Some(100)
        );
        assert_eq!(index.resolve("1", 200).found().map(|g| g.end), Some(200));
    }

    #[test]
    fn test_resolve_first_match_wins() {
        // overlapping annotations: input order decides, not span size
        let index = GeneIndex::from_intervals(vec![
            interval("1", 100, 500, "G1"),
            interval("1", 140, 160, "G2"),
        ]);
        assert_eq!(
            index.resolve("1", 150).found().map(|g| g.gene_id.as_str()),
            Some("G1")
        );
    }

    #[test]
    fn test_resolve_unknown_seqname() {
        let index = GeneIndex::from_intervals(vec![interval("1", 100, 200, "G1")]);
        assert_eq!(index.resolve("2", 150), MatchResult::NotFound);
    }

    #[test]
    fn test_resolve_inverted_span_never_matches() {
        let index = GeneIndex::from_intervals(vec![interval("1", 200, 100, "G1")]);
        assert_eq!(index.resolve("1", 150), MatchResult::NotFound);
    }

    #[test]
    fn test_annotate_both_sides() {
        let annotator = Annotator::from_intervals(vec![interval("1", 100, 200, "G1")]);
        let record = annotator.annotate(FusionRecord::new("1", 150, "1", 999));

        assert_eq!(record.gene_1.as_deref(), Some("G1"));
        assert_eq!(record.start_1, Some(100));
        assert_eq!(record.end_1, Some(200));
        assert_eq!(record.gene_2, None);
        assert_eq!(record.start_2, None);
        assert_eq!(record.end_2, None);
        assert_eq!(record.feature.as_deref(), Some(INTRACHROMOSOMAL));
    }

    #[test]
    fn test_annotate_label_requires_first_side_match() {
        // breakpoint 1 has no matching chromosome, so no label is assigned
        // even though breakpoint 2 resolves
        let annotator = Annotator::from_intervals(vec![interval("1", 100, 200, "G1")]);
        let record = annotator.annotate(FusionRecord::new("2", 50, "1", 150));

        assert_eq!(record.gene_1, None);
        assert_eq!(record.feature, None);
        assert_eq!(record.gene_2.as_deref(), Some("G1"));
        assert_eq!(record.start_2, Some(100));
        assert_eq!(record.end_2, Some(200));
    }

    #[test]
    fn test_annotate_interchromosomal_label() {
        let annotator = Annotator::from_intervals(vec![
            interval("1", 100, 200, "G1"),
            interval("2", 300, 400, "G2"),
        ]);
        let record = annotator.annotate(FusionRecord::new("1", 150, "2", 350));

        assert_eq!(record.feature.as_deref(), Some(INTERCHROMOSOMAL));
        assert_eq!(record.gene_1.as_deref(), Some("G1"));
        assert_eq!(record.gene_2.as_deref(), Some("G2"));
    }

    #[test]
    fn test_annotate_no_match_leaves_record_unchanged() {
        let annotator = Annotator::from_intervals(vec![interval("1", 100, 200, "G1")]);
        let input = FusionRecord::new("3", 10, "4", 20);
        let record = annotator.annotate(input.clone());
        assert_eq!(record, input);
    }

    #[test]
    fn test_annotate_idempotent() {
        let annotator = Annotator::from_intervals(vec![
            interval("1", 100, 200, "G1"),
            interval("2", 300, 400, "G2"),
        ]);
        let once = annotator.annotate(FusionRecord::new("1", 150, "2", 350));
        let twice = annotator.annotate(once.clone());
        assert_eq!(once, twice);
    }
}
