//! Fusanno annotates gene-fusion breakpoint records with the gene annotations
//! that overlap them. It parses a [GTF](https://www.ensembl.org/info/website/upload/gff.html)
//! genome annotation file into a set of per-gene genomic intervals, resolves each
//! breakpoint of every fusion record to the gene (if any) whose span contains it on
//! the matching chromosome, and labels each fusion as intra- or inter-chromosomal.
//!
//! The crate is organized as a small library around a batch pipeline:
//! [reader::gtf] extracts gene intervals from the annotation file,
//! [annotate] resolves breakpoints against those intervals and fills in the
//! fusion records, and [writer] persists the enriched fusion table.

pub mod annotate;
pub mod options;
pub mod reader;
pub mod utils;
pub mod writer;

pub use annotate::{Annotator, FusionRecord, GeneIndex, GeneInterval, MatchResult, Resolve};
