use anyhow::ensure;
use clap::Parser;
use fusanno::annotate::Annotator;
use fusanno::options::{ExtractOptions, FusionColumns};
use fusanno::reader::fusion::FusionTable;
use fusanno::reader::gtf;
use fusanno::writer;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fusanno", version, author)]
#[command(
    about = "Annotate gene-fusion breakpoints with the gene annotations that overlap them"
)]
struct Cli {
    /// genome annotation file (GTF, optionally gzip compressed)
    #[arg(short, long)]
    gtf: PathBuf,

    /// fusion breakpoint table with chr1/bpt1/chr2/bpt2 columns
    #[arg(short, long)]
    fusions: PathBuf,

    /// annotated output table
    #[arg(short, long)]
    output: PathBuf,

    /// feature type of the annotation rows to extract
    #[arg(long, default_value = "gene")]
    feature_type: String,

    /// field delimiter of the fusion table
    #[arg(long, default_value_t = ',')]
    in_delimiter: char,

    /// field delimiter of the output table
    #[arg(long, default_value_t = '\t')]
    out_delimiter: char,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();
    ensure!(
        cli.in_delimiter.is_ascii() && cli.out_delimiter.is_ascii(),
        "delimiters must be single ASCII characters"
    );

    let start = Instant::now();
    let opts = ExtractOptions::new(&cli.feature_type);
    let intervals = gtf::extract_genes(&cli.gtf, &opts)?;
    info!(
        "Extracted {} gene intervals in {:?}.",
        intervals.len(),
        start.elapsed()
    );

    let table = FusionTable::from_path(&cli.fusions, cli.in_delimiter as u8, &FusionColumns::default())?;

    let start = Instant::now();
    let annotator = Annotator::from_intervals(intervals);
    let table = annotator.annotate_table(table);
    info!("Matched breakpoints in {:?}.", start.elapsed());

    writer::write_table_to_path(&cli.output, &table, cli.out_delimiter as u8)?;
    info!("Wrote the annotated fusion table to {:?}.", cli.output);

    Ok(())
}
