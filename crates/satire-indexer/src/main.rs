//! `satire-i` — builds a SATIRE index from a stream of term-document-score
//! triples (spec.md §4.3, §6).

use std::fs::File;
use std::io::BufReader;
use std::process::ExitCode;

use clap::Parser;
use log::{info, Level};
use satire_format::IndexerConfig;

/// Builds `<outputStem>.vocab`, `<outputStem>.if`, and `<outputStem>.cfg`
/// from a sorted stream of `termid\tdocid\tscore` triples.
#[derive(Debug, Parser)]
#[command(name = "satire-i", version = satire_format::VERSION)]
struct Cli {
    /// File of text containing the term-document scores, in TSV format.
    #[arg(long = "inputFileName")]
    input_file_name: String,

    /// Stem of the index files produced: `<stem>.vocab`, `<stem>.if`, `<stem>.cfg`.
    #[arg(long = "outputStem")]
    output_stem: String,

    /// How many documents are in the corpus.
    #[arg(long = "numDocs")]
    num_docs: u32,

    /// Quantized scores below this value are dropped from the index.
    #[arg(long = "lowScoreCutoff", default_value_t = 1)]
    low_score_cutoff: u32,

    /// Floating point scores are multiplied by 10000 and floored; this
    /// bounds what the resulting integer may be (must be in 2..=65535).
    #[arg(long = "maxQuantisedValue", default_value_t = 10_000)]
    max_quantised_value: u32,

    /// Verbosity of logging output.
    #[arg(long, default_value_t = 0)]
    debug: i32,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = satire_format::logging::level_for_debug_flag(cli.debug).max(Level::Info);
    satire_format::logging::init_at(level).ok();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = IndexerConfig {
        input_file_name: cli.input_file_name.clone(),
        output_stem: cli.output_stem.clone(),
        num_docs: cli.num_docs,
        low_score_cutoff: cli.low_score_cutoff,
        max_quantised_value: cli.max_quantised_value,
    };
    cfg.validate()?;

    info!("opening input file {}", cfg.input_file_name);
    let file = File::open(&cfg.input_file_name)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", cfg.input_file_name))?;
    let reader = BufReader::with_capacity(2 * 1024 * 1024, file);

    info!(
        "opening output files: {}.cfg, {}.vocab, {}.if",
        cfg.output_stem, cfg.output_stem, cfg.output_stem
    );
    let report = satire_indexer::atomic::build_index_atomic(reader, &cfg)?;

    info!(
        "{} lines read. {} postings indexed + {} postings ignored, {} bytes written to .if file",
        report.lines_read,
        report.total_postings_count,
        report.postings_ignored_count,
        report.if_bytes_written
    );
    info!("time taken: {:.3} sec.", report.elapsed.as_secs_f64());

    Ok(())
}
