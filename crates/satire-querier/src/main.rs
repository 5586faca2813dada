//! `satire-q` — evaluates top-k SAAT queries against a mapped index
//! (spec.md §4.5, §6).

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use log::{debug, info, warn, Level};
use satire_format::QuerierConfig;
use satire_querier::{Engine, MAX_QTERMS};

/// Answers top-k ranked queries against a SATIRE index built by `satire-i`.
#[derive(Debug, Parser)]
#[command(name = "satire-q", version = satire_format::VERSION)]
struct Cli {
    /// Stem of the index files to query: `<stem>.vocab`, `<stem>.if`.
    #[arg(long = "indexStem")]
    index_stem: String,

    /// How many documents are in the corpus.
    #[arg(long = "numDocs")]
    num_docs: u32,

    /// Target ranked result count per query.
    #[arg(long, default_value_t = 10)]
    k: u32,

    /// ETM-1: stop once the next QSCORE to process falls below this.
    #[arg(long = "lowScoreCutoff", default_value_t = 1)]
    low_score_cutoff: u32,

    /// ETM-2: stop once this many postings have been processed. 0 disables.
    #[arg(long = "postingsCountCutoff", default_value_t = 0)]
    postings_count_cutoff: u64,

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
    let raw_config = QuerierConfig {
        index_stem: cli.index_stem.clone(),
        num_docs: cli.num_docs,
        k: cli.k,
        low_score_cutoff: cli.low_score_cutoff,
        postings_count_cutoff: cli.postings_count_cutoff,
        debug: cli.debug,
    };
    let (config, warning) = raw_config.sanitise();
    if let Some(msg) = warning {
        warn!("{msg}");
    }
    config.validate()?;

    info!("opening index {}.vocab / {}.if", config.index_stem, config.index_stem);
    let mut engine = Engine::open(config)?;
    info!("index mapped and warmed, ready for queries");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut query_number: u64 = 0;
    for line in stdin.lock().lines() {
        let line = line?;
        let Some((qid_str, rest)) = line.split_once('\t') else { break };
        let Ok(queryid) = qid_str.trim().parse::<i64>() else { break };

        let mut termids: Vec<u32> = Vec::new();
        let mut overflowed = false;
        for tok in rest.split_whitespace() {
            if termids.len() >= MAX_QTERMS {
                overflowed = true;
                continue;
            }
            if let Ok(t) = tok.parse::<u32>() {
                termids.push(t);
            }
        }
        if overflowed {
            warn!("query {queryid} supplied more than {MAX_QTERMS} termids; extras discarded");
        }

        query_number += 1;
        debug!("query {queryid}: {} terms", termids.len());

        let (results, counters) = engine.run_query(&termids)?;
        for r in &results {
            writeln!(out, "{queryid}\t{}\t{}\tSATIRE", r.docid, r.rank)?;
        }
        eprintln!("{}", counters.format_per_query(query_number));

        if query_number % 10 == 0 {
            info!("{query_number} queries processed");
        }
    }

    eprintln!("{}", engine.global_counters().format_global());
    Ok(())
}
