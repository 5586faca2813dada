//! Ensures a build never leaves a partial index visible as successful
//! (spec.md §7): `.vocab` and `.if` are built in temp files beside the
//! target stem and only renamed into place once every byte has been
//! written and flushed, grounded in
//! `ajw998-blaze/crates/engine/src/index/persist.rs::write_index_atomic`
//! (`tempfile::NamedTempFile` + `persist`).

use std::io::BufRead;
use std::path::{Path, PathBuf};

use satire_format::{IndexerConfig, SatireError, SatireResult};
use tempfile::NamedTempFile;

use crate::build::{self, IndexerReport};

fn stem_dir(output_stem: &str) -> PathBuf {
    Path::new(output_stem)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Run the full build: validate configuration, stream the input through
/// [`build::build`] into temp files, then atomically publish `.vocab`,
/// `.if`, and `.cfg`.
pub fn build_index_atomic<R: BufRead>(input: R, cfg: &IndexerConfig) -> SatireResult<IndexerReport> {
    cfg.validate()?;

    let dir = stem_dir(&cfg.output_stem);
    let vocab_tmp = NamedTempFile::new_in(&dir)?;
    let if_tmp = NamedTempFile::new_in(&dir)?;

    let (report, vocab_tmp, if_tmp) = build::build(input, cfg, vocab_tmp, if_tmp)?;

    vocab_tmp
        .persist(format!("{}.vocab", cfg.output_stem))
        .map_err(|e| SatireError::Io(e.error))?;
    if_tmp
        .persist(format!("{}.if", cfg.output_stem))
        .map_err(|e| SatireError::Io(e.error))?;

    cfg.write_cfg(&cfg.output_stem)?;

    Ok(report)
}
