//! Configuration structs shared between the CLI surfaces and the `.cfg`
//! sidecar reader/writer (spec.md §6).

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use crate::error::{SatireError, SatireResult};
use crate::layout::MAX_QSCORE;

/// Indexer configuration, validated once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerConfig {
    pub input_file_name: String,
    pub output_stem: String,
    pub num_docs: u32,
    pub low_score_cutoff: u32,
    pub max_quantised_value: u32,
}

impl IndexerConfig {
    /// Mirrors `sanitiseParams` in the original `i/iargTable.c`.
    pub fn validate(&self) -> SatireResult<()> {
        if self.num_docs == 0 {
            return Err(SatireError::Usage("numDocs must be > 0".into()));
        }
        if self.max_quantised_value < 2 || self.max_quantised_value > MAX_QSCORE {
            return Err(SatireError::OutOfRange(format!(
                "maxQuantisedValue must be at least 2 and at most {MAX_QSCORE}, got {}",
                self.max_quantised_value
            )));
        }
        if self.low_score_cutoff > self.max_quantised_value {
            return Err(SatireError::OutOfRange(format!(
                "lowScoreCutoff ({}) exceeds maxQuantisedValue ({})",
                self.low_score_cutoff, self.max_quantised_value
            )));
        }
        Ok(())
    }

    /// Write the `<stem>.cfg` sidecar: one `key = value` per line.
    pub fn write_cfg(&self, stem: &str) -> SatireResult<()> {
        let path = format!("{stem}.cfg");
        let mut f = std::fs::File::create(&path)?;
        writeln!(f, "inputFileName = {}", self.input_file_name)?;
        writeln!(f, "outputStem = {}", self.output_stem)?;
        writeln!(f, "numDocs = {}", self.num_docs)?;
        writeln!(f, "lowScoreCutoff = {}", self.low_score_cutoff)?;
        writeln!(f, "maxQuantisedValue = {}", self.max_quantised_value)?;
        Ok(())
    }

    /// Parse a previously-written `.cfg` sidecar. Not required by the
    /// querier at runtime (spec.md §6: "Not consumed by the querier"), but
    /// useful for tests and diagnostics.
    pub fn read_cfg(path: &Path) -> SatireResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let map = parse_kv_lines(&text);
        Ok(Self {
            input_file_name: get_str(&map, "inputFileName")?,
            output_stem: get_str(&map, "outputStem")?,
            num_docs: get_int(&map, "numDocs")?,
            low_score_cutoff: get_int(&map, "lowScoreCutoff")?,
            max_quantised_value: get_int(&map, "maxQuantisedValue")?,
        })
    }
}

/// Querier configuration, validated/clamped once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerierConfig {
    pub index_stem: String,
    pub num_docs: u32,
    pub k: u32,
    pub low_score_cutoff: u32,
    pub postings_count_cutoff: u64,
    pub debug: i32,
}

impl QuerierConfig {
    /// Clamp `k` to `>= 1`, matching the original's runtime warning +
    /// adjustment rather than a hard validation failure.
    pub fn sanitise(mut self) -> (Self, Option<String>) {
        let mut warning = None;
        if self.k < 1 {
            warning = Some(format!(
                "value of k must be at least 1. Adjusting {} to be 1 instead.",
                self.k
            ));
            self.k = 1;
        }
        (self, warning)
    }

    pub fn validate(&self) -> SatireResult<()> {
        if self.num_docs == 0 {
            return Err(SatireError::Usage("numDocs must be > 0".into()));
        }
        if self.index_stem.is_empty() {
            return Err(SatireError::Usage("indexStem is required".into()));
        }
        Ok(())
    }
}

fn parse_kv_lines(text: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for line in text.lines() {
        if let Some((k, v)) = line.split_once('=') {
            map.insert(k.trim().to_string(), v.trim().to_string());
        }
    }
    map
}

fn get_str(map: &BTreeMap<String, String>, key: &str) -> SatireResult<String> {
    map.get(key)
        .cloned()
        .ok_or_else(|| SatireError::InvalidInput { line: 0, message: format!("missing key {key} in .cfg") })
}

fn get_int(map: &BTreeMap<String, String>, key: &str) -> SatireResult<u32> {
    get_str(map, key)?
        .parse::<u32>()
        .map_err(|e| SatireError::InvalidInput { line: 0, message: format!("bad value for {key}: {e}") })
}
