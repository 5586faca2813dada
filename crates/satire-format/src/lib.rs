//! Shared on-disk layout, integer codec, configuration, and error types for
//! the SATIRE score-ordered inverted-index engine.
//!
//! This crate has no opinion on how triples get produced or how queries get
//! delivered; it only defines the contract the indexer writes and the
//! querier reads.

pub mod codec;
pub mod config;
pub mod counters;
pub mod error;
pub mod layout;
pub mod logging;

pub use config::{IndexerConfig, QuerierConfig};
pub use counters::Counters;
pub use error::{SatireError, SatireResult};
pub use layout::{RunHeader, VocabEntry};

/// Library version, echoed by both binaries' `--version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum termids accepted per query line (spec.md §4.5 / §6).
pub const MAX_QTERMS: usize = 100;

/// Accumulator block size (spec.md §3 / §4.7).
pub const ACC_BLOCK_SIZE: usize = 1024;
