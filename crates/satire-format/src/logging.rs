//! Minimal stderr logger shared by `satire-i` and `satire-q`.
//!
//! The original C tools wrote progress and trace output unconditionally
//! with `printf`/`fprintf(stderr, ...)`, gated ad hoc by a `debug` integer.
//! This keeps the same stderr destination and the same broad verbosity
//! levels, but routes everything through the `log` facade so volume is
//! controlled the ordinary way (`RUST_LOG`/`SATIRE_LOG`, or a `--debug`
//! flag that raises the floor).

use std::sync::OnceLock;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

const LOG_ENV: &str = "SATIRE_LOG";

struct StderrLogger {
    level: Level,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("{} [{}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

fn level_from_env() -> Level {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|s| s.parse::<LevelFilter>().ok())
        .and_then(|filter| filter.to_level())
        .unwrap_or(Level::Info)
}

/// Initialize the process-wide logger at the level named by `SATIRE_LOG`
/// (default `info`). Safe to call more than once; only the first call wins.
pub fn init() -> Result<(), SetLoggerError> {
    init_at(level_from_env())
}

/// Initialize at an explicit level, e.g. raised by a `--debug` CLI flag.
pub fn init_at(level: Level) -> Result<(), SetLoggerError> {
    static LOGGER: OnceLock<StderrLogger> = OnceLock::new();
    let first_call = LOGGER.get().is_none();
    let logger = LOGGER.get_or_init(|| StderrLogger { level });
    if first_call {
        log::set_logger(logger)?;
        log::set_max_level(level.to_level_filter());
    }
    Ok(())
}

/// Map the legacy `debug` integer (0 = quiet, >=1 = verbose) onto a level.
pub fn level_for_debug_flag(debug: i32) -> Level {
    if debug <= 0 {
        Level::Info
    } else if debug == 1 {
        Level::Debug
    } else {
        Level::Trace
    }
}
