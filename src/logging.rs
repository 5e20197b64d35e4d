//! Minimal stderr logger behind the `log` facade.
//!
//! Level resolution: `-q` > `-v` count > `CNT_MESH_LOG` > `info`.

use std::io::Write;

use log::{Level, LevelFilter, Log, Metadata, Record};

pub const LOG_ENV: &str = "CNT_MESH_LOG";

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let tag = match record.level() {
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        };
        let _ = writeln!(std::io::stderr().lock(), "[{tag}] {}", record.args());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Pick the level from flags and environment.
pub fn resolve_level(verbose: u8, quiet: bool, env: Option<&str>) -> LevelFilter {
    if quiet {
        return LevelFilter::Warn;
    }
    match verbose {
        0 => env
            .and_then(|s| s.trim().parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Info),
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the logger once; later calls only adjust the level.
pub fn init(level: LevelFilter) {
    // Fails only when a logger is already installed (tests, repeated runs).
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
