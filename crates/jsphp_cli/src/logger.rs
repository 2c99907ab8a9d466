//! A stderr logger for the `log` facade.

use log::{Level, LevelFilter, Log, Metadata, Record};

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
        match record.level() {
            Level::Error | Level::Warn => eprintln!("{}: {}", record.level().as_str().to_lowercase(), record.args()),
            _ => eprintln!("[{} {}] {}", record.level(), record.target(), record.args()),
        }
    }

    fn flush(&self) {}
}

/// The level for `-v` repeated `verbose` times, or errors only when quiet.
pub fn level_filter(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init(verbose: u8, quiet: bool) {
    // A second installation attempt keeps the first logger.
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level_filter(verbose, quiet));
    }
}
