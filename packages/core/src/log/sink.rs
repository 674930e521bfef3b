//! Built-in sinks

use std::fmt;
use std::io::Write;

use super::{Level, LogSink};

/// Writes level-tagged lines to standard error.
///
/// `Debug` and `Verbose` records are dropped unless the crate is built with
/// the `verbose-log` feature.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl StderrSink {
    #[must_use]
    pub fn enabled(level: Level) -> bool {
        cfg!(feature = "verbose-log") || level <= Level::Info
    }
}

impl LogSink for StderrSink {
    fn log(&self, level: Level, message: &fmt::Arguments<'_>) {
        if !Self::enabled(level) {
            return;
        }
        let stderr = std::io::stderr();
        let mut out = stderr.lock();
        // A failed diagnostic write has nowhere else to go.
        let _ = writeln!(out, "[unisock] {level} {message}");
    }
}

/// Forwards records to `tracing`, for applications running a subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: Level, message: &fmt::Arguments<'_>) {
        match level {
            Level::Fatal => tracing::error!(fatal = true, "{}", message),
            Level::Error => tracing::error!("{}", message),
            Level::Warn => tracing::warn!("{}", message),
            Level::Info => tracing::info!("{}", message),
            Level::Debug => tracing::debug!("{}", message),
            Level::Verbose => tracing::trace!("{}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stderr_sink_filters_debug() {
        assert!(StderrSink::enabled(Level::Fatal));
        assert!(StderrSink::enabled(Level::Info));
        assert_eq!(
            StderrSink::enabled(Level::Debug),
            cfg!(feature = "verbose-log")
        );
        assert_eq!(
            StderrSink::enabled(Level::Verbose),
            cfg!(feature = "verbose-log")
        );
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Fatal < Level::Error);
        assert!(Level::Debug < Level::Verbose);
        assert_eq!(Level::Warn.to_string(), "WARN");
    }
}
