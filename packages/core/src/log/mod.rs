//! Leveled log sink
//!
//! Every failure is logged where it is detected, before it is returned.
//! The process-wide sink can be replaced once, before any other call into
//! this crate; until then records go to [`StderrSink`].

use std::fmt;

use once_cell::sync::OnceCell;

#[macro_use]
mod macros;
mod sink;

pub use sink::{StderrSink, TracingSink};

/// Record severity, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Fatal,
    Error,
    Warn,
    Info,
    Debug,
    Verbose,
}

impl Level {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Fatal => "FATAL",
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Verbose => "VERBOSE",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination for log records.
pub trait LogSink: Send + Sync {
    fn log(&self, level: Level, message: &fmt::Arguments<'_>);
}

static SINK: OnceCell<Box<dyn LogSink>> = OnceCell::new();
static DEFAULT_SINK: StderrSink = StderrSink;

/// Install the process-wide sink.
///
/// Succeeds only for the first caller; records emitted before installation
/// have already gone to the default sink.
///
/// # Errors
///
/// Returns `Err(sink)` when a sink is already in place.
pub fn set_sink(sink: Box<dyn LogSink>) -> std::result::Result<(), Box<dyn LogSink>> {
    SINK.set(sink)
}

/// Whether a custom sink has been installed.
#[must_use]
pub fn has_custom_sink() -> bool {
    SINK.get().is_some()
}

#[doc(hidden)]
pub fn emit(level: Level, message: fmt::Arguments<'_>) {
    match SINK.get() {
        Some(sink) => sink.log(level, &message),
        None => DEFAULT_SINK.log(level, &message),
    }
}
