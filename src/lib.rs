//! a compact, sampling system monitor.

pub use self::{
    config::{Args, TickConfig},
    monitor::Monitor,
    source::{MetricSource, System},
    terminal::{Canvas, Terminal},
};

use {
    self::{sample::MetricClass, source::SourceError},
    std::{fmt::Display, io},
};

pub mod config;
pub mod delta;
pub mod layout;
pub mod monitor;
pub mod sample;
pub mod signal;
pub mod source;
/// kernel statistics facilities.
///
/// this module parses the pseudo-files under `/proc`.
pub mod stat;
mod sys;
pub mod terminal;
pub mod tick;

#[cfg(test)]
mod testing;

/// an error that ends a run.
#[derive(Debug)]
pub enum Error {
    /// a metric could not be read.
    Source(SourceError),
    /// a frame could not be drawn.
    Terminal(io::Error),
    /// a worker thread could not be started.
    Spawn(io::Error),
    /// a worker exited without reporting its result.
    WorkerLost(MetricClass),
}

// === impl Error ===

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Source(source) => Some(source),
            Self::Terminal(io) | Self::Spawn(io) => Some(io),
            Self::WorkerLost(_) => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source(source) => write!(f, "{source}"),
            Self::Terminal(io) => write!(f, "failed to draw: {io}"),
            Self::Spawn(io) => write!(f, "failed to start a worker: {io}"),
            Self::WorkerLost(class) => write!(f, "the {class} worker exited without a result"),
        }
    }
}

impl From<SourceError> for Error {
    fn from(source: SourceError) -> Self {
        Self::Source(source)
    }
}
