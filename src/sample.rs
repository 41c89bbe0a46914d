//! sampled metrics, and the worker that samples them.

use {
    crate::{
        source::{MetricSource, SourceError},
        stat::{CpuCounters, MemInfo},
    },
    std::fmt::{self, Display},
};

/// an independently enabled category of sampled data.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum MetricClass {
    Memory,
    Users,
    Cpu,
}

/// the result of sampling one [`MetricClass`].
#[derive(Clone, Debug, PartialEq)]
pub enum SampleResult {
    Memory(MemorySample),
    Users(UsersSample),
    Cpu(CpuCounters),
}

#[derive(Clone, Debug, PartialEq)]
pub struct MemorySample {
    /// the formatted `used / total -- virtual used / virtual total` line.
    pub line: String,
    /// physical memory in use, in gibibytes.
    pub physical_used_gb: f64,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UsersSample {
    /// one formatted line per session.
    pub rows: Vec<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HostIdentity {
    pub sysname: String,
    pub nodename: String,
    pub release: String,
    pub version: String,
    pub machine: String,
}

/// samples `class` from `source`.
///
/// this is the body of a worker: it reads exactly one metric and returns. source failures are
/// returned as they are, there is no partial result.
pub fn sample(class: MetricClass, source: &impl MetricSource) -> Result<SampleResult, SourceError> {
    match class {
        MetricClass::Memory => source.memory().map(SampleResult::Memory),
        MetricClass::Users => source
            .connected_users()
            .map(|rows| UsersSample { rows })
            .map(SampleResult::Users),
        MetricClass::Cpu => source.cpu_counters().map(SampleResult::Cpu),
    }
}

// === impl MetricClass ===

impl MetricClass {
    /// every class, in the order their results are consumed.
    pub const ALL: [Self; 3] = [Self::Memory, Self::Users, Self::Cpu];
}

impl Display for MetricClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Memory => "memory",
            Self::Users => "users",
            Self::Cpu => "cpu",
        })
    }
}

// === impl SampleResult ===

impl SampleResult {
    pub fn class(&self) -> MetricClass {
        match self {
            Self::Memory(_) => MetricClass::Memory,
            Self::Users(_) => MetricClass::Users,
            Self::Cpu(_) => MetricClass::Cpu,
        }
    }
}

// === impl MemorySample ===

impl From<&MemInfo> for MemorySample {
    fn from(info: &MemInfo) -> Self {
        Self {
            line: info.summary(),
            physical_used_gb: info.physical_used_gb(),
        }
    }
}
