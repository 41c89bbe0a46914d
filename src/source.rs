//! metric sources.
//!
//! [`MetricSource`] is the boundary between the sampling engine and the host. [`System`] is
//! the real implementation, reading procfs through a [`ProcSource`] and calling into libc for
//! the few metrics that have no procfs file.

use {
    crate::{
        sample::{HostIdentity, MemorySample},
        stat::{self, CpuCounters, CpuInfo, EntryParseError, MemInfo, MissingField, SelfStatus, Uptime},
        sys,
    },
    std::{
        collections::{HashMap, VecDeque},
        fmt::{self, Display},
        fs::File,
        io::{self, BufReader, Cursor, Read},
        path::PathBuf,
        sync::Mutex,
    },
};

pub use self::procfs::*;

/// a provider of host metrics.
///
/// every method is a synchronous, stateless read. implementations are shared by the worker
/// threads of a tick, hence `Sync`.
pub trait MetricSource: Sync {
    /// physical and virtual memory utilization.
    fn memory(&self) -> Result<MemorySample, SourceError>;
    /// aggregate cpu time counters since boot.
    fn cpu_counters(&self) -> Result<CpuCounters, SourceError>;
    /// the number of cpu cores.
    fn cpu_cores(&self) -> Result<usize, SourceError>;
    /// one formatted row per logged-in user session.
    fn connected_users(&self) -> Result<Vec<String>, SourceError>;
    fn host_identity(&self) -> Result<HostIdentity, SourceError>;
    fn uptime(&self) -> Result<Uptime, SourceError>;
    /// this process's peak resident set size, in kibibytes.
    fn self_peak_rss_kb(&self) -> Result<u64, SourceError>;
}

/// the host system.
#[derive(Default)]
pub struct System<P = ProcFs> {
    procfs: P,
}

/// a failure to read a metric from the host.
#[derive(Debug)]
pub enum SourceError {
    Io { file: ProcFile, error: io::Error },
    Entry(EntryParseError),
    Field { file: ProcFile, missing: MissingField },
    Sys { call: &'static str, error: io::Error },
}

/// abstracts over providers of procfs files.
mod procfs {
    use super::*;

    /// the procfs files the monitor reads.
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    pub enum ProcFile {
        Stat,
        MemInfo,
        CpuInfo,
        Uptime,
        SelfStatus,
    }

    /// a source of procfs files.
    pub trait ProcSource {
        /// returns a reader over the given file.
        fn open(&self, file: ProcFile) -> io::Result<impl Read>;
    }

    /// files backed by a mounted procfs.
    pub struct ProcFs {
        root: PathBuf,
    }

    /// a mock procfs.
    #[derive(Default)]
    #[allow(dead_code, reason = "this is a testing utility.")]
    pub struct MockProcFs {
        files: Mutex<HashMap<ProcFile, VecDeque<String>>>,
    }

    // === impl ProcFile ===

    impl ProcFile {
        /// the path of this file, relative to the procfs mount point.
        pub fn path(self) -> &'static str {
            match self {
                Self::Stat => "stat",
                Self::MemInfo => "meminfo",
                Self::CpuInfo => "cpuinfo",
                Self::Uptime => "uptime",
                Self::SelfStatus => "self/status",
            }
        }
    }

    impl Display for ProcFile {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_fmt(format_args!("/proc/{}", self.path()))
        }
    }

    // === impl ProcFs ===

    impl ProcFs {
        const ROOT: &str = "/proc";

        /// reads procfs mounted somewhere other than `/proc`.
        pub fn at(root: impl Into<PathBuf>) -> Self {
            Self { root: root.into() }
        }
    }

    impl Default for ProcFs {
        fn default() -> Self {
            Self::at(Self::ROOT)
        }
    }

    impl ProcSource for ProcFs {
        fn open(&self, file: ProcFile) -> io::Result<impl Read> {
            let Self { root } = self;
            File::open(root.join(file.path())).map(BufReader::new)
        }
    }

    // === impl MockProcFs ===

    #[allow(dead_code, reason = "this is a testing utility.")]
    impl MockProcFs {
        /// queues the contents returned by the next unanswered `open` of `file`.
        pub fn push(&self, file: ProcFile, contents: impl Into<String>) {
            let Self { files } = self;

            files
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .entry(file)
                .or_default()
                .push_back(contents.into());
        }
    }

    impl ProcSource for MockProcFs {
        fn open(&self, file: ProcFile) -> io::Result<impl Read> {
            let Self { files } = self;

            files
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .get_mut(&file)
                .and_then(VecDeque::pop_front)
                .map(Cursor::new)
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, file.to_string()))
        }
    }
}

// === impl System ===

impl<P> System<P> {
    pub fn new(procfs: P) -> Self {
        Self { procfs }
    }
}

impl<P: ProcSource> System<P> {
    fn read(&self, file: ProcFile) -> Result<String, SourceError> {
        let Self { procfs } = self;

        let mut contents = String::new();
        procfs
            .open(file)
            .and_then(|mut reader| reader.read_to_string(&mut contents))
            .map_err(|error| SourceError::Io { file, error })?;

        Ok(contents)
    }

    /// reads and parses one of the key-value procfs files.
    fn parse<T>(&self, file: ProcFile) -> Result<T, SourceError>
    where
        T: std::str::FromStr<Err = MissingField>,
    {
        self.read(file)?
            .parse()
            .map_err(|missing| SourceError::Field { file, missing })
    }
}

impl<P: ProcSource + Sync> MetricSource for System<P> {
    fn memory(&self) -> Result<MemorySample, SourceError> {
        self.parse::<MemInfo>(ProcFile::MemInfo)
            .map(|info| MemorySample::from(&info))
    }

    fn cpu_counters(&self) -> Result<CpuCounters, SourceError> {
        let stat = self.read(ProcFile::Stat)?;
        stat::aggregate_counters(&stat).map_err(SourceError::Entry)
    }

    fn cpu_cores(&self) -> Result<usize, SourceError> {
        let file = ProcFile::CpuInfo;
        self.parse::<CpuInfo>(file)?
            .cores()
            .map_err(|missing| SourceError::Field { file, missing })
    }

    fn connected_users(&self) -> Result<Vec<String>, SourceError> {
        sys::user_sessions().map(|sessions| sessions.iter().map(ToString::to_string).collect())
    }

    fn host_identity(&self) -> Result<HostIdentity, SourceError> {
        sys::uname()
    }

    fn uptime(&self) -> Result<Uptime, SourceError> {
        self.parse(ProcFile::Uptime)
    }

    fn self_peak_rss_kb(&self) -> Result<u64, SourceError> {
        self.parse::<SelfStatus>(ProcFile::SelfStatus)
            .map(|status| status.vm_hwm)
    }
}

// === impl SourceError ===

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { error, .. } | Self::Sys { error, .. } => Some(error),
            Self::Entry(entry) => Some(entry),
            Self::Field { missing, .. } => Some(missing),
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { file, error } => f.write_fmt(format_args!("failed to read {file}: {error}")),
            Self::Entry(entry) => f.write_fmt(format_args!("failed to parse /proc/stat: {entry}")),
            Self::Field { file, missing } => f.write_fmt(format_args!("{file}: {missing}")),
            Self::Sys { call, error } => f.write_fmt(format_args!("{call} failed: {error}")),
        }
    }
}

impl From<EntryParseError> for SourceError {
    fn from(entry: EntryParseError) -> Self {
        Self::Entry(entry)
    }
}
