use std::{
    fmt::{self, Display},
    ops::{Deref, Not},
    str::FromStr,
};

pub use self::{
    cpu_time::{CpuCounters, CpuTime},
    cpuinfo::CpuInfo,
    meminfo::MemInfo,
    status::SelfStatus,
    uptime::{Elapsed, Uptime},
    user_hz::UserHz,
};

mod cpu_time;
mod cpuinfo;
mod meminfo;
mod status;
mod uptime;
mod user_hz;

#[cfg(test)]
mod tests;

/// an entry in the `/proc/stat` kernel statistics table.
///
/// see `proc_stat(5)` for more information.
#[derive(Debug, Eq, PartialEq)]
pub enum Entry {
    /// the amount of time that the system ("cpu" line) spent in various states.
    AllCpu {
        time: CpuTime,
    },
    /// the amount of time that a specific cpu ("cpuN" line) spent in various states.
    Cpu {
        id: CpuId,
        time: CpuTime,
    },
    /// any other line. the set of these varies between kernel versions, and none of them
    /// are read.
    Other,
}

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct CpuId(u16);

#[derive(Debug, Eq, PartialEq)]
pub enum EntryParseError {
    Empty,
    CpuIdParse(<u16 as FromStr>::Err),
    UserHzParse(<UserHz as FromStr>::Err),
    CpuTime { fields: usize },
    MissingAllCpu,
}

/// a required key was absent from a procfs file.
#[derive(Debug, Eq, PartialEq)]
pub struct MissingField {
    pub field: &'static str,
}

/// scans the contents of `/proc/stat` for the aggregate "cpu" line.
///
/// the kernel always emits the aggregate line first, so scanning stops there and later lines
/// (whose set varies between kernel versions) are never parsed.
pub fn aggregate_counters(stat: &str) -> Result<CpuCounters, EntryParseError> {
    for line in stat.lines().filter(|l| l.trim().is_empty().not()) {
        if let Entry::AllCpu { time } = line.parse::<Entry>()? {
            return Ok(time.counters());
        }
    }

    Err(EntryParseError::MissingAllCpu)
}

// === impl Entry ===

impl FromStr for Entry {
    type Err = EntryParseError;
    fn from_str(entry: &str) -> Result<Self, Self::Err> {
        let tokens = entry
            .split(' ')
            .filter(|t| t.is_empty().not())
            .collect::<Vec<_>>();
        let [kind, tokens @ ..] = tokens.as_slice() else {
            return Err(EntryParseError::Empty);
        };

        let Some(suffix) = kind.strip_prefix("cpu") else {
            return Ok(Self::Other);
        };
        let id = Self::parse_cpu_id(suffix)?;

        let time = tokens
            .iter()
            .map(Deref::deref)
            .map(str::parse::<UserHz>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(EntryParseError::UserHzParse)
            .and_then(CpuTime::try_from)?;

        Ok(if let Some(id) = id {
            Self::Cpu { id, time }
        } else {
            Self::AllCpu { time }
        })
    }
}

impl Entry {
    /// parses what follows the "cpu" prefix of a line's kind.
    fn parse_cpu_id(suffix: &str) -> Result<Option<CpuId>, EntryParseError> {
        // if there is no suffix, this is the aggregate line.
        if suffix.is_empty() {
            return Ok(None);
        }

        suffix
            .parse::<u16>()
            .map(CpuId)
            .map(Some)
            .map_err(EntryParseError::CpuIdParse)
    }
}

// === impl EntryParseError ===

impl Display for EntryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use EntryParseError::*;
        match self {
            Empty => f.write_str("empty entry"),
            CpuIdParse(error) => f.write_fmt(format_args!("invalid cpu id: {error}")),
            UserHzParse(error) => f.write_fmt(format_args!("invalid time value: {error}")),
            CpuTime { fields } => f.write_fmt(format_args!(
                "expected between {} and {} cpu time fields, found {fields}",
                self::CpuTime::MIN_FIELDS,
                self::CpuTime::MAX_FIELDS,
            )),
            MissingAllCpu => f.write_str("no aggregate cpu entry"),
        }
    }
}

impl std::error::Error for EntryParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use EntryParseError::*;

        match self {
            CpuIdParse(error) => Some(error),
            UserHzParse(error) => Some(error),
            Empty | CpuTime { fields: _ } | MissingAllCpu => None,
        }
    }
}

// === impl MissingField ===

impl Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { field } = self;
        f.write_fmt(format_args!("missing or malformed field: {field}"))
    }
}

impl std::error::Error for MissingField {}

/// returns the first numeric value on the line keyed by `key`, in `key: value [unit]` form.
fn keyed_value<T: FromStr>(text: &str, key: &'static str) -> Result<T, MissingField> {
    text.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(k, _)| k.trim() == key)
        .and_then(|(_, value)| value.split_whitespace().next())
        .and_then(|value| value.parse().ok())
        .ok_or(MissingField { field: key })
}
