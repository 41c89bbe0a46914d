use super::*;

/// seconds since boot, from the first field of `/proc/uptime`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Uptime(pub f64);

/// uptime broken down for display.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Elapsed {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

// === impl Uptime ===

impl Uptime {
    pub fn elapsed(self) -> Elapsed {
        const MINUTE: u64 = 60;
        const HOUR: u64 = 60 * MINUTE;
        const DAY: u64 = 24 * HOUR;

        let Self(secs) = self;
        let secs = secs.max(0.0) as u64;

        Elapsed {
            days: secs / DAY,
            hours: secs % DAY / HOUR,
            minutes: secs % HOUR / MINUTE,
            seconds: secs % MINUTE,
        }
    }
}

impl FromStr for Uptime {
    type Err = MissingField;
    fn from_str(uptime: &str) -> Result<Self, Self::Err> {
        uptime
            .split_whitespace()
            .next()
            .and_then(|secs| secs.parse().ok())
            .map(Self)
            .ok_or(MissingField { field: "uptime" })
    }
}

// === impl Elapsed ===

impl Display for Elapsed {
    /// `D days H:MM:SS (TH:MM:SS)`, where `TH` counts the days in hours.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            days,
            hours,
            minutes,
            seconds,
        } = *self;
        let total_hours = days * 24 + hours;

        f.write_fmt(format_args!(
            "{days} days {hours}:{minutes:02}:{seconds:02} ({total_hours}:{minutes:02}:{seconds:02})"
        ))
    }
}
