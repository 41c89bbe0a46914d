//! command-line configuration.

use {
    crate::sample::MetricClass,
    clap::Parser,
    std::{str::FromStr, time::Duration},
    tracing::debug,
};

/// a compact, sampling system monitor.
#[derive(Debug, Parser)]
#[command(name = "vigil", version)]
pub struct Args {
    /// Number of samples to take [default: 10]
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    pub samples: Option<String>,

    /// Delay between samples, in seconds [default: 1]
    #[arg(long, value_name = "SECS", allow_hyphen_values = true)]
    pub tdelay: Option<String>,

    /// Report memory utilization.
    #[arg(long)]
    pub system: bool,

    /// Report logged-in user sessions.
    #[arg(long)]
    pub user: bool,

    /// Draw memory and cpu trends.
    #[arg(short, long)]
    pub graphics: bool,

    /// Redraw each pair of samples on a cleared screen instead of accumulating output.
    #[arg(long)]
    pub sequential: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    pub quiet: bool,
}

/// the immutable configuration of a run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TickConfig {
    /// the number of ticks, at least one.
    pub samples: usize,
    /// seconds slept between ticks.
    pub tdelay_secs: u64,
    pub memory: bool,
    pub users: bool,
    pub graphics: bool,
    pub sequential: bool,
}

// === impl TickConfig ===

impl TickConfig {
    pub const DEFAULT_SAMPLES: usize = 10;
    pub const DEFAULT_TDELAY_SECS: u64 = 1;

    /// whether `class` is sampled in this run. cpu always is.
    pub fn enabled(&self, class: MetricClass) -> bool {
        match class {
            MetricClass::Memory => self.memory,
            MetricClass::Users => self.users,
            MetricClass::Cpu => true,
        }
    }

    /// the classes sampled each tick, in consumption order.
    pub fn classes(&self) -> impl Iterator<Item = MetricClass> + '_ {
        MetricClass::ALL
            .into_iter()
            .filter(|class| self.enabled(*class))
    }

    pub fn tdelay(&self) -> Duration {
        Duration::from_secs(self.tdelay_secs)
    }
}

impl Default for TickConfig {
    fn default() -> Self {
        Self::from(Args::default_args())
    }
}

impl From<Args> for TickConfig {
    fn from(
        Args {
            samples,
            tdelay,
            system,
            user,
            graphics,
            sequential,
            verbose: _,
            quiet: _,
        }: Args,
    ) -> Self {
        let samples = lenient(samples.as_deref(), "samples", Self::DEFAULT_SAMPLES, |n| *n > 0);
        let tdelay_secs = lenient(tdelay.as_deref(), "tdelay", Self::DEFAULT_TDELAY_SECS, |_| true);

        // with no section chosen, both are shown. `--graphics` on its own keeps the cpu block
        // alone, unless the sequential layout was asked for too.
        let (memory, users) = match (system, user) {
            (false, false) if sequential || !graphics => (true, true),
            chosen => chosen,
        };

        Self {
            samples,
            tdelay_secs,
            memory,
            users,
            graphics,
            sequential,
        }
    }
}

// === impl Args ===

impl Args {
    /// the arguments of a run with no flags.
    fn default_args() -> Self {
        Self {
            samples: None,
            tdelay: None,
            system: false,
            user: false,
            graphics: false,
            sequential: false,
            verbose: 0,
            quiet: false,
        }
    }
}

/// parses a numeric flag, falling back to `default` when it is absent, malformed, or invalid.
fn lenient<T>(value: Option<&str>, flag: &str, default: T, valid: impl Fn(&T) -> bool) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    let Some(value) = value else {
        return default;
    };

    match value.trim().parse::<T>() {
        Ok(parsed) if valid(&parsed) => parsed,
        _ => {
            debug!(flag, value, ?default, "ignoring invalid value");
            default
        }
    }
}
