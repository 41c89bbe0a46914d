//! values derived from the previous tick.

use {
    crate::stat::CpuCounters,
    std::{
        fmt::{self, Display},
        iter::{once, repeat_n},
    },
    tracing::debug,
};

/// remembers the previous tick's baselines.
///
/// only the immediately prior tick is kept. both baselines start out empty; the first tick
/// establishes them without producing a reading.
#[derive(Debug, Default)]
pub struct DeltaEngine {
    /// the last observed cpu counters.
    cpu: Option<CpuCounters>,
    /// the last observed physical memory usage, in gibibytes.
    memory: Option<f64>,
}

/// the change in physical memory usage since the previous tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MemoryDelta {
    /// gibibytes gained (positive) or released (negative).
    pub diff: f64,
    /// the usage this tick, in gibibytes.
    pub used_gb: f64,
}

/// a run of glyphs whose length encodes the magnitude of a memory delta.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GlyphRun {
    Steady,
    Rising(usize),
    Falling(usize),
}

// === impl DeltaEngine ===

impl DeltaEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// returns the percentage of cpu time spent busy since the previous call.
    ///
    /// the first call only records a baseline and returns 0. a tick in which no jiffies
    /// elapsed is reported as idle.
    pub fn cpu_utilization(&mut self, current: CpuCounters) -> f64 {
        let Self { cpu, .. } = self;

        let Some(previous) = cpu.replace(current) else {
            debug!(?current, "recorded cpu baseline");
            return 0.0;
        };

        let total = current.total.saturating_sub(previous.total);
        let idle = current.idle.saturating_sub(previous.idle);
        if total == 0 {
            return 0.0;
        }

        let busy = total.saturating_sub(idle);
        let percent = (busy as f64 / total as f64 * 100.0).clamp(0.0, 100.0);
        debug!(total, idle, percent, "computed cpu utilization");

        percent
    }

    /// returns the change in physical memory usage since the previous call.
    ///
    /// the first call has nothing to compare against, and reports no change.
    pub fn memory_delta(&mut self, used_gb: f64) -> MemoryDelta {
        let Self { memory, .. } = self;

        let diff = match memory.replace(used_gb) {
            Some(previous) => used_gb - previous,
            None => 0.0,
        };

        MemoryDelta { diff, used_gb }
    }
}

// === impl MemoryDelta ===

impl MemoryDelta {
    pub fn glyphs(&self) -> GlyphRun {
        GlyphRun::new(self.diff)
    }
}

// === impl GlyphRun ===

impl GlyphRun {
    /// gibibytes represented by one glyph.
    pub const QUANTUM: f64 = 0.01;

    const STEADY: char = 'o';
    const RISING: char = '#';
    const RISING_END: char = '*';
    const FALLING: char = ':';
    const FALLING_END: char = '@';

    pub fn new(diff: f64) -> Self {
        let len = |magnitude: f64| (magnitude / Self::QUANTUM).floor() as usize;

        if diff > 0.0 {
            Self::Rising(len(diff))
        } else if diff < 0.0 {
            Self::Falling(len(-diff))
        } else {
            Self::Steady
        }
    }

    /// the number of glyphs before the terminator.
    pub fn len(&self) -> usize {
        match *self {
            Self::Steady => 0,
            Self::Rising(n) | Self::Falling(n) => n,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Display for GlyphRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (glyph, end, n) = match *self {
            Self::Steady => return f.write_fmt(format_args!("{}", Self::STEADY)),
            Self::Rising(n) => (Self::RISING, Self::RISING_END, n),
            Self::Falling(n) => (Self::FALLING, Self::FALLING_END, n),
        };

        let run = repeat_n(glyph, n).chain(once(end)).collect::<String>();
        f.write_str(&run)
    }
}
