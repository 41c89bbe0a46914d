//! screen layout.
//!
//! all row arithmetic lives here. [`render`] turns one tick's readings into a [`Frame`] of
//! positioned lines, without touching the terminal. rows and columns are 1-based.

use {
    crate::{
        config::TickConfig,
        delta::MemoryDelta,
        sample::HostIdentity,
        stat::Uptime,
        tick::{CombinedResult, TickContext},
    },
    std::iter::repeat_n,
};

const SEPARATOR: &str = "---------------------------------------";
const MEMORY_TITLE: &str = "### Memory ### (Phys.Used/Tot -- Virtual Used/Tot)";
const USERS_TITLE: &str = "### Sessions/users ###";
const SYSTEM_TITLE: &str = "### System Information ### ";

/// cpu utilization percentage points represented by one bar segment.
const BAR_QUANTUM: f64 = 0.03;

/// a line of text at a screen position.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Write {
    pub row: usize,
    pub col: usize,
    pub text: String,
}

/// everything drawn for one tick.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Frame {
    /// whether the screen is cleared before drawing.
    pub clear: bool,
    /// writes, in drawing order.
    pub writes: Vec<Write>,
}

/// the values derived for a tick, alongside its [`CombinedResult`].
#[derive(Clone, Debug, PartialEq)]
pub struct Readings {
    /// busy cpu time since the previous tick, in percent.
    pub utilization: f64,
    /// present exactly when memory was sampled.
    pub memory: Option<MemoryDelta>,
    pub cores: usize,
    /// the monitor's own peak resident size, for the header.
    pub peak_rss_kb: u64,
    /// the closing host block, on the final tick only.
    pub closing: Option<Closing>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Closing {
    pub host: HostIdentity,
    pub uptime: Uptime,
}

/// the rows of each section for one tick.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Rows {
    pub header: usize,
    pub memory_title: Option<usize>,
    pub memory_line: Option<usize>,
    pub memory_end: Option<usize>,
    pub users_title: Option<usize>,
    pub users: Option<usize>,
    pub cores: usize,
    pub cpu: usize,
    pub bar: Option<usize>,
    pub footer: Option<usize>,
}

/// the row offset of `tick`.
///
/// the continuous layout draws every tick from the top. the sequential layout draws even
/// ticks from the top of a cleared screen, and odd ticks below them.
pub fn base_row(config: &TickConfig, tick: usize, saved_user_rows: usize) -> usize {
    if config.sequential && tick % 2 == 1 {
        below(config.samples, below(saved_user_rows, 13))
    } else {
        0
    }
}

// === impl Rows ===

impl Rows {
    /// computes section rows for the tick in `ctx`, with `user_rows` sessions listed.
    ///
    /// the cores and cpu rows follow this tick's sessions, so they always sit below the
    /// session list drawn in the same frame.
    pub fn new(config: &TickConfig, ctx: &TickContext, user_rows: usize) -> Self {
        let TickConfig {
            samples,
            memory,
            users,
            graphics,
            ..
        } = *config;
        let TickContext { tick, base, .. } = *ctx;

        // the memory section holds one line per sample.
        let after_memory = below(base, samples);

        let memory_title = memory.then_some(below(base, 4));
        let memory_line = memory.then_some(below(base, below(tick, 5)));
        let memory_end = memory.then_some(below(after_memory, 5));
        let users_title = users.then_some(if memory {
            below(after_memory, 6)
        } else {
            below(base, 4)
        });
        let users_row = users.then_some(if memory {
            below(after_memory, 7)
        } else {
            below(base, 5)
        });

        let cores = match (memory, users) {
            (true, true) => below(after_memory, below(user_rows, 8)),
            (true, false) => below(after_memory, 6),
            (false, true) => below(base, below(user_rows, 6)),
            (false, false) => below(base, 4),
        };
        let cpu = below(cores, 1);

        let is_final = tick.saturating_add(1) == samples;
        let bar = (graphics && tick > 0).then_some(below(cpu, below(tick, 1)));
        // bars of ticks 1..samples sit below the cpu line, the footer below the last of them.
        let footer = is_final.then(|| {
            if graphics {
                below(cpu, below(samples, 1))
            } else {
                below(cpu, 1)
            }
        });

        Self {
            header: below(base, 1),
            memory_title,
            memory_line,
            memory_end,
            users_title,
            users: users_row,
            cores,
            cpu,
            bar,
            footer,
        }
    }
}

/// lays out one tick.
pub fn render(
    config: &TickConfig,
    ctx: &TickContext,
    combined: &CombinedResult,
    readings: &Readings,
) -> Frame {
    let rows = Rows::new(config, ctx, combined.user_rows);
    let mut frame = Frame {
        clear: ctx.tick == 0 || (config.sequential && ctx.tick % 2 == 0),
        writes: Vec::new(),
    };

    // the header is drawn once, or with every tick when each pair of ticks gets a new screen.
    if ctx.tick == 0 || config.sequential {
        header(&mut frame, config, &rows, readings.peak_rss_kb);
    }

    if let (Some(row), Some(memory)) = (rows.memory_line, &combined.memory) {
        let mut line = memory.line.clone();
        if let (true, Some(delta)) = (config.graphics, readings.memory) {
            line.push_str(&format!(
                "\t|{} {:.2} ({:.2})",
                delta.glyphs(),
                delta.diff,
                delta.used_gb
            ));
        }
        frame.put(row, line);
    }

    if let (Some(start), Some(users)) = (rows.users, &combined.users) {
        for (i, user) in users.rows.iter().enumerate() {
            frame.put(below(start, i), user.clone());
        }
        frame.put(below(start, users.rows.len()), SEPARATOR);
    }

    frame.put(rows.cores, format!("Number of cores: {}", readings.cores));
    frame.put(
        rows.cpu,
        format!("total cpu use = {:.2}%", readings.utilization),
    );

    // the first tick only records a baseline, so it has no bar.
    if let Some(row) = rows.bar.filter(|_| readings.utilization > 0.0) {
        frame.put(row, bar(readings.utilization));
    }

    if let Some(row) = rows.footer {
        frame.put(row, SEPARATOR);
        if let Some(closing) = &readings.closing {
            system_information(&mut frame, below(row, 1), closing);
        }
    }

    frame
}

fn header(frame: &mut Frame, config: &TickConfig, rows: &Rows, peak_rss_kb: u64) {
    let TickConfig {
        samples,
        tdelay_secs,
        ..
    } = *config;

    frame.put(
        rows.header,
        format!("Nbr of samples: {samples} -- every {tdelay_secs} secs"),
    );
    frame.put(
        below(rows.header, 1),
        format!(" Memory usage: {peak_rss_kb} kilobytes"),
    );
    frame.put(below(rows.header, 2), SEPARATOR);

    if let (Some(title), Some(end)) = (rows.memory_title, rows.memory_end) {
        frame.put(title, MEMORY_TITLE);
        frame.put(end, SEPARATOR);
    }
    if let Some(title) = rows.users_title {
        frame.put(title, USERS_TITLE);
    }
}

/// draws `utilization` as a run of bars, one per [`BAR_QUANTUM`].
fn bar(utilization: f64) -> String {
    let len = (utilization / BAR_QUANTUM).floor() as usize;
    let bars = repeat_n('|', len).collect::<String>();
    format!("\t\t{bars}  {utilization:.2}")
}

fn system_information(frame: &mut Frame, row: usize, Closing { host, uptime }: &Closing) {
    let HostIdentity {
        sysname,
        nodename,
        release,
        version,
        machine,
    } = host;

    let lines = [
        SYSTEM_TITLE.to_owned(),
        format!("System Name = {sysname}"),
        format!("Machine Name = {nodename}"),
        format!("Version = {version}"),
        format!("Release = {release}"),
        format!("Architecture = {machine}"),
        format!("System running since last reboot: {}", uptime.elapsed()),
        SEPARATOR.to_owned(),
    ];
    for (i, line) in lines.into_iter().enumerate() {
        frame.put(below(row, i), line);
    }
}

/// the row `n` lines below `row`. rows past the bottom of the terminal are clamped when drawn.
fn below(row: usize, n: usize) -> usize {
    row.saturating_add(n)
}

// === impl Frame ===

impl Frame {
    fn put(&mut self, row: usize, text: impl Into<String>) {
        self.writes.push(Write {
            row,
            col: 1,
            text: text.into(),
        });
    }

    /// the text last written to `row`, if any.
    #[cfg(test)]
    fn line(&self, row: usize) -> Option<&str> {
        self.writes
            .iter()
            .rev()
            .find(|write| write.row == row)
            .map(|write| write.text.as_str())
    }
}
