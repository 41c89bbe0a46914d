//! the run loop.

use {
    crate::{
        Error,
        config::TickConfig,
        delta::DeltaEngine,
        layout::{self, Closing, Readings},
        source::MetricSource,
        terminal::Canvas,
        tick::{self, CombinedResult, TickContext},
    },
    std::thread,
    tracing::{debug, debug_span, info},
};


/// samples and draws the configured number of ticks.
pub struct Monitor<S, C> {
    config: TickConfig,
    source: S,
    canvas: C,
    /// baselines carried from one tick to the next.
    delta: DeltaEngine,
    state: State,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    /// nothing has been sampled yet.
    Init,
    /// the next tick to sample.
    Ticking {
        ctx: TickContext,
        cores: usize,
    },
    Done,
}

// === impl Monitor ===

impl<S, C> Monitor<S, C>
where
    S: MetricSource,
    C: Canvas,
{
    pub fn new(config: TickConfig, source: S, canvas: C) -> Self {
        Self {
            config,
            source,
            canvas,
            delta: DeltaEngine::new(),
            state: State::Init,
        }
    }

    /// runs every tick, returning once the closing block is drawn.
    ///
    /// a failure to sample or draw ends the run.
    pub fn run(&mut self) -> Result<(), Error> {
        loop {
            self.state = match self.state {
                State::Init => self.init()?,
                State::Ticking { ctx, cores } => self.tick(ctx, cores)?,
                State::Done => {
                    info!(samples = self.config.samples, "finished");
                    return Ok(());
                }
            };
        }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    fn init(&mut self) -> Result<State, Error> {
        let Self { config, source, .. } = self;

        info!(
            samples = config.samples,
            tdelay = config.tdelay_secs,
            memory = config.memory,
            users = config.users,
            graphics = config.graphics,
            sequential = config.sequential,
            "starting"
        );

        if config.samples == 0 {
            return Ok(State::Done);
        }

        // the core count does not change over a run.
        let cores = source.cpu_cores()?;
        let ctx = TickContext {
            tick: 0,
            base: layout::base_row(config, 0, 0),
            saved_user_rows: 0,
        };

        Ok(State::Ticking { ctx, cores })
    }

    /// samples, draws, and then waits out one tick.
    fn tick(&mut self, ctx: TickContext, cores: usize) -> Result<State, Error> {
        let _span = debug_span!("tick", tick = ctx.tick, base = ctx.base).entered();
        let Self {
            config,
            source,
            canvas,
            delta,
            ..
        } = self;

        // returns only once every worker of this tick has been joined.
        let combined = tick::run_tick(source, config, &ctx)?;
        let is_final = ctx.tick + 1 == config.samples;

        let CombinedResult {
            memory,
            cpu,
            user_rows,
            ..
        } = &combined;
        let utilization = cpu
            .map(|counters| delta.cpu_utilization(counters))
            .unwrap_or(0.0);
        let memory = memory
            .as_ref()
            .map(|sample| delta.memory_delta(sample.physical_used_gb));
        debug!(utilization, ?memory, user_rows, "sampled");

        let closing = if is_final {
            Some(Closing {
                host: source.host_identity()?,
                uptime: source.uptime()?,
            })
        } else {
            None
        };
        let readings = Readings {
            utilization,
            memory,
            cores,
            peak_rss_kb: source.self_peak_rss_kb()?,
            closing,
        };

        let frame = layout::render(config, &ctx, &combined, &readings);
        canvas.draw(&frame).map_err(Error::Terminal)?;

        if is_final {
            return Ok(State::Done);
        }
        thread::sleep(config.tdelay());

        let saved_user_rows = if config.users {
            *user_rows
        } else {
            ctx.saved_user_rows
        };
        let tick = ctx.tick + 1;
        let next = TickContext {
            tick,
            base: layout::base_row(config, tick, saved_user_rows),
            saved_user_rows,
        };

        Ok(State::Ticking { ctx: next, cores })
    }
}
