//! sampling a single tick.
//!
//! each enabled [`MetricClass`] is sampled by its own worker thread, which reports back over a
//! private one-shot channel. results are consumed in the fixed order of [`MetricClass::ALL`],
//! and every worker is joined before the tick returns, so no tick overlaps the next.

use {
    crate::{
        Error,
        config::TickConfig,
        sample::{self, MemorySample, MetricClass, SampleResult, UsersSample},
        source::{MetricSource, SourceError},
        stat::CpuCounters,
    },
    std::{
        sync::mpsc::{self, Receiver},
        thread::{self, Scope, ScopedJoinHandle},
    },
    tracing::trace,
};

/// per-tick layout state, owned by the run loop.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TickContext {
    /// the zero-based index of this tick.
    pub tick: usize,
    /// the row offset this tick is drawn at.
    pub base: usize,
    /// the number of user rows reported by the previous tick.
    pub saved_user_rows: usize,
}

/// everything sampled during one tick.
///
/// a slot is filled exactly when its class is enabled.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CombinedResult {
    pub memory: Option<MemorySample>,
    pub users: Option<UsersSample>,
    pub cpu: Option<CpuCounters>,
    /// the number of user rows sampled this tick, 0 when users are disabled.
    pub user_rows: usize,
}

/// a worker sampling one metric class.
struct Worker<'scope> {
    class: MetricClass,
    result: Receiver<Result<SampleResult, SourceError>>,
    handle: ScopedJoinHandle<'scope, ()>,
}

/// samples every class `config` enables, concurrently.
pub fn run_tick<S: MetricSource>(
    source: &S,
    config: &TickConfig,
    ctx: &TickContext,
) -> Result<CombinedResult, Error> {
    thread::scope(|scope| {
        let mut workers = Vec::with_capacity(MetricClass::ALL.len());
        for class in config.classes() {
            trace!(tick = ctx.tick, %class, "launching worker");
            workers.push(Worker::spawn(scope, class, source)?);
        }

        // every worker is drained, even after a failure, before the first error is reported.
        let mut combined = CombinedResult::default();
        let mut failure = None;
        for worker in workers {
            match worker.finish() {
                Ok(result) => combined.insert(result),
                Err(error) => {
                    failure.get_or_insert(error);
                }
            }
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(combined),
        }
    })
}

// === impl Worker ===

impl<'scope> Worker<'scope> {
    fn spawn<'env, S: MetricSource>(
        scope: &'scope Scope<'scope, 'env>,
        class: MetricClass,
        source: &'env S,
    ) -> Result<Self, Error> {
        let (tx, result) = mpsc::sync_channel(1);
        let handle = thread::Builder::new()
            .name(format!("vigil-{class}"))
            .spawn_scoped(scope, move || {
                let sampled = sample::sample(class, source);
                // the coordinator only hangs up after it has failed already.
                let _ = tx.send(sampled);
            })
            .map_err(Error::Spawn)?;

        Ok(Self {
            class,
            result,
            handle,
        })
    }

    /// waits for this worker's result, then joins it.
    fn finish(self) -> Result<SampleResult, Error> {
        let Self {
            class,
            result,
            handle,
        } = self;

        let received = result.recv();
        let joined = handle.join();
        trace!(%class, "worker finished");

        match (received, joined) {
            (Ok(sampled), Ok(())) => {
                let sampled = sampled?;
                debug_assert_eq!(sampled.class(), class);
                Ok(sampled)
            }
            _ => Err(Error::WorkerLost(class)),
        }
    }
}

// === impl CombinedResult ===

impl CombinedResult {
    fn insert(&mut self, result: SampleResult) {
        match result {
            SampleResult::Memory(memory) => self.memory = Some(memory),
            SampleResult::Users(users) => {
                self.user_rows = users.rows.len();
                self.users = Some(users);
            }
            SampleResult::Cpu(cpu) => self.cpu = Some(cpu),
        }
    }
}
