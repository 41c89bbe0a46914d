//! a scripted metric source.

use {
    crate::{
        sample::{HostIdentity, MemorySample, MetricClass},
        source::{MetricSource, SourceError},
        stat::{CpuCounters, Uptime},
    },
    std::{
        collections::VecDeque,
        io,
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
    },
};

/// a metric source that replays scripted readings and counts how often each class is read.
///
/// memory and session readings are replayed in order, the last one repeating. cpu counters advance by 100
/// jiffies per read, half of them idle.
pub(crate) struct FakeSource {
    memory: Mutex<VecDeque<f64>>,
    cpu: Mutex<CpuCounters>,
    users: Mutex<VecDeque<Vec<String>>>,
    cores: usize,
    failing: Option<MetricClass>,
    panicking: Option<MetricClass>,
    calls: [AtomicUsize; 3],
}

impl Default for FakeSource {
    fn default() -> Self {
        Self {
            memory: Mutex::new(VecDeque::from([4.0])),
            cpu: Mutex::new(CpuCounters::default()),
            users: Mutex::new(VecDeque::from([Vec::new()])),
            cores: 4,
            failing: None,
            panicking: None,
            calls: Default::default(),
        }
    }
}

impl FakeSource {
    pub(crate) fn with_memory(self, used_gb: impl IntoIterator<Item = f64>) -> Self {
        Self {
            memory: Mutex::new(used_gb.into_iter().collect()),
            ..self
        }
    }

    pub(crate) fn with_users<'a>(self, rows: impl IntoIterator<Item = &'a str>) -> Self {
        let rows = rows.into_iter().map(str::to_owned).collect::<Vec<_>>();
        Self {
            users: Mutex::new(VecDeque::from([rows])),
            ..self
        }
    }

    /// replays a different number of sessions on each read.
    pub(crate) fn with_session_counts(self, counts: impl IntoIterator<Item = usize>) -> Self {
        let sessions = |n: usize| -> Vec<String> {
            (0..n).map(|i| format!("user{i}\tpts/{i} ()")).collect()
        };
        Self {
            users: Mutex::new(counts.into_iter().map(sessions).collect()),
            ..self
        }
    }

    pub(crate) fn with_cores(self, cores: usize) -> Self {
        Self { cores, ..self }
    }

    pub(crate) fn failing(self, class: MetricClass) -> Self {
        Self {
            failing: Some(class),
            ..self
        }
    }

    pub(crate) fn panicking(self, class: MetricClass) -> Self {
        Self {
            panicking: Some(class),
            ..self
        }
    }

    /// reads of memory, users, and cpu so far.
    pub(crate) fn calls(&self) -> [usize; 3] {
        let [memory, users, cpu] = &self.calls;
        [memory, users, cpu].map(|calls| calls.load(Ordering::SeqCst))
    }

    fn read(&self, class: MetricClass) -> Result<(), SourceError> {
        let index = MetricClass::ALL
            .iter()
            .position(|c| *c == class)
            .expect("every class is listed");
        self.calls[index].fetch_add(1, Ordering::SeqCst);

        if self.panicking == Some(class) {
            panic!("{class} source panicked");
        }
        if self.failing == Some(class) {
            return Err(SourceError::Sys {
                call: "fake",
                error: io::Error::other(format!("{class} unavailable")),
            });
        }

        Ok(())
    }
}

impl MetricSource for FakeSource {
    fn memory(&self) -> Result<MemorySample, SourceError> {
        self.read(MetricClass::Memory)?;

        let used = replay(&self.memory);

        Ok(MemorySample {
            line: format!("{used:.2} GB / 16.00 GB  -- {used:.2} GB / 18.00 GB"),
            physical_used_gb: used,
        })
    }

    fn cpu_counters(&self) -> Result<CpuCounters, SourceError> {
        self.read(MetricClass::Cpu)?;

        let mut cpu = self.cpu.lock().unwrap();
        cpu.total += 100;
        cpu.idle += 50;
        Ok(*cpu)
    }

    fn cpu_cores(&self) -> Result<usize, SourceError> {
        Ok(self.cores)
    }

    fn connected_users(&self) -> Result<Vec<String>, SourceError> {
        self.read(MetricClass::Users)?;
        Ok(replay(&self.users))
    }

    fn host_identity(&self) -> Result<HostIdentity, SourceError> {
        Ok(HostIdentity {
            sysname: "Linux".to_owned(),
            nodename: "vigil-test".to_owned(),
            release: "6.1.0".to_owned(),
            version: "#1 SMP".to_owned(),
            machine: "x86_64".to_owned(),
        })
    }

    fn uptime(&self) -> Result<Uptime, SourceError> {
        Ok(Uptime(93_784.0))
    }

    fn self_peak_rss_kb(&self) -> Result<u64, SourceError> {
        Ok(2048)
    }
}

/// the next scripted reading, or the last one once the script runs out.
fn replay<T: Clone>(script: &Mutex<VecDeque<T>>) -> T {
    let mut script = script.lock().unwrap();
    if script.len() > 1 {
        script.pop_front().unwrap()
    } else {
        script.front().cloned().unwrap()
    }
}
