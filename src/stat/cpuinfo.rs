use super::*;

/// core topology read from `/proc/cpuinfo`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CpuInfo {
    /// the `cpu cores` field of the first processor block, if the architecture reports one.
    pub cpu_cores: Option<usize>,
    /// the number of `processor` blocks.
    pub processors: usize,
}

// === impl CpuInfo ===

impl CpuInfo {
    /// the number of cores to report.
    ///
    /// x86 kernels report physical cores per package; other architectures only list their
    /// processors, in which case those are counted instead.
    pub fn cores(&self) -> Result<usize, MissingField> {
        match self {
            Self {
                cpu_cores: Some(cores),
                ..
            } if *cores > 0 => Ok(*cores),
            Self { processors, .. } if *processors > 0 => Ok(*processors),
            _ => Err(MissingField { field: "processor" }),
        }
    }
}

impl FromStr for CpuInfo {
    type Err = MissingField;
    fn from_str(cpuinfo: &str) -> Result<Self, Self::Err> {
        let cpu_cores = keyed_value(cpuinfo, "cpu cores").ok();
        let processors = cpuinfo
            .lines()
            .filter_map(|line| line.split_once(':'))
            .filter(|(key, _)| key.trim() == "processor")
            .count();

        Ok(Self {
            cpu_cores,
            processors,
        })
    }
}
