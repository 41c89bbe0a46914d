use super::*;

/// the subset of `/proc/meminfo` needed for memory utilization, in kibibytes.
///
/// see `proc_meminfo(5)` for more information.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MemInfo {
    pub mem_total: u64,
    pub mem_free: u64,
    pub swap_total: u64,
    pub swap_free: u64,
}

// === impl MemInfo ===

impl MemInfo {
    /// kibibytes in a gibibyte.
    const KIB_PER_GIB: f64 = (1024 * 1024) as f64;

    pub fn physical_total_gb(&self) -> f64 {
        Self::gib(self.mem_total)
    }

    pub fn physical_used_gb(&self) -> f64 {
        Self::gib(self.mem_total.saturating_sub(self.mem_free))
    }

    /// physical memory plus swap.
    pub fn virtual_total_gb(&self) -> f64 {
        Self::gib(self.mem_total + self.swap_total)
    }

    pub fn virtual_used_gb(&self) -> f64 {
        let total = self.mem_total + self.swap_total;
        let free = self.mem_free + self.swap_free;
        Self::gib(total.saturating_sub(free))
    }

    /// formats the `used / total -- virtual used / virtual total` line.
    pub fn summary(&self) -> String {
        format!(
            "{:.2} GB / {:.2} GB  -- {:.2} GB / {:.2} GB",
            self.physical_used_gb(),
            self.physical_total_gb(),
            self.virtual_used_gb(),
            self.virtual_total_gb(),
        )
    }

    fn gib(kib: u64) -> f64 {
        kib as f64 / Self::KIB_PER_GIB
    }
}

impl FromStr for MemInfo {
    type Err = MissingField;
    fn from_str(meminfo: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            mem_total: keyed_value(meminfo, "MemTotal")?,
            mem_free: keyed_value(meminfo, "MemFree")?,
            // kernels built without swap support omit these.
            swap_total: keyed_value(meminfo, "SwapTotal").unwrap_or(0),
            swap_free: keyed_value(meminfo, "SwapFree").unwrap_or(0),
        })
    }
}
