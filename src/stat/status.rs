use super::*;

/// the monitor's own entry in `/proc/self/status`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SelfStatus {
    /// peak resident set size ("high water mark"), in kibibytes.
    pub vm_hwm: u64,
}

impl FromStr for SelfStatus {
    type Err = MissingField;
    fn from_str(status: &str) -> Result<Self, Self::Err> {
        keyed_value(status, "VmHWM").map(|vm_hwm| Self { vm_hwm })
    }
}
