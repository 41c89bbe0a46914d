use super::*;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CpuTime {
    /// time spent in user mode.
    user: UserHz,
    /// time spent in user mode with low priority (nice).
    nice: UserHz,
    /// time spent in system mode.
    system: UserHz,
    /// time spent in the idle task.
    ///
    /// this value should be USER_HZ times the second entry in the /proc/uptime pseudo-file.
    idle: UserHz,
    /// time waiting for i/o to complete.
    ///
    /// this value is not reliable, for the following reasons:
    ///   *  the cpu will not wait for i/o to complete; iowait is the time that a task is waiting
    ///      for i/o to complete. when a cpu goes into idle state for outstanding task i/o,
    ///      another task will be scheduled on this cpu.
    ///   *  on a multi-core cpu, the task waiting for i/o to complete is not running on any cpu,
    ///      so the iowait of each cpu is difficult to calculate.
    ///   *  the value in this field may decrease in certain conditions.
    iowait: UserHz,
    /// time servicing interrupts.
    irq: UserHz,
    /// time servicing softirqs.
    softirq: UserHz,
    /// stolen time, which is the time spent in other operating systems when running in a
    /// virtualized environment. (linux 2.6.11 onward.)
    steal: UserHz,
    /// time spent running a virtual cpu for guest operating systems. (linux 2.6.24 onward.)
    guest: UserHz,
    /// time spent running a niced guest. (linux 2.6.33 onward.)
    guest_nice: UserHz,
}

/// the two counters the monitor tracks between ticks.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CpuCounters {
    /// jiffies spent in every accounted state.
    pub total: u64,
    /// jiffies spent idle.
    pub idle: u64,
}

// === impl CpuTime ===

impl CpuTime {
    /// older kernels stop after `softirq`.
    pub(super) const MIN_FIELDS: usize = 7;
    pub(super) const MAX_FIELDS: usize = 10;

    /// collapses this into total and idle jiffies.
    ///
    /// `steal` and the guest fields are left out of the total; guest time is already folded
    /// into `user` and `nice` by the kernel.
    pub fn counters(&self) -> CpuCounters {
        let Self {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
            steal: _,
            guest: _,
            guest_nice: _,
        } = *self;

        let total = user + nice + system + idle + iowait + irq + softirq;

        CpuCounters {
            total: total.as_u64(),
            idle: idle.as_u64(),
        }
    }
}

impl TryFrom<Vec<UserHz>> for CpuTime {
    type Error = EntryParseError;
    fn try_from(mut times: Vec<UserHz>) -> Result<Self, Self::Error> {
        let fields = times.len();
        if !(Self::MIN_FIELDS..=Self::MAX_FIELDS).contains(&fields) {
            return Err(EntryParseError::CpuTime { fields });
        }

        // fields a kernel does not report yet are zero.
        times.resize(Self::MAX_FIELDS, UserHz::ZERO);

        <_ as TryInto<[_; 10]>>::try_into(times)
            .map(Self::from)
            .map_err(|_| EntryParseError::CpuTime { fields })
    }
}

impl From<[UserHz; 10]> for CpuTime {
    fn from(
        [
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
            steal,
            guest,
            guest_nice,
        ]: [UserHz; 10],
    ) -> Self {
        Self {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
            steal,
            guest,
            guest_nice,
        }
    }
}
