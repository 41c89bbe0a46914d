use super::*;

mod entry_parse_tests {
    use super::*;

    // two examples provided in the `proc_stat(5)` man page.
    const EXAMPLE_1: &str = "cpu 10132153 290696 3084719 46828483 16683 0 25195 0 175628 0";
    const EXAMPLE_2: &str = "cpu0 1393280 32966 572056 13343292 6130 0 17875 0 23933 0";

    #[test]
    fn example_1() {
        let entry = EXAMPLE_1.parse::<Entry>().unwrap();
        assert!(matches!(entry, Entry::AllCpu { .. }));
    }

    #[test]
    fn example_2() {
        let entry = EXAMPLE_2.parse::<Entry>().unwrap();
        assert!(matches!(entry, Entry::Cpu { id: CpuId(0), .. }));
    }

    #[test]
    fn example_3() {
        const EXAMPLE_3: &str = "cpu  10132153 290696 3084719 46828483 16683 0 25195 0 175628 0";
        let _ = EXAMPLE_3.parse::<Entry>().unwrap();
    }

    #[test]
    fn bad_cpu_id() {
        let err = "cpuA 0 0 0 0 0 0 0 0 0 0".parse::<Entry>().unwrap_err();
        assert!(matches!(err, EntryParseError::CpuIdParse(_)));
    }

    #[test]
    fn empty() {
        assert_eq!("   ".parse::<Entry>().unwrap_err(), EntryParseError::Empty);
    }

    /// kernels older than 2.6.11 stop after softirq.
    #[test]
    fn seven_times() {
        const ENTRY: &str = "cpu 10132153 290696 3084719 46828483 16683 0 25195";
        let entry = ENTRY.parse::<Entry>().unwrap();
        assert!(matches!(entry, Entry::AllCpu { .. }));
    }

    /// parse a cpu entry that is missing too many of its times.
    #[test]
    fn missing_time() {
        const ENTRY: &str = "cpu 10132153 290696 3084719 46828483 16683 0";
        let err = ENTRY.parse::<Entry>().unwrap_err();
        assert_eq!(err, EntryParseError::CpuTime { fields: 6 });
    }

    /// parse a cpu entry that has one too many times..
    #[test]
    fn extra_time() {
        const ENTRY: &str = "cpu 10132153 290696 3084719 46828483 16683 0 25195 0 175628 0 0";
        let err = ENTRY.parse::<Entry>().unwrap_err();
        assert_eq!(err, EntryParseError::CpuTime { fields: 11 });
    }

    #[test]
    fn other_kinds() {
        for entry in [
            "page 5741 1808",
            "intr 1462898",
            "procs_running 6",
            "softirq 229245889 94 60001584 13619 5175704 2471304 28 51212741 59130143 0 51240672",
            "some_future_entry 0 0 0 0 0 0 0 0 0 0",
        ] {
            assert_eq!(entry.parse::<Entry>(), Ok(Entry::Other), "{entry}");
        }
    }

    /// counters on long-lived hosts overflow 32 bits.
    #[test]
    fn big() {
        let entry = "cpu  5000000000 5000000000 5000000000 5000000000 5000000000 5000000000 5000000000 0 0 0"
                .parse::<Entry>()
                .unwrap();
        let Entry::AllCpu { time } = entry else {
            panic!("expected the aggregate line");
        };
        assert_eq!(
            time.counters(),
            CpuCounters {
                total: 35_000_000_000,
                idle: 5_000_000_000,
            }
        );
    }
}

mod parse_cpu_id_tests {
    use super::*;

    #[test]
    fn all() {
        assert_eq!(Entry::parse_cpu_id(""), Ok(None));
    }

    #[test]
    fn one() {
        assert_eq!(Entry::parse_cpu_id("1"), Ok(Some(CpuId(1))));
    }

    #[test]
    fn a() {
        assert!(matches!(
            Entry::parse_cpu_id("a"),
            Err(EntryParseError::CpuIdParse(_))
        ));
    }
}

mod aggregate_counters_tests {
    use super::*;

    const STAT: &str = "\
cpu  10132153 290696 3084719 46828483 16683 0 25195 0 175628 0
cpu0 1393280 32966 572056 13343292 6130 0 17875 0 23933 0
intr 1462898
ctxt 115315
btime 769041601
processes 86031
procs_running 6
procs_blocked 2
";

    #[test]
    fn sums_the_first_seven_fields() {
        let counters = aggregate_counters(STAT).unwrap();
        assert_eq!(
            counters,
            CpuCounters {
                total: 60_377_929,
                idle: 46_828_483,
            }
        );
    }

    #[test]
    fn stops_before_unknown_entries() {
        let stat = format!("{STAT}some_future_entry 1 2 3\n");
        assert!(aggregate_counters(&stat).is_ok());
    }

    #[test]
    fn per_cpu_lines_are_not_the_aggregate() {
        let err = aggregate_counters("cpu0 1 0 1 8 0 0 0\ncpu1 1 0 1 8 0 0 0\n").unwrap_err();
        assert_eq!(err, EntryParseError::MissingAllCpu);
    }

    #[test]
    fn missing_aggregate() {
        let err = aggregate_counters("intr 1462898\n").unwrap_err();
        assert_eq!(err, EntryParseError::MissingAllCpu);
    }
}

mod meminfo_tests {
    use super::*;

    const MEMINFO: &str = "\
MemTotal:        8388608 kB
MemFree:         2097152 kB
MemAvailable:    4194304 kB
Buffers:          123456 kB
Cached:          1048576 kB
SwapCached:            0 kB
SwapTotal:       2097152 kB
SwapFree:        1048576 kB
";

    #[test]
    fn parse() {
        let info = MEMINFO.parse::<MemInfo>().unwrap();
        assert_eq!(
            info,
            MemInfo {
                mem_total: 8_388_608,
                mem_free: 2_097_152,
                swap_total: 2_097_152,
                swap_free: 1_048_576,
            }
        );
    }

    #[test]
    fn summary() {
        let info = MEMINFO.parse::<MemInfo>().unwrap();
        assert_eq!(info.physical_used_gb(), 6.0);
        assert_eq!(info.summary(), "6.00 GB / 8.00 GB  -- 7.00 GB / 10.00 GB");
    }

    #[test]
    fn without_swap() {
        let info = "MemTotal: 1048576 kB\nMemFree: 524288 kB\n"
            .parse::<MemInfo>()
            .unwrap();
        assert_eq!(info.summary(), "0.50 GB / 1.00 GB  -- 0.50 GB / 1.00 GB");
    }

    #[test]
    fn missing_total() {
        let err = "MemFree: 524288 kB\n".parse::<MemInfo>().unwrap_err();
        assert_eq!(err, MissingField { field: "MemTotal" });
    }
}

mod cpuinfo_tests {
    use super::*;

    const X86: &str = "\
processor\t: 0
model name\t: Some CPU
cpu cores\t: 2

processor\t: 1
model name\t: Some CPU
cpu cores\t: 2

processor\t: 2
cpu cores\t: 2

processor\t: 3
cpu cores\t: 2
";

    const AARCH64: &str = "\
processor\t: 0
BogoMIPS\t: 48.00

processor\t: 1
BogoMIPS\t: 48.00

processor\t: 2
BogoMIPS\t: 48.00
";

    #[test]
    fn reports_cpu_cores() {
        let info = X86.parse::<CpuInfo>().unwrap();
        assert_eq!(info.processors, 4);
        assert_eq!(info.cores(), Ok(2));
    }

    #[test]
    fn falls_back_to_processors() {
        let info = AARCH64.parse::<CpuInfo>().unwrap();
        assert_eq!(info.cpu_cores, None);
        assert_eq!(info.cores(), Ok(3));
    }

    #[test]
    fn empty() {
        let info = "".parse::<CpuInfo>().unwrap();
        assert!(info.cores().is_err());
    }
}

mod uptime_tests {
    use super::*;

    #[test]
    fn parse() {
        let uptime = "350735.47 234388.90\n".parse::<Uptime>().unwrap();
        assert_eq!(uptime, Uptime(350735.47));
    }

    #[test]
    fn elapsed() {
        let elapsed = Uptime(350735.47).elapsed();
        assert_eq!(
            elapsed,
            Elapsed {
                days: 4,
                hours: 1,
                minutes: 25,
                seconds: 35,
            }
        );
        assert_eq!(elapsed.to_string(), "4 days 1:25:35 (97:25:35)");
    }

    #[test]
    fn garbage() {
        assert!("uptime".parse::<Uptime>().is_err());
    }
}

mod status_tests {
    use super::*;

    #[test]
    fn peak_rss() {
        const STATUS: &str = "Name:\tvigil\nVmPeak:\t  10000 kB\nVmHWM:\t    2048 kB\nVmRSS:\t    1900 kB\n";
        let status = STATUS.parse::<SelfStatus>().unwrap();
        assert_eq!(status, SelfStatus { vm_hwm: 2048 });
    }
}
