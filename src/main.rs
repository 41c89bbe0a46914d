//! a compact, sampling system monitor.

use {
    clap::Parser,
    std::{io::Write, process::ExitCode},
    tracing::{Level, error},
    tracing_subscriber::EnvFilter,
    vigil::{Args, Monitor, System, Terminal, TickConfig, signal, source::ProcFs},
};

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);
    signal::install();

    let config = TickConfig::from(args);

    match monitor(config, std::io::stdout()).run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "monitor failed");
            eprintln!("vigil: {err}");
            ExitCode::FAILURE
        }
    }
}

/// a monitor of this host, drawing onto `out`.
fn monitor<W: Write>(config: TickConfig, out: W) -> Monitor<System, Terminal<W>> {
    Monitor::new(config, System::new(ProcFs::default()), Terminal::new(out))
}

/// logs to stderr, so frames on stdout stay intact.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("vigil={level}").parse() {
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
