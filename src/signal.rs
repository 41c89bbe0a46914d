//! interactive signal handling.

use {
    std::io::{self, BufRead, Write},
    tracing::{info, warn},
};

/// asks before quitting on an interrupt, and ignores requests to suspend.
///
/// the monitor redraws the terminal in place, so it is kept in the foreground.
pub fn install() {
    if let Err(error) = ctrlc::set_handler(confirm_quit) {
        warn!(%error, "failed to set the interrupt handler");
    }

    // SAFETY: `SIG_IGN` installs no handler code; this only changes the disposition.
    let previous = unsafe { libc::signal(libc::SIGTSTP, libc::SIG_IGN) };
    if previous == libc::SIG_ERR {
        warn!(error = %io::Error::last_os_error(), "failed to ignore SIGTSTP");
    }
}

/// prompts on the terminal, exiting the whole process if the answer is yes.
///
/// stdout stays locked until the answer arrives, so the run loop's next frame waits behind
/// the prompt instead of drawing over it. in-flight workers are not waited for.
fn confirm_quit() {
    let mut out = io::stdout().lock();
    let quit = confirm(&mut out, &mut io::stdin().lock());

    match quit {
        Ok(true) => {
            info!("quitting on interrupt");
            std::process::exit(0);
        }
        Ok(false) => {}
        Err(error) => warn!(%error, "failed to read an answer"),
    }
}

/// asks whether to quit on `out`, and reads the answer from `input`.
fn confirm(out: &mut impl Write, input: &mut impl BufRead) -> io::Result<bool> {
    out.write_all(PROMPT.as_bytes())?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    Ok(is_yes(&answer))
}

const PROMPT: &str = "\nDo you want to quit? (y/n): ";

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim_start().chars().next(), Some('y' | 'Y'))
}
