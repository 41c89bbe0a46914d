//! metrics read through libc rather than procfs.

use {
    crate::{sample::HostIdentity, source::SourceError},
    std::{
        ffi::c_char,
        fmt::{self, Display},
        io,
        sync::Mutex,
    },
};

/// a login session recorded in the utmp database.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserSession {
    pub user: String,
    /// the tty the session is attached to.
    pub line: String,
    /// the remote host, empty for local logins.
    pub host: String,
}

/// the utmp cursor is process-global.
static UTMP: Mutex<()> = Mutex::new(());

/// returns the sessions of logged-in users, in utmp order.
pub fn user_sessions() -> Result<Vec<UserSession>, SourceError> {
    let _guard = UTMP.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let mut sessions = Vec::new();

    // SAFETY: access to the utmp cursor is serialized by `UTMP`, and each record returned by
    // `getutxent` is copied out before the next call invalidates it.
    unsafe {
        libc::setutxent();
        loop {
            let entry = libc::getutxent();
            if entry.is_null() {
                break;
            }
            let entry = &*entry;
            if entry.ut_type != libc::USER_PROCESS {
                continue;
            }
            sessions.push(UserSession {
                user: field(&entry.ut_user),
                line: field(&entry.ut_line),
                host: field(&entry.ut_host),
            });
        }
        libc::endutxent();
    }

    Ok(sessions)
}

/// identifies the running kernel and host via `uname(2)`.
pub fn uname() -> Result<HostIdentity, SourceError> {
    // SAFETY: `utsname` is plain old data; zeroed is a valid value for it.
    let mut buf: libc::utsname = unsafe { std::mem::zeroed() };

    // SAFETY: `buf` is a valid, writable `utsname`.
    if unsafe { libc::uname(&mut buf) } == -1 {
        return Err(SourceError::Sys {
            call: "uname",
            error: io::Error::last_os_error(),
        });
    }

    Ok(HostIdentity {
        sysname: field(&buf.sysname),
        nodename: field(&buf.nodename),
        release: field(&buf.release),
        version: field(&buf.version),
        machine: field(&buf.machine),
    })
}

/// copies a fixed-size, possibly unterminated c string field.
fn field(chars: &[c_char]) -> String {
    let bytes = chars
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect::<Vec<_>>();

    String::from_utf8_lossy(&bytes).into_owned()
}

// === impl UserSession ===

impl Display for UserSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { user, line, host } = self;
        f.write_fmt(format_args!("{user}\t{line} ({host})"))
    }
}
