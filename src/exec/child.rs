// src/exec/child.rs

//! The supervised command.

use std::fmt;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::errors::{EXIT_INTERNAL_ERROR, FtrapError, Result};
use crate::types::TrapSignal;

/// How the command terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Exited normally with this code.
    Exited(i32),
    /// Killed by this signal number.
    Signaled(i32),
}

impl From<ExitStatus> for Disposition {
    fn from(status: ExitStatus) -> Self {
        match (status.code(), status.signal()) {
            (Some(code), _) => Disposition::Exited(code),
            (None, Some(sig)) => Disposition::Signaled(sig),
            // wait(2) does not report stopped or continued children here.
            (None, None) => Disposition::Exited(EXIT_INTERNAL_ERROR),
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disposition::Exited(code) => write!(f, "exited with code {code}"),
            Disposition::Signaled(sig) => match Signal::try_from(*sig) {
                Ok(signal) => write!(f, "terminated by {signal}"),
                Err(_) => write!(f, "terminated by signal {sig}"),
            },
        }
    }
}

/// Owns the child process: the only code that signals or reaps it.
///
/// Once [`spawn`](Self::spawn) succeeds, [`wait`](Self::wait) must be called
/// on every path before the supervisor goes away.
pub struct ChildSupervisor {
    child: Child,
    program: String,
    pid: Option<u32>,
    disposition: Option<Disposition>,
}

impl fmt::Debug for ChildSupervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildSupervisor")
            .field("program", &self.program)
            .field("pid", &self.pid)
            .field("disposition", &self.disposition)
            .finish_non_exhaustive()
    }
}

impl ChildSupervisor {
    /// Spawn `argv[0]` with the remaining arguments, inheriting stdio.
    ///
    /// A program that cannot be executed is reported here as a spawn error.
    pub fn spawn(argv: &[String]) -> Result<Self> {
        let (program, args) = argv.split_first().ok_or_else(|| {
            FtrapError::ConfigError("command is not specified".to_string())
        })?;

        let child = Command::new(program)
            .args(args)
            .kill_on_drop(false)
            .spawn()
            .map_err(|source| FtrapError::Spawn {
                program: program.clone(),
                source,
            })?;

        let pid = child.id();
        info!(program = %program, pid, "spawned command");

        Ok(Self {
            child,
            program: program.clone(),
            pid,
            disposition: None,
        })
    }

    pub fn id(&self) -> Option<u32> {
        self.pid
    }

    /// Final disposition, if the child has been reaped.
    pub fn disposition(&self) -> Option<Disposition> {
        self.disposition
    }

    /// Deliver `signal` to the child.
    ///
    /// Fails once the child has been reaped, or if it is racing to exit.
    pub fn signal(&self, signal: TrapSignal) -> Result<()> {
        let signal_error = |source: nix::errno::Errno| FtrapError::Signal {
            signal: signal.to_string(),
            source,
        };

        let pid = match (self.disposition, self.pid) {
            (None, Some(pid)) => pid,
            _ => return Err(signal_error(nix::errno::Errno::ESRCH)),
        };
        let pid = i32::try_from(pid).map_err(|_| signal_error(nix::errno::Errno::ESRCH))?;

        kill(Pid::from_raw(pid), Signal::from(signal)).map_err(signal_error)?;
        debug!(pid, %signal, "sent signal to command");
        Ok(())
    }

    /// Block until the child terminates and return its disposition.
    ///
    /// The first successful call reaps the child; later calls return the
    /// cached value. Interrupted waits are retried internally. Cancel safe.
    pub async fn wait(&mut self) -> Result<Disposition> {
        if let Some(disposition) = self.disposition {
            return Ok(disposition);
        }

        let status = self.child.wait().await.map_err(FtrapError::Wait)?;
        let disposition = Disposition::from(status);
        self.disposition = Some(disposition);

        info!(program = %self.program, pid = self.pid, %disposition, "command finished");
        Ok(disposition)
    }
}
