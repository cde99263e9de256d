// src/exec/exit.rs

//! Make `ftrap` itself terminate the way its command did.

use nix::sys::signal::{SigHandler, SigSet, SigmaskHow, Signal, raise, signal, sigprocmask};
use tracing::warn;

use crate::exec::child::Disposition;

/// Exit code used when a signal disposition cannot be re-raised.
pub fn fallback_code(sig: i32) -> i32 {
    128 + sig
}

/// Terminate the current process with the same disposition as the command.
///
/// `Exited(n)` becomes `exit(n)`. `Signaled(s)` restores the default action
/// of `s`, unblocks it and raises it, so a parent shell sees a death by
/// signal rather than an exit code.
pub fn exit_with(disposition: Disposition) -> ! {
    match disposition {
        Disposition::Exited(code) => std::process::exit(code),
        Disposition::Signaled(sig) => {
            if let Ok(sig) = Signal::try_from(sig) {
                raise_default(sig);
            }
            // Still alive: the signal does not terminate by default.
            std::process::exit(fallback_code(sig))
        }
    }
}

fn raise_default(sig: Signal) {
    // SAFETY: installing SIG_DFL does not run any handler code.
    if let Err(err) = unsafe { signal(sig, SigHandler::SigDfl) } {
        warn!(%sig, error = %err, "failed to restore default signal action");
    }

    let mut set = SigSet::empty();
    set.add(sig);
    if let Err(err) = sigprocmask(SigmaskHow::SIG_UNBLOCK, Some(&set), None) {
        warn!(%sig, error = %err, "failed to unblock signal");
    }

    if let Err(err) = raise(sig) {
        warn!(%sig, error = %err, "failed to raise signal");
    }
}
