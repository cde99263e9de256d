use std::fmt;
use std::str::FromStr;

use nix::sys::signal::Signal;
use serde::Deserialize;

/// Signal that `ftrap` delivers to the command when a watched file changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum TrapSignal {
    #[default]
    Hup,
    Usr1,
    Usr2,
    Term,
    Quit,
    Int,
}

/// Accepted signal names, in the order shown in `--help`.
pub const SIGNAL_NAMES: [(&str, TrapSignal); 6] = [
    ("HUP", TrapSignal::Hup),
    ("USR1", TrapSignal::Usr1),
    ("USR2", TrapSignal::Usr2),
    ("TERM", TrapSignal::Term),
    ("QUIT", TrapSignal::Quit),
    ("INT", TrapSignal::Int),
];

impl TrapSignal {
    pub fn name(self) -> &'static str {
        SIGNAL_NAMES
            .iter()
            .find(|(_, sig)| *sig == self)
            .map(|(name, _)| *name)
            .unwrap_or("HUP")
    }
}

impl fmt::Display for TrapSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SIG{}", self.name())
    }
}

impl From<TrapSignal> for Signal {
    fn from(sig: TrapSignal) -> Self {
        match sig {
            TrapSignal::Hup => Signal::SIGHUP,
            TrapSignal::Usr1 => Signal::SIGUSR1,
            TrapSignal::Usr2 => Signal::SIGUSR2,
            TrapSignal::Term => Signal::SIGTERM,
            TrapSignal::Quit => Signal::SIGQUIT,
            TrapSignal::Int => Signal::SIGINT,
        }
    }
}

impl FromStr for TrapSignal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        let name = upper.strip_prefix("SIG").unwrap_or(&upper);
        SIGNAL_NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, sig)| *sig)
            .ok_or_else(|| {
                format!(
                    "unrecognized signal name '{s}' (expected one of HUP, USR1, USR2, TERM, QUIT, INT)"
                )
            })
    }
}

impl TryFrom<String> for TrapSignal {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
