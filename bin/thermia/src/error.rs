use std::fmt;

use climate::ErrorKind;

#[derive(Debug)]
pub enum Error {
    Climate(climate::Error),
    Timeout(tokio::time::error::Elapsed),
    Config(String),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Transport,
    Protocol,
    Parse,
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureAction {
    LogAndContinue,
    Abort,
}

/// What the loop does about each kind of failure. Every cycle failure is
/// deferred to the next scheduled cycle; only startup configuration aborts.
pub fn policy_for(kind: FailureKind) -> FailureAction {
    match kind {
        FailureKind::Transport => FailureAction::LogAndContinue,
        FailureKind::Protocol => FailureAction::LogAndContinue,
        FailureKind::Parse => FailureAction::LogAndContinue,
        FailureKind::Config => FailureAction::Abort,
    }
}

impl Error {
    /// `None` for cancellation, which is a shutdown request rather than a failure.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Climate(err) => Some(match err.kind() {
                ErrorKind::Transport => FailureKind::Transport,
                ErrorKind::Protocol => FailureKind::Protocol,
                ErrorKind::Parse => FailureKind::Parse,
            }),
            Self::Timeout(_) => Some(FailureKind::Transport),
            Self::Config(_) => Some(FailureKind::Config),
            Self::Cancelled => None,
        }
    }
}

impl From<climate::Error> for Error {
    fn from(err: climate::Error) -> Self {
        Self::Climate(err)
    }
}

impl From<tokio::time::error::Elapsed> for Error {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        Self::Timeout(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Climate(err) => write!(f, "climate api error: {err}"),
            Self::Timeout(err) => write!(f, "timeout error: {err}"),
            Self::Config(msg) => write!(f, "config error: {msg}"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::error::Error for Error {}
