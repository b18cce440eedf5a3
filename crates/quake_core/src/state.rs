use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    AwaitingResponse,
    Cached,
}

/// Why a request cycle ended in failure. The listener only ever sees
/// `on_failure()`; the cause is kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    Transport,
    MalformedInput,
    NotFound,
    /// Another request was already in flight.
    Busy,
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Transport => write!(f, "transport failure"),
            FailureCause::MalformedInput => write!(f, "malformed input"),
            FailureCause::NotFound => write!(f, "no matching record"),
            FailureCause::Busy => write!(f, "request already in flight"),
        }
    }
}

/// Cache latch and single-listener slot of one coordinator.
///
/// `pending` is filled only when a request goes out and is emptied by the
/// completion that reports it. `L` is whatever the owner uses to reach a
/// listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchState<L> {
    cached_value: Option<String>,
    pending: Option<L>,
    last_failure: Option<FailureCause>,
}

impl<L> Default for FetchState<L> {
    fn default() -> Self {
        Self {
            cached_value: None,
            pending: None,
            last_failure: None,
        }
    }
}

impl<L> FetchState<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> FetchPhase {
        if self.pending.is_some() {
            FetchPhase::AwaitingResponse
        } else if self.cached_value.is_some() {
            FetchPhase::Cached
        } else {
            FetchPhase::Idle
        }
    }

    pub fn is_cached(&self) -> bool {
        self.cached_value.is_some()
    }

    pub fn cached_value(&self) -> Option<&str> {
        self.cached_value.as_deref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn last_failure(&self) -> Option<FailureCause> {
        self.last_failure
    }

    pub(crate) fn set_pending(&mut self, listener: L) {
        self.pending = Some(listener);
    }

    pub(crate) fn take_pending(&mut self) -> Option<L> {
        self.pending.take()
    }

    pub(crate) fn latch(&mut self, value: String) {
        self.cached_value = Some(value);
        self.last_failure = None;
    }

    pub(crate) fn invalidate(&mut self, cause: FailureCause) {
        self.cached_value = None;
        self.last_failure = Some(cause);
    }
}
