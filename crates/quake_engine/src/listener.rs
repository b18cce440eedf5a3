use std::sync::{mpsc, Weak};

/// Receiver of one request's outcome.
///
/// Exactly one of the two methods is called per request, on whichever thread
/// completes it: the caller's thread for a cache hit, the coordinator's worker
/// otherwise.
pub trait QuakeListener: Send {
    fn on_success(&self, value: &str);
    fn on_failure(&self);
}

/// A caller that has been dropped is not notified.
impl<L> QuakeListener for Weak<L>
where
    L: QuakeListener + Sync,
{
    fn on_success(&self, value: &str) {
        if let Some(listener) = self.upgrade() {
            listener.on_success(value);
        }
    }

    fn on_failure(&self) {
        if let Some(listener) = self.upgrade() {
            listener.on_failure();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuakeReport {
    Success(String),
    Failure,
}

/// Forwards outcomes over a channel so the owner can receive them on its own
/// thread.
pub struct ChannelListener {
    tx: mpsc::Sender<QuakeReport>,
}

impl ChannelListener {
    pub fn new(tx: mpsc::Sender<QuakeReport>) -> Self {
        Self { tx }
    }
}

impl QuakeListener for ChannelListener {
    fn on_success(&self, value: &str) {
        let _ = self.tx.send(QuakeReport::Success(value.to_string()));
    }

    fn on_failure(&self) {
        let _ = self.tx.send(QuakeReport::Failure);
    }
}
