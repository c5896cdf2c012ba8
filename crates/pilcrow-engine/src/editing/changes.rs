use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};

use crate::editing::EditResult;

/// Default number of notifications buffered per subscriber before the oldest
/// are dropped
pub const DEFAULT_CHANGE_BUFFER: usize = 256;

pub(crate) fn channel(capacity: usize) -> broadcast::Sender<EditResult> {
    let (tx, _) = broadcast::channel(capacity.max(1));
    tx
}

/// Subscriber end of an editor's change notifications.
///
/// Events arrive in mutation order. A subscriber that falls more than the
/// buffer size behind loses the oldest events; the loss is counted in
/// [`ChangeStream::skipped`] and never stalls the editor.
#[derive(Debug)]
pub struct ChangeStream {
    rx: broadcast::Receiver<EditResult>,
    skipped: u64,
}

impl ChangeStream {
    pub(crate) fn new(rx: broadcast::Receiver<EditResult>) -> Self {
        Self { rx, skipped: 0 }
    }

    /// Next pending event without waiting
    pub fn try_next(&mut self) -> Option<EditResult> {
        loop {
            match self.rx.try_recv() {
                Ok(result) => return Some(result),
                Err(TryRecvError::Lagged(count)) => self.record_lag(count),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// All pending events, oldest first
    pub fn drain(&mut self) -> Vec<EditResult> {
        std::iter::from_fn(|| self.try_next()).collect()
    }

    /// Wait for the next event. Returns `None` once the editor is dropped and
    /// every buffered event has been read.
    pub async fn recv(&mut self) -> Option<EditResult> {
        loop {
            match self.rx.recv().await {
                Ok(result) => return Some(result),
                Err(RecvError::Lagged(count)) => self.record_lag(count),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Number of events dropped because this subscriber lagged
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    fn record_lag(&mut self, count: u64) {
        log::warn!("change subscriber lagged, {count} notifications dropped");
        self.skipped += count;
    }
}
