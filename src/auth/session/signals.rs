//! Process-wide session signals

use tokio::sync::broadcast;
use tracing::debug;

/// Signals raised outside the session store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    /// The backend rejected the current credentials
    CredentialsExpired,
}

/// Broadcast bus for [`SessionSignal`]s
#[derive(Debug, Clone)]
pub struct SignalBus {
    sender: broadcast::Sender<SessionSignal>,
}

impl SignalBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Announce that credentials expired. Returns how many listeners got it.
    pub fn credentials_expired(&self) -> usize {
        let delivered = self
            .sender
            .send(SessionSignal::CredentialsExpired)
            .unwrap_or(0);
        debug!("credentials-expired delivered to {} listeners", delivered);
        delivered
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionSignal> {
        self.sender.subscribe()
    }
}
