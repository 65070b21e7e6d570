use std::sync::Arc;

use async_trait::async_trait;
use manup_host::ReadinessSignal;
use tokio::sync::watch;

/// One-shot readiness latch the host flips once its UI can show alerts.
#[derive(Debug, Clone)]
pub struct ReadyFlag {
    sender: Arc<watch::Sender<bool>>,
}

impl Default for ReadyFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadyFlag {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn mark_ready(&self) {
        self.sender.send_replace(true);
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        *self.sender.borrow()
    }
}

#[async_trait]
impl ReadinessSignal for ReadyFlag {
    async fn ready(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives as long as `self`, so this only returns once ready.
        let _ = receiver.wait_for(|ready| *ready).await;
    }
}
