use std::{error::Error, sync::Arc};

use tokio::sync::watch;
use tracing::Level;

use crate::{domain::OperationStatus, log_error_chain};

/// Observable status of one kind of user action. Clones share the slot.
#[derive(Clone)]
pub struct StatusSlot(Arc<watch::Sender<OperationStatus>>);

impl StatusSlot {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(OperationStatus::Idle);
        Self(Arc::new(sender))
    }

    pub fn set(&self, status: OperationStatus) {
        self.0.send_replace(status);
    }

    pub fn reset(&self) {
        self.set(OperationStatus::Idle);
    }

    /// Logs the error chain and moves the slot to `Error` with a message
    /// fit for display.
    pub fn fail(&self, action: &str, error: &(dyn Error + 'static)) {
        log_error_chain(error, Level::WARN);
        self.set(OperationStatus::Error(format!("{action}: {error}")));
    }

    pub fn current(&self) -> OperationStatus {
        self.0.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<OperationStatus> {
        self.0.subscribe()
    }
}

impl Default for StatusSlot {
    fn default() -> Self {
        Self::new()
    }
}
