use std::future::Future;

use tokio::{sync::mpsc, task::JoinHandle};

use super::{Document, DocumentStoreError};

pub type Snapshot = Result<Vec<Document>, DocumentStoreError>;

const SNAPSHOT_BUFFER: usize = 16;

/// Receiving end of a live query. Dropping it stops the producing task.
pub struct SnapshotListener {
    receiver: mpsc::Receiver<Snapshot>,
    producer: JoinHandle<()>,
}

impl SnapshotListener {
    /// Runs `produce` on the current Tokio runtime with the sending half of
    /// a bounded snapshot channel.
    pub fn spawn<F, Fut>(produce: F) -> Self
    where
        F: FnOnce(mpsc::Sender<Snapshot>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel(SNAPSHOT_BUFFER);
        let producer = tokio::spawn(produce(sender));
        Self { receiver, producer }
    }

    /// `None` once the producer has stopped.
    pub async fn next(&mut self) -> Option<Snapshot> {
        self.receiver.recv().await
    }
}

impl Drop for SnapshotListener {
    fn drop(&mut self) {
        self.producer.abort();
    }
}

/// Keeps a callback subscription alive. Callbacks stop firing once the
/// registration is removed or dropped.
pub struct ListenerRegistration {
    task: JoinHandle<()>,
}

impl ListenerRegistration {
    pub fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn remove(self) {
        drop(self);
    }
}

impl Drop for ListenerRegistration {
    fn drop(&mut self) {
        self.task.abort();
    }
}
