use std::sync::Arc;

use tokio::sync::watch;

/// A value derived from an observable source, recomputed on demand.
pub struct Projection<T, R> {
    source: watch::Receiver<T>,
    select: Arc<dyn Fn(&T) -> R + Send + Sync>,
}

impl<T: 'static, R: 'static> Projection<T, R> {
    pub fn new<F>(source: watch::Receiver<T>, select: F) -> Self
    where
        F: Fn(&T) -> R + Send + Sync + 'static,
    {
        Self {
            source,
            select: Arc::new(select),
        }
    }

    pub fn current(&self) -> R {
        let value = self.source.borrow();
        (self.select)(&*value)
    }

    /// Waits for the source to change and returns the new projection.
    /// `None` once the source has been dropped.
    pub async fn changed(&mut self) -> Option<R> {
        self.source.changed().await.ok()?;
        let value = self.source.borrow_and_update();
        Some((self.select)(&*value))
    }
}

impl<T, R> Clone for Projection<T, R> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            select: Arc::clone(&self.select),
        }
    }
}
