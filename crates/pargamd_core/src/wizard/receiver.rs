//! Background task that feeds push events into the wizard.

use futures_util::{Stream, StreamExt};
use tokio::task::JoinHandle;

use crate::models::PushEvent;

/// Owns the push-event task. Dropping the handle stops the task.
#[derive(Debug)]
pub struct StatusSubscription {
    task: Option<JoinHandle<()>>,
}

impl StatusSubscription {
    /// Spawn a task draining `stream` into `on_event`.
    ///
    /// The task ends when the stream ends, when `on_event` returns `false`,
    /// or when the subscription is shut down. Outside a tokio runtime
    /// nothing is spawned and the subscription starts inactive.
    pub fn spawn<S, F>(stream: S, mut on_event: F) -> Self
    where
        S: Stream<Item = PushEvent> + Send + 'static,
        F: FnMut(PushEvent) -> bool + Send + 'static,
    {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime; push events will not be received");
            return Self { task: None };
        };
        let task = handle.spawn(async move {
            let mut stream = Box::pin(stream);
            while let Some(event) = stream.next().await {
                tracing::debug!("Push event: {}", event.name());
                if !on_event(event) {
                    break;
                }
            }
            tracing::debug!("Push subscription ended");
        });
        Self { task: Some(task) }
    }

    /// Stop receiving events. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().map_or(false, |t| !t.is_finished())
    }
}

impl Drop for StatusSubscription {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn channel_stream(rx: mpsc::UnboundedReceiver<PushEvent>) -> impl Stream<Item = PushEvent> {
        futures_util::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        })
    }

    #[tokio::test]
    async fn delivers_until_shutdown() {
        let (tx, rx) = mpsc::unbounded_channel();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        let mut subscription = StatusSubscription::spawn(channel_stream(rx), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });

        tx.send(PushEvent::Error("one".into())).unwrap();
        tx.send(PushEvent::Error("two".into())).unwrap();
        for _ in 0..100 {
            if seen.load(Ordering::SeqCst) == 2 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert!(subscription.is_active());

        subscription.shutdown();
        assert!(!subscription.is_active());
        subscription.shutdown();
    }

    #[test]
    fn inactive_without_runtime() {
        let events = futures_util::stream::iter(vec![PushEvent::Error("lost".into())]);
        let mut subscription = StatusSubscription::spawn(events, |_| true);
        assert!(!subscription.is_active());
        subscription.shutdown();
    }

    #[tokio::test]
    async fn stops_when_callback_declines() {
        let events = futures_util::stream::iter(vec![
            PushEvent::Error("a".into()),
            PushEvent::Error("b".into()),
        ]);
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        let subscription = StatusSubscription::spawn(events, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            false
        });

        for _ in 0..100 {
            if !subscription.is_active() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(!subscription.is_active());
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }
}
