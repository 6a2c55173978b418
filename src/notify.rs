use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// What an incoming notification asks the app to do: jump to a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationResponse {
    pub screen: String,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    subscribers: HashMap<u64, mpsc::UnboundedSender<NotificationResponse>>,
}

/// Fan-out point for notification taps. The network task publishes, screens
/// subscribe; a dropped `Subscription` unregisters itself.
#[derive(Clone, Default)]
pub struct NotificationHub {
    inner: Arc<Mutex<Inner>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.insert(id, tx);
        Subscription {
            id,
            hub: self.clone(),
            rx,
        }
    }

    pub fn publish(&self, response: NotificationResponse) {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        for tx in inner.subscribers.values() {
            // A closed receiver is cleaned up by its Drop; skip it here.
            let _ = tx.send(response.clone());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .subscribers
            .len()
    }

    fn unsubscribe(&self, id: u64) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .subscribers
            .remove(&id);
    }
}

pub struct Subscription {
    id: u64,
    hub: NotificationHub,
    rx: mpsc::UnboundedReceiver<NotificationResponse>,
}

impl Subscription {
    pub async fn recv(&mut self) -> Option<NotificationResponse> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<NotificationResponse> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.id);
    }
}
