use itinera_shared::ModelEvent;
use tokio::sync::broadcast;

pub type EventReceiver = broadcast::Receiver<ModelEvent>;

/// Typed notification channel shared by a model and its observers
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ModelEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.tx.subscribe()
    }

    /// Delivers to every current observer; an event with no observers is dropped
    pub fn emit(&self, event: ModelEvent) {
        let update_type = event.update_type;
        match self.tx.send(event) {
            Ok(observers) => {
                tracing::debug!("Emitted {} to {} observer(s)", update_type.as_str(), observers)
            }
            Err(_) => {
                tracing::trace!("Dropped {} notification: no observers", update_type.as_str())
            }
        }
    }

    pub fn observer_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
