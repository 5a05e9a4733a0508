use anyhow::Result;
use serde::Serialize;
use tokio::sync::broadcast;

pub mod event;
#[cfg(test)]
mod tests;

pub use event::{EventType, StoreEvent};

/// In-process fan-out of store change events to subscribed views.
///
/// Publishing is fire-and-forget: a mutation never blocks on, or fails
/// because of, its subscribers. Lagging receivers lose the oldest events
/// rather than exerting backpressure.
#[derive(Clone)]
pub struct ChangeNotifier {
    sender: broadcast::Sender<StoreEvent>,
}

impl ChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to all events published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to every current subscriber
    pub fn publish<T: Serialize>(
        &self,
        event_type: EventType,
        subject_id: Option<String>,
        payload: T,
    ) -> Result<()> {
        let event = StoreEvent::new(event_type, subject_id, payload)?;
        // A send error only means nobody is subscribed right now
        let _ = self.sender.send(event);
        Ok(())
    }
}
