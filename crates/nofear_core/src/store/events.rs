//! Change notifications for presentation-layer observers.

use crate::auth::{AuthFailure, GateState};
use log::debug;
use std::sync::mpsc::{self, Receiver, Sender};

/// One observable change in store state.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// The place list changed (add, update, remove, load).
    PlacesChanged,
    /// The selection cursor moved or was cleared.
    SelectionChanged,
    GateChanged(GateState),
    /// An unlock attempt ended without unlocking.
    AuthFailed(AuthFailure),
    Saved { count: usize },
    /// Save failed; the message is already logged.
    SaveFailed(String),
}

/// Fan-out list of event subscribers.
///
/// Receivers that were dropped are pruned on the next publish.
#[derive(Debug, Default)]
pub(crate) struct Subscribers {
    senders: Vec<Sender<StoreEvent>>,
}

impl Subscribers {
    pub(crate) fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.senders.push(tx);
        rx
    }

    pub(crate) fn publish(&mut self, event: StoreEvent) {
        let before = self.senders.len();
        self.senders.retain(|tx| tx.send(event.clone()).is_ok());
        let pruned = before - self.senders.len();
        if pruned > 0 {
            debug!("event=subscribers_pruned module=store count={pruned}");
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.senders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{StoreEvent, Subscribers};

    #[test]
    fn publish_reaches_every_live_subscriber() {
        let mut subscribers = Subscribers::default();
        let first = subscribers.subscribe();
        let second = subscribers.subscribe();

        subscribers.publish(StoreEvent::PlacesChanged);

        assert_eq!(first.try_recv(), Ok(StoreEvent::PlacesChanged));
        assert_eq!(second.try_recv(), Ok(StoreEvent::PlacesChanged));
    }

    #[test]
    fn dropped_receivers_are_pruned() {
        let mut subscribers = Subscribers::default();
        let kept = subscribers.subscribe();
        drop(subscribers.subscribe());

        subscribers.publish(StoreEvent::SelectionChanged);

        assert_eq!(subscribers.len(), 1);
        assert_eq!(kept.try_recv(), Ok(StoreEvent::SelectionChanged));
    }
}
