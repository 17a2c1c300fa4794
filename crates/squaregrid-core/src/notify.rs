//! Change notification for render layers.
//!
//! Each subscriber gets its own unbounded channel, so emitting never blocks and a
//! render loop can drain pending events with `try_recv` once per frame.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Receiving end of a subscription; drain it with `try_recv`
pub type Subscription<E> = UnboundedReceiver<E>;

/// Fan-out of change events to any number of subscribers
#[derive(Debug)]
pub struct ChangeNotifier<E> {
    subscribers: Vec<UnboundedSender<E>>,
}

impl<E> Default for ChangeNotifier<E> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }
}

impl<E: Clone> ChangeNotifier<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    pub fn subscribe(&mut self) -> Subscription<E> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Send an event to every live subscriber, dropping the ones that went away
    pub fn emit(&mut self, event: E) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
