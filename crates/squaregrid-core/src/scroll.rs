use tracing::debug;

use crate::grid::TileId;
use crate::notify::{ChangeNotifier, Subscription};

/// Emitted when a new scroll target is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollEvent {
    TargetSet(TileId),
}

/// Holds at most one pending scroll target.
///
/// `Idle --set_target--> Pending(id) --consume_pending_target--> Idle`. Setting a
/// target while one is pending replaces it.
#[derive(Debug, Default)]
pub struct ScrollController {
    target: Option<TileId>,
    notifier: ChangeNotifier<ScrollEvent>,
}

impl ScrollController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_target(&mut self, id: TileId) {
        if let Some(previous) = self.target.replace(id) {
            debug!("Scroll target {} replaced by {}", previous, id);
        } else {
            debug!("Scroll target set to {}", id);
        }
        self.notifier.emit(ScrollEvent::TargetSet(id));
    }

    /// Take the pending target, leaving the controller idle
    pub fn consume_pending_target(&mut self) -> Option<TileId> {
        self.target.take()
    }

    /// Look at the pending target without consuming it
    pub fn pending(&self) -> Option<TileId> {
        self.target
    }

    pub fn subscribe(&mut self) -> Subscription<ScrollEvent> {
        self.notifier.subscribe()
    }
}
