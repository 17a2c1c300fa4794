use std::collections::BTreeSet;

use tracing::debug;

use crate::grid::TileId;
use crate::notify::{ChangeNotifier, Subscription};

/// Emitted whenever the selection changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    Toggled { id: TileId, selected: bool },
    Cleared { count: usize },
}

/// Set of selected tile ids.
///
/// Ids are not checked against the current grid: any integer can be selected.
#[derive(Debug, Default)]
pub struct SelectionStore {
    selected: BTreeSet<TileId>,
    notifier: ChangeNotifier<SelectionEvent>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the state of `id` and return the new state
    pub fn toggle(&mut self, id: TileId) -> bool {
        let selected = if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        };

        debug!("Toggled selection for tile {} (selected: {})", id, selected);
        self.notifier.emit(SelectionEvent::Toggled { id, selected });
        selected
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.selected.contains(&id)
    }

    /// Deselect everything
    pub fn clear(&mut self) {
        let count = self.selected.len();
        if count == 0 {
            return;
        }
        self.selected.clear();
        debug!("Cleared {} selected tiles", count);
        self.notifier.emit(SelectionEvent::Cleared { count });
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected ids in ascending order
    pub fn iter(&self) -> impl Iterator<Item = TileId> + '_ {
        self.selected.iter().copied()
    }

    /// Receive an event for every subsequent change
    pub fn subscribe(&mut self) -> Subscription<SelectionEvent> {
        self.notifier.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_pairs() {
        let mut store = SelectionStore::new();
        for id in [-3, 0, 1, 42, TileId::MAX] {
            assert!(store.toggle(id));
            assert!(store.contains(id));
            assert!(!store.toggle(id));
            assert!(!store.contains(id));
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_contains_has_no_side_effect() {
        let mut store = SelectionStore::new();
        store.toggle(5);
        assert!(store.contains(5));
        assert!(store.contains(5));
        assert!(!store.contains(6));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_iter_is_sorted() {
        let mut store = SelectionStore::new();
        for id in [9, 2, 5] {
            store.toggle(id);
        }
        assert_eq!(store.iter().collect::<Vec<_>>(), vec![2, 5, 9]);
    }

    #[test]
    fn test_toggle_emits_events() {
        let mut store = SelectionStore::new();
        let mut rx = store.subscribe();

        store.toggle(3);
        store.toggle(3);

        assert_eq!(
            rx.try_recv().ok(),
            Some(SelectionEvent::Toggled { id: 3, selected: true })
        );
        assert_eq!(
            rx.try_recv().ok(),
            Some(SelectionEvent::Toggled { id: 3, selected: false })
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_clear() {
        let mut store = SelectionStore::new();
        let mut rx = store.subscribe();
        store.toggle(1);
        store.toggle(2);
        store.clear();

        assert!(store.is_empty());
        assert!(!store.contains(1));

        let events: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert_eq!(events.last(), Some(&SelectionEvent::Cleared { count: 2 }));

        // Clearing an empty store is silent
        store.clear();
        assert!(rx.try_recv().is_err());
    }
}
