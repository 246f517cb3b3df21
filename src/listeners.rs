use std::collections::BTreeSet;

use tracing::warn;

/// Global event sources that components subscribe to while they are live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ListenerKind {
    /// Mouse clicks, dispatched before the clicked widget sees them.
    OutsideClick,
    Resize,
}

/// Identifies the subscribing component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ListenerId {
    FilterDropdown,
    TypeDropdown,
    Viewport,
}

#[derive(Debug, Default)]
pub struct Listeners {
    registered: BTreeSet<(ListenerKind, ListenerId)>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscription. A second registration of the same pair is refused.
    pub fn register(&mut self, kind: ListenerKind, id: ListenerId) -> bool {
        let inserted = self.registered.insert((kind, id));
        if !inserted {
            warn!(?kind, ?id, "listener already registered");
        }
        inserted
    }

    pub fn unregister(&mut self, kind: ListenerKind, id: ListenerId) -> bool {
        let removed = self.registered.remove(&(kind, id));
        if !removed {
            warn!(?kind, ?id, "listener was not registered");
        }
        removed
    }

    pub fn is_registered(&self, kind: ListenerKind, id: ListenerId) -> bool {
        self.registered.contains(&(kind, id))
    }

    pub fn subscribers(&self, kind: ListenerKind) -> Vec<ListenerId> {
        self.registered
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, id)| *id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn registers_each_pair_once() {
        let mut listeners = Listeners::new();
        assert!(listeners.register(ListenerKind::OutsideClick, ListenerId::FilterDropdown));
        assert!(!listeners.register(ListenerKind::OutsideClick, ListenerId::FilterDropdown));
        assert!(listeners.register(ListenerKind::Resize, ListenerId::Viewport));

        assert_eq!(listeners.len(), 2);
        assert_eq!(
            listeners.subscribers(ListenerKind::OutsideClick),
            vec![ListenerId::FilterDropdown]
        );
    }

    #[test]
    fn unregister_releases_exactly_once() {
        let mut listeners = Listeners::new();
        listeners.register(ListenerKind::Resize, ListenerId::Viewport);

        assert!(listeners.unregister(ListenerKind::Resize, ListenerId::Viewport));
        assert!(!listeners.unregister(ListenerKind::Resize, ListenerId::Viewport));
        assert!(listeners.is_empty());
    }
}
