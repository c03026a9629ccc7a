//! The update-notification registry.
//!
//! Dashboard views subscribe to hear about cache invalidations so they
//! know to refetch. Callbacks run synchronously on the notifying thread; a
//! failing callback is logged and skipped so one broken subscriber never
//! starves the rest.

use std::collections::BTreeMap;

/// Handle returned by [`ListenerRegistry::subscribe`]; pass it back to
/// `unsubscribe` to remove exactly that callback.
pub type ListenerId = u64;

type Callback = Box<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

#[derive(Default)]
pub struct ListenerRegistry {
    next_id: ListenerId,
    listeners: BTreeMap<ListenerId, Callback>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        callback: impl Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> ListenerId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.insert(id, Box::new(callback));
        id
    }

    /// Removes the callback registered under `id`. Returns whether it was
    /// still registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Invokes every listener in subscription order. Returns how many ran
    /// cleanly.
    pub fn notify_all(&self) -> usize {
        let mut succeeded = 0;
        for (id, callback) in &self.listeners {
            match callback() {
                Ok(()) => succeeded += 1,
                Err(error) => {
                    tracing::warn!(listener = id, %error, "update listener failed");
                }
            }
        }
        succeeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn notify_reaches_every_subscriber() {
        let mut registry = ListenerRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let hits = Arc::clone(&hits);
            registry.subscribe(move || {
                hits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }

        assert_eq!(registry.notify_all(), 3);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn a_failing_listener_does_not_block_the_others() {
        let mut registry = ListenerRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));

        registry.subscribe(|| anyhow::bail!("subscriber exploded"));
        let observer = Arc::clone(&hits);
        registry.subscribe(move || {
            observer.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        assert_eq!(registry.notify_all(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_removes_exactly_that_callback() {
        let mut registry = ListenerRegistry::new();
        let first = registry.subscribe(|| Ok(()));
        let second = registry.subscribe(|| Ok(()));

        assert!(registry.unsubscribe(first));
        assert!(!registry.unsubscribe(first));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.notify_all(), 1);
        assert!(registry.unsubscribe(second));
        assert!(registry.is_empty());
    }
}
