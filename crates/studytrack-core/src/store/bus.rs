//! Cross-context change notification.
//!
//! Stores watching the same key in different contexts (the "other tab"
//! case) are wired together through a [`ChangeBus`]. Subscribing returns a
//! [`Subscription`] guard; dropping the guard unsubscribes, so a listener
//! can never outlive its owner.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use super::medium::lock;

type Callback = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
struct Inner {
    next_id: u64,
    subscribers: HashMap<String, Vec<(u64, Callback)>>,
}

/// Notification channel for raw key/value changes.
///
/// Clones share the same subscriber table, so every context that should see
/// the same "storage events" gets a clone of one bus.
#[derive(Clone, Default)]
pub struct ChangeBus {
    inner: Arc<Mutex<Inner>>,
}

/// Guard for one live subscription. Unsubscribes on drop.
pub struct Subscription {
    inner: Weak<Mutex<Inner>>,
    key: String,
    id: u64,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for changes to `key`. The callback receives the
    /// raw serialized value and runs on the publishing thread.
    pub fn subscribe(
        &self,
        key: &str,
        callback: impl Fn(&str) + Send + Sync + 'static,
    ) -> Subscription {
        let mut inner = lock(&self.inner);
        inner.next_id += 1;
        let id = inner.next_id;
        inner
            .subscribers
            .entry(key.to_string())
            .or_default()
            .push((id, Arc::new(callback)));
        Subscription {
            inner: Arc::downgrade(&self.inner),
            key: key.to_string(),
            id,
        }
    }

    /// Deliver `raw` to every subscriber of `key`.
    pub fn publish(&self, key: &str, raw: &str) {
        self.publish_from(key, raw, None);
    }

    /// Deliver `raw` to every subscriber of `key` except `origin`.
    ///
    /// A store passes its own subscription id here when it writes, so the
    /// writer never re-adopts its own value (the browser delivers storage
    /// events only to other documents).
    pub(crate) fn publish_from(&self, key: &str, raw: &str, origin: Option<u64>) {
        let callbacks: Vec<Callback> = {
            let inner = lock(&self.inner);
            match inner.subscribers.get(key) {
                Some(subs) => subs
                    .iter()
                    .filter(|(id, _)| Some(*id) != origin)
                    .map(|(_, cb)| Arc::clone(cb))
                    .collect(),
                None => return,
            }
        };
        // Callbacks run outside the lock so they may touch the bus.
        for cb in callbacks {
            cb(raw);
        }
    }

    /// Number of live subscriptions for `key`.
    pub fn subscriber_count(&self, key: &str) -> usize {
        lock(&self.inner)
            .subscribers
            .get(key)
            .map_or(0, |subs| subs.len())
    }
}

impl Subscription {
    pub(crate) fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut inner = lock(&inner);
            if let Some(subs) = inner.subscribers.get_mut(&self.key) {
                subs.retain(|(id, _)| *id != self.id);
                if subs.is_empty() {
                    inner.subscribers.remove(&self.key);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn publish_reaches_matching_key_only() {
        let bus = ChangeBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let _sub = bus.subscribe("a", move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish("a", "x");
        bus.publish("b", "y");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_unsubscribes() {
        let bus = ChangeBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let sub = bus.subscribe("a", move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(bus.subscriber_count("a"), 1);

        drop(sub);
        assert_eq!(bus.subscriber_count("a"), 0);
        bus.publish("a", "x");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn publish_from_skips_origin() {
        let bus = ChangeBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let sub = bus.subscribe("a", move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish_from("a", "x", Some(sub.id()));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        bus.publish_from("a", "x", None);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clones_share_subscribers() {
        let bus = ChangeBus::new();
        let other = bus.clone();
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let _sub = bus.subscribe("a", move |raw| {
            assert_eq!(raw, "payload");
            seen.fetch_add(1, Ordering::SeqCst);
        });

        other.publish("a", "payload");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
