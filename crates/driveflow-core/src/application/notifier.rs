//! Change notification from presenters to the views that render them.
//!
//! A view registers a callback; the presenter broadcasts after every state
//! change. Callbacks run synchronously on the caller's thread, in
//! registration order, and may re-enter the presenter: read its state,
//! select a row, trigger a reload, or unsubscribe themselves.
//!
//! Everything here is single-threaded (`Rc`), matching a UI event loop.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, warn};

/// Why a subscriber could not handle a change notification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriberError {
    /// The view behind the callback no longer exists.
    ///
    /// The subscription is dropped and the broadcast continues.
    #[error("subscriber view is gone")]
    Stale,

    /// The view exists but failed to refresh.
    #[error("subscriber failed: {0}")]
    Failed(String),
}

/// Change callback. Shared so the same callback can be compared on subscribe.
pub type Callback = Rc<dyn Fn() -> Result<(), SubscriberError>>;

/// Handle returned by [`Subscribers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Summary of one broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Broadcast {
    pub delivered: usize,
    pub dropped: usize,
    pub failed: usize,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(SubscriptionId, Callback)>,
}

/// Ordered list of change callbacks.
///
/// Cloning yields another handle to the same list, so a callback can hold
/// one and unsubscribe itself mid-broadcast.
#[derive(Clone, Default)]
pub struct Subscribers {
    inner: Rc<RefCell<Registry>>,
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.len())
            .finish()
    }
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback`.
    ///
    /// Returns `None` if this exact callback (same allocation) is already
    /// registered; it will still be called only once per broadcast.
    pub fn subscribe(&self, callback: Callback) -> Option<SubscriptionId> {
        let mut registry = self.inner.borrow_mut();
        if registry
            .entries
            .iter()
            .any(|(_, existing)| Rc::ptr_eq(existing, &callback))
        {
            return None;
        }
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.entries.push((id, callback));
        Some(id)
    }

    /// Register a closure. Each call wraps a fresh allocation, so it never
    /// collides with an existing subscription.
    pub fn subscribe_fn<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() -> Result<(), SubscriberError> + 'static,
    {
        let mut registry = self.inner.borrow_mut();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.entries.push((id, Rc::new(callback)));
        id
    }

    /// Remove a subscription. `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.inner.borrow_mut();
        let before = registry.entries.len();
        registry.entries.retain(|(existing, _)| *existing != id);
        registry.entries.len() != before
    }

    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.inner
            .borrow()
            .entries
            .iter()
            .any(|(existing, _)| *existing == id)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call every subscriber once, in registration order.
    ///
    /// Iterates a snapshot taken before the first call, so subscriptions
    /// added during the broadcast wait for the next one. A subscriber removed
    /// by an earlier callback is skipped. Stale subscribers are removed;
    /// failures are logged and never stop the broadcast.
    pub fn notify(&self) -> Broadcast {
        let snapshot: Vec<(SubscriptionId, Callback)> = self.inner.borrow().entries.clone();
        let mut report = Broadcast::default();

        for (id, callback) in snapshot {
            if !self.contains(id) {
                continue;
            }
            match callback() {
                Ok(()) => report.delivered += 1,
                Err(SubscriberError::Stale) => {
                    debug!(subscription = id.0, "Dropping stale subscriber");
                    self.unsubscribe(id);
                    report.dropped += 1;
                }
                Err(SubscriberError::Failed(reason)) => {
                    warn!(subscription = id.0, %reason, "Subscriber failed to refresh");
                    report.failed += 1;
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<u32>>, Callback) {
        let hits = Rc::new(Cell::new(0));
        let seen = Rc::clone(&hits);
        let callback: Callback = Rc::new(move || {
            seen.set(seen.get() + 1);
            Ok(())
        });
        (hits, callback)
    }

    #[test]
    fn duplicate_subscription_is_ignored() {
        let subs = Subscribers::new();
        let (hits, callback) = counter();

        assert!(subs.subscribe(Rc::clone(&callback)).is_some());
        assert!(subs.subscribe(callback).is_none());

        subs.notify();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn called_in_registration_order() {
        let subs = Subscribers::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for n in 0..3 {
            let order = Rc::clone(&order);
            subs.subscribe_fn(move || {
                order.borrow_mut().push(n);
                Ok(())
            });
        }

        subs.notify();
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn unsubscribe_reports_whether_present() {
        let subs = Subscribers::new();
        let id = subs.subscribe_fn(|| Ok(()));
        assert!(subs.unsubscribe(id));
        assert!(!subs.unsubscribe(id));
        assert!(subs.is_empty());
    }

    #[test]
    fn stale_subscriber_removed_others_still_called() {
        let subs = Subscribers::new();
        subs.subscribe_fn(|| Err(SubscriberError::Stale));
        let (hits, callback) = counter();
        subs.subscribe(callback);

        let report = subs.notify();
        assert_eq!(report.dropped, 1);
        assert_eq!(report.delivered, 1);
        assert_eq!(subs.len(), 1);

        subs.notify();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn failed_subscriber_kept_and_broadcast_continues() {
        let subs = Subscribers::new();
        subs.subscribe_fn(|| Err(SubscriberError::Failed("redraw".into())));
        let (hits, callback) = counter();
        subs.subscribe(callback);

        let report = subs.notify();
        assert_eq!(report.failed, 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(subs.len(), 2);
    }

    #[test]
    fn callback_can_unsubscribe_itself() {
        let subs = Subscribers::new();
        let handle = subs.clone();
        let slot: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));
        let own = Rc::clone(&slot);
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);

        let id = subs.subscribe_fn(move || {
            seen.set(seen.get() + 1);
            if let Some(id) = own.get() {
                handle.unsubscribe(id);
            }
            Ok(())
        });
        slot.set(Some(id));

        subs.notify();
        subs.notify();
        assert_eq!(calls.get(), 1);
        assert!(subs.is_empty());
    }

    #[test]
    fn subscriber_removed_by_earlier_callback_is_skipped() {
        let subs = Subscribers::new();
        let handle = subs.clone();
        let victim: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));
        let target = Rc::clone(&victim);

        subs.subscribe_fn(move || {
            if let Some(id) = target.get() {
                handle.unsubscribe(id);
            }
            Ok(())
        });
        let (hits, callback) = counter();
        victim.set(subs.subscribe(callback));

        subs.notify();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn subscribed_during_broadcast_waits_for_next() {
        let subs = Subscribers::new();
        let handle = subs.clone();
        let (hits, late) = counter();
        let added = Rc::new(Cell::new(false));
        let flag = Rc::clone(&added);

        subs.subscribe_fn(move || {
            if !flag.replace(true) {
                handle.subscribe(Rc::clone(&late));
            }
            Ok(())
        });

        subs.notify();
        assert_eq!(hits.get(), 0);
        subs.notify();
        assert_eq!(hits.get(), 1);
    }
}
