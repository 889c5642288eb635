//! Change notification for the expense store.
//!
//! Views register a listener and re-query the list when told something
//! changed. Events are delivered synchronously, in subscription order, after a
//! mutation has been persisted. A failed operation never produces an event.

use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::models::ExpenseId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseEvent {
    Added(ExpenseId),
    Updated(ExpenseId),
    Deleted(Vec<ExpenseId>),
}

pub trait ExpenseListener: Send + Sync {
    fn on_expenses_changed(&self, event: &ExpenseEvent);
}

impl<F> ExpenseListener for F
where
    F: Fn(&ExpenseEvent) + Send + Sync,
{
    fn on_expenses_changed(&self, event: &ExpenseEvent) {
        self(event)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct ListenerRegistry {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(SubscriptionId, Arc<dyn ExpenseListener>)>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: Arc<dyn ExpenseListener>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners().push((id, listener));
        debug!("Registered expense listener {:?}", id);
        id
    }

    /// Returns false if the subscription was already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners();
        let before = listeners.len();
        listeners.retain(|(sub_id, _)| *sub_id != id);
        listeners.len() < before
    }

    pub fn len(&self) -> usize {
        self.listeners().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn notify(&self, event: &ExpenseEvent) {
        // Snapshot first so a listener may subscribe or unsubscribe re-entrantly.
        let snapshot: Vec<Arc<dyn ExpenseListener>> = self
            .listeners()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            listener.on_expenses_changed(event);
        }
    }

    // The list is only ever pushed to or filtered, so a poisoned lock still
    // holds a usable vector.
    fn listeners(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Arc<dyn ExpenseListener>)>> {
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
