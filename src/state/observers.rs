//! Observer registry keyed by [`Field`].
//!
//! Subscribers are plain callbacks. The store snapshots the interested
//! callbacks under the lock and invokes them after releasing it, so a
//! callback may subscribe or cancel without deadlocking.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::field::Field;
use super::record::StateRecord;

/// A change callback. Receives the record after the write and the field that
/// changed.
pub type Subscriber = Arc<dyn Fn(&StateRecord, Field) + Send + Sync>;

/// Identifies one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

pub(crate) type SharedObservers = Arc<Mutex<Observers>>;

#[derive(Default)]
pub(crate) struct Observers {
    /// Callbacks interested in specific fields.
    by_field: HashMap<Field, Vec<(SubscriptionId, Subscriber)>>,
    /// Callbacks interested in every field.
    whole_record: Vec<(SubscriptionId, Subscriber)>,
    next_id: u64,
}

impl Observers {
    fn allocate_id(&mut self) -> SubscriptionId {
        self.next_id += 1;
        SubscriptionId(self.next_id)
    }

    /// Registers `callback` for each of `fields`.
    pub fn add_fields(&mut self, fields: &[Field], callback: Subscriber) -> SubscriptionId {
        let id = self.allocate_id();
        let mut fields = fields.to_vec();
        fields.sort_unstable();
        fields.dedup();
        for field in fields {
            self.by_field
                .entry(field)
                .or_default()
                .push((id, Arc::clone(&callback)));
        }
        id
    }

    /// Registers `callback` for every field.
    pub fn add_whole_record(&mut self, callback: Subscriber) -> SubscriptionId {
        let id = self.allocate_id();
        self.whole_record.push((id, callback));
        id
    }

    /// Removes a registration. Returns `false` if it was already gone.
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let mut removed = false;
        for entries in self.by_field.values_mut() {
            let before = entries.len();
            entries.retain(|(entry_id, _)| *entry_id != id);
            removed |= entries.len() != before;
        }
        self.by_field.retain(|_, entries| !entries.is_empty());

        let before = self.whole_record.len();
        self.whole_record.retain(|(entry_id, _)| *entry_id != id);
        removed | (self.whole_record.len() != before)
    }

    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.whole_record.iter().any(|(entry_id, _)| *entry_id == id)
            || self
                .by_field
                .values()
                .any(|entries| entries.iter().any(|(entry_id, _)| *entry_id == id))
    }

    /// Snapshot of the callbacks to run for a change of `field`: field
    /// subscribers first, then whole-record subscribers, each in
    /// registration order.
    pub fn interested(&self, field: Field) -> Vec<Subscriber> {
        self.by_field
            .get(&field)
            .into_iter()
            .flatten()
            .chain(self.whole_record.iter())
            .map(|(_, callback)| Arc::clone(callback))
            .collect()
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        let mut ids: Vec<_> = self
            .by_field
            .values()
            .flatten()
            .chain(self.whole_record.iter())
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}

/// Guard for a registration. Dropping it cancels the subscription.
///
/// A component that lives as long as the editor can call
/// [`detach`](Self::detach) instead and cancel later through
/// [`SharedState::unsubscribe`](super::SharedState::unsubscribe).
#[must_use = "dropping a Subscription cancels it immediately"]
pub struct Subscription {
    id: SubscriptionId,
    observers: Weak<Mutex<Observers>>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, observers: &SharedObservers) -> Self {
        Self {
            id,
            observers: Arc::downgrade(observers),
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns `true` while the callback is still registered.
    pub fn is_active(&self) -> bool {
        self.observers
            .upgrade()
            .is_some_and(|observers| observers.lock().contains(self.id))
    }

    /// Cancels the subscription now.
    pub fn cancel(self) {
        drop(self);
    }

    /// Keeps the callback registered after this guard is gone.
    pub fn detach(mut self) -> SubscriptionId {
        self.observers = Weak::new();
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(observers) = self.observers.upgrade() {
            observers.lock().remove(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
