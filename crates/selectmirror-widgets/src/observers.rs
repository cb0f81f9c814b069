//! Registry of change observers.
//!
//! Observers are attached to the real control's native change channel, so
//! they hear user-driven and programmatic selection changes alike. The
//! registry only remembers which host listener belongs to which
//! subscription, keyed by an opaque handle instead of callback identity.

use selectmirror_core::ListenerId;

/// Handle returned by `Dropdown::on_change`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChangeSubscription(u64);

impl ChangeSubscription {
    /// Raw handle value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct Registration {
    subscription: ChangeSubscription,
    listener: ListenerId,
}

/// Ordered set of live subscriptions.
#[derive(Debug, Default)]
pub(crate) struct ChangeRegistry {
    next_id: u64,
    registrations: Vec<Registration>,
}

impl ChangeRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn mint(&mut self) -> ChangeSubscription {
        let subscription = ChangeSubscription(self.next_id);
        self.next_id += 1;
        subscription
    }

    /// Track a host listener under a fresh subscription.
    pub(crate) fn insert(&mut self, listener: ListenerId) -> ChangeSubscription {
        let subscription = self.mint();
        self.registrations.push(Registration {
            subscription,
            listener,
        });
        subscription
    }

    /// A subscription attached to nothing; unsubscribing it is a no-op.
    pub(crate) fn inert(&mut self) -> ChangeSubscription {
        self.mint()
    }

    /// Forget a subscription, returning its host listener.
    pub(crate) fn remove(&mut self, subscription: ChangeSubscription) -> Option<ListenerId> {
        let at = self
            .registrations
            .iter()
            .position(|r| r.subscription == subscription)?;
        Some(self.registrations.remove(at).listener)
    }

    /// Forget every subscription, in registration order.
    pub(crate) fn drain(&mut self) -> Vec<(ChangeSubscription, ListenerId)> {
        self.registrations
            .drain(..)
            .map(|r| (r.subscription, r.listener))
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, subscription: ChangeSubscription) -> bool {
        self.registrations
            .iter()
            .any(|r| r.subscription == subscription)
    }

    pub(crate) fn len(&self) -> usize {
        self.registrations.len()
    }
}
