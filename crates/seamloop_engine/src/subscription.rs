// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scoped host subscriptions.
//!
//! A [`Subscription`] wraps whatever the host must undo when the engine goes
//! away (a resize observer, a visibility listener, a focus hook). Dropping
//! it runs the release closure exactly once. The engine keeps them in a
//! [`SubscriptionSet`] and releases them together on teardown.

use indexmap::IndexMap;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    /// Create a new random subscription ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

/// A host registration that is released on drop
pub struct Subscription {
    id: SubscriptionId,
    label: String,
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wrap a registration together with the closure that undoes it
    pub fn new(label: impl Into<String>, release: impl FnOnce() + 'static) -> Self {
        Self {
            id: SubscriptionId::new(),
            label: label.into(),
            release: Some(Box::new(release)),
        }
    }

    /// Subscription ID
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Human-readable label
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("released", &self.release.is_none())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            tracing::trace!(label = %self.label, "releasing host subscription");
            release();
        }
    }
}

/// Subscriptions owned by one engine
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    entries: IndexMap<SubscriptionId, Subscription>,
}

impl SubscriptionSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a subscription
    pub fn insert(&mut self, subscription: Subscription) -> SubscriptionId {
        let id = subscription.id();
        self.entries.insert(id, subscription);
        id
    }

    /// Release a single subscription
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        self.entries.shift_remove(&id).is_some()
    }

    /// Release everything, most recent first
    pub fn release_all(&mut self) {
        while self.entries.pop().is_some() {}
    }

    /// Number of live subscriptions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no subscriptions are held
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Drop for SubscriptionSet {
    fn drop(&mut self) {
        self.release_all();
    }
}
