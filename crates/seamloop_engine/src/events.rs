// SPDX-License-Identifier: MIT OR Apache-2.0
//! Change and settle notifications.

use indexmap::IndexMap;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub Uuid);

impl ListenerId {
    /// Create a new random listener ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What brought the playhead to rest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleCause {
    /// An index transition finished
    Navigation,
    /// A zero-duration jump
    Teleport,
    /// A drag (and its throw) finished
    Drag,
}

/// Payload of a change notification
#[derive(Debug, Clone, Copy)]
pub struct ChangeEvent<'a, T> {
    /// Newly aligned item index
    pub index: usize,
    /// The item itself
    pub item: &'a T,
    /// Loop progress in `[0, 1)`
    pub progress: f64,
    /// Number of items in the loop
    pub total_items: usize,
}

/// Notification delivered to listeners
#[derive(Debug, Clone, Copy)]
pub enum LoopEvent<'a, T> {
    /// The aligned item changed
    Changed(ChangeEvent<'a, T>),
    /// Motion came to rest
    Settled {
        /// Index the engine settled on
        index: usize,
        /// What finished
        cause: SettleCause,
    },
}

/// Error type listeners may return
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Result type listeners return
pub type ListenerResult = Result<(), ListenerError>;

/// A boxed event listener
pub type Listener<T> = Box<dyn FnMut(&LoopEvent<'_, T>) -> ListenerResult>;

/// Insertion-ordered listener table
pub(crate) struct Listeners<T> {
    entries: IndexMap<ListenerId, Listener<T>>,
}

impl<T> Listeners<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub(crate) fn insert<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&LoopEvent<'_, T>) -> ListenerResult + 'static,
    {
        let id = ListenerId::new();
        self.entries.insert(id, Box::new(listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        self.entries.shift_remove(&id).is_some()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Deliver an event to every listener; a failing listener is logged and skipped
    pub(crate) fn dispatch(&mut self, event: &LoopEvent<'_, T>) {
        for (id, listener) in self.entries.iter_mut() {
            if let Err(err) = listener(event) {
                tracing::warn!(listener = %id, "loop listener failed: {err}");
            }
        }
    }
}
