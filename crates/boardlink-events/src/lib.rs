//! Listener registries: the event bus shared by the client and the game.
//!
//! A [`Listeners<T>`] is an ordered list of callbacks for one kind of
//! event. Publishing runs every callback, in registration order, on the
//! publishing task. There is no queue in between: when `publish` returns,
//! every listener has seen the event.
//!
//! Components own their registries and hand out `Arc`s to them, instead
//! of inheriting a notifier base type.
//!
//! # Blocking
//!
//! Callbacks run inline. A slow callback delays everything published after
//! it, so callbacks should hand work off (a channel send, a `Notify`)
//! rather than do it.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// A shared callback for events of type `T`.
pub type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Ordered callbacks for one event kind.
pub struct Listeners<T> {
    callbacks: Mutex<Vec<Callback<T>>>,
}

impl<T> Listeners<T> {
    pub fn new() -> Self {
        Self {
            callbacks: Mutex::new(Vec::new()),
        }
    }

    /// Appends a callback. It will see every event published from now on.
    pub fn register<F>(&self, callback: F)
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.lock().push(Arc::new(callback));
    }

    /// Runs every registered callback with `event`, in registration order.
    ///
    /// The list is copied before the first callback runs, so a callback may
    /// register or clear listeners without deadlocking. Changes it makes
    /// apply to the next publish.
    pub fn publish(&self, event: &T) {
        let snapshot: Vec<Callback<T>> = self.lock().clone();
        for callback in snapshot {
            callback(event);
        }
    }

    /// Removes every callback.
    pub fn clear(&self) {
        let removed = {
            let mut callbacks = self.lock();
            std::mem::take(&mut *callbacks)
        };
        tracing::trace!(removed = removed.len(), "listeners cleared");
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panicking listener poisons the mutex; the Vec is still valid.
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Callback<T>>> {
        self.callbacks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.len())
            .finish()
    }
}
