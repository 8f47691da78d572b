//! Shared LIFO work queue.

use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};

/// A mutex-guarded stack shared between render threads.
///
/// Pushes and pops are mutually exclusive. There is no fairness between
/// threads waiting to pop.
#[derive(Debug)]
pub struct WorkStack<T> {
    items: Mutex<Vec<T>>,
}

impl<T> WorkStack<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    // Poisoning is ignored: push and pop never leave the Vec half-updated.
    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, item: T) {
        self.lock().push(item);
    }

    /// Wait for the lock, then take the top item. `None` once empty.
    pub fn pop(&self) -> Option<T> {
        self.lock().pop()
    }

    /// Take the top item without waiting. `None` if another thread holds the
    /// lock or the stack is empty.
    pub fn try_pop(&self) -> Option<T> {
        match self.items.try_lock() {
            Ok(mut items) => items.pop(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().pop(),
            Err(TryLockError::WouldBlock) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl<T> Default for WorkStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for WorkStack<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: Mutex::new(iter.into_iter().collect()),
        }
    }
}
