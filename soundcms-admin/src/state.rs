use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// Shared state cell with interior mutability.
///
/// `State<T>` wraps `Arc<RwLock<T>>`, so clones observe the same value and
/// it can be moved into async tasks. Every write raises a dirty flag that a
/// consumer can poll and clear to decide whether to re-read.
///
/// Guards never escape this type; callers cannot hold the lock across an
/// `.await`.
///
/// # Example
///
/// ```
/// use soundcms_admin::state::State;
///
/// let count = State::new(1);
/// count.update(|v| *v += 1);
/// assert_eq!(count.get(), 2);
/// assert!(count.is_dirty());
/// ```
#[derive(Debug)]
pub struct State<T> {
    inner: Arc<RwLock<T>>,
    dirty: Arc<AtomicBool>,
}

impl<T> State<T> {
    /// Create a new state with the given value
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(value)),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a clone of the current value
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Read through a closure without cloning the whole value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        match self.inner.read() {
            Ok(guard) => f(&guard),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }

    /// Set a new value
    pub fn set(&self, value: T) {
        self.update(|current| *current = value);
    }

    /// Update the value using a closure
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        self.modify(f);
    }

    /// Update the value and return whatever the closure computed.
    ///
    /// The read-check-write happens under one write lock, which is what the
    /// table uses to compare fetch sequence numbers atomically.
    pub fn modify<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = match self.inner.write() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        };
        self.dirty.store(true, Ordering::SeqCst);
        result
    }

    /// Check if the state has been modified since last check
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl<T: Default> Default for State<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
