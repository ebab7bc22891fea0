//! Shared view state that can be torn down while requests are in flight.
//!
//! Requests are never cancelled. A completion that arrives after the owning
//! view was unmounted must find nothing to update, so every state access
//! goes through `with`, which returns `None` once `unmount` has run.

use std::sync::{Arc, Mutex, MutexGuard};

struct Slot<T> {
    state: T,
    mounted: bool,
}

pub struct Mounted<T> {
    inner: Arc<Mutex<Slot<T>>>,
}

impl<T> Clone for Mounted<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Mounted<T> {
    pub fn new(state: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Slot {
                state,
                mounted: true,
            })),
        }
    }

    // A panic inside a closure leaves the state as it was at the panic point;
    // later readers still get it rather than a poisoned error.
    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` against the state if the view is still mounted.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut slot = self.lock();
        if !slot.mounted {
            return None;
        }
        Some(f(&mut slot.state))
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let slot = self.lock();
        if !slot.mounted {
            return None;
        }
        Some(f(&slot.state))
    }

    pub fn unmount(&self) {
        self.lock().mounted = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.lock().mounted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_mutates_while_mounted() {
        let counter = Mounted::new(0u32);
        assert_eq!(counter.with(|c| {
            *c += 1;
            *c
        }), Some(1));
        assert_eq!(counter.read(|c| *c), Some(1));
    }

    #[test]
    fn test_clones_share_state_and_unmount() {
        let a = Mounted::new(String::from("draft"));
        let b = a.clone();
        b.with(|s| s.push_str("-edited"));
        assert_eq!(a.read(|s| s.clone()), Some("draft-edited".to_string()));

        a.unmount();
        assert!(!b.is_mounted());
        assert_eq!(b.with(|s| s.clear()), None);
    }
}
