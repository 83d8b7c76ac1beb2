//! Debug-only detection of re-entrant map calls.
//!
//! `LinkedHashMap` calls into user code (`K: Hash`, `K: Eq`, value
//! constructors) while its chains or order links may be half-updated. A key
//! whose `Eq` reaches back into the same map would observe that state. Each
//! map owns an `OpTracker`; public entry points hold an `OpGuard` for their
//! duration. In debug builds a second `enter` panics naming both operations.
//! In release builds everything here is a no-op.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-map record of the operation currently in progress.
#[derive(Debug, Default)]
pub(crate) struct OpTracker {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    // Keep the map !Sync in every build profile.
    _not_sync: PhantomData<Cell<()>>,
}

impl OpTracker {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _not_sync: PhantomData,
        }
    }

    /// Marks `op` as running until the returned guard is dropped.
    #[inline]
    pub(crate) fn enter(&self, op: &'static str) -> OpGuard<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(busy) = self.active.get() {
                panic!("re-entrant call to `{op}` while `{busy}` is in progress on the same map");
            }
            self.active.set(Some(op));
            return OpGuard { tracker: self };
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            return OpGuard {
                _tracker: PhantomData,
            };
        }
    }

    #[cfg(all(test, debug_assertions))]
    fn active(&self) -> Option<&'static str> {
        self.active.get()
    }
}

// Trackers are per instance; a cloned map starts idle.
impl Clone for OpTracker {
    fn clone(&self) -> Self {
        Self::new()
    }
}

pub(crate) struct OpGuard<'a> {
    #[cfg(debug_assertions)]
    tracker: &'a OpTracker,
    #[cfg(not(debug_assertions))]
    _tracker: PhantomData<&'a OpTracker>,
}

impl Drop for OpGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(self.tracker.active.get().is_some());
            self.tracker.active.set(None);
        }
    }
}
