//! Lazily computed, remembered properties of parser nodes, with detection of
//! grammars whose properties depend on themselves.

use std::{cell::RefCell, sync::OnceLock};

use tracing::trace;


thread_local! {
    /// Addresses of the `Memo`s whose values are being computed by this
    /// thread, innermost last.
    static IN_PROGRESS: RefCell<Vec<usize>> = RefCell::new(Vec::new());
}


/// Removes an entry from `IN_PROGRESS` when dropped, including when unwinding
/// from a panic, so that a caught panic does not leave stale entries.
struct Computing(usize);

impl Drop for Computing {
    fn drop(&mut self) {
        IN_PROGRESS.with(|in_progress| {
            let mut in_progress = in_progress.borrow_mut();
            if let Some(i) = in_progress.iter().rposition(|&key| key == self.0) {
                let _ = in_progress.remove(i);
            }
        });
    }
}


pub(super) struct Memo<V> {
    cell: OnceLock<V>,
}

impl<V> Memo<V>
    where V: Clone,
{
    pub(super) fn new() -> Self {
        Self { cell: OnceLock::new() }
    }

    pub(super) fn peek(&self) -> Option<&V> {
        self.cell.get()
    }

    /// The remembered value, computing it first if needed.
    ///
    /// If the computation of this value requires this same value, i.e. the
    /// grammar is left-recursive, that panics instead of recursing forever.
    /// Different threads may race to compute the same value, which is fine
    /// because the computation is pure, and the first to finish is kept.
    pub(super) fn get_or_compute(&self, what: &str, compute: impl FnOnce() -> V) -> V {
        if let Some(value) = self.cell.get() {
            return value.clone();
        }

        let key = self as *const Self as usize;
        let reentered = IN_PROGRESS.with(|in_progress| {
            let mut in_progress = in_progress.borrow_mut();
            if in_progress.contains(&key) {
                true
            } else {
                in_progress.push(key);
                false
            }
        });
        if reentered {
            panic!("left-recursive grammar: {} of a parser depends on itself", what);
        }

        let computing = Computing(key);
        let value = compute();
        drop(computing);
        trace!(what, "computed parser property");
        let _ = self.cell.set(value.clone());
        value
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_once() {
        let memo = Memo::new();
        assert_eq!(memo.peek(), None);
        let mut calls = 0;
        assert_eq!(memo.get_or_compute("test", || { calls += 1; 7 }), 7);
        assert_eq!(memo.get_or_compute("test", || { calls += 1; 8 }), 7);
        assert_eq!(calls, 1);
        assert_eq!(memo.peek(), Some(&7));
    }

    #[test]
    #[should_panic(expected = "left-recursive grammar")]
    fn reentry_panics() {
        let memo: Memo<bool> = Memo::new();
        let _ = memo.get_or_compute("test", || memo.get_or_compute("test", || true));
    }

    #[test]
    fn unwinding_clears() {
        let memo: Memo<i32> = Memo::new();
        let caught = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            memo.get_or_compute("test", || panic!("inner"))
        }));
        assert!(caught.is_err());
        // Not mistaken for re-entry.
        assert_eq!(memo.get_or_compute("test", || 1), 1);
    }
}
