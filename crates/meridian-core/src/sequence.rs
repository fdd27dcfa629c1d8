//! Registration-order sequence.
//!
//! Every [`Operation`](crate::Operation) draws a sort key from a [`Sequence`]
//! when it is built. Keys are unique and strictly increasing per sequence,
//! which gives documentation and container traversal a stable order.

use std::sync::atomic::{AtomicU64, Ordering};

static GLOBAL: Sequence = Sequence::new();

/// A monotonically increasing key generator.
///
/// The process-wide instance is available through [`Sequence::global`].
/// Tests can inject their own instance through
/// [`OperationBuilder::build_with`](crate::OperationBuilder::build_with).
///
/// # Example
///
/// ```
/// use meridian_core::Sequence;
///
/// let seq = Sequence::new();
/// assert_eq!(seq.next_key(), 0);
/// assert_eq!(seq.next_key(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Sequence {
    next: AtomicU64,
}

impl Sequence {
    /// Creates a sequence starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// Returns the process-wide sequence.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Returns the next key.
    pub fn next_key(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_keys_increase() {
        let seq = Sequence::new();
        let keys: Vec<u64> = (0..5).map(|_| seq.next_key()).collect();
        assert_eq!(keys, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_global_keys_are_unique() {
        let a = Sequence::global().next_key();
        let b = Sequence::global().next_key();
        assert!(b > a);
    }

    #[test]
    fn test_concurrent_keys_unique() {
        let seq = Arc::new(Sequence::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let seq = Arc::clone(&seq);
                thread::spawn(move || (0..100).map(|_| seq.next_key()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 400);
    }
}
