//! Shared player-count cell.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide player count.
///
/// Starts at 0 and is not persisted: a restart resets the published
/// population until the game server reports again.
#[derive(Debug, Clone, Default)]
pub struct PlayerCount {
    inner: Arc<AtomicU64>,
}

impl PlayerCount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest accepted value.
    pub fn get(&self) -> u64 {
        self.inner.load(Ordering::Acquire)
    }

    /// Replace the stored value (last write wins) and return the previous one.
    pub fn set(&self, count: u64) -> u64 {
        self.inner.swap(count, Ordering::AcqRel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(PlayerCount::new().get(), 0);
    }

    #[test]
    fn clones_share_the_same_cell() {
        let count = PlayerCount::new();
        let handle = count.clone();

        assert_eq!(handle.set(42), 0);
        assert_eq!(count.get(), 42);
        assert_eq!(count.set(7), 42);
        assert_eq!(handle.get(), 7);
    }

    #[test]
    fn concurrent_writers_leave_one_of_their_values() {
        let count = PlayerCount::new();
        let writers: Vec<_> = (1..=8u64)
            .map(|n| {
                let c = count.clone();
                std::thread::spawn(move || {
                    c.set(n);
                })
            })
            .collect();
        for w in writers {
            w.join().ok();
        }

        assert!((1..=8).contains(&count.get()));
    }
}
