//! Tracked entities - handles whose in-place changes are persisted on save

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct TrackedEntry<T> {
    current: T,
    snapshot: T,
}

/// Handle to an entity registered in a repository's unit of work
///
/// Clones share the same entry, so a change made through any clone is seen by
/// the repository that handed it out.
#[derive(Debug)]
pub struct Tracked<T> {
    entry: Arc<Mutex<TrackedEntry<T>>>,
}

impl<T> Clone for Tracked<T> {
    fn clone(&self) -> Self {
        Self {
            entry: Arc::clone(&self.entry),
        }
    }
}

impl<T: Clone + PartialEq> Tracked<T> {
    pub(crate) fn new(entity: T) -> Self {
        Self {
            entry: Arc::new(Mutex::new(TrackedEntry {
                snapshot: entity.clone(),
                current: entity,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TrackedEntry<T>> {
        self.entry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state of the entity
    pub fn get(&self) -> T {
        self.lock().current.clone()
    }

    /// Mutates the entity in place
    pub fn modify<R>(&self, change: impl FnOnce(&mut T) -> R) -> R {
        change(&mut self.lock().current)
    }

    /// `true` when the entity differs from the state it was loaded with
    pub fn is_dirty(&self) -> bool {
        let entry = self.lock();
        entry.current != entry.snapshot
    }

    /// Returns the current state if it changed since the last save
    pub(crate) fn pending(&self) -> Option<T> {
        let entry = self.lock();
        (entry.current != entry.snapshot).then(|| entry.current.clone())
    }

    /// Marks `written` as the persisted state
    pub(crate) fn mark_saved(&self, written: T) {
        self.lock().snapshot = written;
    }
}

#[cfg(test)]
mod tests {
    use super::Tracked;

    #[test]
    fn test_modify_marks_dirty_until_saved() {
        let tracked = Tracked::new(10_i64);
        assert!(!tracked.is_dirty());

        tracked.modify(|value| *value += 5);
        assert!(tracked.is_dirty());
        assert_eq!(tracked.pending(), Some(15));

        tracked.mark_saved(15);
        assert!(!tracked.is_dirty());
        assert_eq!(tracked.pending(), None);
    }

    #[test]
    fn test_clones_share_state() {
        let tracked = Tracked::new(String::from("a"));
        let other = tracked.clone();
        other.modify(|value| value.push('b'));

        assert_eq!(tracked.get(), "ab");
        assert!(tracked.is_dirty());
    }
}
