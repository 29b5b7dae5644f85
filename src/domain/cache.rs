// src/domain/cache.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A value computed once and shared for the rest of the process.
///
/// The lock is held across the computation so concurrent misses compute
/// it a single time. `reset` drops the value so the next call recomputes.
#[derive(Debug)]
pub struct Memo<T> {
    slot: Mutex<Option<Arc<T>>>,
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<T> Memo<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_init(&self, init: impl FnOnce() -> T) -> Arc<T> {
        let mut slot = lock(&self.slot);
        if let Some(value) = slot.as_ref() {
            return Arc::clone(value);
        }
        let value = Arc::new(init());
        *slot = Some(Arc::clone(&value));
        value
    }

    pub fn reset(&self) {
        *lock(&self.slot) = None;
    }
}

/// Compute-once values keyed by string, behind one lock.
#[derive(Debug)]
pub struct KeyedMemo<V> {
    values: Mutex<HashMap<String, V>>,
}

impl<V> Default for KeyedMemo<V> {
    fn default() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
        }
    }
}

impl<V: Clone> KeyedMemo<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_insert_with(&self, key: &str, init: impl FnOnce() -> V) -> V {
        let mut values = lock(&self.values);
        if let Some(value) = values.get(key) {
            return value.clone();
        }
        let value = init();
        values.insert(key.to_string(), value.clone());
        value
    }

    pub fn reset(&self) {
        lock(&self.values).clear();
    }
}

// The cached data is immutable once stored, so a poisoned lock is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn memo_computes_once_until_reset() {
        let memo = Memo::new();
        let calls = Cell::new(0);

        let first = memo.get_or_init(|| {
            calls.set(calls.get() + 1);
            42
        });
        let second = memo.get_or_init(|| {
            calls.set(calls.get() + 1);
            7
        });
        assert_eq!((*first, *second, calls.get()), (42, 42, 1));

        memo.reset();
        assert_eq!(*memo.get_or_init(|| 7), 7);
    }

    #[test]
    fn keyed_memo_is_per_key() {
        let memo: KeyedMemo<usize> = KeyedMemo::new();
        assert_eq!(memo.get_or_insert_with("STILL", || 5), 5);
        assert_eq!(memo.get_or_insert_with("STILL", || 9), 5);
        assert_eq!(memo.get_or_insert_with("COS", || 3), 3);

        memo.reset();
        assert_eq!(memo.get_or_insert_with("STILL", || 9), 9);
    }
}
