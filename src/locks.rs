// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Lock helpers that recover from poisoning instead of panicking.
//!
//! A thread panicking while holding a lock poisons it. The subscriber set
//! and progress bookkeeping must stay available to the delivery worker and
//! fetch tasks even then, so these helpers log the event and take the
//! guard anyway.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Acquire a read lock, recovering from poisoning if necessary.
#[inline]
pub fn resilient_read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::error!(
                "RwLock poisoned during read acquisition; recovering. \
                 A thread panicked while holding this lock."
            );
            poisoned.into_inner()
        }
    }
}

/// Acquire a write lock, recovering from poisoning if necessary.
#[inline]
pub fn resilient_write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::error!(
                "RwLock poisoned during write acquisition; recovering. \
                 A thread panicked while holding this lock."
            );
            poisoned.into_inner()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::RwLock;

    #[test]
    fn test_resilient_read_and_write() {
        let lock = RwLock::new(1);
        {
            let mut guard = resilient_write(&lock);
            *guard = 2;
        }
        assert_eq!(*resilient_read(&lock), 2);
    }

    #[test]
    fn test_recovers_after_poison() {
        let lock = std::sync::Arc::new(RwLock::new(5));
        let poisoner = lock.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.write().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(lock.read().is_err());
        assert_eq!(*resilient_read(&lock), 5);
    }
}
