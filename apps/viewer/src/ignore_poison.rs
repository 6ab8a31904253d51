//! Mutex locking that shrugs off poisoning.
//!
//! The session cache only holds plain view state. A panic while it was locked leaves nothing
//! half-written that later calls could trip over, so every lock goes through
//! `.lock_ignore_poison()`.

use std::sync::{Mutex, MutexGuard};

pub trait IgnorePoison<T> {
    fn lock_ignore_poison(&self) -> MutexGuard<'_, T>;
}

impl<T> IgnorePoison<T> for Mutex<T> {
    fn lock_ignore_poison(&self) -> MutexGuard<'_, T> {
        self.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
