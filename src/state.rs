//! Shared publication of the latest frame and behavior
//!
//! The store is the only cross-thread shared mutable data in the system. The
//! two fields are guarded independently, each lock held strictly around a
//! single read or write and never across a callback. Readers always get a
//! self-consistent copy of each field; cross-field atomicity between frame
//! and behavior is intentionally not guaranteed.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::types::{BehaviorState, Frame};

/// Thread-safe holder for the most recently published frame and behavior
#[derive(Debug, Default)]
pub struct SharedStateStore {
    frame: Mutex<Option<Frame>>,
    behavior: Mutex<BehaviorState>,
}

impl SharedStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the latest frame (every cycle, not only on change)
    pub fn publish_frame(&self, frame: Frame) {
        *lock(&self.frame) = Some(frame);
    }

    /// Publish the latest behavior
    pub fn publish_behavior(&self, behavior: BehaviorState) {
        *lock(&self.behavior) = behavior;
    }

    /// Copy of the latest frame, or None before the first publish
    pub fn latest_frame(&self) -> Option<Frame> {
        lock(&self.frame).clone()
    }

    /// The latest behavior; Normal before the first publish
    pub fn latest_behavior(&self) -> BehaviorState {
        *lock(&self.behavior)
    }
}

/// A writer that panicked mid-update must not wedge every reader; the last
/// fully written value is still valid.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
