// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Counting permit pool with timeout- and cancellation-aware acquisition
//!
//! Permits are not tied to a guard: an acquire consumes one permit and a
//! later, independent release returns it. Waiters are not queued fairly;
//! whichever waiter observes a freed permit first takes it.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Result of [`Semaphore::acquire`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// A permit was consumed
    Acquired,
    /// No permit became available before the wait elapsed
    TimedOut,
    /// The cancellation signal fired first
    Cancelled,
}

/// Result of [`Semaphore::release`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// A permit was returned to the pool
    Released,
    /// The pool was already full (release without a matching acquire)
    Rejected,
}

/// Permit pool
#[derive(Debug)]
pub struct Semaphore {
    permits: tokio::sync::Semaphore,
    capacity: NonZeroUsize,
    /// Permits currently consumed; bounds `release` to `capacity`
    held: AtomicUsize,
}

impl Semaphore {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            permits: tokio::sync::Semaphore::new(capacity.get()),
            capacity,
            held: AtomicUsize::new(0),
        }
    }

    /// A semaphore of capacity 1
    pub fn binary() -> Self {
        Self::new(NonZeroUsize::MIN)
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Permits immediately available
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Wait up to `wait` for a permit, resolving early if `cancel` fires.
    ///
    /// The timer lives inside the race and is dropped as soon as any branch
    /// wins, so a successful acquire never leaves a pending timeout behind.
    pub async fn acquire(&self, wait: Duration, cancel: &CancellationToken) -> AcquireOutcome {
        if cancel.is_cancelled() {
            return AcquireOutcome::Cancelled;
        }

        if let Ok(permit) = self.permits.try_acquire() {
            permit.forget();
            self.held.fetch_add(1, Ordering::AcqRel);
            return AcquireOutcome::Acquired;
        }

        tokio::select! {
            permit = self.permits.acquire() => match permit {
                Ok(permit) => {
                    permit.forget();
                    self.held.fetch_add(1, Ordering::AcqRel);
                    AcquireOutcome::Acquired
                }
                // The pool is never closed; treat it like a lost race.
                Err(_) => AcquireOutcome::Cancelled,
            },
            _ = tokio::time::sleep(wait) => AcquireOutcome::TimedOut,
            _ = cancel.cancelled() => AcquireOutcome::Cancelled,
        }
    }

    /// Return one permit. Never blocks.
    pub fn release(&self) -> ReleaseOutcome {
        let returned = self
            .held
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |held| {
                held.checked_sub(1)
            });

        match returned {
            Ok(_) => {
                self.permits.add_permits(1);
                ReleaseOutcome::Released
            }
            Err(_) => ReleaseOutcome::Rejected,
        }
    }
}

#[cfg(test)]
#[path = "semaphore_tests.rs"]
mod tests;
