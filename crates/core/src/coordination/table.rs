// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-client table of named mutexes and activity counters

use super::semaphore::{AcquireOutcome, ReleaseOutcome, Semaphore};
use crate::error::MutexError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Lock/unlock counters of one client at a point in time
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Activity {
    pub locks: u64,
    pub unlocks: u64,
}

impl Activity {
    /// Whether a lock is outstanding
    pub fn is_holding(&self) -> bool {
        self.locks != self.unlocks
    }
}

/// What a purge scan concluded about a table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Observation {
    /// Counters moved since the previous scan; snapshot refreshed
    Active,
    /// Counters unchanged since the previous scan
    Idle(Activity),
}

/// Named semaphores owned by a single client
#[derive(Debug, Default)]
pub struct MutexTable {
    semaphores: RwLock<HashMap<String, Arc<Semaphore>>>,
    total_locks: AtomicU64,
    total_unlocks: AtomicU64,
    /// Counters seen by the last purge scan; only the scan writes this
    snapshot: Mutex<Activity>,
}

impl MutexTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the semaphore for `name`, creating a binary one if absent
    pub fn semaphore(&self, name: &str) -> Arc<Semaphore> {
        if let Some(sem) = self.find(name) {
            return sem;
        }

        let mut semaphores = self.semaphores.write().unwrap_or_else(|e| e.into_inner());
        Arc::clone(
            semaphores
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Semaphore::binary())),
        )
    }

    /// Look up an existing semaphore without creating one
    pub fn find(&self, name: &str) -> Option<Arc<Semaphore>> {
        let semaphores = self.semaphores.read().unwrap_or_else(|e| e.into_inner());
        semaphores.get(name).cloned()
    }

    /// Acquire the mutex `name`, waiting at most `wait`
    pub async fn lock(
        &self,
        name: &str,
        wait: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), MutexError> {
        let sem = self.semaphore(name);

        match sem.acquire(wait, cancel).await {
            AcquireOutcome::Acquired => {
                self.total_locks.fetch_add(1, Ordering::AcqRel);
                Ok(())
            }
            AcquireOutcome::TimedOut => Err(MutexError::LockTimeout {
                name: name.to_string(),
            }),
            AcquireOutcome::Cancelled => Err(MutexError::LockCancelled {
                name: name.to_string(),
            }),
        }
    }

    /// Release the mutex `name`
    pub fn unlock(&self, name: &str) -> Result<(), MutexError> {
        let sem = self.find(name).ok_or_else(|| MutexError::UnknownMutex {
            name: name.to_string(),
        })?;

        match sem.release() {
            ReleaseOutcome::Released => {
                self.total_unlocks.fetch_add(1, Ordering::AcqRel);
                Ok(())
            }
            ReleaseOutcome::Rejected => Err(MutexError::MismatchedUnlock {
                name: name.to_string(),
            }),
        }
    }

    /// Live counters
    pub fn activity(&self) -> Activity {
        Activity {
            locks: self.total_locks.load(Ordering::Acquire),
            unlocks: self.total_unlocks.load(Ordering::Acquire),
        }
    }

    /// Counters recorded by the last purge scan
    pub fn snapshot(&self) -> Activity {
        *self.snapshot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether nothing happened since the last purge scan
    pub fn is_idle(&self) -> bool {
        self.activity() == self.snapshot()
    }

    /// Compare live counters to the snapshot; refresh the snapshot if they moved
    pub fn observe(&self) -> Observation {
        let mut snapshot = self.snapshot.lock().unwrap_or_else(|e| e.into_inner());
        let live = self.activity();
        if live == *snapshot {
            Observation::Idle(live)
        } else {
            *snapshot = live;
            Observation::Active
        }
    }

    /// Number of named mutexes created so far
    pub fn mutex_count(&self) -> usize {
        self.semaphores
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
