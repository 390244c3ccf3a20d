// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process coordination engine
//!
//! This module provides:
//! - **Semaphore** - Permit pool racing acquisition against timeout and cancellation
//! - **MutexTable** - One client's named binary mutexes plus activity counters
//! - **Registry** - Client identity to mutex table map
//! - **Purge** - Background daemon/worker pair evicting idle clients

pub mod purge;
pub mod registry;
pub mod semaphore;
pub mod stats;
pub mod table;

pub use purge::{PurgeConfig, PurgeDaemon, PurgeTasks, PurgeWorker};
pub use registry::Registry;
pub use semaphore::{AcquireOutcome, ReleaseOutcome, Semaphore};
pub use stats::RegistryStats;
pub use table::{Activity, MutexTable, Observation};
