// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! mx-core: Concurrency engine for the mx mutex service
//!
//! This crate provides:
//! - A timeout/cancellation-aware semaphore and per-client mutex tables
//! - The client registry and the idle-client purge subsystem
//! - The identity store interface
//! - `MutexService`, the entry point used by request handlers
//! - The JSON bodies of the HTTP surface

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod coordination;
pub mod error;
pub mod id;
pub mod policy;
pub mod service;
pub mod store;
pub mod wire;

// Re-exports
pub use coordination::{
    purge, AcquireOutcome, Activity, MutexTable, PurgeConfig, PurgeTasks, Registry,
    RegistryStats, ReleaseOutcome, Semaphore,
};
pub use error::MutexError;
pub use id::{ClientId, IdGen, SequentialIdGen, UuidIdGen};
pub use policy::{FixedWaitPolicy, WaitPolicy};
pub use service::MutexService;
pub use store::{ClientQuery, ClientRecord, IdentityStore, MemoryIdentityStore, StoreError};
pub use wire::{Ack, ClientInfo, ErrorBody};
