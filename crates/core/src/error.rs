// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client-facing error taxonomy

use crate::id::ClientId;
use crate::store::StoreError;
use thiserror::Error;

/// Errors surfaced to callers of the mutex service
///
/// None of these are retried inside the service; retry policy belongs to
/// the caller.
#[derive(Debug, Error)]
pub enum MutexError {
    #[error("unknown client '{0}'")]
    UnknownClient(ClientId),

    #[error("email '{0}' is already registered")]
    DuplicateEmail(String),

    #[error("unable to lock mutex '{name}': wait timeout expired")]
    LockTimeout { name: String },

    #[error("unable to lock mutex '{name}': client disconnected")]
    LockCancelled { name: String },

    #[error("invalid mutex identifier '{name}'")]
    UnknownMutex { name: String },

    #[error("unable to unlock mutex '{name}' (mismatched lock/unlock calls?)")]
    MismatchedUnlock { name: String },

    #[error("identity store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for MutexError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(email) => MutexError::DuplicateEmail(email),
            StoreError::Unavailable(reason) => MutexError::StoreUnavailable(reason),
        }
    }
}
