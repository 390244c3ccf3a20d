// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server-side ceiling on how long a lock request may wait

use crate::id::ClientId;
use std::time::Duration;

/// Maximum wait allowed for a client's lock requests
pub trait WaitPolicy: Send + Sync {
    fn max_wait(&self, client: &ClientId) -> Duration;

    /// Clamp a requested wait to this client's ceiling.
    ///
    /// No request means "as long as allowed".
    fn effective_wait(&self, client: &ClientId, requested: Option<Duration>) -> Duration {
        let ceiling = self.max_wait(client);
        requested.map_or(ceiling, |wait| wait.min(ceiling))
    }
}

/// Same ceiling for every client
#[derive(Clone, Copy, Debug)]
pub struct FixedWaitPolicy(pub Duration);

impl Default for FixedWaitPolicy {
    fn default() -> Self {
        FixedWaitPolicy(Duration::from_secs(180))
    }
}

impl WaitPolicy for FixedWaitPolicy {
    fn max_wait(&self, _client: &ClientId) -> Duration {
        self.0
    }
}

impl<F> WaitPolicy for F
where
    F: Fn(&ClientId) -> Duration + Send + Sync,
{
    fn max_wait(&self, client: &ClientId) -> Duration {
        self(client)
    }
}
