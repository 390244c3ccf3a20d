// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background reclaim of idle clients
//!
//! Two tasks cooperate: the daemon wakes every interval, compares each
//! table's counters to the snapshot from the previous scan, and queues
//! idle clients; the worker drains that queue and removes the entries.
//! The queue is unbounded so a scan never waits on the worker.

use super::registry::Registry;
use super::table::Observation;
use crate::id::ClientId;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Configuration for the purge subsystem
#[derive(Clone, Debug)]
pub struct PurgeConfig {
    /// Time between scans
    pub interval: Duration,
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(180),
        }
    }
}

impl PurgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Periodic idle-client scanner
pub struct PurgeDaemon {
    registry: Arc<Registry>,
    config: PurgeConfig,
    evictions: mpsc::UnboundedSender<ClientId>,
}

impl PurgeDaemon {
    pub fn new(
        registry: Arc<Registry>,
        config: PurgeConfig,
        evictions: mpsc::UnboundedSender<ClientId>,
    ) -> Self {
        Self {
            registry,
            config,
            evictions,
        }
    }

    /// Run one scan, queueing every idle client for eviction.
    ///
    /// Returns the queued identities in discovery order.
    pub fn scan(&self) -> Vec<ClientId> {
        let mut idle = Vec::new();

        self.registry.for_each(|client, table| {
            let Observation::Idle(activity) = table.observe() else {
                return;
            };

            if activity.is_holding() {
                warn!(
                    client = %client,
                    locks = activity.locks,
                    unlocks = activity.unlocks,
                    "purging idle client with an outstanding lock"
                );
            }

            if self.evictions.send(client.clone()).is_err() {
                warn!(client = %client, "purge worker gone, eviction dropped");
                return;
            }
            idle.push(client.clone());
        });

        idle
    }

    /// Scan every interval until `shutdown` fires
    pub async fn run(self, shutdown: CancellationToken) {
        info!(interval = ?self.config.interval, "purge daemon started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.config.interval) => {
                    let idle = self.scan();
                    debug!(
                        clients = self.registry.len(),
                        idle = idle.len(),
                        "purge scan complete"
                    );
                }
            }
        }

        info!("purge daemon stopped");
    }
}

/// Serialized consumer of eviction requests
pub struct PurgeWorker {
    registry: Arc<Registry>,
    evictions: mpsc::UnboundedReceiver<ClientId>,
}

impl PurgeWorker {
    pub fn new(registry: Arc<Registry>, evictions: mpsc::UnboundedReceiver<ClientId>) -> Self {
        Self {
            registry,
            evictions,
        }
    }

    /// Remove one client from the registry
    pub fn evict(&self, client: &ClientId) -> bool {
        let removed = self.registry.remove(client);
        if removed {
            info!(client = %client, "purged idle client");
        }
        removed
    }

    /// Process evictions until every sender is gone
    pub async fn run(mut self) {
        while let Some(client) = self.evictions.recv().await {
            self.evict(&client);
        }
        debug!("purge worker drained");
    }
}

/// Join handles for the two purge tasks
pub struct PurgeTasks {
    pub daemon: JoinHandle<()>,
    pub worker: JoinHandle<()>,
}

impl PurgeTasks {
    /// Wait for both tasks to finish (after shutdown was signalled)
    pub async fn join(self) {
        if let Err(e) = self.daemon.await {
            warn!("purge daemon task failed: {}", e);
        }
        if let Err(e) = self.worker.await {
            warn!("purge worker task failed: {}", e);
        }
    }
}

/// Start the purge daemon and worker on the current runtime
pub fn spawn(
    registry: Arc<Registry>,
    config: PurgeConfig,
    shutdown: CancellationToken,
) -> PurgeTasks {
    let (tx, rx) = mpsc::unbounded_channel();
    let daemon = PurgeDaemon::new(Arc::clone(&registry), config, tx);
    let worker = PurgeWorker::new(registry, rx);

    PurgeTasks {
        daemon: tokio::spawn(daemon.run(shutdown)),
        worker: tokio::spawn(worker.run()),
    }
}

#[cfg(test)]
#[path = "purge_tests.rs"]
mod tests;
