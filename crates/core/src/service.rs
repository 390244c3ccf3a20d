// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request-facing operations over the registry and identity store

use crate::coordination::{MutexTable, Registry, RegistryStats};
use crate::error::MutexError;
use crate::id::{ClientId, IdGen};
use crate::policy::{FixedWaitPolicy, WaitPolicy};
use crate::store::{ClientQuery, ClientRecord, IdentityStore};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Registration, verification and lock/unlock entry points
pub struct MutexService<G: IdGen> {
    registry: Arc<Registry>,
    store: Arc<dyn IdentityStore>,
    wait_policy: Arc<dyn WaitPolicy>,
    id_gen: G,
}

impl<G: IdGen> MutexService<G> {
    pub fn new(store: Arc<dyn IdentityStore>, id_gen: G) -> Self {
        Self {
            registry: Arc::new(Registry::new()),
            store,
            wait_policy: Arc::new(FixedWaitPolicy::default()),
            id_gen,
        }
    }

    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_wait_policy(mut self, policy: impl WaitPolicy + 'static) -> Self {
        self.wait_policy = Arc::new(policy);
        self
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Register a new client under `email`
    pub async fn register(&self, email: &str) -> Result<ClientRecord, MutexError> {
        let record = ClientRecord::new(email.trim(), self.id_gen.next());
        self.store.insert(record.clone()).await?;

        // Materialize the table now to skip a store lookup on first lock
        self.registry.get_or_create(&record.client_id);

        info!(client = %record.client_id, email = %record.email, "registered client");
        Ok(record)
    }

    /// Resolve the client's table, rehydrating it from the store if the
    /// registry has no entry (never seen, or purged)
    pub async fn verify(&self, client: &ClientId) -> Result<Arc<MutexTable>, MutexError> {
        if let Some(table) = self.registry.get(client) {
            return Ok(table);
        }

        match self.store.find(&ClientQuery::ById(client.clone())).await? {
            Some(record) if &record.client_id == client => {
                debug!(client = %client, "rehydrated client from store");
                Ok(self.registry.get_or_create(client))
            }
            _ => Err(MutexError::UnknownClient(client.clone())),
        }
    }

    /// Lock `name` for `client`, waiting at most the lesser of `requested`
    /// and the client's ceiling
    pub async fn lock(
        &self,
        client: &ClientId,
        name: &str,
        requested: Option<Duration>,
        cancel: &CancellationToken,
    ) -> Result<(), MutexError> {
        let table = self.verify(client).await?;
        let wait = self.wait_policy.effective_wait(client, requested);

        let result = table.lock(name, wait, cancel).await;
        debug!(client = %client, mutex = name, ?wait, ok = result.is_ok(), "lock");
        result
    }

    pub async fn unlock(&self, client: &ClientId, name: &str) -> Result<(), MutexError> {
        let table = self.verify(client).await?;

        let result = table.unlock(name);
        debug!(client = %client, mutex = name, ok = result.is_ok(), "unlock");
        result
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats::collect(&self.registry)
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
