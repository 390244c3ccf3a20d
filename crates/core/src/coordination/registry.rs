// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide map from client identity to its mutex table
//!
//! Lock order is always registry then table. Request handlers resolve a
//! table here, drop the registry guard, and only then touch the table.

use super::table::MutexTable;
use crate::id::ClientId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
pub struct Registry {
    tables: RwLock<HashMap<ClientId, Arc<MutexTable>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the table for `client`, creating it on first contact.
    ///
    /// Absence is re-checked under the write lock, so concurrent first
    /// callers all receive the same instance.
    pub fn get_or_create(&self, client: &ClientId) -> Arc<MutexTable> {
        if let Some(table) = self.get(client) {
            return table;
        }

        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        Arc::clone(
            tables
                .entry(client.clone())
                .or_insert_with(|| Arc::new(MutexTable::new())),
        )
    }

    /// Get the table for `client` if present
    pub fn get(&self, client: &ClientId) -> Option<Arc<MutexTable>> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        tables.get(client).cloned()
    }

    pub fn contains(&self, client: &ClientId) -> bool {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        tables.contains_key(client)
    }

    /// Drop the entry for `client`. Returns whether one was present.
    pub fn remove(&self, client: &ClientId) -> bool {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        tables.remove(client).is_some()
    }

    /// Visit every entry under the shared lock.
    ///
    /// The visitor must not call back into the registry's mutating methods.
    pub fn for_each(&self, mut visit: impl FnMut(&ClientId, &MutexTable)) {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        for (client, table) in tables.iter() {
            visit(client, table);
        }
    }

    pub fn len(&self) -> usize {
        self.tables.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
