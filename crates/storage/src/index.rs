// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory index materialized from the client log

use mx_core::{ClientId, ClientRecord};
use mx_core::store::normalize_email;
use std::collections::HashMap;

/// Registered clients keyed by email and by identity
#[derive(Debug, Default)]
pub struct ClientIndex {
    by_email: HashMap<String, ClientRecord>,
    by_id: HashMap<ClientId, String>,
}

impl ClientIndex {
    /// Add a record. Returns false (and changes nothing) if either its
    /// email or its identity is already indexed.
    pub fn apply(&mut self, record: ClientRecord) -> bool {
        let key = record.email_key();
        if self.by_email.contains_key(&key) || self.by_id.contains_key(&record.client_id) {
            return false;
        }
        self.by_id.insert(record.client_id.clone(), key.clone());
        self.by_email.insert(key, record);
        true
    }

    pub fn contains_email(&self, email: &str) -> bool {
        self.by_email.contains_key(&normalize_email(email))
    }

    pub fn by_email(&self, email: &str) -> Option<&ClientRecord> {
        self.by_email.get(&normalize_email(email))
    }

    pub fn by_id(&self, id: &ClientId) -> Option<&ClientRecord> {
        self.by_id.get(id).and_then(|key| self.by_email.get(key))
    }

    pub fn len(&self) -> usize {
        self.by_email.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_email.is_empty()
    }
}

#[cfg(test)]
#[path = "index_tests.rs"]
mod tests;
