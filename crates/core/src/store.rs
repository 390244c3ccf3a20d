// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable client identity records
//!
//! The service only needs two operations from a store: insert a new
//! registration and find an existing one. The in-memory store here backs
//! tests and embedded use; the daemon uses the file-backed log from
//! `mx-storage`.

use crate::id::ClientId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

/// A registered client
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    pub email: String,
    #[serde(rename = "clientID")]
    pub client_id: ClientId,
    pub registered_at: DateTime<Utc>,
}

impl ClientRecord {
    pub fn new(email: impl Into<String>, client_id: ClientId) -> Self {
        Self {
            email: email.into(),
            client_id,
            registered_at: Utc::now(),
        }
    }

    /// Key used for duplicate detection
    pub fn email_key(&self) -> String {
        normalize_email(&self.email)
    }
}

/// Emails compare trimmed and case-insensitively
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Lookup criteria for [`IdentityStore::find`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientQuery {
    ById(ClientId),
    ByEmail(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email '{0}' is already registered")]
    Duplicate(String),
    #[error("{0}")]
    Unavailable(String),
}

/// Durable store of client identities
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Persist a new record, failing with [`StoreError::Duplicate`] if the
    /// email is taken
    async fn insert(&self, record: ClientRecord) -> Result<(), StoreError>;

    async fn find(&self, query: &ClientQuery) -> Result<Option<ClientRecord>, StoreError>;
}

/// Process-local identity store
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    records: Mutex<HashMap<String, ClientRecord>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn insert(&self, record: ClientRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let key = record.email_key();
        if records.contains_key(&key) {
            return Err(StoreError::Duplicate(record.email));
        }
        records.insert(key, record);
        Ok(())
    }

    async fn find(&self, query: &ClientQuery) -> Result<Option<ClientRecord>, StoreError> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let found = match query {
            ClientQuery::ById(id) => records.values().find(|r| &r.client_id == id),
            ClientQuery::ByEmail(email) => records.get(&normalize_email(email)),
        };
        Ok(found.cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_then_find_by_id_and_email() {
        let store = MemoryIdentityStore::new();
        let record = ClientRecord::new("a@example.com", ClientId::from("c-1"));
        store.insert(record.clone()).await.unwrap();

        let by_id = store
            .find(&ClientQuery::ById(ClientId::from("c-1")))
            .await
            .unwrap();
        let by_email = store
            .find(&ClientQuery::ByEmail("A@Example.com ".to_string()))
            .await
            .unwrap();

        assert_eq!(by_id, Some(record.clone()));
        assert_eq!(by_email, Some(record));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryIdentityStore::new();
        store
            .insert(ClientRecord::new("a@example.com", ClientId::from("c-1")))
            .await
            .unwrap();

        let result = store
            .insert(ClientRecord::new("A@EXAMPLE.COM", ClientId::from("c-2")))
            .await;

        assert!(matches!(result, Err(StoreError::Duplicate(_))));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn find_missing_returns_none() {
        let store = MemoryIdentityStore::new();
        let found = store
            .find(&ClientQuery::ById(ClientId::from("nobody")))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn record_serializes_client_id_key() {
        let record = ClientRecord::new("a@example.com", ClientId::from("c-1"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["clientID"], "c-1");
        assert_eq!(json["email"], "a@example.com");
        assert!(json.get("registeredAt").is_some());
    }
}
