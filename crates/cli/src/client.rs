// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Blocking HTTP client for mxd

use std::time::Duration;

use mx_core::{Ack, ClientInfo, ErrorBody, RegistryStats};
use serde::de::DeserializeOwned;
use thiserror::Error;

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8080";

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not reach {server}: {source}")]
    Unreachable {
        server: String,
        #[source]
        source: ureq::Error,
    },

    #[error("error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("unexpected response from server: {0}")]
    Decode(#[from] serde_json::Error),
}

/// What to do with a named mutex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Lock { wait: Option<Duration> },
    Unlock,
}

/// Connection to one mxd server
pub struct MxClient {
    server: String,
    agent: ureq::Agent,
}

impl MxClient {
    pub fn new(server: &str) -> Self {
        // 4xx/5xx carry an error body; read it instead of failing early
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            server: server.trim_end_matches('/').to_string(),
            agent: ureq::Agent::new_with_config(config),
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn register(&self, email: &str) -> Result<ClientInfo, ClientError> {
        self.post(&register_url(&self.server, email))
    }

    pub fn lock(
        &self,
        client_id: &str,
        name: &str,
        wait: Option<Duration>,
    ) -> Result<Ack, ClientError> {
        self.post(&mutex_url(&self.server, client_id, name, Action::Lock { wait }))
    }

    pub fn unlock(&self, client_id: &str, name: &str) -> Result<Ack, ClientError> {
        self.post(&mutex_url(&self.server, client_id, name, Action::Unlock))
    }

    pub fn stats(&self, admin_id: &str) -> Result<RegistryStats, ClientError> {
        let url = stats_url(&self.server, admin_id);
        let result = self.agent.get(&url).call();
        self.decode(result)
    }

    fn post<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        let result = self.agent.post(url).send_empty();
        self.decode(result)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        result: Result<ureq::http::Response<ureq::Body>, ureq::Error>,
    ) -> Result<T, ClientError> {
        let unreachable = |source| ClientError::Unreachable {
            server: self.server.clone(),
            source,
        };

        let mut response = result.map_err(unreachable)?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string().map_err(unreachable)?;

        if status >= 400 {
            return Err(server_error(status, &body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// `POST` target registering `email`
pub fn register_url(server: &str, email: &str) -> String {
    format!(
        "{}/api/client?register&email={}",
        server,
        urlencoding::encode(email)
    )
}

/// `POST` target locking or unlocking `name` for `client_id`
pub fn mutex_url(server: &str, client_id: &str, name: &str, action: Action) -> String {
    let query = match action {
        Action::Lock { wait: None } => "lock".to_string(),
        Action::Lock { wait: Some(wait) } => format!("lock&waitTimeoutMs={}", wait.as_millis()),
        Action::Unlock => "unlock".to_string(),
    };
    format!(
        "{}/api/client/{}/mutex/{}?{}",
        server,
        urlencoding::encode(client_id),
        urlencoding::encode(name),
        query
    )
}

/// `GET` target for server statistics
pub fn stats_url(server: &str, admin_id: &str) -> String {
    format!("{}/stats?adminID={}", server, urlencoding::encode(admin_id))
}

/// Error from a 4xx/5xx reply, using the JSON message when present
pub fn server_error(status: u16, body: &str) -> ClientError {
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => err.error_message,
        Err(_) => body.trim().to_string(),
    };
    ClientError::Server { status, message }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
