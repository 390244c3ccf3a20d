// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request routing: maps HTTP requests onto the mutex service

use crate::http::{HttpRequest, HttpResponse};
use mx_core::{Ack, ClientId, ClientInfo, IdGen, MutexError, MutexService};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

pub const REGISTER_USAGE: &str = "usage: /api/client?register&email=[ValidEmailAddress]";
pub const MUTEX_USAGE: &str =
    "usage: /api/client/[clientID]/mutex/[name]?lock[&waitTimeoutMs=N] or ?unlock";

/// Shared state handed to every connection
pub struct AppState<G: IdGen> {
    pub service: MutexService<G>,
    pub admin_id: String,
}

impl<G: IdGen> AppState<G> {
    pub fn new(service: MutexService<G>, admin_id: impl Into<String>) -> Self {
        Self {
            service,
            admin_id: admin_id.into(),
        }
    }
}

/// HTTP status for each service error
pub fn status_for(err: &MutexError) -> u16 {
    match err {
        MutexError::UnknownClient(_) => 401,
        MutexError::DuplicateEmail(_) => 400,
        MutexError::LockTimeout { .. }
        | MutexError::LockCancelled { .. }
        | MutexError::UnknownMutex { .. }
        | MutexError::MismatchedUnlock { .. } => 409,
        MutexError::StoreUnavailable(_) => 503,
    }
}

fn error_response(err: MutexError) -> HttpResponse {
    let status = status_for(&err);
    if status >= 500 {
        warn!(error = %err, "request failed");
    }
    HttpResponse::error(status, err.to_string())
}

/// Route and execute one request.
///
/// `cancel` fires when the client goes away; a pending lock resolves as
/// cancelled without consuming a permit.
pub async fn handle<G: IdGen>(
    state: &AppState<G>,
    request: &HttpRequest,
    cancel: &CancellationToken,
) -> HttpResponse {
    let segments: Vec<&str> = request.segments.iter().map(String::as_str).collect();
    match segments.as_slice() {
        ["api", "client"] => register(state, request).await,
        ["api", "client", client, "mutex", name] => {
            mutex(state, request, &ClientId::from(*client), name, cancel).await
        }
        ["stats"] => stats(state, request),
        _ => HttpResponse::error(404, format!("no such resource '{}'", request.path)),
    }
}

async fn register<G: IdGen>(state: &AppState<G>, request: &HttpRequest) -> HttpResponse {
    if !request.is_post() {
        return HttpResponse::error(400, "use POST to register a new client");
    }

    let email = match request.param("email") {
        Some(email) if request.has("register") => email,
        _ => return HttpResponse::error(400, REGISTER_USAGE),
    };

    match state.service.register(email).await {
        Ok(record) => HttpResponse::json(
            200,
            &ClientInfo {
                email: record.email,
                client_id: record.client_id,
            },
        ),
        Err(err) => error_response(err),
    }
}

async fn mutex<G: IdGen>(
    state: &AppState<G>,
    request: &HttpRequest,
    client: &ClientId,
    name: &str,
    cancel: &CancellationToken,
) -> HttpResponse {
    if !request.is_post() {
        return HttpResponse::error(400, "use POST to lock or unlock a mutex");
    }

    let result = match (request.has("lock"), request.has("unlock")) {
        (true, false) => {
            let wait = match wait_timeout(request) {
                Ok(wait) => wait,
                Err(response) => return response,
            };
            state.service.lock(client, name, wait, cancel).await
        }
        (false, true) => state.service.unlock(client, name).await,
        _ => return HttpResponse::error(400, MUTEX_USAGE),
    };

    match result {
        Ok(()) => HttpResponse::json(200, &Ack { status_code: 200 }),
        Err(err) => error_response(err),
    }
}

/// Optional `waitTimeoutMs`; absent means "up to the ceiling"
fn wait_timeout(request: &HttpRequest) -> Result<Option<Duration>, HttpResponse> {
    match request.param("waitTimeoutMs") {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|_| {
                HttpResponse::error(400, "waitTimeoutMs must be a non-negative integer")
            }),
    }
}

fn stats<G: IdGen>(state: &AppState<G>, request: &HttpRequest) -> HttpResponse {
    if !request.is_get() {
        return HttpResponse::error(400, "use GET to read statistics");
    }

    match request.param("adminID") {
        Some(id) if id == state.admin_id => HttpResponse::json(200, &state.service.stats()),
        _ => HttpResponse::error(401, "invalid adminID"),
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
