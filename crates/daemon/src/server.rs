// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TCP accept loop and connection handling.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::{TokioIo, TokioTimer};
use mx_core::IdGen;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::api::{self, AppState};
use crate::http::{HttpRequest, HttpResponse};

/// Accept connections until `shutdown` fires.
///
/// Each request gets a child of `shutdown`, so a shutdown also cancels
/// every pending lock.
pub async fn serve<G>(
    listener: TcpListener,
    state: Arc<AppState<G>>,
    request_timeout: Duration,
    shutdown: CancellationToken,
) where
    G: IdGen + 'static,
{
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,

            result = listener.accept() => {
                match result {
                    Ok((stream, peer)) => {
                        let state = Arc::clone(&state);
                        let shutdown = shutdown.clone();
                        tokio::spawn(async move {
                            if let Err(e) =
                                handle_connection(state, stream, request_timeout, shutdown).await
                            {
                                debug!(%peer, "connection ended: {}", e);
                            }
                        });
                    }
                    Err(e) => {
                        error!("Error accepting connection: {}", e);
                    }
                }
            }
        }
    }
    debug!("accept loop stopped");
}

/// Serve a single connection: one request, one response.
///
/// hyper drops the request future when the peer closes the connection
/// mid-request; the drop guard turns that into a cancellation.
pub async fn handle_connection<G>(
    state: Arc<AppState<G>>,
    stream: TcpStream,
    request_timeout: Duration,
    shutdown: CancellationToken,
) -> Result<(), hyper::Error>
where
    G: IdGen + 'static,
{
    let service = service_fn(move |request: Request<Incoming>| {
        let state = Arc::clone(&state);
        let cancel = shutdown.child_token();
        async move {
            let _disconnect = cancel.clone().drop_guard();
            let target = request
                .uri()
                .path_and_query()
                .map_or("/", |target| target.as_str());

            let response = match HttpRequest::from_target(request.method().as_str(), target) {
                Ok(request) => {
                    debug!(method = %request.method, path = %request.path, "request");
                    api::handle(&state, &request, &cancel).await
                }
                Err(e) => HttpResponse::error(400, e.to_string()),
            };

            debug!(status = response.status, "response");
            Ok::<_, Infallible>(response.into_response())
        }
    });

    http1::Builder::new()
        .keep_alive(false)
        .timer(TokioTimer::new())
        .header_read_timeout(request_timeout)
        .serve_connection(TokioIo::new(stream), service)
        .await
}
