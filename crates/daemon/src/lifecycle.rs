// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, serving, shutdown.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use mx_core::{purge, FixedWaitPolicy, MutexService, PurgeConfig, PurgeTasks, Registry, UuidIdGen};
use mx_storage::ClientLog;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::api::AppState;
use crate::config::Config;
use crate::server;

/// Request state with the production id generator
pub type DaemonState = AppState<UuidIdGen>;

/// A started daemon: store open, purge tasks running, listener bound
pub struct Daemon {
    pub config: Config,
    pub listener: TcpListener,
    pub state: Arc<DaemonState>,
    pub shutdown: CancellationToken,
    purge: PurgeTasks,
    /// When daemon started
    pub start_time: Instant,
}

impl Daemon {
    pub fn local_addr(&self) -> Result<SocketAddr, LifecycleError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until `stop` resolves, then shut down gracefully
    pub async fn run_until<F>(self, stop: F) -> Result<(), LifecycleError>
    where
        F: Future<Output = ()>,
    {
        let Daemon {
            config,
            listener,
            state,
            shutdown,
            purge,
            start_time,
        } = self;

        let server = tokio::spawn(server::serve(
            listener,
            state,
            config.request_timeout,
            shutdown.clone(),
        ));

        stop.await;

        info!("Shutting down daemon...");
        shutdown.cancel();

        if let Err(e) = server.await {
            error!("server task failed: {}", e);
        }
        purge.join().await;

        info!(
            uptime_secs = start_time.elapsed().as_secs(),
            "Daemon shutdown complete"
        );
        Ok(())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Client store unavailable: {0}")]
    StoreUnavailable(#[from] mx_storage::ClientLogError),

    #[error("Failed to bind {0}: {1}")]
    BindFailed(String, std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the daemon
pub async fn startup(config: &Config) -> Result<Daemon, LifecycleError> {
    // 1. Open the client log; a corrupt or unreadable store is fatal
    let store = ClientLog::open(&config.store_path)?;
    info!(
        "Loaded {} registered clients from {}",
        store.len(),
        config.store_path.display()
    );

    // 2. Build the registry and service
    let registry = Arc::new(Registry::new());
    let service = MutexService::new(Arc::new(store), UuidIdGen)
        .with_registry(Arc::clone(&registry))
        .with_wait_policy(FixedWaitPolicy(config.max_wait));
    let state = Arc::new(AppState::new(service, config.admin_id.clone()));

    // 3. Bind (after the store, so a bad store never accepts connections)
    let listener = TcpListener::bind(&config.listen)
        .await
        .map_err(|e| LifecycleError::BindFailed(config.listen.clone(), e))?;

    // 4. Purge tasks stop with the shutdown token
    let shutdown = CancellationToken::new();
    let purge = purge::spawn(
        registry,
        PurgeConfig::new().with_interval(config.purge_interval),
        shutdown.clone(),
    );

    info!(
        max_wait = ?config.max_wait,
        purge_interval = ?config.purge_interval,
        "Daemon started on {}",
        config.listen
    );

    Ok(Daemon {
        config: config.clone(),
        listener,
        state,
        shutdown,
        purge,
        start_time: Instant::now(),
    })
}
