// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! mx-daemon: HTTP front end for the mx mutex service
//!
//! `mxd` wires the client log, the mutex service and the purge tasks to a
//! TCP listener through hyper. The modules are public so tests can run the server
//! in-process.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod api;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod server;

pub use api::AppState;
pub use config::{Args, Config, ConfigError};
pub use lifecycle::{startup, Daemon, LifecycleError};
