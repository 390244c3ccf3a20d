// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock/unlock specs

use std::time::{Duration, Instant};

use crate::prelude::*;

#[test]
fn lock_and_unlock_succeed() {
    let temp = Workspace::empty();
    let daemon = temp.start();
    let client = daemon.register("dev@example.com");

    daemon
        .post(&format!("/api/client/{}/mutex/release?lock", client))
        .status(200);
    daemon
        .post(&format!("/api/client/{}/mutex/release?unlock", client))
        .status(200);
}

#[test]
fn second_lock_waits_out_its_timeout() {
    let temp = Workspace::empty();
    let daemon = temp.start();
    let client = daemon.register("dev@example.com");
    let target = format!("/api/client/{}/mutex/m?lock&waitTimeoutMs=500", client);
    daemon.post(&target).status(200);

    let start = Instant::now();
    daemon
        .post(&target)
        .status(409)
        .message_has("wait timeout expired");

    assert!(start.elapsed() >= Duration::from_millis(500));
}

#[test]
fn unknown_client_is_unauthorized() {
    let temp = Workspace::empty();
    let daemon = temp.start();

    daemon
        .post("/api/client/00000000-0000-0000-0000-000000000000/mutex/m?lock")
        .status(401);
}

#[test]
fn unlocking_an_unknown_mutex_conflicts() {
    let temp = Workspace::empty();
    let daemon = temp.start();
    let client = daemon.register("dev@example.com");

    daemon
        .post(&format!("/api/client/{}/mutex/never-locked?unlock", client))
        .status(409)
        .message_has("invalid mutex identifier 'never-locked'");
}

#[test]
fn clients_have_separate_namespaces() {
    let temp = Workspace::empty();
    let daemon = temp.start();
    let alice = daemon.register("alice@example.com");
    let bob = daemon.register("bob@example.com");

    daemon
        .post(&format!("/api/client/{}/mutex/shared?lock", alice))
        .status(200);
    daemon
        .post(&format!("/api/client/{}/mutex/shared?lock&waitTimeoutMs=0", bob))
        .status(200);
}
