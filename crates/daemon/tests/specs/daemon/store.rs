// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client store specs
//!
//! Registrations are durable, a torn final write is dropped, and a damaged
//! store stops startup.

use crate::prelude::*;

#[test]
fn registration_survives_restart() {
    let temp = Workspace::empty();
    let client = {
        let daemon = temp.start();
        daemon.register("dev@example.com")
    };

    let daemon = temp.start();

    daemon
        .post(&format!("/api/client/{}/mutex/m?lock", client))
        .status(200);
    daemon
        .post("/api/client?register&email=dev@example.com")
        .status(400)
        .message_has("already registered");
}

#[test]
fn corrupt_store_is_fatal() {
    let temp = Workspace::empty();
    std::fs::write(temp.store(), "{\"seq\":1,\"record\":\nnot json either\n").unwrap();

    let (status, stderr) = run_to_exit(temp.mxd());

    assert!(!status.success());
    assert!(stderr.to_lowercase().contains("store"), "{}", stderr);
}

#[test]
fn torn_final_write_is_dropped_on_restart() {
    let temp = Workspace::empty();
    let client = {
        let daemon = temp.start();
        daemon.register("dev@example.com")
    };
    let mut content = std::fs::read_to_string(temp.store()).unwrap();
    content.push_str("{\"seq\":2,\"record\":{\"email\":\"ops@");
    std::fs::write(temp.store(), content).unwrap();

    let daemon = temp.start();

    daemon
        .post(&format!("/api/client/{}/mutex/m?lock", client))
        .status(200);
    daemon.register("ops@example.com");
}

#[test]
fn store_directory_is_created() {
    let temp = Workspace::empty();
    let mut cmd = temp.mxd_bare();
    let nested = temp.path().join("state").join("clients.jsonl");
    cmd.arg("--store").arg(&nested);

    let daemon = Daemon::spawn(cmd);
    daemon.register("dev@example.com");

    assert!(nested.exists());
}
