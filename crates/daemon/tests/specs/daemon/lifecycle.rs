// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle specs
//!
//! Verify startup, readiness and shutdown.

use crate::prelude::*;

#[test]
fn daemon_prints_ready_with_bound_address() {
    let temp = Workspace::empty();

    let daemon = temp.start();

    assert!(daemon.addr.starts_with("127.0.0.1:"));
    assert!(!daemon.addr.ends_with(":0"));
}

#[test]
fn daemon_exits_cleanly_on_sigterm() {
    let temp = Workspace::empty();
    let daemon = temp.start();

    let status = daemon.terminate();

    assert!(status.success(), "{:?}", status);
}

#[test]
fn daemon_rejects_zero_purge_interval() {
    let temp = Workspace::empty();
    let mut cmd = temp.mxd();
    cmd.args(["--purge-interval", "0s"]);

    let (status, stderr) = run_to_exit(cmd);

    assert!(!status.success());
    assert!(stderr.contains("purge_interval"), "{}", stderr);
}

#[test]
fn daemon_defaults_store_to_working_directory() {
    let temp = Workspace::empty();
    let daemon = Daemon::spawn(temp.mxd_bare());

    daemon.register("dev@example.com");

    assert!(temp.path().join("mx-clients.jsonl").exists());
}

#[test]
fn daemon_reads_config_file() {
    let temp = Workspace::empty();
    let config = temp.file("mxd.toml", "admin_id = \"from-file\"\nmax_wait = \"1s\"\n");
    let mut cmd = temp.mxd_bare();
    cmd.arg("--config")
        .arg(&config)
        .args(["--admin-id", "from-flag"]);
    let daemon = Daemon::spawn(cmd);

    daemon.get("/stats?adminID=from-file").status(401);
    daemon.get("/stats?adminID=from-flag").status(200);
}

#[test]
fn daemon_rejects_unknown_config_keys() {
    let temp = Workspace::empty();
    let config = temp.file("mxd.toml", "tls_cert = \"cert.pem\"\n");
    let mut cmd = temp.mxd();
    cmd.arg("--config").arg(&config);

    let (status, _) = run_to_exit(cmd);

    assert!(!status.success());
}
