// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client registration specs

use crate::prelude::*;

#[test]
fn register_returns_email_and_client_id() {
    let temp = Workspace::empty();
    let daemon = temp.start();

    let reply = daemon
        .post("/api/client?register&email=dev@example.com")
        .status(200);

    assert_eq!(reply.string("email"), "dev@example.com");
    assert_eq!(reply.string("clientID").len(), 36);
    assert!(reply.head.contains("content-type: application/json; charset=utf8"));
}

#[test]
fn register_with_get_is_rejected() {
    let temp = Workspace::empty();
    let daemon = temp.start();

    daemon
        .get("/api/client?register&email=dev@example.com")
        .status(400)
        .message_has("use POST");
}

#[test]
fn register_without_email_shows_usage() {
    let temp = Workspace::empty();
    let daemon = temp.start();

    daemon
        .post("/api/client?register")
        .status(400)
        .message_has("usage: /api/client?register&email=");
}

#[test]
fn stats_need_the_admin_id() {
    let temp = Workspace::empty();
    let daemon = temp.start();
    daemon.register("dev@example.com");

    daemon.get("/stats").status(401);
    let stats = daemon
        .get(&format!("/stats?adminID={}", ADMIN_ID))
        .status(200);

    assert_eq!(stats.body["totalClients"], 1);
}
