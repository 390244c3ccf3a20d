// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for request building and error decoding.

use super::*;
use yare::parameterized;

const SERVER: &str = "http://127.0.0.1:8080";

#[test]
fn register_url_encodes_email() {
    assert_eq!(
        register_url(SERVER, "dev+ci@example.com"),
        "http://127.0.0.1:8080/api/client?register&email=dev%2Bci%40example.com"
    );
}

#[parameterized(
    lock = { Action::Lock { wait: None }, "lock" },
    lock_with_wait = { Action::Lock { wait: Some(Duration::from_secs(3)) }, "lock&waitTimeoutMs=3000" },
    lock_zero_wait = { Action::Lock { wait: Some(Duration::ZERO) }, "lock&waitTimeoutMs=0" },
    unlock = { Action::Unlock, "unlock" },
)]
fn mutex_url_query(action: Action, query: &str) {
    assert_eq!(
        mutex_url(SERVER, "c-1", "deploy", action),
        format!("http://127.0.0.1:8080/api/client/c-1/mutex/deploy?{}", query)
    );
}

#[test]
fn mutex_url_encodes_segments() {
    assert_eq!(
        mutex_url(SERVER, "c 1", "build/main", Action::Unlock),
        "http://127.0.0.1:8080/api/client/c%201/mutex/build%2Fmain?unlock"
    );
}

#[test]
fn stats_url_encodes_admin_id() {
    assert_eq!(
        stats_url(SERVER, "a&b"),
        "http://127.0.0.1:8080/stats?adminID=a%26b"
    );
}

#[test]
fn new_trims_trailing_slash() {
    let client = MxClient::new("http://localhost:9000/");
    assert_eq!(client.server(), "http://localhost:9000");
}

#[test]
fn server_error_uses_json_message() {
    let err = server_error(
        409,
        "{\"statusCode\":409,\"errorMessage\":\"unable to lock mutex 'm': wait timeout expired\"}\n",
    );

    assert_eq!(
        err.to_string(),
        "error (409): unable to lock mutex 'm': wait timeout expired"
    );
}

#[test]
fn server_error_falls_back_to_raw_body() {
    let err = server_error(502, "Bad Gateway\n");

    assert!(matches!(err, ClientError::Server { status: 502, ref message } if message == "Bad Gateway"));
}
