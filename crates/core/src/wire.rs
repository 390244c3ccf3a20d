// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON bodies shared by the server and its clients

use crate::id::ClientId;
use serde::{Deserialize, Serialize};

/// Body of a successful registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub email: String,
    #[serde(rename = "clientID")]
    pub client_id: ClientId,
}

/// Body of a successful lock or unlock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ack {
    pub status_code: u16,
}

/// Body sent with every 4xx/5xx status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub error_message: String,
}
