// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! The first line is always the bare error, so scripts can match on
//! `error (<status>): <message>`.

use std::fmt;

use crate::client::ClientError;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct MxError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
}

impl MxError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Explain a failed request against `server`
    pub fn from_client(err: &ClientError, server: &str) -> Self {
        match err {
            ClientError::Unreachable { source, .. } => {
                MxError::new(format!("error: could not reach {}", server))
                    .with_context(source.to_string())
                    .with_suggestion("Start the daemon: mxd --listen <addr>")
                    .with_suggestion("Point at another server with --server or MX_SERVER")
            }
            ClientError::Server { status: 401, .. } => MxError::new(err.to_string())
                .with_suggestion("Register first: mx register --email <address>"),
            ClientError::Server { status: 409, message } if message.contains("timeout") => {
                MxError::new(err.to_string())
                    .with_context("Another request holds this mutex")
                    .with_suggestion("Retry with a longer wait: --wait 30s")
            }
            ClientError::Server { status: 503, .. } => MxError::new(err.to_string())
                .with_suggestion("Check the daemon log for store errors"),
            _ => MxError::new(err.to_string()),
        }
    }
}

impl fmt::Display for MxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for MxError {}
