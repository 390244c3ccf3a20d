// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! mx - command-line client for the mx mutex service

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod error;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::client::{MxClient, DEFAULT_SERVER};
use crate::error::MxError;

#[derive(Parser)]
#[command(name = "mx", version, about = "mx - named mutexes over HTTP")]
struct Cli {
    /// Base URL of the mxd server
    #[arg(long, global = true, env = "MX_SERVER", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new client and print its id
    Register {
        /// Contact address; each address registers once
        #[arg(long)]
        email: String,
    },
    /// Lock a mutex, waiting up to the server's ceiling
    Lock {
        client_id: String,
        name: String,
        /// Give up after this long (e.g. "500ms", "30s")
        #[arg(long, value_parser = humantime::parse_duration)]
        wait: Option<Duration>,
    },
    /// Unlock a mutex held by this client
    Unlock { client_id: String, name: String },
    /// Show server statistics
    Stats {
        #[arg(long)]
        admin_id: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let client = MxClient::new(&cli.server);

    match run(&client, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<client::ClientError>() {
                Some(err) => eprint!("{}", MxError::from_client(err, client.server())),
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(client: &MxClient, command: Commands) -> Result<()> {
    match command {
        Commands::Register { email } => print_json(&client.register(&email)?),
        Commands::Lock {
            client_id,
            name,
            wait,
        } => print_json(&client.lock(&client_id, &name, wait)?),
        Commands::Unlock { client_id, name } => print_json(&client.unlock(&client_id, &name)?),
        Commands::Stats { admin_id } => print_json(&client.stats(&admin_id)?),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
