// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers: spawn `mxd`, send raw HTTP, assert on replies.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpStream;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

pub use serde_json::Value;

pub const ADMIN_ID: &str = "spec-admin";

/// A temporary directory holding the daemon's client log
pub struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn store(&self) -> PathBuf {
        self.dir.path().join("clients.jsonl")
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Daemon command with this workspace's store and an ephemeral port
    pub fn mxd(&self) -> Command {
        let mut cmd = self.mxd_bare();
        cmd.args(["--admin-id", ADMIN_ID])
            .arg("--store")
            .arg(self.store());
        cmd
    }

    /// Daemon command with only an ephemeral port set
    pub fn mxd_bare(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_mxd"));
        cmd.args(["--listen", "127.0.0.1:0"])
            .current_dir(self.path())
            .env("RUST_LOG", "warn")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    pub fn start(&self) -> Daemon {
        Daemon::spawn(self.mxd())
    }
}

/// A running daemon, killed on drop
pub struct Daemon {
    child: Child,
    pub addr: String,
}

impl Daemon {
    /// Spawn and wait for the `READY <addr>` line
    pub fn spawn(mut cmd: Command) -> Self {
        let mut child = cmd.spawn().unwrap();
        let stdout = child.stdout.take().unwrap();

        let mut line = String::new();
        BufReader::new(stdout).read_line(&mut line).unwrap();
        let addr = match line.trim().strip_prefix("READY ") {
            Some(addr) => addr.to_string(),
            None => {
                let _ = child.kill();
                let output = child.wait_with_output().unwrap();
                panic!(
                    "daemon did not become ready: {:?}\nstderr: {}",
                    line,
                    String::from_utf8_lossy(&output.stderr)
                );
            }
        };

        Self { child, addr }
    }

    pub fn post(&self, target: &str) -> Reply {
        self.request("POST", target)
    }

    pub fn get(&self, target: &str) -> Reply {
        self.request("GET", target)
    }

    pub fn request(&self, method: &str, target: &str) -> Reply {
        let mut stream = TcpStream::connect(&self.addr).unwrap();
        stream.set_read_timeout(Some(Duration::from_secs(30))).unwrap();
        write!(stream, "{} {} HTTP/1.1\r\nHost: {}\r\n\r\n", method, target, self.addr).unwrap();

        let mut raw = String::new();
        stream.read_to_string(&mut raw).unwrap();
        Reply::parse(&raw)
    }

    /// Register `email` and return the new client id
    pub fn register(&self, email: &str) -> String {
        self.post(&format!("/api/client?register&email={}", email))
            .status(200)
            .string("clientID")
    }

    /// Send SIGTERM and wait for exit
    pub fn terminate(mut self) -> ExitStatus {
        let pid = self.child.id().to_string();
        Command::new("kill").args(["-TERM", &pid]).status().unwrap();
        wait_timeout(&mut self.child, Duration::from_secs(10))
    }
}

impl Drop for Daemon {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Run a daemon command that is expected to exit on its own
pub fn run_to_exit(mut cmd: Command) -> (ExitStatus, String) {
    let mut child = cmd.spawn().unwrap();
    let status = wait_timeout(&mut child, Duration::from_secs(10));
    let mut stderr = String::new();
    if let Some(mut pipe) = child.stderr.take() {
        pipe.read_to_string(&mut stderr).unwrap();
    }
    (status, stderr)
}

fn wait_timeout(child: &mut Child, limit: Duration) -> ExitStatus {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait().unwrap() {
            return status;
        }
        if Instant::now() > deadline {
            let _ = child.kill();
            panic!("process did not exit within {:?}", limit);
        }
        std::thread::sleep(Duration::from_millis(20));
    }
}

/// A parsed HTTP reply
#[derive(Debug)]
pub struct Reply {
    pub code: u16,
    /// Status line and headers, lowercased
    pub head: String,
    pub body: Value,
}

impl Reply {
    fn parse(raw: &str) -> Self {
        let (head, body) = raw
            .split_once("\r\n\r\n")
            .unwrap_or_else(|| panic!("incomplete reply: {:?}", raw));
        let code = head
            .split_whitespace()
            .nth(1)
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| panic!("bad status line: {:?}", head));

        Self {
            code,
            head: head.to_ascii_lowercase(),
            body: serde_json::from_str(body).unwrap_or(Value::Null),
        }
    }

    pub fn status(self, expected: u16) -> Self {
        assert_eq!(self.code, expected, "unexpected status, body: {}", self.body);
        self
    }

    pub fn message_has(self, needle: &str) -> Self {
        let message = self.body["errorMessage"].as_str().unwrap_or_default();
        assert!(
            message.contains(needle),
            "errorMessage {:?} does not contain {:?}",
            message,
            needle
        );
        self
    }

    pub fn string(&self, key: &str) -> String {
        self.body[key]
            .as_str()
            .unwrap_or_else(|| panic!("missing {} in {}", key, self.body))
            .to_string()
    }
}
