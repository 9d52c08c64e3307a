//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::process::ExitStatus;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;
use linkhook::config::{CommandConfig, Config, RuleConfig};
use linkhook::dispatch::{CommandRunner, Invocation, RunError};
use linkhook::{HttpServer, Shutdown};
use tokio::net::TcpListener;

/// Runner that records invocations instead of spawning processes.
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<Invocation>>,
}

impl RecordingRunner {
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Poll until at least `n` invocations arrived or the deadline passes.
    pub async fn wait_for(&self, n: usize) -> Vec<Invocation> {
        for _ in 0..100 {
            let calls = self.calls();
            if calls.len() >= n {
                return calls;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.calls()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: Invocation) -> BoxFuture<'static, Result<ExitStatus, RunError>> {
        self.calls.lock().unwrap().push(invocation);
        Box::pin(async { Ok(success()) })
    }
}

#[cfg(unix)]
fn success() -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(0)
}

#[cfg(windows)]
fn success() -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(0)
}

pub fn rule(page: &[&str], link: &[&str], name: &str, args: &[&str]) -> RuleConfig {
    RuleConfig {
        page_globs: page.iter().map(|s| s.to_string()).collect(),
        link_globs: link.iter().map(|s| s.to_string()).collect(),
        command: CommandConfig {
            name: name.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
        },
    }
}

/// A running server bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub runner: Arc<RecordingRunner>,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server with `rules` and a recording runner.
pub async fn start_server(rules: Vec<RuleConfig>) -> TestServer {
    let runner = Arc::new(RecordingRunner::default());
    let config = Config {
        port: "0".into(),
        rules,
    };
    let server = HttpServer::with_runner(&config, runner.clone()).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        addr,
        runner,
        shutdown,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
