//! Chromedriver process management.
//!
//! When no WebDriver endpoint is configured, each session gets its own
//! chromedriver on a free loopback port. The child is spawned with
//! `kill_on_drop`, so dropping the service also terminates it.
use anyhow::{anyhow, bail, Context, Result};
use std::net::TcpListener;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A running chromedriver child process.
#[derive(Debug)]
pub struct ChromeDriverService {
    process: Child,
    url: String,
}

impl ChromeDriverService {
    /// Spawn chromedriver from `path` and wait until `/status` reports ready.
    pub async fn spawn(path: &str, startup_timeout: Duration) -> Result<Self> {
        let port = free_local_port()?;
        let url = format!("http://127.0.0.1:{port}");

        let process = Command::new(path)
            .arg(format!("--port={port}"))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn chromedriver at `{path}`"))?;

        info!(target: "browser.launch", %path, %url, "spawned chromedriver");

        let mut service = Self { process, url };
        if let Err(err) = service.wait_ready(startup_timeout).await {
            if let Err(shutdown_err) = service.shutdown().await {
                warn!(target: "browser.launch", error = %shutdown_err, "chromedriver shutdown failed");
            }
            return Err(err);
        }
        Ok(service)
    }

    /// Base URL of the WebDriver endpoint.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn wait_ready(&mut self, startup_timeout: Duration) -> Result<()> {
        let http = reqwest::Client::builder()
            .timeout(READY_POLL_INTERVAL * 5)
            .build()
            .context("failed to build readiness client")?;
        let status_url = format!("{}/status", self.url);
        let deadline = Instant::now() + startup_timeout;

        loop {
            if let Some(status) = self
                .process
                .try_wait()
                .context("failed to check chromedriver status")?
            {
                bail!("chromedriver exited during startup with status: {status}");
            }

            match http.get(&status_url).send().await {
                Ok(resp) => {
                    let body: serde_json::Value = resp.json().await.unwrap_or_default();
                    if body["value"]["ready"].as_bool().unwrap_or(false) {
                        debug!(target: "browser.launch", url = %self.url, "chromedriver ready");
                        return Ok(());
                    }
                }
                Err(err) => {
                    debug!(target: "browser.launch", error = %err, "chromedriver not reachable yet");
                }
            }

            if Instant::now() >= deadline {
                return Err(anyhow!(
                    "chromedriver not ready after {:?} at {}",
                    startup_timeout,
                    self.url
                ));
            }
            sleep(READY_POLL_INTERVAL).await;
        }
    }

    /// Kill the process and reap it.
    pub async fn shutdown(mut self) -> Result<()> {
        if self.process.try_wait()?.is_none() {
            self.process
                .kill()
                .await
                .context("failed to kill chromedriver")?;
        }
        let _ = tokio::time::timeout(Duration::from_secs(2), self.process.wait()).await;
        debug!(target: "browser.launch", url = %self.url, "chromedriver stopped");
        Ok(())
    }
}

fn free_local_port() -> Result<u16> {
    let listener =
        TcpListener::bind(("127.0.0.1", 0)).context("failed to reserve a local port")?;
    Ok(listener.local_addr()?.port())
}
