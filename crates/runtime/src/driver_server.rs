//! chromedriver process management
//!
//! Spawns a local chromedriver, waits for it to report ready, and tears it
//! down when the owning session is released.

use std::net::TcpListener;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use authcheck_protocol::{StatusValue, ValueEnvelope};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Time allowed for a freshly spawned driver to answer `GET /status`.
pub const DRIVER_STARTUP_TIMEOUT: Duration = Duration::from_secs(10);

const STATUS_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A running chromedriver process bound to a local port.
#[derive(Debug)]
pub struct DriverServer {
	process: Child,
	port: u16,
}

impl DriverServer {
	/// Launch chromedriver on `port`, or on a free ephemeral port when `None`.
	///
	/// # Errors
	///
	/// Returns `Error::LaunchFailed` if the process cannot be spawned, exits
	/// early, or never reports ready within [`DRIVER_STARTUP_TIMEOUT`].
	pub async fn launch(executable: &Path, port: Option<u16>) -> Result<Self> {
		let port = match port {
			Some(port) => port,
			None => free_port()?,
		};

		let mut cmd = Command::new(executable);
		cmd.arg(format!("--port={port}"))
			.stdin(Stdio::null())
			.stdout(Stdio::null())
			.stderr(Stdio::inherit())
			.kill_on_drop(true);

		let child = cmd
			.spawn()
			.map_err(|e| Error::LaunchFailed(format!("Failed to spawn {}: {e}", executable.display())))?;

		let mut server = Self { process: child, port };
		info!(target = "authcheck", port, executable = %executable.display(), "spawned chromedriver");

		if let Err(err) = server.wait_until_ready().await {
			let _ = server.process.start_kill();
			return Err(err);
		}
		Ok(server)
	}

	/// Base URL for WebDriver requests.
	pub fn url(&self) -> String {
		format!("http://127.0.0.1:{}", self.port)
	}

	async fn wait_until_ready(&mut self) -> Result<()> {
		let client = reqwest::Client::builder()
			.timeout(Duration::from_secs(2))
			.build()
			.map_err(|e| Error::LaunchFailed(format!("Failed to build HTTP client: {e}")))?;
		let status_url = format!("{}/status", self.url());
		let deadline = tokio::time::Instant::now() + DRIVER_STARTUP_TIMEOUT;

		loop {
			match self.process.try_wait() {
				Ok(Some(status)) => {
					return Err(Error::LaunchFailed(format!("chromedriver exited immediately with status: {status}")));
				}
				Ok(None) => {}
				Err(e) => {
					return Err(Error::LaunchFailed(format!("Failed to check process status: {e}")));
				}
			}

			match client.get(&status_url).send().await {
				Ok(resp) => match resp.json::<ValueEnvelope<StatusValue>>().await {
					Ok(envelope) if envelope.value.ready => {
						debug!(target = "authcheck", port = self.port, "chromedriver ready");
						return Ok(());
					}
					Ok(envelope) => {
						debug!(target = "authcheck", message = %envelope.value.message, "chromedriver not ready yet");
					}
					Err(e) => debug!(target = "authcheck", error = %e, "unreadable status response"),
				},
				Err(e) => debug!(target = "authcheck", error = %e, "status probe failed"),
			}

			if tokio::time::Instant::now() >= deadline {
				return Err(Error::LaunchFailed(format!(
					"chromedriver did not become ready within {}s",
					DRIVER_STARTUP_TIMEOUT.as_secs()
				)));
			}
			tokio::time::sleep(STATUS_POLL_INTERVAL).await;
		}
	}

	/// Shut down the driver and wait for it to exit.
	pub async fn shutdown(mut self) -> Result<()> {
		self.process
			.kill()
			.await
			.map_err(|e| Error::LaunchFailed(format!("Failed to kill chromedriver: {e}")))?;

		if tokio::time::timeout(Duration::from_secs(5), self.process.wait()).await.is_err() {
			warn!(target = "authcheck", port = self.port, "chromedriver shutdown timed out after 5 seconds");
		}
		Ok(())
	}
}

/// Asks the OS for an unused local port.
fn free_port() -> Result<u16> {
	let listener = TcpListener::bind(("127.0.0.1", 0))?;
	Ok(listener.local_addr()?.port())
}
