//! Browser session lifecycle.
//!
//! A [`Session`] owns one WebDriver session and, when it spawned one, the
//! chromedriver process behind it. Sessions are exclusively owned by a single
//! scenario and must be released on every exit path; [`scoped`] does that.

use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use authcheck_protocol::{ElementRef, ErrorCode, LaunchOptions, NewSessionRequest, NewSessionValue};
use authcheck_runtime::{Connection, DEFAULT_REQUEST_TIMEOUT, DriverServer, Error, Result, resolve_chromedriver};
use futures_util::FutureExt;
use parking_lot::Mutex;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::BoxFut;
use crate::browser::BrowserLike;
use crate::locator::Locator;

/// Where the WebDriver endpoint comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverEndpoint {
	/// Spawn a local chromedriver per session.
	Spawn {
		/// Explicit executable; discovered when `None`.
		executable: Option<PathBuf>,
		/// Fixed port; a free one is chosen when `None`.
		port: Option<u16>,
	},
	/// Use an already-running driver or grid.
	Remote(String),
}

impl Default for DriverEndpoint {
	fn default() -> Self {
		DriverEndpoint::Spawn { executable: None, port: None }
	}
}

/// Everything needed to start a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
	pub driver: DriverEndpoint,
	pub options: LaunchOptions,
	/// Maximise the window once the session exists.
	pub maximize: bool,
	pub request_timeout: Duration,
}

impl Default for LaunchConfig {
	fn default() -> Self {
		Self {
			driver: DriverEndpoint::default(),
			options: LaunchOptions::default(),
			maximize: true,
			request_timeout: DEFAULT_REQUEST_TIMEOUT,
		}
	}
}

/// A live WebDriver session.
pub struct Session {
	conn: Connection,
	id: String,
	driver: Mutex<Option<DriverServer>>,
	released: AtomicBool,
}

impl std::fmt::Debug for Session {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Session")
			.field("id", &self.id)
			.field("endpoint", &self.conn.base_url())
			.field("released", &self.released.load(Ordering::SeqCst))
			.finish()
	}
}

impl Session {
	/// Starts a browser configured by `config`.
	///
	/// # Errors
	///
	/// Returns an error for which [`Error::is_launch_error`] holds when the
	/// driver or browser is unavailable.
	pub async fn acquire(config: &LaunchConfig) -> Result<Self> {
		let (conn, driver) = match &config.driver {
			DriverEndpoint::Spawn { executable, port } => {
				// Discovery probes candidates with blocking `--version` runs.
				let explicit = executable.clone();
				let executable = tokio::task::spawn_blocking(move || resolve_chromedriver(explicit.as_deref()))
					.await
					.map_err(|e| Error::LaunchFailed(format!("chromedriver discovery did not finish: {e}")))??;
				let server = DriverServer::launch(&executable, *port).await?;
				let conn = Connection::new(server.url(), config.request_timeout)?;
				(conn, Some(server))
			}
			DriverEndpoint::Remote(url) => {
				let conn = Connection::new(url.as_str(), config.request_timeout)?;
				let status = conn
					.status()
					.await
					.map_err(|e| Error::LaunchFailed(format!("driver at {url} is unreachable: {e}")))?;
				if !status.ready {
					return Err(Error::LaunchFailed(format!("driver at {url} is not ready: {}", status.message)));
				}
				(conn, None)
			}
		};

		let request = serde_json::to_value(NewSessionRequest::chrome(&config.options))?;
		let created = match conn.post("session", request).await {
			Ok(value) => serde_json::from_value::<NewSessionValue>(value).map_err(Error::from),
			Err(err) => Err(err),
		};
		let created = match created {
			Ok(created) => created,
			Err(err) => {
				if let Some(server) = driver {
					let _ = server.shutdown().await;
				}
				return Err(if err.is_launch_error() {
					err
				} else {
					Error::LaunchFailed(format!("Failed to create browser session: {err}"))
				});
			}
		};

		info!(target = "authcheck", session = %created.session_id, endpoint = conn.base_url(), "session started");
		let session = Self {
			conn,
			id: created.session_id,
			driver: Mutex::new(driver),
			released: AtomicBool::new(false),
		};

		if config.maximize {
			if let Err(err) = session.maximize_window().await {
				warn!(target = "authcheck", session = %session.id, error = %err, "failed to maximise window");
			}
		}
		Ok(session)
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn is_released(&self) -> bool {
		self.released.load(Ordering::SeqCst)
	}

	fn ensure_open(&self, op: &str) -> Result<()> {
		if self.is_released() {
			Err(Error::SessionClosed(op.to_string()))
		} else {
			Ok(())
		}
	}

	fn path(&self, suffix: &str) -> String {
		format!("session/{}/{suffix}", self.id)
	}

	fn element_path(&self, element: &ElementRef, suffix: &str) -> String {
		format!("session/{}/element/{}/{suffix}", self.id, element.id())
	}

	async fn get_string(&self, path: String) -> Result<String> {
		match self.conn.get(&path).await? {
			Value::String(s) => Ok(s),
			Value::Null => Ok(String::new()),
			other => Err(Error::ProtocolError(format!("expected string from {path}, got {other}"))),
		}
	}

	async fn get_bool(&self, path: String) -> Result<bool> {
		match self.conn.get(&path).await? {
			Value::Bool(b) => Ok(b),
			other => Err(Error::ProtocolError(format!("expected bool from {path}, got {other}"))),
		}
	}
}

#[async_trait]
impl BrowserLike for Session {
	async fn goto(&self, url: &str) -> Result<()> {
		self.ensure_open("goto")?;
		debug!(target = "authcheck", session = %self.id, url, "navigate");
		self.conn.post(&self.path("url"), json!({ "url": url })).await?;
		Ok(())
	}

	async fn current_url(&self) -> Result<String> {
		self.ensure_open("current_url")?;
		self.get_string(self.path("url")).await
	}

	async fn title(&self) -> Result<String> {
		self.ensure_open("title")?;
		self.get_string(self.path("title")).await
	}

	async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>> {
		self.ensure_open("find_elements")?;
		let body = serde_json::to_value(locator.to_find())?;
		let value = self.conn.post(&self.path("elements"), body).await?;
		Ok(serde_json::from_value(value)?)
	}

	async fn is_displayed(&self, element: &ElementRef) -> Result<bool> {
		self.ensure_open("is_displayed")?;
		self.get_bool(self.element_path(element, "displayed")).await
	}

	async fn is_enabled(&self, element: &ElementRef) -> Result<bool> {
		self.ensure_open("is_enabled")?;
		self.get_bool(self.element_path(element, "enabled")).await
	}

	async fn text(&self, element: &ElementRef) -> Result<String> {
		self.ensure_open("text")?;
		self.get_string(self.element_path(element, "text")).await
	}

	async fn clear(&self, element: &ElementRef) -> Result<()> {
		self.ensure_open("clear")?;
		self.conn.post(&self.element_path(element, "clear"), json!({})).await?;
		Ok(())
	}

	async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()> {
		self.ensure_open("send_keys")?;
		self.conn.post(&self.element_path(element, "value"), json!({ "text": text })).await?;
		Ok(())
	}

	async fn click(&self, element: &ElementRef) -> Result<()> {
		self.ensure_open("click")?;
		self.conn.post(&self.element_path(element, "click"), json!({})).await?;
		Ok(())
	}

	async fn maximize_window(&self) -> Result<()> {
		self.ensure_open("maximize_window")?;
		self.conn.post(&self.path("window/maximize"), json!({})).await?;
		Ok(())
	}

	/// Deletes the WebDriver session, then stops the driver process if this
	/// session spawned it. Only the first call does anything.
	async fn release(&self) -> Result<()> {
		if self.released.swap(true, Ordering::SeqCst) {
			debug!(target = "authcheck", session = %self.id, "release called again; ignoring");
			return Ok(());
		}

		let deleted = match self.conn.delete(&format!("session/{}", self.id)).await {
			Ok(_) => Ok(()),
			Err(err) if err.remote_code() == Some(ErrorCode::InvalidSessionId) => Ok(()),
			Err(err) => Err(err),
		};

		let driver = self.driver.lock().take();
		if let Some(server) = driver {
			if let Err(err) = server.shutdown().await {
				warn!(target = "authcheck", session = %self.id, error = %err, "failed to stop chromedriver");
			}
		}

		info!(target = "authcheck", session = %self.id, "session released");
		deleted
	}
}

impl Drop for Session {
	fn drop(&mut self) {
		if !self.is_released() {
			warn!(target = "authcheck", session = %self.id, "session dropped without release; driver process will be killed");
		}
	}
}

/// Source of fresh browser sessions.
#[async_trait]
pub trait SessionProvider: Send + Sync {
	async fn acquire(&self) -> Result<Box<dyn BrowserLike>>;
}

#[async_trait]
impl SessionProvider for LaunchConfig {
	async fn acquire(&self) -> Result<Box<dyn BrowserLike>> {
		let session = Session::acquire(self).await?;
		Ok(Box::new(session))
	}
}

/// Acquires a session, runs `f` with it, and releases it on every path.
///
/// A panic inside `f` is re-raised after the session is released. Release
/// failures are logged rather than returned, so they never mask the body's
/// own result.
pub async fn scoped<T, F>(provider: &dyn SessionProvider, f: F) -> Result<T>
where
	T: Send,
	F: for<'s> FnOnce(&'s dyn BrowserLike) -> BoxFut<'s, T> + Send,
{
	let browser = provider.acquire().await?;
	let session = browser.as_ref();
	let outcome = AssertUnwindSafe(async move { f(session).await }).catch_unwind().await;

	if let Err(err) = browser.release().await {
		warn!(target = "authcheck", error = %err, "failed to release session");
	}

	match outcome {
		Ok(value) => Ok(value),
		Err(panic) => std::panic::resume_unwind(panic),
	}
}
