//! Error types for the authcheck runtime.

use authcheck_protocol::ErrorCode;
use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while launching, talking to, or driving a browser session.
#[derive(Debug, Error)]
pub enum Error {
	/// chromedriver binary was not found.
	#[error("chromedriver not found. Install it or set CHROMEDRIVER_PATH")]
	DriverNotFound,

	/// Failed to start the driver process or create a browser session.
	#[error("Failed to launch browser session: {0}")]
	LaunchFailed(String),

	/// Could not reach the driver endpoint.
	#[error("Failed to connect to driver: {0}")]
	ConnectionFailed(String),

	/// HTTP transport failure while a request was in flight.
	#[error("Transport error: {0}")]
	Transport(#[from] reqwest::Error),

	/// The driver answered with something that is not a WebDriver envelope.
	#[error("Protocol error: {0}")]
	ProtocolError(String),

	/// Error reported by the driver with its W3C error code.
	#[error("{code}: {message}")]
	Remote {
		code: ErrorCode,
		message: String,
		/// Driver-side stack trace, when provided
		stacktrace: Option<String>,
	},

	/// A wait for an element elapsed before the element became usable.
	#[error("Element not found within {timeout_ms}ms: {locator}")]
	ElementNotFoundWithinTimeout { locator: String, timeout_ms: u64 },

	/// A page asked its locator table for a name it does not define.
	#[error("Screen '{screen}' has no element named '{name}'")]
	UnknownElement { screen: &'static str, name: String },

	/// The session was already released.
	#[error("Session closed: cannot perform '{0}' after release")]
	SessionClosed(String),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl Error {
	/// Builds a [`Error::Remote`] from a code and message.
	pub fn remote(code: ErrorCode, message: impl Into<String>) -> Self {
		Error::Remote {
			code,
			message: message.into(),
			stacktrace: None,
		}
	}

	/// Returns the W3C error code if this is a driver-reported error.
	pub fn remote_code(&self) -> Option<ErrorCode> {
		match self {
			Error::Remote { code, .. } => Some(*code),
			_ => None,
		}
	}

	/// Returns the driver stack trace if this is a remote error with one.
	pub fn stack_trace(&self) -> Option<&str> {
		match self {
			Error::Remote { stacktrace, .. } => stacktrace.as_deref(),
			_ => None,
		}
	}

	/// Returns true if the browser or driver could not be brought up.
	pub fn is_launch_error(&self) -> bool {
		match self {
			Error::DriverNotFound | Error::LaunchFailed(_) => true,
			Error::Remote { code, .. } => *code == ErrorCode::SessionNotCreated,
			_ => false,
		}
	}

	/// Returns true if this is a timeout of any kind.
	pub fn is_timeout(&self) -> bool {
		match self {
			Error::ElementNotFoundWithinTimeout { .. } => true,
			Error::Remote { code, .. } => *code == ErrorCode::Timeout,
			Error::Transport(e) => e.is_timeout(),
			_ => false,
		}
	}

	/// Returns true if an element reference went stale.
	pub fn is_stale_element(&self) -> bool {
		self.remote_code() == Some(ErrorCode::StaleElementReference)
	}

	/// Returns true if the driver could not find an element.
	pub fn is_no_such_element(&self) -> bool {
		self.remote_code() == Some(ErrorCode::NoSuchElement)
	}
}
