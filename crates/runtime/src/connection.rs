//! HTTP connection to a WebDriver endpoint
//!
//! Every command is a JSON request; every response is a `{"value": ...}`
//! envelope. Non-2xx responses carry an error payload that is mapped to
//! [`Error::Remote`].

use std::time::Duration;

use authcheck_protocol::{ErrorValue, StatusValue};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client bound to one WebDriver base URL.
#[derive(Debug, Clone)]
pub struct Connection {
	client: reqwest::Client,
	base_url: String,
}

impl Connection {
	/// Creates a connection to `base_url` (e.g. `http://127.0.0.1:9515`).
	pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self> {
		let client = reqwest::Client::builder()
			.timeout(request_timeout)
			.build()
			.map_err(|e| Error::ConnectionFailed(format!("Failed to build HTTP client: {e}")))?;
		Ok(Self {
			client,
			base_url: base_url.into().trim_end_matches('/').to_string(),
		})
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	fn url(&self, path: &str) -> String {
		format!("{}/{}", self.base_url, path.trim_start_matches('/'))
	}

	/// Sends a command and returns the unwrapped `value` payload.
	pub async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
		let url = self.url(path);
		trace!(target = "authcheck::wire", %method, %url, body = ?body, "request");

		let mut request = self.client.request(method.clone(), &url);
		if let Some(body) = body {
			request = request.json(&body);
		} else if method == Method::POST {
			request = request.json(&serde_json::json!({}));
		}

		let response = request.send().await.map_err(|e| {
			if e.is_connect() {
				Error::ConnectionFailed(format!("{url}: {e}"))
			} else {
				Error::Transport(e)
			}
		})?;

		let status = response.status();
		let text = response.text().await?;
		trace!(target = "authcheck::wire", %status, body = %text, "response");

		let parsed: Value = if text.trim().is_empty() {
			Value::Null
		} else {
			serde_json::from_str(&text).map_err(|e| Error::ProtocolError(format!("{method} {path} returned non-JSON body ({status}): {e}")))?
		};

		if !status.is_success() {
			return Err(match ErrorValue::from_body(&parsed) {
				Some(err) => {
					debug!(target = "authcheck", %method, path, code = %err.error, message = %err.message, "driver error");
					Error::Remote {
						code: err.error,
						message: err.message,
						stacktrace: err.stacktrace.filter(|s| !s.is_empty()),
					}
				}
				None => Error::ProtocolError(format!("{method} {path} failed with {status}: {text}")),
			});
		}

		match parsed {
			Value::Object(mut map) => Ok(map.remove("value").unwrap_or(Value::Null)),
			Value::Null => Ok(Value::Null),
			other => Err(Error::ProtocolError(format!("{method} {path} returned unexpected body: {other}"))),
		}
	}

	pub async fn get(&self, path: &str) -> Result<Value> {
		self.send(Method::GET, path, None).await
	}

	pub async fn post(&self, path: &str, body: Value) -> Result<Value> {
		self.send(Method::POST, path, Some(body)).await
	}

	pub async fn delete(&self, path: &str) -> Result<Value> {
		self.send(Method::DELETE, path, None).await
	}

	/// Sends a command and deserializes the payload into `T`.
	pub async fn send_as<T: DeserializeOwned>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T> {
		let value = self.send(method, path, body).await?;
		Ok(serde_json::from_value(value)?)
	}

	/// Queries `GET /status`.
	pub async fn status(&self) -> Result<StatusValue> {
		self.send_as(Method::GET, "status", None).await
	}
}
