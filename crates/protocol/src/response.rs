//! Response envelopes.
//!
//! Every WebDriver response wraps its payload in `{"value": ...}`. Failures use
//! the same envelope with an [`ErrorValue`] payload and a non-2xx status.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{"value": T}` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueEnvelope<T> {
	pub value: T,
}

/// Payload of `POST /session`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionValue {
	pub session_id: String,
	#[serde(default)]
	pub capabilities: Value,
}

/// Payload of `GET /status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusValue {
	pub ready: bool,
	#[serde(default)]
	pub message: String,
}

/// Payload of an error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorValue {
	pub error: ErrorCode,
	#[serde(default)]
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stacktrace: Option<String>,
}

impl ErrorValue {
	/// Extracts an error payload from a raw response body, if it carries one.
	pub fn from_body(body: &Value) -> Option<Self> {
		let value = body.get("value")?;
		value.get("error")?;
		serde_json::from_value(value.clone()).ok()
	}
}

/// W3C error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
	#[serde(rename = "element click intercepted")]
	ElementClickIntercepted,
	#[serde(rename = "element not interactable")]
	ElementNotInteractable,
	#[serde(rename = "insecure certificate")]
	InsecureCertificate,
	#[serde(rename = "invalid argument")]
	InvalidArgument,
	#[serde(rename = "invalid element state")]
	InvalidElementState,
	#[serde(rename = "invalid selector")]
	InvalidSelector,
	#[serde(rename = "invalid session id")]
	InvalidSessionId,
	#[serde(rename = "javascript error")]
	JavascriptError,
	#[serde(rename = "no such element")]
	NoSuchElement,
	#[serde(rename = "no such window")]
	NoSuchWindow,
	#[serde(rename = "session not created")]
	SessionNotCreated,
	#[serde(rename = "stale element reference")]
	StaleElementReference,
	#[serde(rename = "timeout")]
	Timeout,
	#[serde(rename = "unexpected alert open")]
	UnexpectedAlertOpen,
	#[serde(rename = "unknown command")]
	UnknownCommand,
	#[serde(rename = "unknown error")]
	UnknownError,
	#[serde(rename = "unknown method")]
	UnknownMethod,
	#[serde(rename = "unsupported operation")]
	UnsupportedOperation,
	/// Any code not listed above.
	#[serde(other)]
	Other,
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			ErrorCode::ElementClickIntercepted => "element click intercepted",
			ErrorCode::ElementNotInteractable => "element not interactable",
			ErrorCode::InsecureCertificate => "insecure certificate",
			ErrorCode::InvalidArgument => "invalid argument",
			ErrorCode::InvalidElementState => "invalid element state",
			ErrorCode::InvalidSelector => "invalid selector",
			ErrorCode::InvalidSessionId => "invalid session id",
			ErrorCode::JavascriptError => "javascript error",
			ErrorCode::NoSuchElement => "no such element",
			ErrorCode::NoSuchWindow => "no such window",
			ErrorCode::SessionNotCreated => "session not created",
			ErrorCode::StaleElementReference => "stale element reference",
			ErrorCode::Timeout => "timeout",
			ErrorCode::UnexpectedAlertOpen => "unexpected alert open",
			ErrorCode::UnknownCommand => "unknown command",
			ErrorCode::UnknownError => "unknown error",
			ErrorCode::UnknownMethod => "unknown method",
			ErrorCode::UnsupportedOperation => "unsupported operation",
			ErrorCode::Other => "other",
		};
		f.write_str(name)
	}
}
