use std::path::PathBuf;

use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, SuiteError>;

/// Process exit code when every selected scenario passed.
pub const EXIT_OK: i32 = 0;
/// Process exit code when at least one scenario failed.
pub const EXIT_FAILURES: i32 = 1;
/// Process exit code for configuration and launch problems.
pub const EXIT_SETUP: i32 = 2;

#[derive(Debug, Error)]
pub enum SuiteError {
	/// Scenarios ran and at least one failed. The report has already been printed.
	#[error("{failed} of {total} scenarios failed")]
	ScenariosFailed { failed: usize, total: usize },

	/// No scenario could get a browser. The report has already been printed.
	#[error("browser launch failed: {0}")]
	BrowserLaunch(String),

	#[error("invalid configuration: {0}")]
	Config(String),

	#[error("invalid config file {path}")]
	ConfigFile {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("invalid base URL '{url}': {source}")]
	BaseUrl {
		url: String,
		#[source]
		source: url::ParseError,
	},

	#[error("no scenarios match: {}", .0.join(", "))]
	NoScenarios(Vec<String>),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Anyhow(#[from] anyhow::Error),
}

impl SuiteError {
	/// True when the run report already went to stdout and only the exit code remains.
	pub fn is_output_already_printed(&self) -> bool {
		matches!(self, SuiteError::ScenariosFailed { .. } | SuiteError::BrowserLaunch(_))
	}

	pub fn exit_code(&self) -> i32 {
		match self {
			SuiteError::ScenariosFailed { .. } => EXIT_FAILURES,
			_ => EXIT_SETUP,
		}
	}

	/// Convert this error to a CommandError for structured output
	pub fn to_command_error(&self) -> CommandError {
		let (code, details) = match self {
			SuiteError::ScenariosFailed { failed, total } => (
				ErrorCode::ScenarioFailed,
				Some(serde_json::json!({ "failed": failed, "total": total })),
			),
			SuiteError::BrowserLaunch(_) => (ErrorCode::BrowserLaunchFailed, None),
			SuiteError::Config(_) => (ErrorCode::InvalidConfig, None),
			SuiteError::ConfigFile { path, source } => (
				ErrorCode::InvalidConfig,
				Some(serde_json::json!({ "path": path, "line": source.line(), "column": source.column() })),
			),
			SuiteError::BaseUrl { url, .. } => (ErrorCode::InvalidConfig, Some(serde_json::json!({ "baseUrl": url }))),
			SuiteError::NoScenarios(filters) => (ErrorCode::NoScenarios, Some(serde_json::json!({ "filters": filters }))),
			SuiteError::Io(_) => (ErrorCode::IoError, None),
			SuiteError::Json(_) | SuiteError::Anyhow(_) => (ErrorCode::InternalError, None),
		};

		let message = match self {
			SuiteError::ConfigFile { path, source } => format!("invalid config file {}: {source}", path.display()),
			other => other.to_string(),
		};

		CommandError { code, message, details }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn exit_codes_separate_failures_from_setup_problems() {
		assert_eq!(SuiteError::ScenariosFailed { failed: 1, total: 14 }.exit_code(), EXIT_FAILURES);
		assert_eq!(SuiteError::BrowserLaunch("chromedriver not found".into()).exit_code(), EXIT_SETUP);
		assert_eq!(SuiteError::Config("wait must be positive".into()).exit_code(), EXIT_SETUP);
		assert_eq!(SuiteError::NoScenarios(vec!["nope".into()]).exit_code(), EXIT_SETUP);
	}

	#[test]
	fn command_errors_carry_codes_and_details() {
		let err = SuiteError::BaseUrl {
			url: "localhost:3000".into(),
			source: url::ParseError::RelativeUrlWithoutBase,
		};
		let cmd = err.to_command_error();
		assert_eq!(cmd.code, ErrorCode::InvalidConfig);
		assert_eq!(cmd.details.unwrap()["baseUrl"], "localhost:3000");

		let cmd = SuiteError::NoScenarios(vec!["foo".into(), "bar".into()]).to_command_error();
		assert_eq!(cmd.code, ErrorCode::NoScenarios);
		assert_eq!(cmd.message, "no scenarios match: foo, bar");
	}

	#[test]
	fn config_file_message_includes_parse_position() {
		let source = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
		let err = SuiteError::ConfigFile {
			path: PathBuf::from("authcheck.json"),
			source,
		};
		let cmd = err.to_command_error();
		assert!(cmd.message.starts_with("invalid config file authcheck.json: "));
		assert_eq!(cmd.details.unwrap()["line"], 1);
	}

	#[test]
	fn printed_reports_are_not_repeated() {
		assert!(SuiteError::ScenariosFailed { failed: 2, total: 3 }.is_output_already_printed());
		assert!(!SuiteError::Config("x".into()).is_output_already_printed());
	}
}
