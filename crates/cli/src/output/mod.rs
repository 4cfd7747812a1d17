//! Structured output for suite runs.
//!
//! ## Output Contract
//!
//! `json` prints one result envelope on stdout:
//!
//! ```json
//! {
//!   "schemaVersion": 1,
//!   "ok": false,
//!   "command": "run",
//!   "data": { "total": 14, "passed": 13, "failed": 1, "scenarios": [ ... ] },
//!   "error": { "code": "SCENARIO_FAILED", "message": "1 of 14 scenarios failed" },
//!   "timings": { "durationMs": 41234 }
//! }
//! ```
//!
//! `ndjson` prints one compact [`ScenarioReport`] per line as scenarios finish,
//! then the envelope on a final line. `text` prints coloured status lines and
//! a summary.


use std::io::{self, Write};
use std::time::{Duration, Instant};

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::runner::{ScenarioReport, Status, SuiteReport};
use crate::scenarios::Scenario;

/// Current schema version for command output.
///
/// Increment this when making breaking changes to the output structure.
pub const SCHEMA_VERSION: u32 = 1;

/// Output format for CLI results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text
	#[default]
	Text,
	/// JSON output
	Json,
	/// Newline-delimited JSON (streaming)
	Ndjson,
}

impl std::str::FromStr for OutputFormat {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"text" => Ok(OutputFormat::Text),
			"json" => Ok(OutputFormat::Json),
			"ndjson" => Ok(OutputFormat::Ndjson),
			_ => Err(format!("unknown format: {s}")),
		}
	}
}

impl std::fmt::Display for OutputFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			OutputFormat::Text => write!(f, "text"),
			OutputFormat::Json => write!(f, "json"),
			OutputFormat::Ndjson => write!(f, "ndjson"),
		}
	}
}

/// The result envelope.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T: Serialize> {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub schema_version: Option<u32>,

	pub ok: bool,

	/// Command name ("run", "list")
	pub command: String,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub timings: Option<Timings>,
}

/// Error information for failed commands
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
	pub code: ErrorCode,

	pub message: String,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<serde_json::Value>,
}

/// Standardized error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	/// At least one scenario failed
	ScenarioFailed,
	/// No browser session could be started
	BrowserLaunchFailed,
	/// Configuration file or flags were invalid
	InvalidConfig,
	/// Filters selected no scenarios
	NoScenarios,
	IoError,
	InternalError,
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ErrorCode::ScenarioFailed => write!(f, "SCENARIO_FAILED"),
			ErrorCode::BrowserLaunchFailed => write!(f, "BROWSER_LAUNCH_FAILED"),
			ErrorCode::InvalidConfig => write!(f, "INVALID_CONFIG"),
			ErrorCode::NoScenarios => write!(f, "NO_SCENARIOS"),
			ErrorCode::IoError => write!(f, "IO_ERROR"),
			ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
		}
	}
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timings {
	pub duration_ms: u64,
}

impl From<Duration> for Timings {
	fn from(duration: Duration) -> Self {
		Timings {
			duration_ms: duration.as_millis() as u64,
		}
	}
}

/// Builder for constructing command results
pub struct ResultBuilder<T: Serialize> {
	command: String,
	data: Option<T>,
	error: Option<CommandError>,
	start_time: Instant,
	timings: Option<Timings>,
}

impl<T: Serialize> ResultBuilder<T> {
	pub fn new(command: impl Into<String>) -> Self {
		Self {
			command: command.into(),
			data: None,
			error: None,
			start_time: Instant::now(),
			timings: None,
		}
	}

	pub fn data(mut self, data: T) -> Self {
		self.data = Some(data);
		self
	}

	pub fn error(mut self, code: ErrorCode, message: impl Into<String>) -> Self {
		self.error = Some(CommandError {
			code,
			message: message.into(),
			details: None,
		});
		self
	}

	pub fn error_with_details(mut self, code: ErrorCode, message: impl Into<String>, details: serde_json::Value) -> Self {
		self.error = Some(CommandError {
			code,
			message: message.into(),
			details: Some(details),
		});
		self
	}

	/// Override timings instead of measuring from construction.
	pub fn timings(mut self, timings: Timings) -> Self {
		self.timings = Some(timings);
		self
	}

	/// `ok` is true only with data and no error; a failed run carries both.
	pub fn build(self) -> CommandResult<T> {
		let ok = self.error.is_none() && self.data.is_some();
		CommandResult {
			schema_version: Some(SCHEMA_VERSION),
			ok,
			command: self.command,
			data: self.data,
			error: self.error,
			timings: Some(self.timings.unwrap_or_else(|| Timings::from(self.start_time.elapsed()))),
		}
	}
}

/// Builds the envelope for a finished run.
pub fn suite_result(report: SuiteReport) -> CommandResult<SuiteReport> {
	let timings = Timings {
		duration_ms: report.duration_ms,
	};
	let builder = ResultBuilder::new("run").timings(timings);
	if report.all_passed() {
		builder.data(report).build()
	} else {
		let code = if report.all_failures_are_launch() {
			ErrorCode::BrowserLaunchFailed
		} else {
			ErrorCode::ScenarioFailed
		};
		let message = format!("{} of {} scenarios failed", report.failed, report.total);
		builder
			.error(code, message)
			.data(report)
			.build()
	}
}

/// Print a command result to stdout in the specified format
pub fn print_result<T: Serialize>(result: &CommandResult<T>, format: OutputFormat) {
	let _ = write_result(&mut io::stdout().lock(), result, format);
}

pub fn write_result<W: Write, T: Serialize>(w: &mut W, result: &CommandResult<T>, format: OutputFormat) -> io::Result<()> {
	match format {
		OutputFormat::Json => writeln!(w, "{}", serde_json::to_string_pretty(result)?),
		OutputFormat::Ndjson => writeln!(w, "{}", serde_json::to_string(result)?),
		OutputFormat::Text => {
			if let Some(ref error) = result.error {
				writeln!(w, "Error [{}]: {}", error.code, error.message)?;
			} else if let Some(ref data) = result.data {
				writeln!(w, "{}", serde_json::to_string_pretty(data)?)?;
			}
			Ok(())
		}
	}
}

/// Streams one finished scenario. Prints nothing for `json`, which only
/// emits the final envelope.
pub fn write_scenario<W: Write>(w: &mut W, report: &ScenarioReport, format: OutputFormat) -> io::Result<()> {
	match format {
		OutputFormat::Json => Ok(()),
		OutputFormat::Ndjson => writeln!(w, "{}", serde_json::to_string(report)?),
		OutputFormat::Text => {
			let status = match report.status {
				Status::Passed => "PASS".green().bold(),
				Status::Failed => "FAIL".red().bold(),
				Status::Skipped => "SKIP".yellow().bold(),
			};
			writeln!(w, "{status} {} ({}ms)", report.name, report.duration_ms)?;
			if let Some(ref failure) = report.failure {
				writeln!(w, "     {}", failure.message.dimmed())?;
			}
			if let Some(ref reason) = report.skip_reason {
				writeln!(w, "     {}", reason.dimmed())?;
			}
			Ok(())
		}
	}
}

/// Writes the end-of-run output: a summary for `text`, the envelope otherwise.
pub fn write_summary<W: Write>(w: &mut W, result: &CommandResult<SuiteReport>, format: OutputFormat) -> io::Result<()> {
	if format != OutputFormat::Text {
		return write_result(w, result, format);
	}
	let Some(ref report) = result.data else {
		return write_result(w, result, format);
	};

	let line = format!(
		"{} passed, {} failed, {} skipped ({} total) in {:.1}s",
		report.passed,
		report.failed,
		report.skipped,
		report.total,
		report.duration_ms as f64 / 1000.0
	);
	writeln!(w)?;
	if report.all_passed() {
		writeln!(w, "{}", line.green())
	} else {
		writeln!(w, "{}", line.red())?;
		for failed in report.scenarios.iter().filter(|s| s.status == Status::Failed) {
			writeln!(w, "  {} {}", "✗".red(), failed.name)?;
		}
		Ok(())
	}
}

/// One entry of `authcheck list`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioInfo {
	pub name: String,
	pub description: String,
	pub creates_account: bool,
}

impl From<&Scenario> for ScenarioInfo {
	fn from(scenario: &Scenario) -> Self {
		Self {
			name: scenario.name.to_string(),
			description: scenario.description.to_string(),
			creates_account: scenario.creates_account,
		}
	}
}

pub fn write_scenario_list<W: Write>(w: &mut W, scenarios: &[ScenarioInfo], format: OutputFormat) -> io::Result<()> {
	match format {
		OutputFormat::Text => {
			for s in scenarios {
				let marker = if s.creates_account { " [account]".yellow().to_string() } else { String::new() };
				writeln!(w, "{:<32} {}{marker}", s.name.cyan(), s.description)?;
			}
			Ok(())
		}
		_ => {
			let result = ResultBuilder::new("list").data(scenarios).build();
			write_result(w, &result, format)
		}
	}
}

/// Print an error to stderr in human-readable format
pub fn print_error_stderr(error: &CommandError) {
	eprintln!("{} [{}]: {}", "Error".red().bold(), error.code, error.message);
}
