use std::io::Write;

use authcheck::SessionProvider;
use tracing::warn;

use crate::cli::RunArgs;
use crate::config::SuiteConfig;
use crate::error::{Result, SuiteError};
use crate::output::{self, OutputFormat};
use crate::runner::{self, RunOptions, SuiteReport};
use crate::scenarios::{FailureKind, SCENARIOS};

/// Runs the selected scenarios, streaming per-scenario output to `out`.
///
/// Returns the report when every scenario passed. Failures come back as
/// [`SuiteError::ScenariosFailed`] or, when nothing could get a browser,
/// [`SuiteError::BrowserLaunch`], after the report has been written.
pub async fn execute<W: Write + Send>(
	provider: &dyn SessionProvider,
	config: &SuiteConfig,
	args: &RunArgs,
	format: OutputFormat,
	out: &mut W,
) -> Result<SuiteReport> {
	let options = RunOptions {
		base_url: config.base_url.clone(),
		wait: config.wait,
		filters: args.filters.clone(),
		fail_fast: args.fail_fast,
		include_accounts: config.include_accounts && !args.no_accounts,
	};

	if runner::select(SCENARIOS, &options).is_empty() {
		return Err(SuiteError::NoScenarios(args.filters.clone()));
	}

	let mut write_error = None;
	let report = runner::run_suite(provider, SCENARIOS, &options, |scenario| {
		if let Err(err) = output::write_scenario(out, scenario, format) {
			write_error.get_or_insert(err);
		}
	})
	.await;
	if let Some(err) = write_error {
		warn!(target = "authcheck", error = %err, "failed to stream scenario output");
	}

	let result = output::suite_result(report.clone());
	output::write_summary(out, &result, format)?;
	out.flush()?;

	if report.all_passed() {
		return Ok(report);
	}
	if report.all_failures_are_launch() {
		let message = report
			.scenarios
			.iter()
			.filter_map(|s| s.failure.as_ref())
			.find(|f| f.kind == FailureKind::Launch)
			.map(|f| f.message.clone())
			.unwrap_or_default();
		return Err(SuiteError::BrowserLaunch(message));
	}
	Err(SuiteError::ScenariosFailed {
		failed: report.failed,
		total: report.total,
	})
}
