//! Sequential scenario runner.
//!
//! Every scenario gets its own session from a [`SessionProvider`] and the
//! session is released however the scenario ends. A panicking scenario is
//! reported as a failure and the suite carries on.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use authcheck::{SessionProvider, Wait, scoped};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::scenarios::{FailureKind, Scenario, ScenarioCtx, ScenarioError};

/// What to run and how.
#[derive(Debug, Clone)]
pub struct RunOptions {
	pub base_url: String,
	pub wait: Wait,
	/// Name substrings; empty selects every scenario.
	pub filters: Vec<String>,
	pub fail_fast: bool,
	/// Run scenarios that register accounts.
	pub include_accounts: bool,
}

impl RunOptions {
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into(),
			wait: Wait::default(),
			filters: Vec::new(),
			fail_fast: false,
			include_accounts: true,
		}
	}

	fn matches(&self, scenario: &Scenario) -> bool {
		self.filters.is_empty() || self.filters.iter().any(|f| scenario.name.contains(f.as_str()))
	}
}

/// Outcome of one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
	Passed,
	Failed,
	Skipped,
}

/// Why a scenario failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
	pub kind: FailureKind,
	pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
	pub name: String,
	pub description: String,
	pub status: Status,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub failure: Option<Failure>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub skip_reason: Option<String>,
	pub duration_ms: u64,
}

impl ScenarioReport {
	fn skipped(scenario: &Scenario, reason: &str) -> Self {
		Self {
			name: scenario.name.to_string(),
			description: scenario.description.to_string(),
			status: Status::Skipped,
			failure: None,
			skip_reason: Some(reason.to_string()),
			duration_ms: 0,
		}
	}
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteReport {
	pub base_url: String,
	pub total: usize,
	pub passed: usize,
	pub failed: usize,
	pub skipped: usize,
	pub duration_ms: u64,
	pub scenarios: Vec<ScenarioReport>,
}

impl SuiteReport {
	pub fn all_passed(&self) -> bool {
		self.failed == 0
	}

	/// True when the run failed and every failure was a browser that never came up.
	pub fn all_failures_are_launch(&self) -> bool {
		self.failed > 0
			&& self
				.scenarios
				.iter()
				.filter(|s| s.status == Status::Failed)
				.all(|s| s.failure.as_ref().is_some_and(|f| f.kind == FailureKind::Launch))
	}
}

/// Scenarios selected by the filters, in list order.
pub fn select<'s>(scenarios: &'s [Scenario], options: &RunOptions) -> Vec<&'s Scenario> {
	scenarios.iter().filter(|s| options.matches(s)).collect()
}

/// Runs one scenario in its own session.
pub async fn run_scenario(provider: &dyn SessionProvider, scenario: &Scenario, base_url: &str, wait: Wait) -> ScenarioReport {
	info!(target = "authcheck", scenario = scenario.name, "starting scenario");
	let start = Instant::now();
	let run = scenario.run;
	let base_url: Arc<str> = Arc::from(base_url);

	let outcome = AssertUnwindSafe(scoped(provider, move |browser| run(ScenarioCtx::new(browser, base_url, wait))))
		.catch_unwind()
		.await;

	let result = match outcome {
		Ok(Ok(result)) => result,
		Ok(Err(launch)) => Err(ScenarioError::Launch(launch)),
		Err(panic) => Err(ScenarioError::Panicked(panic_message(panic.as_ref()))),
	};

	let duration_ms = start.elapsed().as_millis() as u64;
	let (status, failure) = match result {
		Ok(()) => {
			info!(target = "authcheck", scenario = scenario.name, duration_ms, "scenario passed");
			(Status::Passed, None)
		}
		Err(err) => {
			warn!(target = "authcheck", scenario = scenario.name, duration_ms, error = %err, "scenario failed");
			(
				Status::Failed,
				Some(Failure {
					kind: err.kind(),
					message: err.to_string(),
				}),
			)
		}
	};

	ScenarioReport {
		name: scenario.name.to_string(),
		description: scenario.description.to_string(),
		status,
		failure,
		skip_reason: None,
		duration_ms,
	}
}

/// Runs the selected scenarios one after another.
///
/// `on_result` sees each report as soon as its scenario finishes.
pub async fn run_suite(
	provider: &dyn SessionProvider,
	scenarios: &[Scenario],
	options: &RunOptions,
	mut on_result: impl FnMut(&ScenarioReport),
) -> SuiteReport {
	let start = Instant::now();
	let mut reports = Vec::new();
	let mut stop = false;

	for scenario in select(scenarios, options) {
		let report = if stop {
			ScenarioReport::skipped(scenario, "fail-fast")
		} else if scenario.creates_account && !options.include_accounts {
			ScenarioReport::skipped(scenario, "account scenarios disabled")
		} else {
			run_scenario(provider, scenario, &options.base_url, options.wait).await
		};

		if report.status == Status::Failed && options.fail_fast {
			stop = true;
		}
		on_result(&report);
		reports.push(report);
	}

	let count = |status: Status| reports.iter().filter(|r| r.status == status).count();
	SuiteReport {
		base_url: options.base_url.clone(),
		total: reports.len(),
		passed: count(Status::Passed),
		failed: count(Status::Failed),
		skipped: count(Status::Skipped),
		duration_ms: start.elapsed().as_millis() as u64,
		scenarios: reports,
	}
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&str>() {
		s.to_string()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		"non-string panic payload".to_string()
	}
}
