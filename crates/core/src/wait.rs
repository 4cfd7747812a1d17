//! Condition-polling waits.
//!
//! [`Wait::until`] re-runs a probe until it reports [`Probe::Ready`] or the
//! budget elapses. The probe always runs at least once and once more at the
//! deadline, so a condition that holds exactly at the budget is still met.

use std::future::Future;
use std::time::Duration;

use authcheck_protocol::ElementRef;
use authcheck_runtime::{Error, Result};
use tokio::time::Instant;
use tracing::trace;

use crate::browser::BrowserLike;
use crate::locator::Locator;

/// Budget used by page facades unless configured otherwise.
pub const DEFAULT_WAIT_BUDGET: Duration = Duration::from_secs(10);

/// Pause between probes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Result of a single probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<T> {
	/// Condition holds.
	Ready(T),
	/// The subject exists but the condition does not hold yet.
	Pending,
	/// The subject does not exist.
	Missing,
}

/// Result of a whole wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome<T> {
	/// The condition held; carries the probed value.
	Met(T),
	/// The subject was seen at least once but the condition never held.
	TimedOut { waited: Duration },
	/// The subject never appeared.
	Absent { waited: Duration },
}

impl<T> WaitOutcome<T> {
	pub fn is_met(&self) -> bool {
		matches!(self, WaitOutcome::Met(_))
	}

	pub fn into_option(self) -> Option<T> {
		match self {
			WaitOutcome::Met(value) => Some(value),
			_ => None,
		}
	}

	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> WaitOutcome<U> {
		match self {
			WaitOutcome::Met(value) => WaitOutcome::Met(f(value)),
			WaitOutcome::TimedOut { waited } => WaitOutcome::TimedOut { waited },
			WaitOutcome::Absent { waited } => WaitOutcome::Absent { waited },
		}
	}

	/// Converts a failed wait into [`Error::ElementNotFoundWithinTimeout`].
	pub fn or_not_found(self, locator: &Locator) -> Result<T> {
		match self {
			WaitOutcome::Met(value) => Ok(value),
			WaitOutcome::TimedOut { waited } | WaitOutcome::Absent { waited } => Err(Error::ElementNotFoundWithinTimeout {
				locator: locator.to_string(),
				timeout_ms: waited.as_millis() as u64,
			}),
		}
	}
}

/// Polling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wait {
	pub timeout: Duration,
	pub poll_interval: Duration,
}

impl Default for Wait {
	fn default() -> Self {
		Self {
			timeout: DEFAULT_WAIT_BUDGET,
			poll_interval: DEFAULT_POLL_INTERVAL,
		}
	}
}

impl Wait {
	pub fn new(timeout: Duration) -> Self {
		Self {
			timeout,
			..Self::default()
		}
	}

	pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
		self.poll_interval = poll_interval;
		self
	}

	/// Polls `probe` until it is ready or the budget elapses.
	///
	/// Stale-element errors count as [`Probe::Pending`] and no-such-element
	/// errors as [`Probe::Missing`]; any other error aborts the wait.
	pub async fn until<T, F, Fut>(&self, mut probe: F) -> Result<WaitOutcome<T>>
	where
		F: FnMut() -> Fut,
		Fut: Future<Output = Result<Probe<T>>>,
	{
		let start = Instant::now();
		let deadline = start + self.timeout;
		let mut seen = false;

		loop {
			match probe().await {
				Ok(Probe::Ready(value)) => return Ok(WaitOutcome::Met(value)),
				Ok(Probe::Pending) => seen = true,
				Ok(Probe::Missing) => {}
				Err(err) if err.is_stale_element() => seen = true,
				Err(err) if err.is_no_such_element() => {}
				Err(err) => return Err(err),
			}

			let now = Instant::now();
			if now >= deadline {
				let waited = now - start;
				trace!(target = "authcheck", waited_ms = waited.as_millis() as u64, seen, "wait elapsed");
				return Ok(if seen {
					WaitOutcome::TimedOut { waited }
				} else {
					WaitOutcome::Absent { waited }
				});
			}
			tokio::time::sleep(self.poll_interval.min(deadline - now)).await;
		}
	}

	/// Waits until the first element matching `locator` is displayed.
	pub async fn visible(&self, browser: &dyn BrowserLike, locator: &Locator) -> Result<WaitOutcome<ElementRef>> {
		self.until(move || probe_visible(browser, locator)).await
	}

	/// Waits until the first element matching `locator` is displayed and enabled.
	pub async fn clickable(&self, browser: &dyn BrowserLike, locator: &Locator) -> Result<WaitOutcome<ElementRef>> {
		self.until(move || probe_clickable(browser, locator)).await
	}

	/// Waits until at least one element matches `locator`.
	pub async fn present(&self, browser: &dyn BrowserLike, locator: &Locator) -> Result<WaitOutcome<ElementRef>> {
		self.until(move || probe_present(browser, locator)).await
	}
}

async fn probe_present(browser: &dyn BrowserLike, locator: &Locator) -> Result<Probe<ElementRef>> {
	Ok(match browser.find_elements(locator).await?.into_iter().next() {
		Some(element) => Probe::Ready(element),
		None => Probe::Missing,
	})
}

async fn probe_visible(browser: &dyn BrowserLike, locator: &Locator) -> Result<Probe<ElementRef>> {
	let Some(element) = browser.find_elements(locator).await?.into_iter().next() else {
		return Ok(Probe::Missing);
	};
	Ok(if browser.is_displayed(&element).await? {
		Probe::Ready(element)
	} else {
		Probe::Pending
	})
}

async fn probe_clickable(browser: &dyn BrowserLike, locator: &Locator) -> Result<Probe<ElementRef>> {
	let Some(element) = browser.find_elements(locator).await?.into_iter().next() else {
		return Ok(Probe::Missing);
	};
	Ok(if browser.is_displayed(&element).await? && browser.is_enabled(&element).await? {
		Probe::Ready(element)
	} else {
		Probe::Pending
	})
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};

	use authcheck_protocol::ErrorCode;

	use super::*;

	fn counting() -> Arc<AtomicUsize> {
		Arc::new(AtomicUsize::new(0))
	}

	#[tokio::test(start_paused = true)]
	async fn ready_on_first_probe_returns_immediately() {
		let calls = counting();
		let c = calls.clone();
		let start = Instant::now();
		let outcome = Wait::default()
			.until(move || {
				c.fetch_add(1, Ordering::SeqCst);
				async { Ok(Probe::Ready(7)) }
			})
			.await
			.unwrap();
		assert_eq!(outcome, WaitOutcome::Met(7));
		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert_eq!(Instant::now(), start);
	}

	#[tokio::test(start_paused = true)]
	async fn missing_subject_is_absent_after_budget() {
		let calls = counting();
		let c = calls.clone();
		let wait = Wait::new(Duration::from_secs(2));
		let outcome = wait
			.until(move || {
				c.fetch_add(1, Ordering::SeqCst);
				async { Ok(Probe::<()>::Missing) }
			})
			.await
			.unwrap();
		assert_eq!(outcome, WaitOutcome::Absent { waited: Duration::from_secs(2) });
		// t = 0, 0.5, 1.0, 1.5, 2.0
		assert_eq!(calls.load(Ordering::SeqCst), 5);
	}

	#[tokio::test(start_paused = true)]
	async fn pending_subject_times_out() {
		let outcome = Wait::new(Duration::from_millis(700))
			.until(|| async { Ok(Probe::<()>::Pending) })
			.await
			.unwrap();
		assert_eq!(outcome, WaitOutcome::TimedOut { waited: Duration::from_millis(700) });
	}

	#[tokio::test(start_paused = true)]
	async fn condition_met_midway() {
		let start = Instant::now();
		let outcome = Wait::default()
			.until(move || async move {
				if start.elapsed() >= Duration::from_secs(3) {
					Ok(Probe::Ready("done"))
				} else {
					Ok(Probe::Pending)
				}
			})
			.await
			.unwrap();
		assert_eq!(outcome, WaitOutcome::Met("done"));
		assert_eq!(start.elapsed(), Duration::from_secs(3));
	}

	#[tokio::test(start_paused = true)]
	async fn zero_budget_probes_once() {
		let calls = counting();
		let c = calls.clone();
		let outcome = Wait::new(Duration::ZERO)
			.until(move || {
				c.fetch_add(1, Ordering::SeqCst);
				async { Ok(Probe::<()>::Missing) }
			})
			.await
			.unwrap();
		assert!(!outcome.is_met());
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn stale_errors_keep_polling_and_other_errors_abort() {
		let outcome = Wait::new(Duration::from_secs(1))
			.until(|| async { Err::<Probe<()>, _>(Error::remote(ErrorCode::StaleElementReference, "gone")) })
			.await
			.unwrap();
		assert!(matches!(outcome, WaitOutcome::TimedOut { .. }));

		let err = Wait::new(Duration::from_secs(1))
			.until(|| async { Err::<Probe<()>, _>(Error::SessionClosed("find".into())) })
			.await
			.unwrap_err();
		assert!(matches!(err, Error::SessionClosed(_)));
	}

	#[test]
	fn or_not_found_reports_locator_and_budget() {
		let outcome: WaitOutcome<()> = WaitOutcome::Absent { waited: Duration::from_secs(10) };
		let err = outcome.or_not_found(&Locator::name("email")).unwrap_err();
		assert_eq!(err.to_string(), "Element not found within 10000ms: name=email");
		assert!(err.is_timeout());
	}
}
