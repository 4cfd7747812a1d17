//! The scripted end-to-end scenarios.
//!
//! Each [`Scenario`] is a plain function from a [`ScenarioCtx`] to a boxed
//! future. The runner hands every scenario a fresh session; scenarios only
//! sequence page-facade calls and check what they observe.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use authcheck::{BoxFut, BrowserLike, Wait};
use thiserror::Error;
use tracing::debug;

use crate::pages::{HomePage, SignInPage, SignUpPage, WelcomePage};

/// Fails the scenario with an assertion error unless `cond` holds.
macro_rules! check {
	($cond:expr, $($msg:tt)+) => {
		if !$cond {
			return Err($crate::scenarios::ScenarioError::Assertion(format!($($msg)+)));
		}
	};
}

/// Fails the scenario unless both sides are equal, reporting both values.
macro_rules! check_eq {
	($left:expr, $right:expr, $($msg:tt)+) => {{
		let (left, right) = (&$left, &$right);
		if left != right {
			return Err($crate::scenarios::ScenarioError::Assertion(format!(
				"{}: expected {:?}, got {:?}",
				format_args!($($msg)+),
				right,
				left
			)));
		}
	}};
}

mod accounts;
mod forms;
mod navigation;

/// Why a scenario failed.
#[derive(Debug, Error)]
pub enum ScenarioError {
	#[error("assertion failed: {0}")]
	Assertion(String),

	#[error("driver error: {0}")]
	Driver(#[from] authcheck::Error),

	#[error("browser launch failed: {0}")]
	Launch(authcheck::Error),

	#[error("scenario panicked: {0}")]
	Panicked(String),
}

impl ScenarioError {
	/// Short machine-readable failure kind.
	pub fn kind(&self) -> FailureKind {
		match self {
			ScenarioError::Assertion(_) => FailureKind::Assertion,
			ScenarioError::Driver(err) if err.is_timeout() => FailureKind::Timeout,
			ScenarioError::Driver(_) => FailureKind::Driver,
			ScenarioError::Launch(_) => FailureKind::Launch,
			ScenarioError::Panicked(_) => FailureKind::Panic,
		}
	}
}

/// Failure category carried into reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
	Assertion,
	Timeout,
	Driver,
	Launch,
	Panic,
}

pub type ScenarioResult = Result<(), ScenarioError>;

/// Entry point of one scenario.
pub type ScenarioFn = for<'a> fn(ScenarioCtx<'a>) -> BoxFut<'a, ScenarioResult>;

/// A named scenario.
#[derive(Clone, Copy)]
pub struct Scenario {
	pub name: &'static str,
	pub description: &'static str,
	/// Registers a new account in the application under test.
	pub creates_account: bool,
	pub run: ScenarioFn,
}

impl std::fmt::Debug for Scenario {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Scenario")
			.field("name", &self.name)
			.field("creates_account", &self.creates_account)
			.finish()
	}
}

/// What a scenario gets to work with.
#[derive(Clone)]
pub struct ScenarioCtx<'a> {
	pub browser: &'a dyn BrowserLike,
	pub base_url: Arc<str>,
	pub wait: Wait,
}

impl<'a> ScenarioCtx<'a> {
	pub fn new(browser: &'a dyn BrowserLike, base_url: impl Into<Arc<str>>, wait: Wait) -> Self {
		Self {
			browser,
			base_url: base_url.into(),
			wait,
		}
	}

	/// Absolute URL for an application path.
	pub fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url.trim_end_matches('/'), path)
	}

	/// Navigates to an application path such as `/signin`.
	pub async fn open(&self, path: &str) -> ScenarioResult {
		let url = self.url(path);
		debug!(target = "authcheck", %url, "open");
		self.browser.goto(&url).await?;
		Ok(())
	}

	pub fn home(&self) -> HomePage<'a> {
		HomePage::with_wait(self.browser, self.wait)
	}

	pub fn sign_in(&self) -> SignInPage<'a> {
		SignInPage::with_wait(self.browser, self.wait)
	}

	pub fn sign_up(&self) -> SignUpPage<'a> {
		SignUpPage::with_wait(self.browser, self.wait)
	}

	pub fn welcome(&self) -> WelcomePage<'a> {
		WelcomePage::with_wait(self.browser, self.wait)
	}
}

/// Every scenario, in run order.
pub static SCENARIOS: &[Scenario] = &[
	Scenario {
		name: "home_page_displayed",
		description: "Home page displays correctly",
		creates_account: false,
		run: navigation::home_page_displayed,
	},
	Scenario {
		name: "sign_in_button_navigation",
		description: "Sign In button on Home opens the Sign In page",
		creates_account: false,
		run: navigation::sign_in_button_navigation,
	},
	Scenario {
		name: "sign_up_button_navigation",
		description: "Sign Up button on Home opens the Sign Up page",
		creates_account: false,
		run: navigation::sign_up_button_navigation,
	},
	Scenario {
		name: "sign_up_page_fields",
		description: "Sign Up page has all required fields",
		creates_account: false,
		run: navigation::sign_up_page_fields,
	},
	Scenario {
		name: "sign_in_page_fields",
		description: "Sign In page has all required fields",
		creates_account: false,
		run: navigation::sign_in_page_fields,
	},
	Scenario {
		name: "sign_in_invalid_credentials",
		description: "Sign In with invalid credentials shows an error message",
		creates_account: false,
		run: forms::sign_in_invalid_credentials,
	},
	Scenario {
		name: "sign_up_mismatched_passwords",
		description: "Sign Up with mismatched passwords shows an error",
		creates_account: false,
		run: forms::sign_up_mismatched_passwords,
	},
	Scenario {
		name: "sign_up_short_password",
		description: "Sign Up with a password shorter than 6 characters shows an error",
		creates_account: false,
		run: forms::sign_up_short_password,
	},
	Scenario {
		name: "sign_in_links_to_sign_up",
		description: "Sign In page links to Sign Up",
		creates_account: false,
		run: navigation::sign_in_links_to_sign_up,
	},
	Scenario {
		name: "sign_up_links_to_sign_in",
		description: "Sign Up page links to Sign In",
		creates_account: false,
		run: navigation::sign_up_links_to_sign_in,
	},
	Scenario {
		name: "sign_in_page_title",
		description: "Sign In page title contains MERN",
		creates_account: false,
		run: navigation::sign_in_page_title,
	},
	Scenario {
		name: "sign_up_page_title",
		description: "Sign Up page title contains MERN",
		creates_account: false,
		run: navigation::sign_up_page_title,
	},
	Scenario {
		name: "register_lands_on_welcome",
		description: "Registering with valid data lands on Welcome with the user's name and email",
		creates_account: true,
		run: accounts::register_lands_on_welcome,
	},
	Scenario {
		name: "logout_then_sign_in",
		description: "A registered user logs out and signs back in",
		creates_account: true,
		run: accounts::logout_then_sign_in,
	},
];

/// Looks a scenario up by exact name.
pub fn find(name: &str) -> Option<&'static Scenario> {
	SCENARIOS.iter().find(|s| s.name == name)
}

/// Email address no earlier run has used.
pub fn unique_email() -> String {
	static COUNTER: AtomicU32 = AtomicU32::new(0);
	let millis = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis()).unwrap_or_default();
	let n = COUNTER.fetch_add(1, Ordering::Relaxed);
	format!("authcheck.{millis}.{n}@example.com")
}
