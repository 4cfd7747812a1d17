//! In-memory model of the MERN auth front end for exercising facades and
//! scenarios without a browser.
//!
//! [`FixtureApp`] owns the account store (the backend) and hands out
//! [`MockBrowser`]s that each carry their own sign-in token (local storage).
//! Validation messages and their order follow the application's API.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use authcheck::testing::{FormValues, MockBrowser, MockElement, MockProvider, MockScreen, RouteOutcome, SubmitOutcome};
use authcheck::Locator;
use parking_lot::Mutex;

use crate::pages::{EMAIL_INPUT, ERROR_MESSAGE, PASSWORD_INPUT};

/// Document title served on every route.
pub const APP_TITLE: &str = "MERN Auth App";
pub const MIN_PASSWORD_LEN: usize = 6;

pub const MSG_ALL_FIELDS: &str = "All fields are required";
pub const MSG_PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const MSG_PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
pub const MSG_EMAIL_IN_USE: &str = "Email already in use";
pub const MSG_SIGN_IN_REQUIRED: &str = "Email and password are required";
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid email or password";

const HEADING: Locator = Locator::xpath("//h1[contains(text(), 'MERN Auth App')]");
const SIGN_IN_LINK: Locator = Locator::xpath("//a[contains(text(), 'Sign In')]");
const SIGN_UP_LINK: Locator = Locator::xpath("//a[contains(text(), 'Sign Up')]");
const SIGN_IN_TITLE: Locator = Locator::xpath("//h2[contains(text(), 'Sign In')]");
const SIGN_UP_TITLE: Locator = Locator::xpath("//h2[contains(text(), 'Sign Up')]");
const SIGN_IN_BUTTON: Locator = Locator::xpath("//button[contains(text(), 'Sign In')]");
const SIGN_UP_BUTTON: Locator = Locator::xpath("//button[contains(text(), 'Sign Up')]");
const NAME_INPUT: Locator = Locator::name("name");
const CONFIRM_INPUT: Locator = Locator::name("confirmPassword");
const WELCOME_TITLE: Locator = Locator::xpath("//h1[contains(text(), 'Welcome')]");
const USER_NAME: Locator = Locator::xpath("(//span[@class='value'])[1]");
const USER_EMAIL: Locator = Locator::xpath("(//span[@class='value'])[2]");
const LOGOUT_BUTTON: Locator = Locator::xpath("//button[contains(text(), 'Logout')]");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
	pub name: String,
	pub email: String,
	pub password: String,
}

/// Timing knobs for the fixture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delays {
	/// Between navigation and a screen's elements entering the DOM.
	pub render: Duration,
	/// Between submit and the error banner appearing.
	pub error: Duration,
	/// Profile fetch on the welcome screen.
	pub profile: Duration,
}

/// The application under test, modelled in memory.
#[derive(Clone, Default)]
pub struct FixtureApp {
	accounts: Arc<Mutex<HashMap<String, Account>>>,
	delays: Delays,
	/// Serves every screen with an empty document title.
	untitled: bool,
}

impl std::fmt::Debug for FixtureApp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FixtureApp")
			.field("accounts", &self.accounts.lock().len())
			.field("delays", &self.delays)
			.finish()
	}
}

impl FixtureApp {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_delays(mut self, delays: Delays) -> Self {
		self.delays = delays;
		self
	}

	pub fn with_render_delay(mut self, delay: Duration) -> Self {
		self.delays.render = delay;
		self
	}

	pub fn with_error_delay(mut self, delay: Duration) -> Self {
		self.delays.error = delay;
		self
	}

	pub fn with_profile_delay(mut self, delay: Duration) -> Self {
		self.delays.profile = delay;
		self
	}

	/// Serves an empty `<title>`, for exercising title checks.
	pub fn without_title(mut self) -> Self {
		self.untitled = true;
		self
	}

	/// Seeds an account directly in the store.
	pub fn add_account(&self, name: &str, email: &str, password: &str) {
		self.accounts.lock().insert(
			email.to_string(),
			Account {
				name: name.to_string(),
				email: email.to_string(),
				password: password.to_string(),
			},
		);
	}

	pub fn account(&self, email: &str) -> Option<Account> {
		self.accounts.lock().get(email).cloned()
	}

	pub fn account_count(&self) -> usize {
		self.accounts.lock().len()
	}

	/// A fresh browser with its own (empty) local storage.
	pub fn browser(&self) -> MockBrowser {
		let browser = MockBrowser::new();
		let tab = Tab {
			app: self.clone(),
			token: Arc::new(Mutex::new(None)),
		};

		let t = tab.clone();
		browser.route("/", move || RouteOutcome::render(t.home()));
		let t = tab.clone();
		browser.route("/signin", move || RouteOutcome::render(t.sign_in()));
		let t = tab.clone();
		browser.route("/signup", move || RouteOutcome::render(t.sign_up()));
		let t = tab;
		browser.route("/welcome", move || t.welcome());
		browser.fallback(|| RouteOutcome::redirect("/"));
		browser
	}

	/// Provider handing out one fixture browser per session.
	pub fn provider(&self) -> MockProvider {
		let app = self.clone();
		MockProvider::new(move || app.browser())
	}

	fn sign_up_outcome(&self, form: &FormValues) -> Result<Account, &'static str> {
		let (name, email, password, confirm) = (form.get("name"), form.get("email"), form.get("password"), form.get("confirmPassword"));
		if name.is_empty() || email.is_empty() || password.is_empty() || confirm.is_empty() {
			return Err(MSG_ALL_FIELDS);
		}
		if password != confirm {
			return Err(MSG_PASSWORD_MISMATCH);
		}
		if password.len() < MIN_PASSWORD_LEN {
			return Err(MSG_PASSWORD_TOO_SHORT);
		}
		let mut accounts = self.accounts.lock();
		if accounts.contains_key(email) {
			return Err(MSG_EMAIL_IN_USE);
		}
		let account = Account {
			name: name.to_string(),
			email: email.to_string(),
			password: password.to_string(),
		};
		accounts.insert(account.email.clone(), account.clone());
		Ok(account)
	}

	fn sign_in_outcome(&self, form: &FormValues) -> Result<Account, &'static str> {
		let (email, password) = (form.get("email"), form.get("password"));
		if email.is_empty() || password.is_empty() {
			return Err(MSG_SIGN_IN_REQUIRED);
		}
		match self.accounts.lock().get(email) {
			Some(account) if account.password == password => Ok(account.clone()),
			_ => Err(MSG_INVALID_CREDENTIALS),
		}
	}
}

/// One browser's view of the app: the shared store plus its own token.
#[derive(Clone)]
struct Tab {
	app: FixtureApp,
	/// Email of the signed-in account.
	token: Arc<Mutex<Option<String>>>,
}

impl Tab {
	fn screen(&self) -> MockScreen {
		MockScreen::new(if self.app.untitled { "" } else { APP_TITLE })
	}

	fn rendered(&self, element: MockElement) -> MockElement {
		element.appear_after(self.app.delays.render)
	}

	fn error_banner(&self, message: &str) -> SubmitOutcome {
		SubmitOutcome::Show(
			MockElement::new("error", ERROR_MESSAGE)
				.text(message)
				.appear_after(self.app.delays.error),
		)
	}

	fn home(&self) -> MockScreen {
		self.screen()
			.element(self.rendered(MockElement::new("heading", HEADING).text(APP_TITLE)))
			.element(self.rendered(MockElement::new("sign_in", SIGN_IN_LINK).text("Sign In").navigates_to("/signin")))
			.element(self.rendered(MockElement::new("sign_up", SIGN_UP_LINK).text("Sign Up").navigates_to("/signup")))
	}

	fn sign_in(&self) -> MockScreen {
		let tab = self.clone();
		let submit = MockElement::new("submit", SIGN_IN_BUTTON).text("Sign In").on_submit(move |form| {
			match tab.app.sign_in_outcome(form) {
				Ok(account) => {
					*tab.token.lock() = Some(account.email);
					SubmitOutcome::Navigate("/welcome".into())
				}
				Err(message) => tab.error_banner(message),
			}
		});

		self.screen()
			.element(self.rendered(MockElement::new("title", SIGN_IN_TITLE).text("Sign In")))
			.element(self.rendered(MockElement::new("email", EMAIL_INPUT)))
			.element(self.rendered(MockElement::new("password", PASSWORD_INPUT)))
			.element(self.rendered(submit))
			.element(self.rendered(MockElement::new("sign_up_link", SIGN_UP_LINK).text("Sign Up").navigates_to("/signup")))
	}

	fn sign_up(&self) -> MockScreen {
		let tab = self.clone();
		let submit = MockElement::new("submit", SIGN_UP_BUTTON).text("Sign Up").on_submit(move |form| {
			match tab.app.sign_up_outcome(form) {
				Ok(account) => {
					*tab.token.lock() = Some(account.email);
					SubmitOutcome::Navigate("/welcome".into())
				}
				Err(message) => tab.error_banner(message),
			}
		});

		self.screen()
			.element(self.rendered(MockElement::new("title", SIGN_UP_TITLE).text("Sign Up")))
			.element(self.rendered(MockElement::new("name", NAME_INPUT)))
			.element(self.rendered(MockElement::new("email", EMAIL_INPUT)))
			.element(self.rendered(MockElement::new("password", PASSWORD_INPUT)))
			.element(self.rendered(MockElement::new("confirmPassword", CONFIRM_INPUT)))
			.element(self.rendered(submit))
			.element(self.rendered(MockElement::new("sign_in_link", SIGN_IN_LINK).text("Sign In").navigates_to("/signin")))
	}

	/// Redirects to Sign In without a token; otherwise shows the profile once loaded.
	fn welcome(&self) -> RouteOutcome {
		let account = self.token.lock().clone().and_then(|email| self.app.account(&email));
		let Some(account) = account else {
			return RouteOutcome::redirect("/signin");
		};

		let loaded = |element: MockElement| element.appear_after(self.app.delays.render + self.app.delays.profile);
		let token = self.token.clone();
		let logout = MockElement::new("logout", LOGOUT_BUTTON).text("Logout").on_submit(move |_| {
			*token.lock() = None;
			SubmitOutcome::Navigate("/signin".into())
		});

		RouteOutcome::render(
			self.screen()
				.element(loaded(MockElement::new("title", WELCOME_TITLE).text(format!("Welcome {}!", account.name))))
				.element(loaded(MockElement::new("user_name", USER_NAME).text(account.name)))
				.element(loaded(MockElement::new("user_email", USER_EMAIL).text(account.email)))
				.element(loaded(logout)),
		)
	}
}
