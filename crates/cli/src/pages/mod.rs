//! Page facades for the four authentication screens.
//!
//! Each facade borrows a live browser and binds it to that screen's static
//! [`LocatorTable`] through a [`PageRef`]. Facades hold no other state, so
//! they are cheap to recreate for every step.

mod home;
mod sign_in;
mod sign_up;
mod welcome;

use authcheck::{BrowserLike, ElementRef, Locator, LocatorTable, Result, Wait, WaitOutcome};
use tracing::debug;

pub use home::{HOME, HomePage};
pub use sign_in::{SIGN_IN, SignInPage};
pub use sign_up::{SIGN_UP, SignUpPage};
pub use welcome::{WELCOME, WelcomePage};

/// Email input on the sign-in and sign-up forms.
pub const EMAIL_INPUT: Locator = Locator::name("email");
/// Password input on the sign-in and sign-up forms.
pub const PASSWORD_INPUT: Locator = Locator::name("password");
/// Validation or server error banner on either form.
pub const ERROR_MESSAGE: Locator = Locator::class_name("error-message");

/// A browser bound to one screen's locators and a wait budget.
#[derive(Clone, Copy)]
pub struct PageRef<'a> {
	browser: &'a dyn BrowserLike,
	table: &'static LocatorTable,
	wait: Wait,
}

impl<'a> PageRef<'a> {
	pub fn new(browser: &'a dyn BrowserLike, table: &'static LocatorTable, wait: Wait) -> Self {
		Self { browser, table, wait }
	}

	/// Waits for the named element to be displayed.
	pub async fn visible(&self, name: &str) -> Result<WaitOutcome<ElementRef>> {
		let locator = self.table.get(name)?;
		self.wait.visible(self.browser, &locator).await
	}

	/// Like [`visible`](Self::visible), folded to a boolean. Driver errors
	/// count as "not visible".
	pub async fn is_visible(&self, name: &str) -> bool {
		match self.visible(name).await {
			Ok(outcome) => outcome.is_met(),
			Err(err) => {
				debug!(target = "authcheck", screen = self.table.screen, element = name, error = %err, "visibility check failed");
				false
			}
		}
	}

	/// True when every named element becomes visible within the budget.
	pub async fn all_visible(&self, names: &[&str]) -> bool {
		for name in names {
			if !self.is_visible(name).await {
				return false;
			}
		}
		true
	}

	/// Waits until the element is interactable, clears it, and types `text`.
	pub async fn fill(&self, name: &str, text: &str) -> Result<()> {
		let locator = self.table.get(name)?;
		let element = self.wait.clickable(self.browser, &locator).await?.or_not_found(&locator)?;
		debug!(target = "authcheck", screen = self.table.screen, element = name, "fill");
		self.browser.clear(&element).await?;
		self.browser.send_keys(&element, text).await
	}

	/// Waits until the element is clickable and clicks it once.
	pub async fn click(&self, name: &str) -> Result<()> {
		let locator = self.table.get(name)?;
		let element = self.wait.clickable(self.browser, &locator).await?.or_not_found(&locator)?;
		debug!(target = "authcheck", screen = self.table.screen, element = name, "click");
		self.browser.click(&element).await
	}

	/// Waits for the element and reads its text.
	pub async fn text_state(&self, name: &str) -> Result<WaitOutcome<String>> {
		Ok(match self.visible(name).await? {
			WaitOutcome::Met(element) => WaitOutcome::Met(self.browser.text(&element).await?),
			WaitOutcome::TimedOut { waited } => WaitOutcome::TimedOut { waited },
			WaitOutcome::Absent { waited } => WaitOutcome::Absent { waited },
		})
	}

	/// Waits for the element and reads its text; a timeout is an error.
	pub async fn text(&self, name: &str) -> Result<String> {
		let locator = self.table.get(name)?;
		self.text_state(name).await?.or_not_found(&locator)
	}

	/// Waits for the element and reads its text; `""` on timeout or error.
	pub async fn text_or_empty(&self, name: &str) -> String {
		match self.text_state(name).await {
			Ok(WaitOutcome::Met(text)) => text,
			_ => String::new(),
		}
	}

	/// Reads the element's text without waiting; `""` if it is not present.
	pub async fn text_now(&self, name: &str) -> Result<String> {
		let locator = self.table.get(name)?;
		match self.browser.find_elements(&locator).await?.first() {
			Some(element) => self.browser.text(element).await,
			None => Ok(String::new()),
		}
	}

	pub async fn title(&self) -> Result<String> {
		self.browser.title().await
	}
}
