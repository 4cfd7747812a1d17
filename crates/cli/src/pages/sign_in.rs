use authcheck::{BrowserLike, Locator, LocatorTable, Result, Wait, WaitOutcome};

use super::{EMAIL_INPUT, ERROR_MESSAGE, PASSWORD_INPUT, PageRef};

pub static SIGN_IN: LocatorTable = LocatorTable::new(
	"sign-in",
	&[
		("title", Locator::xpath("//h2[contains(text(), 'Sign In')]")),
		("email", EMAIL_INPUT),
		("password", PASSWORD_INPUT),
		("submit", Locator::xpath("//button[contains(text(), 'Sign In')]")),
		("sign_up_link", Locator::xpath("//a[contains(text(), 'Sign Up')]")),
		("error", ERROR_MESSAGE),
	],
);

/// The sign-in form at `/signin`.
#[derive(Clone, Copy)]
pub struct SignInPage<'a> {
	page: PageRef<'a>,
}

impl<'a> SignInPage<'a> {
	pub fn new(browser: &'a dyn BrowserLike) -> Self {
		Self::with_wait(browser, Wait::default())
	}

	pub fn with_wait(browser: &'a dyn BrowserLike, wait: Wait) -> Self {
		Self {
			page: PageRef::new(browser, &SIGN_IN, wait),
		}
	}

	pub async fn is_displayed(&self) -> bool {
		self.page.is_visible("title").await
	}

	pub async fn is_displayed_state(&self) -> Result<WaitOutcome<()>> {
		Ok(self.page.visible("title").await?.map(|_| ()))
	}

	/// True when both inputs and the submit button are visible.
	pub async fn has_all_fields(&self) -> bool {
		self.page.all_visible(&["email", "password", "submit"]).await
	}

	pub async fn title(&self) -> Result<String> {
		self.page.title().await
	}

	pub async fn enter_email(&self, email: &str) -> Result<()> {
		self.page.fill("email", email).await
	}

	pub async fn enter_password(&self, password: &str) -> Result<()> {
		self.page.fill("password", password).await
	}

	pub async fn click_sign_in(&self) -> Result<()> {
		self.page.click("submit").await
	}

	pub async fn click_sign_up_link(&self) -> Result<()> {
		self.page.click("sign_up_link").await
	}

	/// Error banner text, or `""` if none appears within the budget.
	pub async fn error_message(&self) -> String {
		self.page.text_or_empty("error").await
	}

	pub async fn error_message_state(&self) -> Result<WaitOutcome<String>> {
		self.page.text_state("error").await
	}

	pub async fn is_error_message_displayed(&self) -> bool {
		self.page.is_visible("error").await
	}

	/// Fills both fields and submits. Does not wait for the result.
	pub async fn sign_in(&self, email: &str, password: &str) -> Result<()> {
		self.enter_email(email).await?;
		self.enter_password(password).await?;
		self.click_sign_in().await
	}
}
