use authcheck::{BrowserLike, Locator, LocatorTable, Result, Wait, WaitOutcome};

use super::{EMAIL_INPUT, ERROR_MESSAGE, PASSWORD_INPUT, PageRef};

pub static SIGN_UP: LocatorTable = LocatorTable::new(
	"sign-up",
	&[
		("title", Locator::xpath("//h2[contains(text(), 'Sign Up')]")),
		("name", Locator::name("name")),
		("email", EMAIL_INPUT),
		("password", PASSWORD_INPUT),
		("confirm_password", Locator::name("confirmPassword")),
		("submit", Locator::xpath("//button[contains(text(), 'Sign Up')]")),
		("sign_in_link", Locator::xpath("//a[contains(text(), 'Sign In')]")),
		("error", ERROR_MESSAGE),
	],
);

/// The registration form at `/signup`.
#[derive(Clone, Copy)]
pub struct SignUpPage<'a> {
	page: PageRef<'a>,
}

impl<'a> SignUpPage<'a> {
	pub fn new(browser: &'a dyn BrowserLike) -> Self {
		Self::with_wait(browser, Wait::default())
	}

	pub fn with_wait(browser: &'a dyn BrowserLike, wait: Wait) -> Self {
		Self {
			page: PageRef::new(browser, &SIGN_UP, wait),
		}
	}

	pub async fn is_displayed(&self) -> bool {
		self.page.is_visible("title").await
	}

	pub async fn is_displayed_state(&self) -> Result<WaitOutcome<()>> {
		Ok(self.page.visible("title").await?.map(|_| ()))
	}

	/// True when all four inputs and the submit button are visible.
	pub async fn has_all_fields(&self) -> bool {
		self.page.all_visible(&["name", "email", "password", "confirm_password", "submit"]).await
	}

	pub async fn title(&self) -> Result<String> {
		self.page.title().await
	}

	pub async fn enter_name(&self, name: &str) -> Result<()> {
		self.page.fill("name", name).await
	}

	pub async fn enter_email(&self, email: &str) -> Result<()> {
		self.page.fill("email", email).await
	}

	pub async fn enter_password(&self, password: &str) -> Result<()> {
		self.page.fill("password", password).await
	}

	pub async fn enter_confirm_password(&self, password: &str) -> Result<()> {
		self.page.fill("confirm_password", password).await
	}

	pub async fn click_sign_up(&self) -> Result<()> {
		self.page.click("submit").await
	}

	pub async fn click_sign_in_link(&self) -> Result<()> {
		self.page.click("sign_in_link").await
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

	/// Fills the whole form and submits. Does not wait for the result.
	pub async fn sign_up(&self, name: &str, email: &str, password: &str, confirm_password: &str) -> Result<()> {
		self.enter_name(name).await?;
		self.enter_email(email).await?;
		self.enter_password(password).await?;
		self.enter_confirm_password(confirm_password).await?;
		self.click_sign_up().await
	}
}
