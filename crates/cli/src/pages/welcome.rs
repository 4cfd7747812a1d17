use authcheck::{BrowserLike, Locator, LocatorTable, Result, Wait, WaitOutcome};

use super::PageRef;

pub static WELCOME: LocatorTable = LocatorTable::new(
	"welcome",
	&[
		("title", Locator::xpath("//h1[contains(text(), 'Welcome')]")),
		// Positional over all value spans, not per parent.
		("user_name", Locator::xpath("(//span[@class='value'])[1]")),
		("user_email", Locator::xpath("(//span[@class='value'])[2]")),
		("logout", Locator::xpath("//button[contains(text(), 'Logout')]")),
	],
);

/// The authenticated landing screen at `/welcome`.
#[derive(Clone, Copy)]
pub struct WelcomePage<'a> {
	page: PageRef<'a>,
}

impl<'a> WelcomePage<'a> {
	pub fn new(browser: &'a dyn BrowserLike) -> Self {
		Self::with_wait(browser, Wait::default())
	}

	pub fn with_wait(browser: &'a dyn BrowserLike, wait: Wait) -> Self {
		Self {
			page: PageRef::new(browser, &WELCOME, wait),
		}
	}

	pub async fn is_displayed(&self) -> bool {
		self.page.is_visible("title").await
	}

	pub async fn is_displayed_state(&self) -> Result<WaitOutcome<()>> {
		Ok(self.page.visible("title").await?.map(|_| ()))
	}

	pub async fn title(&self) -> Result<String> {
		self.page.title().await
	}

	/// Greeting text. Fails if the greeting never appears.
	pub async fn welcome_message(&self) -> Result<String> {
		self.page.text("title").await
	}

	/// Displayed user name, or `""` if it never appears.
	pub async fn user_name(&self) -> String {
		self.page.text_or_empty("user_name").await
	}

	pub async fn user_name_state(&self) -> Result<WaitOutcome<String>> {
		self.page.text_state("user_name").await
	}

	/// Displayed email, read without waiting; `""` if absent.
	pub async fn user_email(&self) -> String {
		self.page.text_now("user_email").await.unwrap_or_default()
	}

	pub async fn click_logout(&self) -> Result<()> {
		self.page.click("logout").await
	}

	/// True when the greeting contains both "Welcome" and `name`.
	pub async fn welcome_message_contains_name(&self, name: &str) -> Result<bool> {
		let message = self.welcome_message().await?;
		Ok(message.contains("Welcome") && message.contains(name))
	}
}
