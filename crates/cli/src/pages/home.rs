use authcheck::{BrowserLike, Locator, LocatorTable, Result, Wait, WaitOutcome};

use super::PageRef;

pub static HOME: LocatorTable = LocatorTable::new(
	"home",
	&[
		("heading", Locator::xpath("//h1[contains(text(), 'MERN Auth App')]")),
		("sign_in_button", Locator::xpath("//a[contains(text(), 'Sign In')]")),
		("sign_up_button", Locator::xpath("//a[contains(text(), 'Sign Up')]")),
	],
);

/// The landing screen at `/`.
#[derive(Clone, Copy)]
pub struct HomePage<'a> {
	page: PageRef<'a>,
}

impl<'a> HomePage<'a> {
	pub fn new(browser: &'a dyn BrowserLike) -> Self {
		Self::with_wait(browser, Wait::default())
	}

	pub fn with_wait(browser: &'a dyn BrowserLike, wait: Wait) -> Self {
		Self {
			page: PageRef::new(browser, &HOME, wait),
		}
	}

	pub async fn is_displayed(&self) -> bool {
		self.page.is_visible("heading").await
	}

	pub async fn is_displayed_state(&self) -> Result<WaitOutcome<()>> {
		Ok(self.page.visible("heading").await?.map(|_| ()))
	}

	pub async fn heading_text(&self) -> Result<String> {
		self.page.text("heading").await
	}

	pub async fn title(&self) -> Result<String> {
		self.page.title().await
	}

	pub async fn click_sign_in(&self) -> Result<()> {
		self.page.click("sign_in_button").await
	}

	pub async fn click_sign_up(&self) -> Result<()> {
		self.page.click("sign_up_button").await
	}
}
