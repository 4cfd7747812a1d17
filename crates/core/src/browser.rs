//! The [`BrowserLike`] seam between page facades and a browser session.
//!
//! [`Session`](crate::Session) implements it over WebDriver;
//! [`MockBrowser`](crate::testing::MockBrowser) implements it in memory.

use async_trait::async_trait;
use authcheck_protocol::ElementRef;
use authcheck_runtime::Result;

use crate::locator::Locator;

/// Operations the suite performs against one browser session.
#[async_trait]
pub trait BrowserLike: Send + Sync {
	/// Navigates the active tab to `url`.
	async fn goto(&self, url: &str) -> Result<()>;

	async fn current_url(&self) -> Result<String>;

	/// Returns the document title.
	async fn title(&self) -> Result<String>;

	/// Returns every element currently matching `locator`, in document order.
	async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>>;

	async fn is_displayed(&self, element: &ElementRef) -> Result<bool>;

	async fn is_enabled(&self, element: &ElementRef) -> Result<bool>;

	/// Returns the rendered text of `element`.
	async fn text(&self, element: &ElementRef) -> Result<String>;

	/// Clears an editable element.
	async fn clear(&self, element: &ElementRef) -> Result<()>;

	/// Types `text` into `element` verbatim.
	async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()>;

	async fn click(&self, element: &ElementRef) -> Result<()>;

	async fn maximize_window(&self) -> Result<()>;

	/// Ends the session. Calling it again is a no-op.
	async fn release(&self) -> Result<()>;
}
