//! In-memory browser for testing page facades and scenarios without a driver.
//!
//! [`MockBrowser`] models just enough of a browser for the suite: routes that
//! render screens (or redirect), elements that appear after a delay, click and
//! form-submit effects, typed values, and stale element references after
//! navigation. Every interaction is recorded as a [`MockAction`].
//!
//! ```ignore
//! let browser = MockBrowser::new();
//! browser.route("/", || RouteOutcome::render(
//!     MockScreen::new("MERN Auth App")
//!         .element(MockElement::new("heading", Locator::xpath("//h1")).text("MERN Auth App")),
//! ));
//! browser.goto("http://localhost:3000/").await?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use authcheck_protocol::{ElementRef, ErrorCode};
use authcheck_runtime::{Error, Result};
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::browser::BrowserLike;
use crate::locator::Locator;
use crate::session::SessionProvider;

const MAX_REDIRECTS: usize = 10;

type RouteFn = Arc<dyn Fn() -> RouteOutcome + Send + Sync>;
type SubmitFn = Arc<dyn Fn(&FormValues) -> SubmitOutcome + Send + Sync>;

/// What a route does when visited.
#[derive(Debug, Clone)]
pub enum RouteOutcome {
	Render(MockScreen),
	/// Client-side redirect to another path.
	Redirect(String),
}

impl RouteOutcome {
	pub fn render(screen: MockScreen) -> Self {
		RouteOutcome::Render(screen)
	}

	pub fn redirect(path: impl Into<String>) -> Self {
		RouteOutcome::Redirect(path.into())
	}
}

/// A rendered document: title plus elements.
#[derive(Debug, Clone, Default)]
pub struct MockScreen {
	pub title: String,
	pub elements: Vec<MockElement>,
}

impl MockScreen {
	pub fn new(title: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			elements: Vec::new(),
		}
	}

	pub fn element(mut self, element: MockElement) -> Self {
		self.elements.push(element);
		self
	}
}

/// Effect of clicking an element.
#[derive(Clone)]
pub enum ClickEffect {
	/// Navigate to a path on the current origin.
	Navigate(String),
	/// Submit the current form values.
	Submit(SubmitFn),
}

impl fmt::Debug for ClickEffect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ClickEffect::Navigate(path) => f.debug_tuple("Navigate").field(path).finish(),
			ClickEffect::Submit(_) => f.write_str("Submit(..)"),
		}
	}
}

/// Result of a form submission.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
	Navigate(String),
	/// Add (or replace, by key) an element on the current screen. Its
	/// `appear_after` counts from the moment of submission.
	Show(MockElement),
	Nothing,
}

/// Values typed into the current screen, keyed by element key.
#[derive(Debug, Clone, Default)]
pub struct FormValues(HashMap<String, String>);

impl FormValues {
	/// Returns the value typed into `key`, or `""`.
	pub fn get(&self, key: &str) -> &str {
		self.0.get(key).map(String::as_str).unwrap_or("")
	}
}

/// An element on a [`MockScreen`].
#[derive(Debug, Clone)]
pub struct MockElement {
	pub key: String,
	pub locator: Locator,
	pub text: String,
	pub hidden: bool,
	pub disabled: bool,
	/// Delay between render and the element entering the DOM.
	pub appear_after: Duration,
	pub on_click: Option<ClickEffect>,
}

impl MockElement {
	pub fn new(key: impl Into<String>, locator: Locator) -> Self {
		Self {
			key: key.into(),
			locator,
			text: String::new(),
			hidden: false,
			disabled: false,
			appear_after: Duration::ZERO,
			on_click: None,
		}
	}

	pub fn text(mut self, text: impl Into<String>) -> Self {
		self.text = text.into();
		self
	}

	pub fn hidden(mut self) -> Self {
		self.hidden = true;
		self
	}

	pub fn disabled(mut self) -> Self {
		self.disabled = true;
		self
	}

	pub fn appear_after(mut self, delay: Duration) -> Self {
		self.appear_after = delay;
		self
	}

	pub fn navigates_to(mut self, path: impl Into<String>) -> Self {
		self.on_click = Some(ClickEffect::Navigate(path.into()));
		self
	}

	pub fn on_submit<F>(mut self, f: F) -> Self
	where
		F: Fn(&FormValues) -> SubmitOutcome + Send + Sync + 'static,
	{
		self.on_click = Some(ClickEffect::Submit(Arc::new(f)));
		self
	}
}

/// Recorded interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockAction {
	Goto(String),
	Click(String),
	Clear(String),
	SendKeys { key: String, text: String },
	Maximize,
	Release,
}

struct Rendered {
	element: MockElement,
	present_from: Instant,
}

struct MockState {
	routes: HashMap<String, RouteFn>,
	fallback: Option<RouteFn>,
	origin: String,
	path: String,
	title: String,
	generation: u64,
	elements: Vec<Rendered>,
	values: HashMap<String, String>,
	actions: Vec<MockAction>,
	released: bool,
}

struct Inner {
	state: Mutex<MockState>,
	release_calls: AtomicUsize,
}

/// In-memory [`BrowserLike`]. Cloning yields another handle to the same browser.
#[derive(Clone)]
pub struct MockBrowser {
	inner: Arc<Inner>,
}

impl Default for MockBrowser {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for MockBrowser {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.inner.state.lock();
		f.debug_struct("MockBrowser")
			.field("url", &format!("{}{}", state.origin, state.path))
			.field("generation", &state.generation)
			.field("released", &state.released)
			.finish()
	}
}

impl MockBrowser {
	/// Creates a browser on a blank page with no routes.
	pub fn new() -> Self {
		Self {
			inner: Arc::new(Inner {
				state: Mutex::new(MockState {
					routes: HashMap::new(),
					fallback: None,
					origin: String::new(),
					path: String::new(),
					title: String::new(),
					generation: 0,
					elements: Vec::new(),
					values: HashMap::new(),
					actions: Vec::new(),
					released: false,
				}),
				release_calls: AtomicUsize::new(0),
			}),
		}
	}

	/// Registers a route for an exact path.
	pub fn route<F>(&self, path: impl Into<String>, f: F) -> &Self
	where
		F: Fn() -> RouteOutcome + Send + Sync + 'static,
	{
		self.inner.state.lock().routes.insert(path.into(), Arc::new(f));
		self
	}

	/// Registers the route used for paths with no exact match.
	pub fn fallback<F>(&self, f: F) -> &Self
	where
		F: Fn() -> RouteOutcome + Send + Sync + 'static,
	{
		self.inner.state.lock().fallback = Some(Arc::new(f));
		self
	}

	pub fn actions(&self) -> Vec<MockAction> {
		self.inner.state.lock().actions.clone()
	}

	/// Current path, without the origin.
	pub fn path(&self) -> String {
		self.inner.state.lock().path.clone()
	}

	/// Value typed into the element with `key` on the current screen.
	pub fn value_of(&self, key: &str) -> String {
		self.inner.state.lock().values.get(key).cloned().unwrap_or_default()
	}

	pub fn is_released(&self) -> bool {
		self.inner.state.lock().released
	}

	/// Number of times `release` was called, including no-op repeats.
	pub fn release_calls(&self) -> usize {
		self.inner.release_calls.load(Ordering::SeqCst)
	}

	fn navigate(state: &mut MockState, path: &str) {
		let mut path = normalize_path(path);
		let mut screen = None;
		for _ in 0..MAX_REDIRECTS {
			let route = state.routes.get(&path).or(state.fallback.as_ref()).cloned();
			match route.map(|route| route()) {
				Some(RouteOutcome::Redirect(to)) => path = normalize_path(&to),
				Some(RouteOutcome::Render(rendered)) => {
					screen = Some(rendered);
					break;
				}
				None => break,
			}
		}

		let screen = screen.unwrap_or_default();
		let now = Instant::now();
		state.path = path;
		state.title = screen.title;
		state.generation += 1;
		state.values.clear();
		state.elements = screen
			.elements
			.into_iter()
			.map(|element| Rendered {
				present_from: now + element.appear_after,
				element,
			})
			.collect();
	}

	fn check_open(state: &MockState, op: &str) -> Result<()> {
		if state.released {
			Err(Error::SessionClosed(op.to_string()))
		} else {
			Ok(())
		}
	}

	/// Resolves an element reference against the current screen.
	fn resolve(state: &MockState, element: &ElementRef) -> Result<usize> {
		let stale = || Error::remote(ErrorCode::StaleElementReference, format!("element {element} is no longer attached to the DOM"));
		let (generation, index) = element.id().split_once(':').ok_or_else(stale)?;
		let generation: u64 = generation.parse().map_err(|_| stale())?;
		let index: usize = index.parse().map_err(|_| stale())?;
		if generation != state.generation || index >= state.elements.len() {
			return Err(stale());
		}
		Ok(index)
	}

	fn interactable<'s>(state: &'s MockState, element: &ElementRef) -> Result<&'s MockElement> {
		let index = Self::resolve(state, element)?;
		let rendered = &state.elements[index].element;
		if rendered.hidden || rendered.disabled {
			return Err(Error::remote(
				ErrorCode::ElementNotInteractable,
				format!("element '{}' is not interactable", rendered.key),
			));
		}
		Ok(rendered)
	}
}

fn normalize_path(path: &str) -> String {
	if path.starts_with('/') {
		path.to_string()
	} else {
		format!("/{path}")
	}
}

/// Splits `http://host:port/path` into origin and path.
fn split_url(url: &str) -> (String, String) {
	let after_scheme = url.find("://").map(|i| i + 3).unwrap_or(0);
	match url[after_scheme..].find('/') {
		Some(i) => (url[..after_scheme + i].to_string(), url[after_scheme + i..].to_string()),
		None => (url.to_string(), "/".to_string()),
	}
}

#[async_trait]
impl BrowserLike for MockBrowser {
	async fn goto(&self, url: &str) -> Result<()> {
		let mut state = self.inner.state.lock();
		Self::check_open(&state, "goto")?;
		let (origin, path) = split_url(url);
		state.actions.push(MockAction::Goto(url.to_string()));
		state.origin = origin;
		Self::navigate(&mut state, &path);
		Ok(())
	}

	async fn current_url(&self) -> Result<String> {
		let state = self.inner.state.lock();
		Self::check_open(&state, "current_url")?;
		if state.path.is_empty() {
			return Ok("about:blank".to_string());
		}
		Ok(format!("{}{}", state.origin, state.path))
	}

	async fn title(&self) -> Result<String> {
		let state = self.inner.state.lock();
		Self::check_open(&state, "title")?;
		Ok(state.title.clone())
	}

	async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>> {
		let state = self.inner.state.lock();
		Self::check_open(&state, "find_elements")?;
		let now = Instant::now();
		Ok(state
			.elements
			.iter()
			.enumerate()
			.filter(|(_, r)| r.element.locator == *locator && now >= r.present_from)
			.map(|(i, _)| ElementRef::new(format!("{}:{i}", state.generation)))
			.collect())
	}

	async fn is_displayed(&self, element: &ElementRef) -> Result<bool> {
		let state = self.inner.state.lock();
		Self::check_open(&state, "is_displayed")?;
		let index = Self::resolve(&state, element)?;
		Ok(!state.elements[index].element.hidden)
	}

	async fn is_enabled(&self, element: &ElementRef) -> Result<bool> {
		let state = self.inner.state.lock();
		Self::check_open(&state, "is_enabled")?;
		let index = Self::resolve(&state, element)?;
		Ok(!state.elements[index].element.disabled)
	}

	async fn text(&self, element: &ElementRef) -> Result<String> {
		let state = self.inner.state.lock();
		Self::check_open(&state, "text")?;
		let index = Self::resolve(&state, element)?;
		let rendered = &state.elements[index].element;
		Ok(if rendered.hidden { String::new() } else { rendered.text.clone() })
	}

	async fn clear(&self, element: &ElementRef) -> Result<()> {
		let mut state = self.inner.state.lock();
		Self::check_open(&state, "clear")?;
		let key = Self::interactable(&state, element)?.key.clone();
		state.values.insert(key.clone(), String::new());
		state.actions.push(MockAction::Clear(key));
		Ok(())
	}

	async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()> {
		let mut state = self.inner.state.lock();
		Self::check_open(&state, "send_keys")?;
		let key = Self::interactable(&state, element)?.key.clone();
		state.values.entry(key.clone()).or_default().push_str(text);
		state.actions.push(MockAction::SendKeys { key, text: text.to_string() });
		Ok(())
	}

	async fn click(&self, element: &ElementRef) -> Result<()> {
		let mut state = self.inner.state.lock();
		Self::check_open(&state, "click")?;
		let target = Self::interactable(&state, element)?;
		let key = target.key.clone();
		let effect = target.on_click.clone();
		state.actions.push(MockAction::Click(key));

		match effect {
			None => {}
			Some(ClickEffect::Navigate(path)) => Self::navigate(&mut state, &path),
			Some(ClickEffect::Submit(submit)) => match submit(&FormValues(state.values.clone())) {
				SubmitOutcome::Navigate(path) => Self::navigate(&mut state, &path),
				SubmitOutcome::Show(shown) => {
					let present_from = Instant::now() + shown.appear_after;
					let rendered = Rendered { element: shown, present_from };
					match state.elements.iter().position(|r| r.element.key == rendered.element.key) {
						Some(i) => state.elements[i] = rendered,
						None => state.elements.push(rendered),
					}
				}
				SubmitOutcome::Nothing => {}
			},
		}
		Ok(())
	}

	async fn maximize_window(&self) -> Result<()> {
		let mut state = self.inner.state.lock();
		Self::check_open(&state, "maximize_window")?;
		state.actions.push(MockAction::Maximize);
		Ok(())
	}

	async fn release(&self) -> Result<()> {
		self.inner.release_calls.fetch_add(1, Ordering::SeqCst);
		let mut state = self.inner.state.lock();
		if !state.released {
			state.released = true;
			state.actions.push(MockAction::Release);
		}
		Ok(())
	}
}

type BrowserFactory = Arc<dyn Fn() -> MockBrowser + Send + Sync>;

/// [`SessionProvider`] handing out [`MockBrowser`]s and counting lifecycles.
pub struct MockProvider {
	factory: Option<BrowserFactory>,
	launch_error: Option<String>,
	/// Acquires left to fail before the factory is used.
	failures_left: Mutex<usize>,
	sessions: Mutex<Vec<MockBrowser>>,
}

impl MockProvider {
	pub fn new<F>(factory: F) -> Self
	where
		F: Fn() -> MockBrowser + Send + Sync + 'static,
	{
		Self {
			factory: Some(Arc::new(factory)),
			launch_error: None,
			failures_left: Mutex::new(0),
			sessions: Mutex::new(Vec::new()),
		}
	}

	/// Fails the next `count` acquires with a launch error, then hands out browsers.
	pub fn fail_first(mut self, count: usize, message: impl Into<String>) -> Self {
		self.launch_error = Some(message.into());
		self.failures_left = Mutex::new(count);
		self
	}

	/// A provider whose every acquire fails with a launch error.
	pub fn failing(message: impl Into<String>) -> Self {
		Self {
			factory: None,
			launch_error: Some(message.into()),
			failures_left: Mutex::new(usize::MAX),
			sessions: Mutex::new(Vec::new()),
		}
	}

	/// Every browser handed out so far.
	pub fn sessions(&self) -> Vec<MockBrowser> {
		self.sessions.lock().clone()
	}

	pub fn acquired(&self) -> usize {
		self.sessions.lock().len()
	}

	pub fn released(&self) -> usize {
		self.sessions.lock().iter().filter(|b| b.is_released()).count()
	}
}

#[async_trait]
impl SessionProvider for MockProvider {
	async fn acquire(&self) -> Result<Box<dyn BrowserLike>> {
		{
			let mut left = self.failures_left.lock();
			if *left > 0 {
				*left -= 1;
				let message = self.launch_error.clone().unwrap_or_default();
				return Err(Error::LaunchFailed(message));
			}
		}
		let Some(factory) = &self.factory else {
			return Err(Error::DriverNotFound);
		};
		let browser = factory();
		self.sessions.lock().push(browser.clone());
		Ok(Box::new(browser))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const HEADING: Locator = Locator::xpath("//h1");
	const FIELD: Locator = Locator::name("email");
	const SUBMIT: Locator = Locator::xpath("//button");
	const ERROR: Locator = Locator::class_name("error-message");
	const LINK: Locator = Locator::xpath("//a");

	fn browser() -> MockBrowser {
		let browser = MockBrowser::new();
		browser
			.route("/", || {
				RouteOutcome::render(
					MockScreen::new("Home")
						.element(MockElement::new("heading", HEADING).text("Hello"))
						.element(MockElement::new("link", LINK).navigates_to("/form")),
				)
			})
			.route("/old", || RouteOutcome::redirect("/"))
			.route("/form", || {
				RouteOutcome::render(MockScreen::new("Form").element(MockElement::new("email", FIELD)).element(
					MockElement::new("submit", SUBMIT).on_submit(|values| {
						if values.get("email") == "ok@test" {
							SubmitOutcome::Navigate("/".into())
						} else {
							SubmitOutcome::Show(MockElement::new("error", ERROR).text("Invalid").appear_after(Duration::from_millis(300)))
						}
					}),
				))
			})
			.fallback(|| RouteOutcome::redirect("/"));
		browser
	}

	#[tokio::test]
	async fn redirects_and_fallback_resolve() {
		let browser = browser();
		browser.goto("http://app.test/old").await.unwrap();
		assert_eq!(browser.current_url().await.unwrap(), "http://app.test/");

		browser.goto("http://app.test/nowhere").await.unwrap();
		assert_eq!(browser.path(), "/");
		assert_eq!(browser.title().await.unwrap(), "Home");
	}

	#[tokio::test]
	async fn navigation_makes_old_references_stale() {
		let browser = browser();
		browser.goto("http://app.test/").await.unwrap();
		let link = browser.find_elements(&LINK).await.unwrap().remove(0);
		browser.click(&link).await.unwrap();

		assert_eq!(browser.path(), "/form");
		let err = browser.text(&link).await.unwrap_err();
		assert!(err.is_stale_element());
	}

	#[tokio::test(start_paused = true)]
	async fn submit_shows_delayed_element() {
		let browser = browser();
		browser.goto("http://app.test/form").await.unwrap();
		let field = browser.find_elements(&FIELD).await.unwrap().remove(0);
		browser.send_keys(&field, "bad").await.unwrap();
		let submit = browser.find_elements(&SUBMIT).await.unwrap().remove(0);
		browser.click(&submit).await.unwrap();

		assert!(browser.find_elements(&ERROR).await.unwrap().is_empty());
		tokio::time::sleep(Duration::from_millis(300)).await;
		let error = browser.find_elements(&ERROR).await.unwrap().remove(0);
		assert_eq!(browser.text(&error).await.unwrap(), "Invalid");
		assert_eq!(browser.path(), "/form");
	}

	#[tokio::test]
	async fn values_accumulate_and_clear() {
		let browser = browser();
		browser.goto("http://app.test/form").await.unwrap();
		let field = browser.find_elements(&FIELD).await.unwrap().remove(0);
		browser.send_keys(&field, "ok").await.unwrap();
		browser.send_keys(&field, "@test").await.unwrap();
		assert_eq!(browser.value_of("email"), "ok@test");

		browser.clear(&field).await.unwrap();
		assert_eq!(browser.value_of("email"), "");
		assert!(browser.actions().contains(&MockAction::Clear("email".into())));
	}

	#[tokio::test]
	async fn hidden_elements_are_not_interactable() {
		let browser = MockBrowser::new();
		browser.route("/", || RouteOutcome::render(MockScreen::new("x").element(MockElement::new("btn", SUBMIT).hidden())));
		browser.goto("http://app.test/").await.unwrap();
		let btn = browser.find_elements(&SUBMIT).await.unwrap().remove(0);

		assert!(!browser.is_displayed(&btn).await.unwrap());
		let err = browser.click(&btn).await.unwrap_err();
		assert_eq!(err.remote_code(), Some(ErrorCode::ElementNotInteractable));
	}

	#[tokio::test]
	async fn release_is_idempotent_and_closes_session() {
		let browser = browser();
		browser.release().await.unwrap();
		browser.release().await.unwrap();

		assert!(browser.is_released());
		assert_eq!(browser.release_calls(), 2);
		assert_eq!(browser.actions().iter().filter(|a| **a == MockAction::Release).count(), 1);
		assert!(matches!(browser.goto("http://app.test/").await, Err(Error::SessionClosed(_))));
	}

	#[tokio::test]
	async fn provider_counts_sessions() {
		let provider = MockProvider::new(MockBrowser::new);
		let first = provider.acquire().await.unwrap();
		let _second = provider.acquire().await.unwrap();
		first.release().await.unwrap();

		assert_eq!(provider.acquired(), 2);
		assert_eq!(provider.released(), 1);

		let Err(err) = MockProvider::failing("no chrome").acquire().await else {
			panic!("failing provider handed out a session");
		};
		assert!(err.is_launch_error());
	}

	#[tokio::test]
	async fn provider_can_fail_only_the_first_acquires() {
		let provider = MockProvider::new(MockBrowser::new).fail_first(1, "driver still starting");
		let Err(err) = provider.acquire().await else {
			panic!("first acquire should fail");
		};
		assert_eq!(err.to_string(), "Failed to launch browser session: driver still starting");

		let browser = provider.acquire().await.unwrap();
		browser.release().await.unwrap();
		assert_eq!(provider.acquired(), 1);
		assert_eq!(provider.released(), 1);
	}

	#[test]
	fn split_url_handles_missing_path() {
		assert_eq!(split_url("http://localhost:3000"), ("http://localhost:3000".into(), "/".into()));
		assert_eq!(split_url("http://localhost:3000/signin"), ("http://localhost:3000".into(), "/signin".into()));
	}
}
