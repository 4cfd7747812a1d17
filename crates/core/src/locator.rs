//! Static element locators.
//!
//! A [`Locator`] is an immutable (kind, selector) pair. Screens describe their
//! elements with a [`LocatorTable`], a fixed mapping from logical element name
//! to locator.

use std::fmt;

use authcheck_protocol::{FindElements, Strategy};
use authcheck_runtime::{Error, Result};

/// Selector kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum By {
	XPath,
	Css,
	/// Matches the `name` attribute.
	Name,
	/// Matches a single CSS class.
	ClassName,
}

/// Immutable element locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locator {
	by: By,
	value: &'static str,
}

impl Locator {
	pub const fn xpath(value: &'static str) -> Self {
		Self { by: By::XPath, value }
	}

	pub const fn css(value: &'static str) -> Self {
		Self { by: By::Css, value }
	}

	pub const fn name(value: &'static str) -> Self {
		Self { by: By::Name, value }
	}

	pub const fn class_name(value: &'static str) -> Self {
		Self { by: By::ClassName, value }
	}

	/// Translates the locator into a W3C find-elements request.
	///
	/// `name` and class locators have no W3C strategy of their own and are
	/// rewritten as CSS selectors.
	pub fn to_find(&self) -> FindElements {
		let (using, value) = match self.by {
			By::XPath => (Strategy::XPath, self.value.to_string()),
			By::Css => (Strategy::Css, self.value.to_string()),
			By::Name => (Strategy::Css, format!("[name=\"{}\"]", self.value)),
			By::ClassName => (Strategy::Css, format!(".{}", self.value)),
		};
		FindElements { using, value }
	}
}

impl fmt::Display for Locator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let kind = match self.by {
			By::XPath => "xpath",
			By::Css => "css",
			By::Name => "name",
			By::ClassName => "class",
		};
		write!(f, "{kind}={}", self.value)
	}
}

/// Named locators for one screen.
#[derive(Debug, Clone, Copy)]
pub struct LocatorTable {
	pub screen: &'static str,
	pub entries: &'static [(&'static str, Locator)],
}

impl LocatorTable {
	pub const fn new(screen: &'static str, entries: &'static [(&'static str, Locator)]) -> Self {
		Self { screen, entries }
	}

	/// Looks up a locator by logical name.
	pub fn get(&self, name: &str) -> Result<Locator> {
		self.entries
			.iter()
			.find(|(key, _)| *key == name)
			.map(|(_, locator)| *locator)
			.ok_or_else(|| Error::UnknownElement {
				screen: self.screen,
				name: name.to_string(),
			})
	}

	pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.entries.iter().map(|(name, _)| *name)
	}
}
