//! Element location strategies.

use serde::{Deserialize, Serialize};

/// W3C locator strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
	#[serde(rename = "css selector")]
	Css,
	#[serde(rename = "link text")]
	LinkText,
	#[serde(rename = "partial link text")]
	PartialLinkText,
	#[serde(rename = "tag name")]
	TagName,
	#[serde(rename = "xpath")]
	XPath,
}

impl Strategy {
	pub fn as_str(&self) -> &'static str {
		match self {
			Strategy::Css => "css selector",
			Strategy::LinkText => "link text",
			Strategy::PartialLinkText => "partial link text",
			Strategy::TagName => "tag name",
			Strategy::XPath => "xpath",
		}
	}
}

impl std::fmt::Display for Strategy {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Body of `POST /session/{id}/elements` (and `/element`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindElements {
	pub using: Strategy,
	pub value: String,
}
