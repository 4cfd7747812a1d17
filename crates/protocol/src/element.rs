//! Web element references.

use serde::{Deserialize, Serialize};

/// JSON key identifying a web element reference (W3C "web element identifier").
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f97d8ec6164";

/// Opaque reference to an element in the remote DOM.
///
/// Serializes as `{"element-6066-11e4-a52e-4f97d8ec6164": "<id>"}`. References
/// become stale once the element is detached, e.g. after client-side navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementRef {
	#[serde(rename = "element-6066-11e4-a52e-4f97d8ec6164")]
	pub id: String,
}

impl ElementRef {
	pub fn new(id: impl Into<String>) -> Self {
		Self { id: id.into() }
	}

	pub fn id(&self) -> &str {
		&self.id
	}
}

impl std::fmt::Display for ElementRef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.id)
	}
}
