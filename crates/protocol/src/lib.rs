//! Wire types for the W3C WebDriver protocol.
//!
//! Only the commands the suite issues are modelled: session creation and
//! deletion, navigation, title/url queries, window maximisation, element lookup
//! and the handful of element interactions (displayed, enabled, text, clear,
//! send keys, click).
//!
//! # Main Types
//!
//! - [`LaunchOptions`] - Browser launch switches, rendered to `goog:chromeOptions`
//! - [`NewSessionRequest`] - Body of `POST /session`
//! - [`FindElements`] - Body of `POST /session/{id}/elements`
//! - [`ElementRef`] - Web element reference returned by element lookup
//! - [`ValueEnvelope`] / [`ErrorValue`] - Response envelopes

pub mod capabilities;
pub mod element;
pub mod locator;
pub mod response;

pub use capabilities::{Capabilities, ChromeOptions, LaunchOptions, NewSessionRequest, Viewport};
pub use element::{ELEMENT_KEY, ElementRef};
pub use locator::{FindElements, Strategy};
pub use response::{ErrorCode, ErrorValue, NewSessionValue, StatusValue, ValueEnvelope};
