//! Browser sessions, static locators, and condition-polling waits.
//!
//! The suite talks to browsers only through [`BrowserLike`]. A live
//! [`Session`] speaks WebDriver to chromedriver; [`testing::MockBrowser`]
//! stands in for it in tests.

use std::future::Future;
use std::pin::Pin;

pub mod browser;
pub mod locator;
pub mod session;
pub mod testing;
pub mod wait;

pub use authcheck_protocol::{ElementRef, ErrorCode, LaunchOptions, Viewport};
pub use authcheck_runtime::{Error, Result};
pub use browser::BrowserLike;
pub use locator::{By, Locator, LocatorTable};
pub use session::{DriverEndpoint, LaunchConfig, Session, SessionProvider, scoped};
pub use wait::{DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_BUDGET, Probe, Wait, WaitOutcome};

/// Boxed future borrowing from a session for `'a`.
pub type BoxFut<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
