//! Runtime for authcheck: locating chromedriver, running it, and speaking
//! the WebDriver HTTP protocol to it.

pub mod connection;
pub mod driver;
pub mod driver_server;
pub mod error;

pub use connection::{Connection, DEFAULT_REQUEST_TIMEOUT};
pub use driver::{CHROMEDRIVER_PATH_ENV, find_chromedriver, resolve_chromedriver};
pub use driver_server::{DRIVER_STARTUP_TIMEOUT, DriverServer};
pub use error::{Error, Result};
