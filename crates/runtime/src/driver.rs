//! chromedriver discovery
//!
//! Locates the chromedriver executable that brokers browser sessions.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Environment variable overriding chromedriver discovery.
pub const CHROMEDRIVER_PATH_ENV: &str = "CHROMEDRIVER_PATH";

/// Get the path to the chromedriver executable
///
/// Search order:
/// 1. `CHROMEDRIVER_PATH` environment variable
/// 2. `chromedriver` on `PATH`
/// 3. Common install locations
///
/// A candidate that exists but does not answer `--version` is skipped with a
/// warning and the next source is tried.
///
/// # Errors
///
/// Returns `Error::DriverNotFound` if no usable executable is found.
pub fn find_chromedriver() -> Result<PathBuf> {
	if let Some(path) = try_env_override() {
		if let Some(path) = resolve_candidate(CHROMEDRIVER_PATH_ENV, path) {
			return Ok(path);
		}
	}

	if let Ok(path) = which::which(driver_file_name()) {
		if let Some(path) = resolve_candidate("PATH", path) {
			return Ok(path);
		}
	}

	for location in common_locations() {
		let path = PathBuf::from(location);
		if path.exists() {
			if let Some(path) = resolve_candidate("common location", path) {
				return Ok(path);
			}
		}
	}

	Err(Error::DriverNotFound)
}

/// Resolves an explicitly configured executable, falling back to discovery
/// when none is given.
pub fn resolve_chromedriver(explicit: Option<&Path>) -> Result<PathBuf> {
	match explicit {
		Some(path) if path.exists() => Ok(path.to_path_buf()),
		Some(path) => Err(Error::LaunchFailed(format!("chromedriver executable does not exist: {}", path.display()))),
		None => find_chromedriver(),
	}
}

fn try_env_override() -> Option<PathBuf> {
	let value = std::env::var_os(CHROMEDRIVER_PATH_ENV)?;
	let path = PathBuf::from(value);
	if path.exists() {
		Some(path)
	} else {
		warn!(
			target = "authcheck",
			path = %path.display(),
			"{CHROMEDRIVER_PATH_ENV} points at a missing file; ignoring"
		);
		None
	}
}

fn resolve_candidate(label: &str, path: PathBuf) -> Option<PathBuf> {
	let usable = driver_is_usable(&path);
	debug!(target = "authcheck", source = label, path = %path.display(), usable, "chromedriver candidate");
	if usable {
		return Some(path);
	}

	warn!(
		target = "authcheck",
		source = label,
		path = %path.display(),
		"chromedriver candidate is not runnable; trying next source"
	);
	None
}

fn driver_is_usable(path: &Path) -> bool {
	Command::new(path)
		.arg("--version")
		.stdout(Stdio::null())
		.stderr(Stdio::null())
		.status()
		.map(|status| status.success())
		.unwrap_or(false)
}

fn driver_file_name() -> &'static str {
	if cfg!(windows) { "chromedriver.exe" } else { "chromedriver" }
}

#[cfg(not(windows))]
fn common_locations() -> &'static [&'static str] {
	&[
		"/usr/local/bin/chromedriver",
		"/usr/bin/chromedriver",
		"/usr/lib/chromium/chromedriver",
		"/usr/lib/chromium-browser/chromedriver",
		"/opt/homebrew/bin/chromedriver",
	]
}

#[cfg(windows)]
fn common_locations() -> &'static [&'static str] {
	&["C:\\Program Files\\chromedriver\\chromedriver.exe", "C:\\tools\\chromedriver\\chromedriver.exe"]
}
