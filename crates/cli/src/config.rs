//! Suite configuration.
//!
//! Sources, highest precedence first: command-line [`Overrides`], the
//! `AUTHCHECK_BASE_URL` environment variable, a JSON [`ConfigFile`], and the
//! built-in defaults. `CHROMEDRIVER_PATH` is read later by driver discovery.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use authcheck::{DriverEndpoint, LaunchConfig, LaunchOptions, Viewport, Wait};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SuiteError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const BASE_URL_ENV: &str = "AUTHCHECK_BASE_URL";
/// Looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "authcheck.json";

/// On-disk configuration. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ConfigFile {
	pub base_url: Option<String>,
	pub launch: Option<LaunchOptions>,
	/// chromedriver executable.
	pub driver: Option<PathBuf>,
	pub driver_port: Option<u16>,
	/// URL of an already-running driver; disables spawning.
	pub remote: Option<String>,
	pub wait_secs: Option<u64>,
	pub poll_ms: Option<u64>,
	pub maximize: Option<bool>,
	pub request_timeout_secs: Option<u64>,
	pub include_accounts: Option<bool>,
}

impl ConfigFile {
	pub fn from_path(path: &Path) -> Result<Self> {
		let raw = fs::read_to_string(path)?;
		serde_json::from_str(&raw).map_err(|source| SuiteError::ConfigFile {
			path: path.to_path_buf(),
			source,
		})
	}
}

/// Values taken from command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
	pub base_url: Option<String>,
	pub headed: bool,
	pub window_size: Option<Viewport>,
	pub driver: Option<PathBuf>,
	pub driver_port: Option<u16>,
	pub remote: Option<String>,
	pub wait_secs: Option<u64>,
	pub browser_binary: Option<PathBuf>,
	pub no_maximize: bool,
}

/// Fully resolved configuration for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteConfig {
	/// Normalised, without a trailing slash.
	pub base_url: String,
	pub launch: LaunchConfig,
	pub wait: Wait,
	pub include_accounts: bool,
	/// File the settings came from, if any.
	pub source: Option<PathBuf>,
}

impl SuiteConfig {
	/// Resolves configuration from the process environment and the filesystem.
	pub fn load(overrides: &Overrides, explicit: Option<&Path>) -> Result<Self> {
		let cwd = std::env::current_dir()?;
		let (file, source) = match explicit {
			Some(path) => (ConfigFile::from_path(path)?, Some(path.to_path_buf())),
			None => match discover(&cwd, dirs::config_dir().as_deref()) {
				Some(path) => (ConfigFile::from_path(&path)?, Some(path)),
				None => (ConfigFile::default(), None),
			},
		};
		if let Some(ref path) = source {
			debug!(target = "authcheck", path = %path.display(), "loaded config file");
		}

		let mut config = Self::resolve(overrides, file, |key| std::env::var(key).ok())?;
		config.source = source;
		Ok(config)
	}

	/// Layers `overrides`, the environment seen through `env`, and `file`.
	pub fn resolve(overrides: &Overrides, file: ConfigFile, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
		let base_url = overrides
			.base_url
			.clone()
			.or_else(|| env(BASE_URL_ENV).filter(|v| !v.trim().is_empty()))
			.or(file.base_url)
			.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
		let base_url = normalize_url(&base_url)?;

		let mut options = if overrides.headed {
			let mut headed = LaunchOptions::headed();
			headed.binary = file.launch.and_then(|l| l.binary);
			headed
		} else {
			file.launch.unwrap_or_default()
		};
		if let Some(size) = overrides.window_size {
			options.fixed_viewport = Some(size);
		}
		if let Some(ref binary) = overrides.browser_binary {
			options.binary = Some(binary.clone());
		}

		let remote = overrides.remote.clone().or(file.remote);
		let driver = match remote {
			Some(url) => DriverEndpoint::Remote(normalize_url(&url)?),
			None => DriverEndpoint::Spawn {
				executable: overrides.driver.clone().or(file.driver),
				port: overrides.driver_port.or(file.driver_port),
			},
		};

		let wait_secs = overrides.wait_secs.or(file.wait_secs);
		if wait_secs == Some(0) {
			return Err(SuiteError::Config("wait budget must be at least one second".into()));
		}
		let mut wait = wait_secs.map(|s| Wait::new(Duration::from_secs(s))).unwrap_or_default();
		if let Some(ms) = file.poll_ms {
			if ms == 0 {
				return Err(SuiteError::Config("pollMs must be positive".into()));
			}
			wait = wait.with_poll_interval(Duration::from_millis(ms));
		}

		let mut launch = LaunchConfig {
			driver,
			options,
			maximize: !overrides.no_maximize && file.maximize.unwrap_or(true),
			..LaunchConfig::default()
		};
		if let Some(secs) = file.request_timeout_secs {
			launch.request_timeout = Duration::from_secs(secs);
		}

		Ok(Self {
			base_url,
			launch,
			wait,
			include_accounts: file.include_accounts.unwrap_or(true),
			source: None,
		})
	}
}

impl Default for SuiteConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.to_string(),
			launch: LaunchConfig::default(),
			wait: Wait::default(),
			include_accounts: true,
			source: None,
		}
	}
}

/// First existing config file: `./authcheck.json`, then `<config dir>/authcheck/config.json`.
pub fn discover(cwd: &Path, config_dir: Option<&Path>) -> Option<PathBuf> {
	let local = cwd.join(LOCAL_CONFIG_FILE);
	if local.is_file() {
		return Some(local);
	}
	config_dir
		.map(|dir| dir.join("authcheck").join("config.json"))
		.filter(|p| p.is_file())
}

fn normalize_url(raw: &str) -> Result<String> {
	let parsed = url::Url::parse(raw.trim()).map_err(|source| SuiteError::BaseUrl {
		url: raw.to_string(),
		source,
	})?;
	if !matches!(parsed.scheme(), "http" | "https") {
		return Err(SuiteError::Config(format!("'{raw}' is not an http(s) URL")));
	}
	Ok(parsed.as_str().trim_end_matches('/').to_string())
}
