//! Session capabilities and Chrome launch switches.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fixed browser window size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
	pub width: u32,
	pub height: u32,
}

impl Viewport {
	pub const fn new(width: u32, height: u32) -> Self {
		Self { width, height }
	}
}

impl Default for Viewport {
	fn default() -> Self {
		Self::new(1920, 1080)
	}
}

impl fmt::Display for Viewport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}x{}", self.width, self.height)
	}
}

impl FromStr for Viewport {
	type Err = String;

	/// Parses `WIDTHxHEIGHT` (also accepts `WIDTH,HEIGHT`).
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (w, h) = s
			.split_once(['x', 'X', ','])
			.ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
		let width = w.trim().parse::<u32>().map_err(|e| format!("invalid width '{w}': {e}"))?;
		let height = h.trim().parse::<u32>().map_err(|e| format!("invalid height '{h}': {e}"))?;
		if width == 0 || height == 0 {
			return Err(format!("window size must be non-zero, got '{s}'"));
		}
		Ok(Self { width, height })
	}
}

/// Browser launch switches recognised by the suite.
///
/// Defaults reproduce the CI-oriented profile: headless, sandbox disabled,
/// no `/dev/shm` usage, GPU off, 1920x1080, notifications and extensions off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct LaunchOptions {
	/// Suppress the visible browser UI.
	pub headless: bool,
	/// Relax OS sandboxing for constrained CI containers (`--no-sandbox`).
	pub sandbox_mode_disabled: bool,
	/// Write shared memory files to `/tmp` instead of `/dev/shm`.
	pub disable_dev_shm_usage: bool,
	pub disable_gpu: bool,
	/// Fixed window size; `None` leaves the browser default.
	pub fixed_viewport: Option<Viewport>,
	pub disable_notifications: bool,
	pub disable_extensions: bool,
	/// Explicit browser binary; `None` lets the driver pick.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub binary: Option<PathBuf>,
}

impl Default for LaunchOptions {
	fn default() -> Self {
		Self {
			headless: true,
			sandbox_mode_disabled: true,
			disable_dev_shm_usage: true,
			disable_gpu: true,
			fixed_viewport: Some(Viewport::default()),
			disable_notifications: true,
			disable_extensions: true,
			binary: None,
		}
	}
}

impl LaunchOptions {
	/// Options for a visible browser with no CI switches.
	pub fn headed() -> Self {
		Self {
			headless: false,
			sandbox_mode_disabled: false,
			disable_dev_shm_usage: false,
			disable_gpu: false,
			fixed_viewport: None,
			disable_notifications: false,
			disable_extensions: false,
			binary: None,
		}
	}

	/// Renders the options as Chrome command-line switches.
	pub fn to_args(&self) -> Vec<String> {
		let mut args = Vec::new();
		if self.headless {
			args.push("--headless".to_string());
		}
		if self.sandbox_mode_disabled {
			args.push("--no-sandbox".to_string());
		}
		if self.disable_dev_shm_usage {
			args.push("--disable-dev-shm-usage".to_string());
		}
		if self.disable_gpu {
			args.push("--disable-gpu".to_string());
		}
		if let Some(viewport) = self.fixed_viewport {
			args.push(format!("--window-size={},{}", viewport.width, viewport.height));
		}
		if self.disable_notifications {
			args.push("--disable-notifications".to_string());
		}
		if self.disable_extensions {
			args.push("--disable-extensions".to_string());
		}
		args
	}

	/// Builds the `goog:chromeOptions` block for these switches.
	pub fn chrome_options(&self) -> ChromeOptions {
		ChromeOptions {
			args: self.to_args(),
			binary: self.binary.as_ref().map(|p| p.to_string_lossy().into_owned()),
		}
	}
}

/// `goog:chromeOptions` capability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromeOptions {
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub args: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub binary: Option<String>,
}

/// Capabilities placed under `alwaysMatch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
	pub browser_name: String,
	#[serde(rename = "goog:chromeOptions")]
	pub chrome_options: ChromeOptions,
}

impl Capabilities {
	pub fn chrome(options: &LaunchOptions) -> Self {
		Self {
			browser_name: "chrome".to_string(),
			chrome_options: options.chrome_options(),
		}
	}
}

/// Body of `POST /session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSessionRequest {
	pub capabilities: CapabilitiesRequest,
}

/// Capability negotiation block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitiesRequest {
	pub always_match: Capabilities,
}

impl NewSessionRequest {
	pub fn chrome(options: &LaunchOptions) -> Self {
		Self {
			capabilities: CapabilitiesRequest {
				always_match: Capabilities::chrome(options),
			},
		}
	}
}
