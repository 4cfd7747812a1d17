
use std::path::PathBuf;

use authcheck::Viewport;
use clap::{Args, Parser, Subcommand};

use crate::config::Overrides;
use crate::output::OutputFormat;
use crate::styles::cli_styles;

/// End-to-end UI checks for the MERN auth app.
#[derive(Parser, Debug)]
#[command(name = "authcheck")]
#[command(about = "End-to-end UI checks for the MERN auth app")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format: text (default), json, or ndjson
	#[arg(short = 'f', long, global = true, value_enum, default_value = "text")]
	pub format: OutputFormat,

	/// JSON config file (default: ./authcheck.json, then the user config dir)
	#[arg(long, global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	#[command(flatten)]
	pub launch: LaunchArgs,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Run scenarios against the application.
	Run(RunArgs),
	/// List available scenarios.
	List,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
	/// Run only scenarios whose name contains one of these substrings.
	#[arg(value_name = "FILTER")]
	pub filters: Vec<String>,

	/// Stop after the first failing scenario.
	#[arg(long)]
	pub fail_fast: bool,

	/// Skip scenarios that register new accounts.
	#[arg(long)]
	pub no_accounts: bool,
}

/// Browser and application settings shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct LaunchArgs {
	/// Application base URL [env: AUTHCHECK_BASE_URL] [default: http://localhost:3000]
	#[arg(long, global = true, value_name = "URL")]
	pub base_url: Option<String>,

	/// Show the browser window and drop the CI launch switches.
	#[arg(long, global = true)]
	pub headed: bool,

	/// Fixed window size, e.g. 1920x1080.
	#[arg(long, global = true, value_name = "WxH")]
	pub window_size: Option<Viewport>,

	/// chromedriver executable [env: CHROMEDRIVER_PATH]
	#[arg(long, global = true, value_name = "PATH", conflicts_with = "remote")]
	pub driver: Option<PathBuf>,

	/// Port for the spawned chromedriver (default: any free port).
	#[arg(long, global = true, value_name = "PORT", conflicts_with = "remote")]
	pub driver_port: Option<u16>,

	/// Use an already-running WebDriver endpoint instead of spawning one.
	#[arg(long, global = true, value_name = "URL")]
	pub remote: Option<String>,

	/// Seconds to wait for elements (default: 10).
	#[arg(long, global = true, value_name = "SECS")]
	pub wait_secs: Option<u64>,

	/// Browser binary passed to the driver.
	#[arg(long, global = true, value_name = "PATH")]
	pub browser_binary: Option<PathBuf>,

	/// Keep the launch window size instead of maximising.
	#[arg(long, global = true)]
	pub no_maximize: bool,
}

impl From<&LaunchArgs> for Overrides {
	fn from(args: &LaunchArgs) -> Self {
		Overrides {
			base_url: args.base_url.clone(),
			headed: args.headed,
			window_size: args.window_size,
			driver: args.driver.clone(),
			driver_port: args.driver_port,
			remote: args.remote.clone(),
			wait_secs: args.wait_secs,
			browser_binary: args.browser_binary.clone(),
			no_maximize: args.no_maximize,
		}
	}
}
