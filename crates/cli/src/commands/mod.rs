pub mod list;
pub mod run;

use authcheck::SessionProvider;
use tracing::info;

use crate::cli::{Cli, Commands};
use crate::config::{Overrides, SuiteConfig};
use crate::error::Result;

pub async fn dispatch(cli: Cli) -> Result<()> {
	let format = cli.format;
	match cli.command {
		Commands::List => list::execute(&mut std::io::stdout().lock(), format),
		Commands::Run(args) => {
			let config = SuiteConfig::load(&Overrides::from(&cli.launch), cli.config.as_deref())?;
			info!(
				target = "authcheck",
				base_url = %config.base_url,
				driver = ?config.launch.driver,
				headless = config.launch.options.headless,
				wait_ms = config.wait.timeout.as_millis() as u64,
				"resolved configuration"
			);
			let provider: &dyn SessionProvider = &config.launch;
			run::execute(provider, &config, &args, format, &mut std::io::stdout())
				.await
				.map(|_| ())
		}
	}
}
