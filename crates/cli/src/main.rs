use authcheck_cli::cli::{Cli, Commands};
use authcheck_cli::commands;
use authcheck_cli::error::SuiteError;
use authcheck_cli::logging;
use authcheck_cli::output::{self, OutputFormat, ResultBuilder};
use clap::Parser;

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let format = cli.format;
	let command = match &cli.command {
		Commands::Run(_) => "run",
		Commands::List => "list",
	};

	if let Err(err) = commands::dispatch(cli).await {
		// The run report already carries the failure
		if !err.is_output_already_printed() {
			handle_error(&err, command, format);
		}
		std::process::exit(err.exit_code());
	}
}

fn handle_error(err: &SuiteError, command: &str, format: OutputFormat) {
	let cmd_error = err.to_command_error();

	output::print_error_stderr(&cmd_error);

	if format != OutputFormat::Text {
		let mut builder = ResultBuilder::<()>::new(command);
		builder = match cmd_error.details {
			Some(details) => builder.error_with_details(cmd_error.code, cmd_error.message, details),
			None => builder.error(cmd_error.code, cmd_error.message),
		};
		output::print_result(&builder.build(), format);
	}
}
