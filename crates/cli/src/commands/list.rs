use std::io::Write;

use anyhow::Context;

use crate::error::Result;
use crate::output::{self, OutputFormat, ScenarioInfo};
use crate::scenarios::SCENARIOS;

pub fn execute<W: Write>(out: &mut W, format: OutputFormat) -> Result<()> {
	let infos: Vec<ScenarioInfo> = SCENARIOS.iter().map(ScenarioInfo::from).collect();
	output::write_scenario_list(out, &infos, format).context("writing scenario list")?;
	Ok(())
}
