//! The authcheck suite: page facades, scenarios, the runner, and the CLI around them.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod pages;
pub mod runner;
pub mod scenarios;
pub mod styles;
pub mod testing;

pub use config::SuiteConfig;
pub use error::{Result, SuiteError};
pub use runner::{RunOptions, ScenarioReport, Status, SuiteReport, run_scenario, run_suite};
pub use scenarios::{SCENARIOS, Scenario, ScenarioCtx, ScenarioError};
