//! ocwait CLI library
//!
//! Argument parsing, configuration, output and the command handlers behind
//! the `ocwait` binary.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;

pub use commands::{Cli, ColorArg, CommandArgs, Commands, EnvArgs, ExpectArgs, FormatArg};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, ProgressReporter};
