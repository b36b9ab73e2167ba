//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use ocwait::{Expectation, ProbeResult};
use std::path::PathBuf;

/// ocwait: poll cluster commands until their output meets an expectation
#[derive(Parser, Debug)]
#[command(name = "ocwait")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// YAML test environment file (environment variables override it)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll a shell command until its output meets an expectation
    Command(CommandArgs),

    /// Show the resolved test environment
    Env(EnvArgs),
}

/// Arguments for the command subcommand
#[derive(Parser, Debug)]
pub struct CommandArgs {
    /// Command line to run (through `sh -c`)
    pub command: String,

    /// Expected output
    #[command(flatten)]
    pub expect: ExpectArgs,

    /// Append `--kubeconfig $KUBECONFIG_PATH` to the command
    #[arg(long)]
    pub admin: bool,

    /// Retries after the first attempt (default: POLL_MAX_RETRIES or 3)
    #[arg(short, long)]
    pub retries: Option<u32>,

    /// Delay between attempts in milliseconds (default: POLL_INTERVAL_MS or 10000)
    #[arg(short, long, value_name = "MS")]
    pub interval: Option<u64>,

    /// Per-command timeout in milliseconds (default: COMMAND_TIMEOUT_MS or 60000)
    #[arg(long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: FormatArg,
}

/// Exactly one way of stating the expected output
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ExpectArgs {
    /// Output must contain this text
    #[arg(long, value_name = "TEXT")]
    pub contains: Option<String>,

    /// Output, minus trailing whitespace, must equal this text
    #[arg(long, value_name = "TEXT")]
    pub equals: Option<String>,

    /// Output must match this regular expression
    #[arg(long, value_name = "REGEX")]
    pub matches: Option<String>,

    /// Expectation shorthand: `/regex/`, `=exact` or a substring (`\` forces a substring)
    #[arg(short, long, value_name = "EXPR")]
    pub expect: Option<String>,
}

impl ExpectArgs {
    /// Build the expectation from whichever flag was given
    pub fn to_expectation(&self) -> ProbeResult<Expectation> {
        if let Some(ref needle) = self.contains {
            return Ok(Expectation::contains(needle.as_str()));
        }
        if let Some(ref value) = self.equals {
            return Ok(Expectation::equals(value.as_str()));
        }
        if let Some(ref pattern) = self.matches {
            return Expectation::matches(pattern);
        }
        self.expect.as_deref().unwrap_or_default().parse()
    }
}

/// Arguments for the env subcommand
#[derive(Parser, Debug)]
pub struct EnvArgs {
    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: FormatArg,
}

/// Output format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

impl From<FormatArg> for crate::output::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
