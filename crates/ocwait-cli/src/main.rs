//! ocwait: wait for cluster state from the command line
//!
//! ## Usage
//!
//! ```bash
//! ocwait command "oc get pod web -o jsonpath={.status.phase}" --equals Running
//! ocwait command "oc get csv -n openshift-operators" --contains Succeeded --admin -r 10
//! ocwait command "oc patch ..." --expect /patched/ --interval 2000 --format json
//! ocwait env --format json
//! ```

use clap::Parser;
use ocwait_cli::handlers::{execute_command, execute_env, load_environment};
use ocwait_cli::{Cli, CliConfig, CliResult, Commands, Verbosity};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(&config);

    match cli.command {
        Commands::Command(ref args) => {
            let env = load_environment(cli.config.as_deref())?;
            execute_command(&config, &env, args).await
        }
        Commands::Env(ref args) => execute_env(cli.config.as_deref(), args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.verbose, cli.quiet))
        .with_color(cli.color.clone().into())
}

fn init_tracing(config: &CliConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.log_filter()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.color.should_color())
        .with_target(false)
        .try_init();
}
