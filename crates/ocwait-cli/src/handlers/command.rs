//! Command handler: poll a shell command line

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{OutputFormat, ProgressReporter};
use crate::CommandArgs;
use ocwait::{ClusterCli, PollConfig, PollOutcome, Poller, ProbeError, TestEnvironment};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Machine-readable result of one poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollReport {
    /// Command line as given (without the appended kubeconfig)
    pub command: String,
    /// Expectation as written back by the parser
    pub expectation: String,
    /// Whether the expectation was met
    pub satisfied: bool,
    /// Attempts performed
    pub attempts: u32,
    /// Configured retry budget
    pub max_retries: u32,
    /// Delay between attempts
    pub interval_ms: u64,
    /// Standard output of the satisfying or last attempt
    pub observation: String,
    /// Exit status of the satisfying or last attempt
    pub exit_code: Option<i32>,
}

impl PollReport {
    /// Build from a finished poll
    #[must_use]
    pub fn new(
        args: &CommandArgs,
        expectation: String,
        config: PollConfig,
        outcome: &PollOutcome,
    ) -> Self {
        let observation = outcome.observation();
        Self {
            command: args.command.clone(),
            expectation,
            satisfied: outcome.is_satisfied(),
            attempts: outcome.attempts(),
            max_retries: config.max_retries,
            interval_ms: config.interval_ms,
            observation: observation.as_str().to_string(),
            exit_code: observation.command_detail().and_then(|d| d.exit_code),
        }
    }

    /// The error reported for an unsatisfied poll
    #[must_use]
    pub fn exhausted_error(&self) -> ProbeError {
        ProbeError::RetryBudgetExhausted {
            description: self.command.clone(),
            expectation: self.expectation.clone(),
            retries: self.max_retries,
            attempts: self.attempts,
            last: self.observation.clone(),
        }
    }
}

/// Poll budget: flags first, then the environment defaults
pub fn poll_config(env: &TestEnvironment, args: &CommandArgs) -> CliResult<PollConfig> {
    let mut config = env.poll;
    if let Some(retries) = args.retries {
        config = config.with_max_retries(retries);
    }
    if let Some(ms) = args.interval {
        config = config.with_interval_ms(ms);
    }
    config
        .validate()
        .map_err(|e| CliError::invalid_argument(e.to_string()))?;
    Ok(config)
}

/// Execute the command subcommand
pub async fn execute_command(
    config: &CliConfig,
    env: &TestEnvironment,
    args: &CommandArgs,
) -> CliResult<()> {
    let expectation = args.expect.to_expectation()?;
    let expectation_text = expectation.to_string();
    let poll = poll_config(env, args)?;
    let format = OutputFormat::from(args.format);

    let mut cli = ClusterCli::new(env);
    if let Some(ms) = args.timeout {
        if ms == 0 {
            return Err(CliError::invalid_argument("--timeout must be greater than 0"));
        }
        cli = cli.with_timeout(Duration::from_millis(ms));
    }
    let mut probe = if args.admin {
        cli.admin_probe(args.command.as_str())
    } else {
        cli.probe(args.command.as_str())
    };

    debug!(
        command = %args.command,
        admin = args.admin,
        retries = poll.max_retries,
        interval_ms = poll.interval_ms,
        "starting poll"
    );
    let mut reporter = ProgressReporter::new(
        config.color.should_color(),
        config.verbosity.is_quiet() || format == OutputFormat::Json,
    );
    reporter.start_spinner(&format!("{} (expecting {expectation_text})", args.command));
    let outcome = Poller::new(expectation)
        .with_config(poll)
        .with_description(args.command.as_str())
        .poll(&mut probe)
        .await;
    reporter.finish();

    let report = PollReport::new(args, expectation_text, poll, &outcome?);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text if report.satisfied => {
            print!("{}", report.observation);
            if !report.observation.ends_with('\n') {
                println!();
            }
            reporter.success(&format!(
                "{} met {} after {} attempt(s)",
                report.command, report.expectation, report.attempts
            ));
        }
        OutputFormat::Text => reporter.failure(&format!(
            "{} did not meet {} after {} attempt(s), last output: {:?}",
            report.command,
            report.expectation,
            report.attempts,
            report.observation.trim_end()
        )),
    }

    if report.satisfied {
        Ok(())
    } else {
        Err(report.exhausted_error().into())
    }
}
