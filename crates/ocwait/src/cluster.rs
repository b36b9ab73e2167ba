//! Cluster command-line probes.
//!
//! Runs `oc` command lines through the shell and turns their output into
//! observations. A non-zero exit status is still an observation: a resource
//! that does not exist yet is exactly the state tests poll through. Only a
//! command that cannot be started at all, or that hangs past its timeout, is
//! an observation failure.

use crate::env::TestEnvironment;
use crate::expect::Expectation;
use crate::observation::Observation;
use crate::observe::Observe;
use crate::poll::{PollConfig, Poller};
use crate::result::{ProbeError, ProbeResult};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Default per-command timeout (60 seconds)
pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 60_000;

/// Runs cluster commands for one test run
#[derive(Debug, Clone)]
pub struct ClusterCli {
    shell: String,
    kubeconfig: Option<PathBuf>,
    timeout: Duration,
}

impl ClusterCli {
    /// Build from the loaded test environment
    #[must_use]
    pub fn new(env: &TestEnvironment) -> Self {
        Self {
            shell: "sh".to_string(),
            kubeconfig: env.kubeconfig.clone(),
            timeout: env.command_timeout(),
        }
    }

    /// Use a different shell (must accept `-c <command>`)
    #[must_use]
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Set the per-command timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Kubeconfig used for admin commands
    #[must_use]
    pub fn kubeconfig(&self) -> Option<&std::path::Path> {
        self.kubeconfig.as_deref()
    }

    /// Append `--kubeconfig <path>` to a command line
    pub fn admin_command(&self, command: &str) -> ProbeResult<String> {
        let path = self.kubeconfig.as_ref().ok_or_else(|| {
            ProbeError::config("KUBECONFIG_PATH is not set; admin commands need a kubeconfig")
        })?;
        Ok(format!("{command} --kubeconfig {}", path.display()))
    }

    /// Run a command line once
    pub async fn run(&self, command: &str) -> ProbeResult<Observation> {
        debug!(command, "running command");
        let child = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ProbeError::observation(format!("cannot run {command:?}: {e}")))?;

        // Reading through the child keeps kill_on_drop effective on timeout.
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => output.map_err(|e| {
                ProbeError::observation(format!("cannot read output of {command:?}: {e}"))
            })?,
            Err(_) => {
                return Err(ProbeError::observation(format!(
                    "{command:?} timed out after {}ms",
                    self.timeout.as_millis()
                )))
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        debug!(
            command,
            exit_code = ?output.status.code(),
            stdout_len = stdout.len(),
            "command finished"
        );
        Ok(Observation::command(stdout, stderr, output.status.code()))
    }

    /// Run an admin command line once (with the run's kubeconfig)
    pub async fn admin(&self, command: &str) -> ProbeResult<Observation> {
        let full = self.admin_command(command)?;
        self.run(&full).await
    }

    /// Observer re-running `command` on each attempt
    #[must_use]
    pub fn probe(&self, command: impl Into<String>) -> CommandProbe<'_> {
        CommandProbe {
            cli: self,
            command: command.into(),
            admin: false,
        }
    }

    /// Observer re-running an admin `command` on each attempt
    #[must_use]
    pub fn admin_probe(&self, command: impl Into<String>) -> CommandProbe<'_> {
        CommandProbe {
            cli: self,
            command: command.into(),
            admin: true,
        }
    }

    /// Poll an admin command until its output satisfies `expected`
    ///
    /// Returns `false` when the budget runs out.
    pub async fn retry_task(
        &self,
        command: &str,
        expected: impl Into<Expectation>,
        config: Option<PollConfig>,
    ) -> ProbeResult<bool> {
        let outcome = Poller::new(expected)
            .with_config(config.unwrap_or_default())
            .poll(&mut self.admin_probe(command))
            .await?;
        Ok(outcome.is_satisfied())
    }

    /// Poll an admin command and fail if its output never satisfies `expected`
    pub async fn check_command_result(
        &self,
        command: &str,
        expected: impl Into<Expectation>,
        config: Option<PollConfig>,
    ) -> ProbeResult<Observation> {
        Poller::new(expected)
            .with_config(config.unwrap_or_default())
            .with_description(command)
            .wait_until(&mut self.admin_probe(command))
            .await
    }
}

/// A command re-run on every poll attempt
#[derive(Debug, Clone)]
pub struct CommandProbe<'a> {
    cli: &'a ClusterCli,
    command: String,
    admin: bool,
}

impl CommandProbe<'_> {
    /// The command line as written by the caller
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }
}

#[async_trait]
impl<'a> Observe for CommandProbe<'a> {
    async fn observe(&mut self) -> ProbeResult<Observation> {
        if self.admin {
            self.cli.admin(&self.command).await
        } else {
            self.cli.run(&self.command).await
        }
    }

    fn describe(&self) -> String {
        self.command.clone()
    }
}
