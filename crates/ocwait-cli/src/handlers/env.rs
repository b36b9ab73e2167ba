//! Env command handler and environment loading

use crate::error::CliResult;
use crate::output::OutputFormat;
use crate::EnvArgs;
use ocwait::TestEnvironment;
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

/// Load the test environment: the YAML file first, then environment variables on top
pub fn load_environment(config: Option<&Path>) -> CliResult<TestEnvironment> {
    load_environment_with(config, |key| std::env::var(key).ok())
}

/// Same as [`load_environment`], with an explicit variable lookup
pub fn load_environment_with<F>(config: Option<&Path>, lookup: F) -> CliResult<TestEnvironment>
where
    F: Fn(&str) -> Option<String>,
{
    debug!(config = ?config, "loading test environment");
    let base = match config {
        Some(path) => TestEnvironment::from_file(path)?,
        None => TestEnvironment::default(),
    };
    Ok(base.overlay(lookup)?)
}

/// Render the environment; the password is never included
pub fn render_environment(env: &TestEnvironment, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(env)?),
        OutputFormat::Text => {
            let unset = || "(unset)".to_string();
            let mut out = String::new();
            let _ = writeln!(
                out,
                "kubeconfig:         {}",
                env.kubeconfig
                    .as_ref()
                    .map_or_else(unset, |p| p.display().to_string())
            );
            let _ = writeln!(
                out,
                "console_url:        {}",
                env.console_url.clone().unwrap_or_else(unset)
            );
            let _ = writeln!(
                out,
                "api_url:            {}",
                env.api_url.clone().unwrap_or_else(unset)
            );
            let _ = writeln!(
                out,
                "login:              {}",
                env.login
                    .as_ref()
                    .map_or_else(unset, |l| format!("{} (password redacted)", l.username))
            );
            let _ = writeln!(out, "command_timeout_ms: {}", env.command_timeout_ms);
            let _ = writeln!(out, "poll.max_retries:   {}", env.poll.max_retries);
            let _ = writeln!(out, "poll.interval_ms:   {}", env.poll.interval_ms);
            Ok(out)
        }
    }
}

/// Execute the env command
pub fn execute_env(config: Option<&Path>, args: &EnvArgs) -> CliResult<()> {
    let env = load_environment(config)?;
    let rendered = render_environment(&env, args.format.into())?;
    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use ocwait::{ENV_BASE_URL, ENV_LOGIN_USERS, ENV_POLL_MAX_RETRIES};
    use std::io::Write;

    fn sample() -> TestEnvironment {
        load_environment_with(None, |key| match key {
            ENV_BASE_URL => Some("https://console-openshift-console.apps.demo.example.com".into()),
            ENV_LOGIN_USERS => Some("kubeadmin:s3cret,dev:dev".into()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn test_text_hides_password() {
        let text = render_environment(&sample(), OutputFormat::Text).unwrap();
        assert!(text.contains("kubeadmin (password redacted)"));
        assert!(text.contains("https://api.demo.example.com:6443"));
        assert!(text.contains("kubeconfig:         (unset)"));
        assert!(!text.contains("s3cret"));
    }

    #[test]
    fn test_json_hides_password() {
        let json = render_environment(&sample(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["login"]["username"], "kubeadmin");
        assert!(value["login"].get("password").is_none());
        assert_eq!(value["poll"]["max_retries"], 3);
    }

    #[test]
    fn test_variables_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "command_timeout_ms: 5000\npoll:\n  max_retries: 9\n  interval_ms: 250").unwrap();
        let env = load_environment_with(Some(file.path()), |key| {
            (key == ENV_POLL_MAX_RETRIES).then(|| "2".to_string())
        })
        .unwrap();
        assert_eq!(env.command_timeout_ms, 5000);
        assert_eq!(env.poll.max_retries, 2);
        assert_eq!(env.poll.interval_ms, 250);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_environment_with(Some(Path::new("/nonexistent/ocwait.yaml")), |_| None);
        assert!(result.is_err());
    }
}
