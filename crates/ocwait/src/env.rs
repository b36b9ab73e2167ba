//! Test environment configuration.
//!
//! Loaded once per test run from the process environment and/or a YAML file,
//! then passed by reference to whatever builds a probe. Nothing in the crate
//! reads environment variables on its own.

use crate::cluster::DEFAULT_COMMAND_TIMEOUT_MS;
use crate::poll::PollConfig;
use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Kubeconfig used for admin commands
pub const ENV_KUBECONFIG: &str = "KUBECONFIG_PATH";
/// Console base URL
pub const ENV_BASE_URL: &str = "BASE_URL";
/// API server URL (derived from the console URL when unset)
pub const ENV_HOST_API: &str = "HOST_API";
/// Comma-separated `user:password` list; the first entry is used
pub const ENV_LOGIN_USERS: &str = "LOGIN_USERS";
/// Per-command timeout in milliseconds
pub const ENV_COMMAND_TIMEOUT_MS: &str = "COMMAND_TIMEOUT_MS";
/// Default poll retries
pub const ENV_POLL_MAX_RETRIES: &str = "POLL_MAX_RETRIES";
/// Default poll interval in milliseconds
pub const ENV_POLL_INTERVAL_MS: &str = "POLL_INTERVAL_MS";

const CONSOLE_HOST_PREFIX: &str = "console-openshift-console.apps";
const API_PORT: u16 = 6443;

/// Credentials of the first configured console user
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    /// Username
    pub username: String,
    /// Password (never serialized or printed)
    #[serde(skip_serializing, default)]
    pub password: String,
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl LoginCredentials {
    /// Parse the first `user:password` entry of a comma-separated list
    pub fn parse_first(users: &str) -> ProbeResult<Self> {
        let first = users.split(',').next().unwrap_or_default().trim();
        match first.split_once(':') {
            Some((username, password)) if !username.is_empty() => Ok(Self {
                username: username.to_string(),
                password: password.to_string(),
            }),
            _ => Err(ProbeError::config(format!(
                "{ENV_LOGIN_USERS} must look like user:password[,user:password...]"
            ))),
        }
    }
}

/// Everything a test run needs to reach the cluster and the console
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestEnvironment {
    /// Kubeconfig appended to admin commands
    pub kubeconfig: Option<PathBuf>,
    /// Console base URL
    pub console_url: Option<String>,
    /// API server URL
    pub api_url: Option<String>,
    /// First console user
    pub login: Option<LoginCredentials>,
    /// Per-command timeout in milliseconds
    pub command_timeout_ms: u64,
    /// Default poll budget
    pub poll: PollConfig,
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self {
            kubeconfig: None,
            console_url: None,
            api_url: None,
            login: None,
            command_timeout_ms: DEFAULT_COMMAND_TIMEOUT_MS,
            poll: PollConfig::default(),
        }
    }
}

impl TestEnvironment {
    /// Load from the process environment
    pub fn from_env() -> ProbeResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup
    pub fn from_lookup<F>(lookup: F) -> ProbeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().overlay(lookup)
    }

    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> ProbeResult<Self> {
        let env: Self = serde_yaml_ng::from_str(yaml)?;
        env.validate()?;
        Ok(env)
    }

    /// Load a YAML file
    pub fn from_file(path: &Path) -> ProbeResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Override fields with values present in `lookup` (empty values count as absent)
    pub fn overlay<F>(mut self, lookup: F) -> ProbeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get(ENV_KUBECONFIG) {
            self.kubeconfig = Some(PathBuf::from(path));
        }
        if let Some(url) = get(ENV_BASE_URL) {
            self.console_url = Some(url.trim_end_matches('/').to_string());
        }
        if let Some(api) = get(ENV_HOST_API) {
            self.api_url = Some(api);
        } else if self.api_url.is_none() {
            self.api_url = self.console_url.as_deref().and_then(derive_api_url);
        }
        if let Some(users) = get(ENV_LOGIN_USERS) {
            self.login = Some(LoginCredentials::parse_first(&users)?);
        }
        if let Some(ms) = get(ENV_COMMAND_TIMEOUT_MS) {
            self.command_timeout_ms = parse_number(ENV_COMMAND_TIMEOUT_MS, &ms)?;
        }
        if let Some(n) = get(ENV_POLL_MAX_RETRIES) {
            self.poll.max_retries = parse_number(ENV_POLL_MAX_RETRIES, &n)?;
        }
        if let Some(ms) = get(ENV_POLL_INTERVAL_MS) {
            self.poll.interval_ms = parse_number(ENV_POLL_INTERVAL_MS, &ms)?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Check the loaded values are usable
    pub fn validate(&self) -> ProbeResult<()> {
        if self.command_timeout_ms == 0 {
            return Err(ProbeError::config(format!(
                "{ENV_COMMAND_TIMEOUT_MS} must be greater than 0"
            )));
        }
        self.poll.validate()
    }

    /// Per-command timeout
    #[must_use]
    pub const fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

/// `https://console-openshift-console.apps.<cluster>` → `https://api.<cluster>:6443`
#[must_use]
pub fn derive_api_url(console_url: &str) -> Option<String> {
    let trimmed = console_url.trim_end_matches('/');
    trimmed
        .contains(CONSOLE_HOST_PREFIX)
        .then(|| format!("{}:{API_PORT}", trimmed.replacen(CONSOLE_HOST_PREFIX, "api", 1)))
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> ProbeResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ProbeError::config(format!("{key} must be a number, got {value:?}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    mod from_lookup {
        use super::*;

        #[test]
        fn test_empty_environment_uses_defaults() {
            let env = TestEnvironment::from_lookup(|_| None).unwrap();
            assert_eq!(env, TestEnvironment::default());
            assert_eq!(env.command_timeout(), Duration::from_secs(60));
        }

        #[test]
        fn test_full_environment() {
            let env = TestEnvironment::from_lookup(lookup(&[
                (ENV_KUBECONFIG, "/run/kubeconfig"),
                (ENV_BASE_URL, "https://console-openshift-console.apps.ci.example.com/"),
                (ENV_LOGIN_USERS, "uiauto1:pass1,uiauto2:pass2"),
                (ENV_POLL_MAX_RETRIES, "6"),
                (ENV_POLL_INTERVAL_MS, "15000"),
            ]))
            .unwrap();
            assert_eq!(env.kubeconfig, Some(PathBuf::from("/run/kubeconfig")));
            assert_eq!(
                env.console_url.as_deref(),
                Some("https://console-openshift-console.apps.ci.example.com")
            );
            assert_eq!(env.api_url.as_deref(), Some("https://api.ci.example.com:6443"));
            let login = env.login.unwrap();
            assert_eq!(login.username, "uiauto1");
            assert_eq!(login.password, "pass1");
            assert_eq!(env.poll, PollConfig::new(6, Duration::from_secs(15)));
        }

        #[test]
        fn test_host_api_overrides_derivation() {
            let env = TestEnvironment::from_lookup(lookup(&[
                (ENV_BASE_URL, "https://console-openshift-console.apps.a.b"),
                (ENV_HOST_API, "https://api.elsewhere:6443"),
            ]))
            .unwrap();
            assert_eq!(env.api_url.as_deref(), Some("https://api.elsewhere:6443"));
        }

        #[test]
        fn test_blank_values_are_ignored() {
            let env = TestEnvironment::from_lookup(lookup(&[(ENV_KUBECONFIG, "  ")])).unwrap();
            assert!(env.kubeconfig.is_none());
        }

        #[test]
        fn test_bad_number_is_config_error() {
            let err = TestEnvironment::from_lookup(lookup(&[(ENV_POLL_MAX_RETRIES, "lots")]))
                .unwrap_err();
            assert!(err.to_string().contains(ENV_POLL_MAX_RETRIES));
        }

        #[test]
        fn test_zero_interval_rejected() {
            let err = TestEnvironment::from_lookup(lookup(&[(ENV_POLL_INTERVAL_MS, "0")]))
                .unwrap_err();
            assert!(matches!(err, ProbeError::InvalidConfig { .. }));
        }

        #[test]
        fn test_malformed_login_users() {
            let err = TestEnvironment::from_lookup(lookup(&[(ENV_LOGIN_USERS, "nopassword")]))
                .unwrap_err();
            assert!(matches!(err, ProbeError::Config { .. }));
        }
    }

    mod api_url {
        use super::*;

        #[test]
        fn test_derived_from_console_host() {
            assert_eq!(
                derive_api_url("https://console-openshift-console.apps.x.y.com").as_deref(),
                Some("https://api.x.y.com:6443")
            );
        }

        #[test]
        fn test_unknown_host_shape_is_not_guessed() {
            assert!(derive_api_url("https://localhost:9000").is_none());
        }
    }

    mod credentials {
        use super::*;

        #[test]
        fn test_debug_redacts_password() {
            let login = LoginCredentials::parse_first("kubeadmin:s3cret").unwrap();
            let debug = format!("{login:?}");
            assert!(debug.contains("kubeadmin"));
            assert!(!debug.contains("s3cret"));
        }

        #[test]
        fn test_password_not_serialized() {
            let login = LoginCredentials::parse_first("kubeadmin:s3cret").unwrap();
            let json = serde_json::to_string(&login).unwrap();
            assert!(!json.contains("s3cret"));
        }

        #[test]
        fn test_password_may_contain_colons() {
            let login = LoginCredentials::parse_first("u:a:b").unwrap();
            assert_eq!(login.password, "a:b");
        }
    }

    mod yaml {
        use super::*;

        #[test]
        fn test_from_file_then_env_overlay() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(
                file,
                "kubeconfig: /etc/kc\nconsole_url: https://console-openshift-console.apps.f.g\npoll:\n  max_retries: 2\n"
            )
            .unwrap();
            let env = TestEnvironment::from_file(file.path())
                .unwrap()
                .overlay(lookup(&[(ENV_KUBECONFIG, "/override/kc")]))
                .unwrap();
            assert_eq!(env.kubeconfig, Some(PathBuf::from("/override/kc")));
            assert_eq!(env.api_url.as_deref(), Some("https://api.f.g:6443"));
            assert_eq!(env.poll.max_retries, 2);
            assert_eq!(env.poll.interval_ms, crate::poll::DEFAULT_RETRY_INTERVAL_MS);
        }

        #[test]
        fn test_missing_file_is_io_error() {
            let err = TestEnvironment::from_file(Path::new("/nonexistent/ocwait.yaml")).unwrap_err();
            assert!(matches!(err, ProbeError::Io(_)));
        }

        #[test]
        fn test_invalid_yaml() {
            let err = TestEnvironment::from_yaml_str("poll: [1, 2").unwrap_err();
            assert!(matches!(err, ProbeError::Yaml(_)));
        }
    }
}
