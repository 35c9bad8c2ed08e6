//! Authenticated access to the ironic CLI
//!
//! `IronicProvider` ties the pieces together: resolve credentials (fatal
//! before anything runs), invoke with the auth environment and retry policy,
//! then post-process the tabular output.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{debug, instrument};

use crate::cli::{invoke_with_retry, CliInvoker, RetryPolicy, CLI_TIMEOUT_SECS};
use crate::credentials::{ConfigSource, CredentialResolver};
use crate::error::Result;

pub struct IronicProvider<S, I> {
    resolver: CredentialResolver<S>,
    invoker: I,
    policy: RetryPolicy,
    timeout: Duration,
}

impl<S: ConfigSource, I: CliInvoker> IronicProvider<S, I> {
    pub fn new(source: S, invoker: I) -> Self {
        Self {
            resolver: CredentialResolver::new(source),
            invoker,
            policy: RetryPolicy::default(),
            timeout: Duration::from_secs(CLI_TIMEOUT_SECS),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    pub fn resolver(&self) -> &CredentialResolver<S> {
        &self.resolver
    }

    /// Drop cached configuration; the next call re-reads credentials
    pub fn reset(&mut self) {
        self.resolver.clear();
    }

    /// Run the ironic CLI with Keystone credentials, returning stdout
    #[instrument(skip(self))]
    pub async fn auth_ironic(&mut self, args: &[String]) -> Result<String> {
        let env = self.resolver.resolve()?.to_env();
        let output =
            invoke_with_retry(&self.invoker, args, &env, &self.policy, self.timeout).await?;
        Ok(output.stdout)
    }

    /// Ids of every resource of `kind` (e.g. `node`, `port`)
    pub async fn list_resources(&mut self, kind: &str) -> Result<Vec<String>> {
        let args = vec![
            format!("{}-list", kind),
            "--format=csv".to_string(),
            "--column=id".to_string(),
            "--quote=none".to_string(),
        ];
        let output = self.auth_ironic(&args).await?;
        let ids = parse_list_output(&output);
        debug!(kind, count = ids.len(), "listed ironic resources");
        Ok(ids)
    }

    /// Attributes of one resource
    pub async fn show_resource(&mut self, kind: &str, id: &str) -> Result<BTreeMap<String, String>> {
        let args = vec![
            format!("{}-show", kind),
            id.to_string(),
            "--format=shell".to_string(),
        ];
        let output = self.auth_ironic(&args).await?;
        Ok(parse_shell_output(&output))
    }
}

/// Resource ids from list output: blank lines and the header are dropped
pub fn parse_list_output(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .skip(1)
        .map(str::to_string)
        .collect()
}

/// `key="value"` pairs from `--format=shell` output
pub fn parse_shell_output(output: &str) -> BTreeMap<String, String> {
    output
        .lines()
        .filter_map(|line| {
            let (key, value) = line.trim().split_once('=')?;
            let key = key.trim();
            if key.is_empty() || key.contains(char::is_whitespace) {
                return None;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}
