use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::OsFamily;
use crate::cli::{RetryPolicy, CLI_TIMEOUT_SECS, DEFAULT_PROGRAM};

/// Where ironic reads its configuration on a typical install
pub const DEFAULT_IRONIC_CONF: &str = "/etc/ironic/ironic.conf";

/// ironicctl's own settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IronicctlConfig {
    /// ironic.conf holding `[keystone_authtoken]`
    pub ironic_conf: PathBuf,
    /// ironic CLI executable
    pub program: String,
    /// Per-attempt timeout
    pub timeout_secs: u64,
    /// Default family for catalog commands
    pub os_family: OsFamily,
    /// Default catalog parameters file
    pub params: Option<PathBuf>,
    pub retry: RetryPolicy,
}

impl Default for IronicctlConfig {
    fn default() -> Self {
        Self {
            ironic_conf: PathBuf::from(DEFAULT_IRONIC_CONF),
            program: DEFAULT_PROGRAM.to_string(),
            timeout_secs: CLI_TIMEOUT_SECS,
            os_family: OsFamily::default(),
            params: None,
            retry: RetryPolicy::default(),
        }
    }
}

impl IronicctlConfig {
    /// Load from `path`, or ~/.ironicctl/config.toml when `None`.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .context(format!("Failed to read config file: {:?}", config_path))?;

        Self::from_toml(&content)
            .context(format!("Failed to parse config file: {:?}", config_path))
    }

    /// Parse TOML and expand `${VAR}` references
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).context("invalid TOML")?;
        config.expand_variables();
        Ok(config)
    }

    /// Get config file path: ~/.ironicctl/config.toml
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ironicctl/config.toml")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn expand_variables(&mut self) {
        self.ironic_conf = PathBuf::from(expand_string(&self.ironic_conf.display().to_string()));
        self.program = expand_string(&self.program);
        if let Some(ref params) = self.params {
            self.params = Some(PathBuf::from(expand_string(&params.display().to_string())));
        }
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(path, toml_str).context(format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }
}

/// Expand ${VAR} references from the environment; unknown variables expand
/// to the empty string
fn expand_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                result.push_str(&env::var(&after[..end]).unwrap_or_default());
                rest = &after[end + 1..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    result.push_str(rest);
    result
}
