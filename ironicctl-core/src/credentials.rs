//! Keystone credential resolution from `ironic.conf`
//!
//! The resolver owns its configuration cache explicitly:
//! - `load` reads through the cache
//! - `resolve` validates `[keystone_authtoken]` and returns a [`Credentials`]
//! - `clear` drops the cache so the next `resolve` re-reads the source
//!
//! A fresh resolver per invocation context gives full isolation without any
//! process-wide state.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IronicError, Result};
use crate::ini::{ConfigSections, IniDocument};

/// Section holding the service credentials
pub const AUTH_SECTION: &str = "keystone_authtoken";

/// Required keys, paired with the environment variable each one feeds
pub const CREDENTIAL_ENV: [(&str, &str); 6] = [
    ("project_name", "OS_PROJECT_NAME"),
    ("username", "OS_USERNAME"),
    ("password", "OS_PASSWORD"),
    ("auth_url", "OS_AUTH_URL"),
    ("project_domain_name", "OS_PROJECT_DOMAIN_NAME"),
    ("user_domain_name", "OS_USER_DOMAIN_NAME"),
];

/// Validated Keystone credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub project_name: String,
    pub username: String,
    pub password: String,
    pub auth_url: String,
    pub project_domain_name: String,
    pub user_domain_name: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("project_name", &self.project_name)
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("auth_url", &self.auth_url)
            .field("project_domain_name", &self.project_domain_name)
            .field("user_domain_name", &self.user_domain_name)
            .finish()
    }
}

impl Credentials {
    /// Validate the `keystone_authtoken` section of a parsed config
    pub fn from_sections(conf: &ConfigSections) -> Result<Self> {
        if conf.is_empty() {
            return Err(IronicError::credentials("configuration is empty"));
        }

        let section = conf.get(AUTH_SECTION).ok_or_else(|| {
            IronicError::credentials(format!("section [{}] is missing", AUTH_SECTION))
        })?;

        let missing: Vec<&str> = CREDENTIAL_ENV
            .iter()
            .map(|(key, _)| *key)
            .filter(|key| section.get(*key).map_or(true, |v| v.trim().is_empty()))
            .collect();

        if !missing.is_empty() {
            return Err(IronicError::credentials(format!(
                "[{}] lacks {}",
                AUTH_SECTION,
                missing.join(", ")
            )));
        }

        let field = |key: &str| section.get(key).cloned().unwrap_or_default();
        Ok(Self {
            project_name: field("project_name"),
            username: field("username"),
            password: field("password"),
            auth_url: field("auth_url"),
            project_domain_name: field("project_domain_name"),
            user_domain_name: field("user_domain_name"),
        })
    }

    /// Materialize as the OpenStack client environment
    pub fn to_env(&self) -> AuthEnv {
        let value = |key: &str| match key {
            "project_name" => &self.project_name,
            "username" => &self.username,
            "password" => &self.password,
            "auth_url" => &self.auth_url,
            "project_domain_name" => &self.project_domain_name,
            _ => &self.user_domain_name,
        };

        AuthEnv {
            vars: CREDENTIAL_ENV
                .iter()
                .map(|(key, var)| (*var, value(key).clone()))
                .collect(),
        }
    }
}

/// Environment handed to a single CLI invocation.
///
/// Applied to the child process only; the parent environment is untouched.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthEnv {
    vars: Vec<(&'static str, String)>,
}

impl AuthEnv {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.vars.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.iter().find(|(k, _)| *k == name).map(|(_, v)| v)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.vars.iter().map(|(k, _)| *k).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl fmt::Debug for AuthEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Where the resolver reads configuration from
pub trait ConfigSource: Send + Sync {
    fn load(&self) -> Result<ConfigSections>;
}

/// `ironic.conf` on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for FileSource {
    fn load(&self) -> Result<ConfigSections> {
        // A missing file reads as an empty config
        if !self.path.exists() {
            debug!(path = %self.path.display(), "ironic.conf not found");
            return Ok(ConfigSections::new());
        }
        Ok(IniDocument::load(&self.path)?.sections())
    }
}

/// Configuration held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticSource(pub ConfigSections);

impl ConfigSource for StaticSource {
    fn load(&self) -> Result<ConfigSections> {
        Ok(self.0.clone())
    }
}

/// Cached credential lookup over a [`ConfigSource`]
pub struct CredentialResolver<S> {
    source: S,
    cache: Option<ConfigSections>,
}

impl<S: ConfigSource> CredentialResolver<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: None,
        }
    }

    /// Parsed configuration, read from the source on first use
    pub fn load(&mut self) -> Result<&ConfigSections> {
        let conf = match self.cache.take() {
            Some(conf) => conf,
            None => self.source.load()?,
        };
        let conf: &ConfigSections = self.cache.insert(conf);
        Ok(conf)
    }

    pub fn resolve(&mut self) -> Result<Credentials> {
        Credentials::from_sections(self.load()?)
    }

    pub fn clear(&mut self) {
        self.cache = None;
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    pub(crate) fn credential_sections() -> ConfigSections {
        let auth: BTreeMap<String, String> = [
            ("project_name", "admin_tenant"),
            ("username", "admin"),
            ("password", "password"),
            ("auth_url", "https://192.168.56.210:5000/"),
            ("project_domain_name", "admin_tenant_domain"),
            ("user_domain_name", "admin_domain"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let mut conf = ConfigSections::new();
        conf.insert(AUTH_SECTION.to_string(), auth);
        conf
    }

    fn assert_credential_error(conf: ConfigSections) {
        let err = Credentials::from_sections(&conf).unwrap_err();
        assert!(matches!(err, IronicError::Credentials { .. }));
        assert!(err.to_string().contains("will not work"), "{}", err);
    }

    #[test]
    fn test_fails_if_config_empty() {
        assert_credential_error(ConfigSections::new());
    }

    #[test]
    fn test_fails_without_keystone_authtoken() {
        let mut conf = ConfigSections::new();
        conf.insert(
            "foo".into(),
            BTreeMap::from([("bar".to_string(), "baz".to_string())]),
        );
        assert_credential_error(conf);
    }

    #[test]
    fn test_fails_without_all_auth_params() {
        let mut conf = ConfigSections::new();
        conf.insert(
            AUTH_SECTION.into(),
            BTreeMap::from([("invalid_value".to_string(), "foo".to_string())]),
        );
        assert_credential_error(conf);
    }

    #[test]
    fn test_fails_on_each_missing_or_empty_key() {
        for (key, _) in CREDENTIAL_ENV {
            let mut conf = credential_sections();
            conf.get_mut(AUTH_SECTION).unwrap().remove(key);
            let err = Credentials::from_sections(&conf).unwrap_err();
            assert!(err.to_string().contains(key));

            let mut conf = credential_sections();
            conf.get_mut(AUTH_SECTION)
                .unwrap()
                .insert(key.to_string(), "  ".to_string());
            assert_credential_error(conf);
        }
    }

    #[test]
    fn test_env_mapping() {
        let creds = Credentials::from_sections(&credential_sections()).unwrap();
        let env = creds.to_env();
        assert_eq!(env.get("OS_PROJECT_NAME"), Some("admin_tenant"));
        assert_eq!(env.get("OS_USERNAME"), Some("admin"));
        assert_eq!(env.get("OS_PASSWORD"), Some("password"));
        assert_eq!(env.get("OS_AUTH_URL"), Some("https://192.168.56.210:5000/"));
        assert_eq!(env.get("OS_PROJECT_DOMAIN_NAME"), Some("admin_tenant_domain"));
        assert_eq!(env.get("OS_USER_DOMAIN_NAME"), Some("admin_domain"));
        assert_eq!(env.names().len(), 6);
    }

    #[test]
    fn test_debug_hides_password() {
        let creds = Credentials::from_sections(&credential_sections()).unwrap();
        let shown = format!("{:?} {:?}", creds, creds.to_env());
        assert!(!shown.contains("\"password\""));
        assert!(shown.contains("[redacted]"));
        assert!(shown.contains("OS_PASSWORD"));
    }

    struct CountingSource {
        loads: Arc<AtomicUsize>,
    }

    impl ConfigSource for CountingSource {
        fn load(&self) -> Result<ConfigSections> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(credential_sections())
        }
    }

    #[test]
    fn test_resolver_caches_until_cleared() {
        let loads = Arc::new(AtomicUsize::new(0));
        let mut resolver = CredentialResolver::new(CountingSource {
            loads: loads.clone(),
        });

        resolver.resolve().unwrap();
        resolver.resolve().unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        resolver.clear();
        assert!(!resolver.is_cached());
        resolver.resolve().unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_file_source_reads_and_rereads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ironic.conf");
        std::fs::write(&path, "[keystone_authtoken]\nusername = a\n").unwrap();

        let mut resolver = CredentialResolver::new(FileSource::new(&path));
        assert!(resolver.resolve().is_err());

        std::fs::write(
            &path,
            "[keystone_authtoken]\nproject_name = p\nusername = u\npassword = pw\n\
             auth_url = http://k:5000\nproject_domain_name = pd\nuser_domain_name = ud\n",
        )
        .unwrap();

        // stale cache until cleared
        assert!(resolver.resolve().is_err());
        resolver.clear();
        assert_eq!(resolver.resolve().unwrap().username, "u");
    }

    #[test]
    fn test_missing_file_is_empty_config() {
        let mut resolver = CredentialResolver::new(FileSource::new("/nonexistent/ironic.conf"));
        let err = resolver.resolve().unwrap_err();
        assert!(err.to_string().contains("configuration is empty"));
    }
}
