//! Resource types making up a catalog

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Sentinel meaning "leave this option to the service's own default"
pub const SERVICE_DEFAULT: &str = "<SERVICE DEFAULT>";

/// Shown instead of secret values
pub const REDACTED: &str = "[redacted]";

/// Tags carried by every package resource
pub const PACKAGE_TAGS: [&str; 2] = ["openstack", "ironic-package"];

/// Tag carried by every service resource
pub const SERVICE_TAG: &str = "ironic-service";

/// Desired value of one `ironic.conf` option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    ServiceDefault,
    Value(String),
}

impl ConfigValue {
    pub fn is_service_default(&self) -> bool {
        matches!(self, Self::ServiceDefault)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::ServiceDefault => SERVICE_DEFAULT,
            Self::Value(v) => v,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        if value == SERVICE_DEFAULT {
            Self::ServiceDefault
        } else {
            Self::Value(value.to_string())
        }
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Value(value.to_string())
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Value(value.to_string())
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::ServiceDefault, Into::into)
    }
}

/// Loosely typed parameter value as written in the params file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Setting {
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<String>),
}

impl From<&Setting> for ConfigValue {
    fn from(setting: &Setting) -> Self {
        match setting {
            Setting::Bool(b) => (*b).into(),
            Setting::Int(n) => (*n).into(),
            Setting::Text(s) => s.as_str().into(),
            Setting::List(items) => items.join(",").into(),
        }
    }
}

impl From<Setting> for ConfigValue {
    fn from(setting: Setting) -> Self {
        (&setting).into()
    }
}

/// One managed `section/key` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub section: String,
    pub key: String,
    pub value: ConfigValue,
    /// Value must never appear in logs or diffs
    pub secret: bool,
}

impl ConfigEntry {
    pub fn new(path: &str, value: impl Into<ConfigValue>) -> Self {
        let (section, key) = path.split_once('/').unwrap_or(("DEFAULT", path));
        Self {
            section: section.to_string(),
            key: key.to_string(),
            value: value.into(),
            secret: false,
        }
    }

    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// `section/key`
    pub fn path(&self) -> String {
        format!("{}/{}", self.section, self.key)
    }

    /// Value safe for display
    pub fn shown_value(&self) -> &str {
        if self.secret && !self.value.is_service_default() {
            REDACTED
        } else {
            self.value.as_str()
        }
    }
}

impl fmt::Display for ConfigEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.path(), self.shown_value())
    }
}

impl Serialize for ConfigEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ConfigEntry", 4)?;
        state.serialize_field("section", &self.section)?;
        state.serialize_field("key", &self.key)?;
        state.serialize_field("value", self.shown_value())?;
        state.serialize_field("secret", &self.secret)?;
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    pub title: String,
    pub name: String,
    pub ensure: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub before: Vec<String>,
}

impl Package {
    pub fn new(title: &str, name: &str, ensure: &str) -> Self {
        Self {
            title: title.to_string(),
            name: name.to_string(),
            ensure: ensure.to_string(),
            tags: PACKAGE_TAGS.iter().map(|t| t.to_string()).collect(),
            before: Vec::new(),
        }
    }

    pub fn before(mut self, resource: impl Into<String>) -> Self {
        self.before.push(resource.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceEnsure {
    Running,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    pub title: String,
    pub name: String,
    pub enable: bool,
    pub ensure: ServiceEnsure,
    pub hasstatus: bool,
    pub tag: String,
}

impl Service {
    pub fn new(title: &str, name: &str, enabled: bool) -> Self {
        Self {
            title: title.to_string(),
            name: name.to_string(),
            enable: enabled,
            ensure: if enabled {
                ServiceEnsure::Running
            } else {
                ServiceEnsure::Stopped
            },
            hasstatus: true,
            tag: SERVICE_TAG.to_string(),
        }
    }

    /// Reference used in ordering edges, e.g. `Service[ironic-conductor]`
    pub fn reference(&self) -> String {
        format!("Service[{}]", self.title)
    }
}
