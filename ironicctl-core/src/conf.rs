//! Apply catalog config entries to an `ironic.conf` document

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::catalog::{Catalog, ConfigEntry, REDACTED};
use crate::credentials::AUTH_SECTION;
use crate::ini::IniDocument;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Change {
    Added {
        path: String,
        value: String,
    },
    Updated {
        path: String,
        old: String,
        new: String,
    },
    Removed {
        path: String,
        old: String,
    },
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { path, value } => write!(f, "+ {} = {}", path, value),
            Self::Updated { path, old, new } => write!(f, "~ {}: {} -> {}", path, old, new),
            Self::Removed { path, old } => write!(f, "- {} (was {})", path, old),
        }
    }
}

fn shown(entry: &ConfigEntry, raw: &str) -> String {
    if entry.secret {
        REDACTED.to_string()
    } else {
        raw.to_string()
    }
}

/// Apply one entry, returning the change it caused (if any)
pub fn apply_entry(doc: &mut IniDocument, entry: &ConfigEntry) -> Option<Change> {
    let path = entry.path();
    let current = doc.get(&entry.section, &entry.key).map(str::to_string);

    if entry.value.is_service_default() {
        let old = doc.remove(&entry.section, &entry.key)?;
        return Some(Change::Removed {
            old: shown(entry, &old),
            path,
        });
    }

    let desired = entry.value.as_str();
    match current {
        Some(ref old) if old == desired => None,
        Some(old) => {
            doc.set(&entry.section, &entry.key, desired);
            Some(Change::Updated {
                old: shown(entry, &old),
                new: entry.shown_value().to_string(),
                path,
            })
        }
        None => {
            doc.set(&entry.section, &entry.key, desired);
            Some(Change::Added {
                value: entry.shown_value().to_string(),
                path,
            })
        }
    }
}

/// Bring `doc` in line with the catalog's config entries.
///
/// With `purge_config`, options the catalog does not manage are removed and
/// their old values are never shown. `[keystone_authtoken]` is never purged:
/// the credentials there are what the CLI wrapper authenticates with.
pub fn apply(doc: &mut IniDocument, catalog: &Catalog) -> Vec<Change> {
    let mut changes: Vec<Change> = catalog
        .config
        .iter()
        .filter_map(|entry| apply_entry(doc, entry))
        .collect();

    if catalog.purge_config {
        let managed: BTreeSet<(&str, &str)> = catalog
            .config
            .iter()
            .map(|e| (e.section.as_str(), e.key.as_str()))
            .collect();

        for (section, key) in doc.keys() {
            if section == AUTH_SECTION || managed.contains(&(section.as_str(), key.as_str())) {
                continue;
            }
            if doc.remove(&section, &key).is_some() {
                changes.push(Change::Removed {
                    path: format!("{}/{}", section, key),
                    // unmanaged keys may hold credentials
                    old: REDACTED.to_string(),
                });
            }
        }
    }

    for change in &changes {
        info!(change = %change, "ironic.conf");
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogParams, OsFamily};

    const CONF: &str = "\
[DEFAULT]
auth_strategy = noauth
my_ip = 10.0.0.5
custom = keep-me

[database]
connection = sqlite:////old.sqlite
";

    fn catalog(toml: &str) -> Catalog {
        Catalog::build(&CatalogParams::from_toml(toml).unwrap(), OsFamily::Debian).unwrap()
    }

    #[test]
    fn test_apply_sets_updates_and_removes() {
        let mut doc = IniDocument::parse(CONF).unwrap();
        let catalog = catalog(
            "[ironic]\ndatabase_connection = \"mysql://u:pw@db/ironic\"\ndatabase_max_retries = 10\n",
        );

        let changes = apply(&mut doc, &catalog);

        assert_eq!(doc.get("DEFAULT", "auth_strategy"), Some("keystone"));
        assert_eq!(doc.get("DEFAULT", "my_ip"), None);
        assert_eq!(doc.get("DEFAULT", "custom"), Some("keep-me"));
        assert_eq!(doc.get("database", "connection"), Some("mysql://u:pw@db/ironic"));
        assert_eq!(doc.get("database", "max_retries"), Some("10"));

        assert!(changes.contains(&Change::Updated {
            path: "DEFAULT/auth_strategy".into(),
            old: "noauth".into(),
            new: "keystone".into(),
        }));
        assert!(changes.contains(&Change::Removed {
            path: "DEFAULT/my_ip".into(),
            old: "10.0.0.5".into(),
        }));
        assert!(changes.contains(&Change::Added {
            path: "database/max_retries".into(),
            value: "10".into(),
        }));
    }

    #[test]
    fn test_secret_values_never_shown() {
        let mut doc = IniDocument::parse(CONF).unwrap();
        let catalog = catalog("[ironic]\ndatabase_connection = \"mysql://u:hunter2@db/ironic\"\n");

        let shown: Vec<String> = apply(&mut doc, &catalog)
            .iter()
            .map(ToString::to_string)
            .collect();
        let joined = shown.join("\n");
        assert!(!joined.contains("hunter2"));
        assert!(!joined.contains("old.sqlite"));
        assert!(joined.contains("~ database/connection: [redacted] -> [redacted]"));
    }

    #[test]
    fn test_second_apply_is_noop() {
        let mut doc = IniDocument::parse(CONF).unwrap();
        let catalog = catalog("[conductor]\n");
        assert!(!apply(&mut doc, &catalog).is_empty());
        assert!(apply(&mut doc, &catalog).is_empty());
    }

    #[test]
    fn test_purge_removes_unmanaged_keys() {
        let mut doc = IniDocument::parse(CONF).unwrap();
        let catalog = catalog("[ironic]\npurge_config = true\n");

        let changes = apply(&mut doc, &catalog);
        assert_eq!(doc.get("DEFAULT", "custom"), None);
        assert!(changes.contains(&Change::Removed {
            path: "DEFAULT/custom".into(),
            old: REDACTED.into(),
        }));
        assert_eq!(doc.get("DEFAULT", "auth_strategy"), Some("keystone"));
    }

    #[test]
    fn test_purge_keeps_credentials() {
        let text = format!(
            "{}\n[keystone_authtoken]\nproject_name = admin_tenant\nusername = admin\n\
             password = password\nauth_url = https://192.168.56.210:5000/\n\
             project_domain_name = admin_tenant_domain\nuser_domain_name = admin_domain\n",
            CONF
        );
        let mut doc = IniDocument::parse(&text).unwrap();
        let catalog = catalog("[ironic]\npurge_config = true\n");

        let changes = apply(&mut doc, &catalog);
        assert!(changes
            .iter()
            .all(|c| !c.to_string().contains("keystone_authtoken")));

        let creds = crate::credentials::Credentials::from_sections(&doc.sections()).unwrap();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password, "password");
    }
}
