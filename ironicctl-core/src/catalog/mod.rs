//! Desired state of an ironic deployment
//!
//! A [`Catalog`] lists the packages, services and `ironic.conf` entries that
//! a set of [`CatalogParams`] calls for. It is pure data: installing packages
//! and starting services is left to the host's own tooling, while the config
//! entries can be written with [`crate::conf::apply`].

mod conductor;
mod ipmi;
mod ironic;
pub mod params;
pub mod platform;
pub mod types;

use serde::Serialize;

pub use params::{CatalogParams, ConductorParams, DriversParams, IpmiParams, IronicParams};
pub use platform::{OsFamily, PlatformNames};
pub use types::{
    ConfigEntry, ConfigValue, Package, Service, ServiceEnsure, Setting, REDACTED, SERVICE_DEFAULT,
};

use crate::error::{IronicError, Result};

#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    pub packages: Vec<Package>,
    pub services: Vec<Service>,
    pub config: Vec<ConfigEntry>,
    /// Remove `ironic.conf` options the catalog does not manage
    pub purge_config: bool,
}

impl Catalog {
    pub fn build(params: &CatalogParams, family: OsFamily) -> Result<Self> {
        let names = family.names();
        let mut catalog = Self::default();

        ironic::declare(&mut catalog, &params.ironic, &names)?;
        if let Some(conductor) = &params.conductor {
            conductor::declare(&mut catalog, conductor, &names)?;
        }
        if let Some(ipmi) = &params.drivers.ipmi {
            ipmi::declare(&mut catalog, ipmi);
        }
        catalog.check_values()?;

        tracing::debug!(
            packages = catalog.packages.len(),
            services = catalog.services.len(),
            config = catalog.config.len(),
            %family,
            "built catalog"
        );
        Ok(catalog)
    }

    /// Every concrete value must read back from ironic.conf unchanged
    fn check_values(&self) -> Result<()> {
        for entry in &self.config {
            let ConfigValue::Value(value) = &entry.value else {
                continue;
            };
            if value.contains(['\n', '\r']) {
                return Err(IronicError::params(
                    entry.path(),
                    "value must fit on a single line",
                ));
            }
            if value.trim() != value {
                return Err(IronicError::params(
                    entry.path(),
                    "value has leading or trailing whitespace",
                ));
            }
        }
        Ok(())
    }

    /// Entry for `section/key`
    pub fn config_entry(&self, path: &str) -> Option<&ConfigEntry> {
        let (section, key) = path.split_once('/')?;
        self.config
            .iter()
            .find(|e| e.section == section && e.key == key)
    }

    pub fn config_value(&self, path: &str) -> Option<&ConfigValue> {
        self.config_entry(path).map(|e| &e.value)
    }

    pub fn package(&self, title: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.title == title)
    }

    pub fn service(&self, title: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.title == title)
    }
}
