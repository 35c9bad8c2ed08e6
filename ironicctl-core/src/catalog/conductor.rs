//! ironic-conductor: package, service and conductor-side options

use super::params::ConductorParams;
use super::platform::PlatformNames;
use super::types::{ConfigEntry, ConfigValue, Package, Service, Setting};
use super::Catalog;
use crate::error::{IronicError, Result};

fn opt(setting: &Option<Setting>) -> ConfigValue {
    setting.as_ref().into()
}

/// `(erase_devices_priority, erase_devices_metadata_priority)`
fn erase_priorities(mode: Option<&str>) -> Result<(ConfigValue, ConfigValue)> {
    match mode {
        None => Ok((ConfigValue::ServiceDefault, ConfigValue::ServiceDefault)),
        Some("full") => Ok((10_i64.into(), 0_i64.into())),
        Some("metadata") => Ok((0_i64.into(), 10_i64.into())),
        Some(other) => Err(IronicError::params(
            "cleaning_disk_erase",
            format!("'{}' is not one of full, metadata", other),
        )),
    }
}

pub(super) fn declare(
    catalog: &mut Catalog,
    params: &ConductorParams,
    names: &PlatformNames,
) -> Result<()> {
    let service = Service::new("ironic-conductor", names.conductor_service, params.enabled);

    catalog.packages.push(
        Package::new("ironic-conductor", names.conductor_package, &params.package_ensure)
            .before(service.reference()),
    );
    for extra in names.conductor_extra_packages {
        catalog.packages.push(Package::new(extra, extra, "present"));
    }
    catalog.services.push(service);

    let p = params;
    let (erase, erase_metadata) = erase_priorities(p.cleaning_disk_erase.as_deref())?;

    catalog.config.extend([
        ConfigEntry::new("DEFAULT/enabled_drivers", p.enabled_drivers.join(",")),
        ConfigEntry::new("conductor/max_time_interval", &p.max_time_interval),
        ConfigEntry::new(
            "conductor/force_power_state_during_sync",
            &p.force_power_state_during_sync,
        ),
        ConfigEntry::new("conductor/automated_clean", opt(&p.automated_clean)),
        ConfigEntry::new("conductor/api_url", opt(&p.api_url)),
        ConfigEntry::new("glance/swift_account", opt(&p.swift_account)),
        ConfigEntry::new("glance/swift_temp_url_key", opt(&p.swift_temp_url_key)).secret(),
        ConfigEntry::new("glance/swift_temp_url_duration", opt(&p.swift_temp_url_duration)),
        ConfigEntry::new("neutron/cleaning_network_uuid", opt(&p.cleaning_network_uuid)),
        ConfigEntry::new("neutron/provisioning_network_uuid", opt(&p.provisioning_network_uuid)),
        ConfigEntry::new("deploy/erase_devices_priority", erase),
        ConfigEntry::new("deploy/erase_devices_metadata_priority", erase_metadata),
        ConfigEntry::new(
            "deploy/continue_if_disk_secure_erase_fails",
            opt(&p.continue_if_disk_secure_erase_fails),
        ),
        ConfigEntry::new("deploy/http_url", opt(&p.http_url)),
        ConfigEntry::new("deploy/http_root", opt(&p.http_root)),
    ]);

    Ok(())
}
