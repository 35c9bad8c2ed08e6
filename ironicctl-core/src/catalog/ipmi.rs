//! IPMI power/management driver options

use super::params::IpmiParams;
use super::types::ConfigEntry;
use super::Catalog;

pub(super) fn declare(catalog: &mut Catalog, params: &IpmiParams) {
    catalog.config.extend([
        ConfigEntry::new("ipmi/command_retry_timeout", params.command_retry_timeout.as_ref()),
        ConfigEntry::new("ipmi/min_command_interval", params.min_command_interval.as_ref()),
        ConfigEntry::new("ipmi/debug", params.debug.as_ref()),
    ]);
}
