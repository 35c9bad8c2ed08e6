//! Catalog input parameters, loaded from TOML
//!
//! ```toml
//! [ironic]
//! database_connection = "mysql+pymysql://ironic:pw@db/ironic"
//! rabbit_ha_queues = true
//!
//! [conductor]
//! enabled_drivers = ["pxe_ipmitool", "agent_ipmitool"]
//! cleaning_disk_erase = "metadata"
//!
//! [drivers.ipmi]
//! debug = true
//! ```
//!
//! Unset options map to the service default marker. Unknown keys are
//! rejected so typos do not silently fall back to defaults.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::types::Setting;
use crate::error::{IronicError, Result};

/// Everything a catalog is built from
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogParams {
    pub ironic: IronicParams,
    /// Conductor resources are only declared when the table is present
    pub conductor: Option<ConductorParams>,
    pub drivers: DriversParams,
}

impl CatalogParams {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| IronicError::toml("catalog parameters", e))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| IronicError::toml(path.display().to_string(), e))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IronicParams {
    pub package_ensure: String,
    pub purge_config: bool,
    pub auth_strategy: String,

    pub my_ip: Option<Setting>,
    pub executor_thread_pool_size: Option<Setting>,
    pub rpc_response_timeout: Option<Setting>,
    pub rpc_transport: Option<Setting>,
    pub control_exchange: Option<Setting>,
    pub default_transport_url: Option<Setting>,
    pub default_resource_class: Option<Setting>,
    pub notification_level: Option<Setting>,
    pub versioned_notifications_topics: Option<Setting>,

    pub database_connection: Option<Setting>,
    pub database_max_retries: Option<Setting>,
    pub database_idle_timeout: Option<Setting>,
    pub database_retry_interval: Option<Setting>,
    /// Deprecated, no longer written to ironic.conf
    pub database_reconnect_interval: Option<Setting>,

    pub rabbit_use_ssl: Option<bool>,
    pub rabbit_ha_queues: Option<Setting>,
    pub amqp_durable_queues: Option<Setting>,
    pub kombu_failover_strategy: Option<Setting>,
    pub kombu_ssl_ca_certs: Option<String>,
    pub kombu_ssl_certfile: Option<String>,
    pub kombu_ssl_keyfile: Option<String>,
    pub kombu_ssl_version: Option<String>,

    pub notification_transport_url: Option<Setting>,
    pub notification_driver: Option<Setting>,
    pub notification_topics: Option<Setting>,

    pub amqp_server_request_prefix: Option<Setting>,
    pub amqp_broadcast_prefix: Option<Setting>,
    pub amqp_group_request_prefix: Option<Setting>,
    pub amqp_container_name: Option<Setting>,
    pub amqp_idle_timeout: Option<Setting>,
    pub amqp_trace: Option<Setting>,
    pub amqp_ssl_ca_file: Option<Setting>,
    pub amqp_ssl_cert_file: Option<Setting>,
    pub amqp_ssl_key_file: Option<Setting>,
    pub amqp_ssl_key_password: Option<Setting>,
    pub amqp_allow_insecure_clients: Option<Setting>,
    pub amqp_sasl_mechanisms: Option<Setting>,
    pub amqp_sasl_config_dir: Option<Setting>,
    pub amqp_sasl_config_name: Option<Setting>,
    pub amqp_username: Option<Setting>,
    pub amqp_password: Option<Setting>,
}

impl Default for IronicParams {
    fn default() -> Self {
        Self {
            package_ensure: "present".to_string(),
            purge_config: false,
            auth_strategy: "keystone".to_string(),
            my_ip: None,
            executor_thread_pool_size: None,
            rpc_response_timeout: None,
            rpc_transport: None,
            control_exchange: None,
            default_transport_url: None,
            default_resource_class: None,
            notification_level: None,
            versioned_notifications_topics: None,
            database_connection: None,
            database_max_retries: None,
            database_idle_timeout: None,
            database_retry_interval: None,
            database_reconnect_interval: None,
            rabbit_use_ssl: None,
            rabbit_ha_queues: None,
            amqp_durable_queues: None,
            kombu_failover_strategy: None,
            kombu_ssl_ca_certs: None,
            kombu_ssl_certfile: None,
            kombu_ssl_keyfile: None,
            kombu_ssl_version: None,
            notification_transport_url: None,
            notification_driver: None,
            notification_topics: None,
            amqp_server_request_prefix: None,
            amqp_broadcast_prefix: None,
            amqp_group_request_prefix: None,
            amqp_container_name: None,
            amqp_idle_timeout: None,
            amqp_trace: None,
            amqp_ssl_ca_file: None,
            amqp_ssl_cert_file: None,
            amqp_ssl_key_file: None,
            amqp_ssl_key_password: None,
            amqp_allow_insecure_clients: None,
            amqp_sasl_mechanisms: None,
            amqp_sasl_config_dir: None,
            amqp_sasl_config_name: None,
            amqp_username: None,
            amqp_password: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConductorParams {
    pub package_ensure: String,
    pub enabled: bool,
    pub enabled_drivers: Vec<String>,
    pub max_time_interval: Setting,
    pub force_power_state_during_sync: Setting,
    pub automated_clean: Option<Setting>,
    pub api_url: Option<Setting>,
    pub swift_account: Option<Setting>,
    pub swift_temp_url_key: Option<Setting>,
    pub swift_temp_url_duration: Option<Setting>,
    pub cleaning_network_uuid: Option<Setting>,
    pub provisioning_network_uuid: Option<Setting>,
    /// `full`, `metadata`, or unset
    pub cleaning_disk_erase: Option<String>,
    pub continue_if_disk_secure_erase_fails: Option<Setting>,
    pub http_url: Option<Setting>,
    pub http_root: Option<Setting>,
}

impl Default for ConductorParams {
    fn default() -> Self {
        Self {
            package_ensure: "present".to_string(),
            enabled: true,
            enabled_drivers: vec!["pxe_ipmitool".to_string()],
            max_time_interval: Setting::Int(120),
            force_power_state_during_sync: Setting::Bool(true),
            automated_clean: None,
            api_url: None,
            swift_account: None,
            swift_temp_url_key: None,
            swift_temp_url_duration: None,
            cleaning_network_uuid: None,
            provisioning_network_uuid: None,
            cleaning_disk_erase: None,
            continue_if_disk_secure_erase_fails: None,
            http_url: None,
            http_root: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriversParams {
    /// IPMI driver options are only declared when the table is present
    pub ipmi: Option<IpmiParams>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IpmiParams {
    pub command_retry_timeout: Option<Setting>,
    pub min_command_interval: Option<Setting>,
    pub debug: Option<Setting>,
}
