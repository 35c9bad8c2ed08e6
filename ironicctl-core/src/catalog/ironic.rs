//! Base installation: common packages, DEFAULT, database and messaging

use super::params::IronicParams;
use super::platform::PlatformNames;
use super::types::{ConfigEntry, ConfigValue, Package, Setting};
use super::Catalog;
use crate::error::{IronicError, Result};

fn opt(setting: &Option<Setting>) -> ConfigValue {
    setting.as_ref().into()
}

pub(super) fn declare(catalog: &mut Catalog, params: &IronicParams, names: &PlatformNames) -> Result<()> {
    catalog.packages.push(Package::new(
        "ironic-common",
        names.common_package,
        &params.package_ensure,
    ));
    catalog.packages.push(Package::new(
        "ironic-lib",
        names.lib_package,
        &params.package_ensure,
    ));
    catalog.purge_config = params.purge_config;

    if params.database_reconnect_interval.is_some() {
        tracing::warn!("database_reconnect_interval is deprecated and ignored");
    }

    let p = params;
    catalog.config.extend([
        ConfigEntry::new("DEFAULT/auth_strategy", p.auth_strategy.as_str()),
        ConfigEntry::new("DEFAULT/my_ip", opt(&p.my_ip)),
        ConfigEntry::new("DEFAULT/executor_thread_pool_size", opt(&p.executor_thread_pool_size)),
        ConfigEntry::new("DEFAULT/rpc_response_timeout", opt(&p.rpc_response_timeout)),
        ConfigEntry::new("DEFAULT/rpc_transport", opt(&p.rpc_transport)),
        ConfigEntry::new("DEFAULT/control_exchange", opt(&p.control_exchange)),
        ConfigEntry::new("DEFAULT/transport_url", opt(&p.default_transport_url)).secret(),
        ConfigEntry::new("DEFAULT/default_resource_class", opt(&p.default_resource_class)),
        ConfigEntry::new("DEFAULT/notification_level", opt(&p.notification_level)),
        ConfigEntry::new(
            "DEFAULT/versioned_notifications_topics",
            opt(&p.versioned_notifications_topics),
        ),
        ConfigEntry::new("database/connection", opt(&p.database_connection)).secret(),
        ConfigEntry::new("database/max_retries", opt(&p.database_max_retries)),
        ConfigEntry::new("database/connection_recycle_time", opt(&p.database_idle_timeout)),
        ConfigEntry::new("database/retry_interval", opt(&p.database_retry_interval)),
    ]);

    declare_rabbit(catalog, p)?;

    catalog.config.extend([
        ConfigEntry::new(
            "oslo_messaging_notifications/transport_url",
            opt(&p.notification_transport_url),
        )
        .secret(),
        ConfigEntry::new("oslo_messaging_notifications/driver", opt(&p.notification_driver)),
        ConfigEntry::new("oslo_messaging_notifications/topics", opt(&p.notification_topics)),
    ]);

    catalog.config.extend([
        ConfigEntry::new("oslo_messaging_amqp/server_request_prefix", opt(&p.amqp_server_request_prefix)),
        ConfigEntry::new("oslo_messaging_amqp/broadcast_prefix", opt(&p.amqp_broadcast_prefix)),
        ConfigEntry::new("oslo_messaging_amqp/group_request_prefix", opt(&p.amqp_group_request_prefix)),
        ConfigEntry::new("oslo_messaging_amqp/container_name", opt(&p.amqp_container_name)),
        ConfigEntry::new("oslo_messaging_amqp/idle_timeout", opt(&p.amqp_idle_timeout)),
        ConfigEntry::new("oslo_messaging_amqp/trace", opt(&p.amqp_trace)),
        ConfigEntry::new("oslo_messaging_amqp/ssl_ca_file", opt(&p.amqp_ssl_ca_file)),
        ConfigEntry::new("oslo_messaging_amqp/ssl_cert_file", opt(&p.amqp_ssl_cert_file)),
        ConfigEntry::new("oslo_messaging_amqp/ssl_key_file", opt(&p.amqp_ssl_key_file)),
        ConfigEntry::new("oslo_messaging_amqp/ssl_key_password", opt(&p.amqp_ssl_key_password)).secret(),
        ConfigEntry::new(
            "oslo_messaging_amqp/allow_insecure_clients",
            opt(&p.amqp_allow_insecure_clients),
        ),
        ConfigEntry::new("oslo_messaging_amqp/sasl_mechanisms", opt(&p.amqp_sasl_mechanisms)),
        ConfigEntry::new("oslo_messaging_amqp/sasl_config_dir", opt(&p.amqp_sasl_config_dir)),
        ConfigEntry::new("oslo_messaging_amqp/sasl_config_name", opt(&p.amqp_sasl_config_name)),
        ConfigEntry::new("oslo_messaging_amqp/username", opt(&p.amqp_username)),
        ConfigEntry::new("oslo_messaging_amqp/password", opt(&p.amqp_password)).secret(),
    ]);

    Ok(())
}

fn declare_rabbit(catalog: &mut Catalog, p: &IronicParams) -> Result<()> {
    let kombu = [
        ("kombu_ssl_ca_certs", "ssl_ca_file", &p.kombu_ssl_ca_certs),
        ("kombu_ssl_certfile", "ssl_cert_file", &p.kombu_ssl_certfile),
        ("kombu_ssl_keyfile", "ssl_key_file", &p.kombu_ssl_keyfile),
        ("kombu_ssl_version", "ssl_version", &p.kombu_ssl_version),
    ];

    if p.rabbit_use_ssl != Some(true) {
        if let Some((name, _, _)) = kombu.iter().find(|(_, _, value)| value.is_some()) {
            return Err(IronicError::params(
                *name,
                "requires rabbit_use_ssl = true",
            ));
        }
    }

    catalog.config.extend([
        ConfigEntry::new("oslo_messaging_rabbit/rabbit_ha_queues", opt(&p.rabbit_ha_queues)),
        ConfigEntry::new("oslo_messaging_rabbit/amqp_durable_queues", opt(&p.amqp_durable_queues)),
        ConfigEntry::new(
            "oslo_messaging_rabbit/kombu_failover_strategy",
            opt(&p.kombu_failover_strategy),
        ),
        ConfigEntry::new("oslo_messaging_rabbit/ssl", p.rabbit_use_ssl),
    ]);

    for (_, key, value) in kombu {
        catalog.config.push(ConfigEntry::new(
            &format!("oslo_messaging_rabbit/{}", key),
            value.as_deref(),
        ));
    }

    Ok(())
}
