//! Per-distribution package and service names

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    #[default]
    Debian,
    RedHat,
}

impl FromStr for OsFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debian" | "ubuntu" => Ok(Self::Debian),
            "redhat" | "rhel" | "centos" | "fedora" => Ok(Self::RedHat),
            other => Err(format!("unsupported OS family '{}' (expected debian or redhat)", other)),
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debian => f.write_str("debian"),
            Self::RedHat => f.write_str("redhat"),
        }
    }
}

/// Names a distribution uses for ironic's packages and services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformNames {
    pub common_package: &'static str,
    pub lib_package: &'static str,
    pub conductor_package: &'static str,
    pub conductor_service: &'static str,
    /// Installed next to the conductor (ipmitool is not pulled in on Debian)
    pub conductor_extra_packages: &'static [&'static str],
}

impl OsFamily {
    pub fn names(&self) -> PlatformNames {
        match self {
            Self::Debian => PlatformNames {
                common_package: "ironic-common",
                lib_package: "python3-ironic-lib",
                conductor_package: "ironic-conductor",
                conductor_service: "ironic-conductor",
                conductor_extra_packages: &["ipmitool"],
            },
            Self::RedHat => PlatformNames {
                common_package: "openstack-ironic-common",
                lib_package: "python-ironic-lib",
                conductor_package: "openstack-ironic-conductor",
                conductor_service: "openstack-ironic-conductor",
                conductor_extra_packages: &[],
            },
        }
    }
}
