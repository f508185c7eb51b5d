mod config;

use clap::ValueEnum;
pub use config::{HardenedDefaults, KubeletConfiguration, HARDENED_DEFAULTS, ZERO_DURATION};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Driver the kubelet uses to manipulate cgroups on the host
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CgroupDriver {
  Cgroupfs,
  #[default]
  Systemd,
}

/// The tenant-specific inputs to the kubelet configuration and the names it is published under
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TenantParameters {
  /// Kubernetes version of the tenant control plane, e.g. `1.28.2`
  pub kubernetes_version: String,
  pub dns_domain: String,
  pub dns_service_ips: Vec<String>,
  pub cgroup_driver: CgroupDriver,
}

/// Render the document published under the kubelet ConfigMap's data key
pub fn config_map_content(params: &TenantParameters) -> Result<String> {
  KubeletConfiguration::new(params).to_yaml()
}
