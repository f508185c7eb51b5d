pub mod names;
pub mod render;
pub mod upload;

use std::{fs::File, io::BufReader, net::IpAddr, path::PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use crate::{
  kubeadm::{ClusterConfiguration, Configuration, InitConfiguration, Networking, Parameters},
  kubelet::CgroupDriver,
};

/// Tenant control plane settings, given as flags or as a configuration file
#[derive(Args, Debug, Default)]
pub struct TenantInput {
  /// YAML file holding the full upload configuration
  ///
  /// When set, the tenant flags below are ignored
  #[arg(long, short)]
  pub config: Option<PathBuf>,

  /// Kubernetes version of the tenant control plane (e.g. 1.28.2)
  #[arg(long, env = "TENANT_KUBERNETES_VERSION", required_unless_present = "config")]
  pub kubernetes_version: Option<String>,

  /// DNS domain used by services in the tenant cluster
  #[arg(long, env = "TENANT_DNS_DOMAIN", default_value = "cluster.local")]
  pub dns_domain: String,

  /// IP addresses of the cluster DNS service, comma separated
  #[arg(long, env = "TENANT_DNS_SERVICE_IPS", value_delimiter = ',')]
  pub dns_service_ips: Vec<IpAddr>,

  /// Cgroup driver the tenant's kubelets use
  #[arg(long, env = "TENANT_CGROUP_DRIVER", value_enum, default_value_t)]
  pub cgroup_driver: CgroupDriver,

  /// Name of the tenant cluster
  #[arg(long)]
  pub cluster_name: Option<String>,

  /// Stable IP address or DNS name of the tenant control plane
  #[arg(long)]
  pub control_plane_endpoint: Option<String>,

  /// Subnet used by services in the tenant cluster
  #[arg(long)]
  pub service_subnet: Option<String>,

  /// Subnet used by pods in the tenant cluster
  #[arg(long)]
  pub pod_subnet: Option<String>,
}

impl TenantInput {
  /// Load the configuration file, or assemble the configuration from flags
  pub fn configuration(&self) -> Result<Configuration> {
    if let Some(path) = &self.config {
      let file = File::open(path).with_context(|| format!("unable to open {}", path.display()))?;
      let reader = BufReader::new(file);
      let config: Configuration = serde_yaml::from_reader(reader)?;
      debug!("Configuration read from {}", path.display());

      return Ok(config);
    }

    let version = self
      .kubernetes_version
      .clone()
      .context("--kubernetes-version is required when --config is not set")?;

    Ok(Configuration {
      init_configuration: InitConfiguration {
        cluster_configuration: ClusterConfiguration {
          cluster_name: self.cluster_name.clone(),
          control_plane_endpoint: self.control_plane_endpoint.clone(),
          kubernetes_version: format!("v{}", version.trim().trim_start_matches('v')),
          networking: Networking {
            dns_domain: self.dns_domain.clone(),
            service_subnet: self.service_subnet.clone(),
            pod_subnet: self.pod_subnet.clone(),
            ..Default::default()
          },
          ..Default::default()
        },
        local_api_endpoint: None,
      },
      parameters: Parameters {
        tenant_control_plane_version: version,
        tenant_dns_service_ips: self.dns_service_ips.iter().map(IpAddr::to_string).collect(),
        tenant_control_plane_cgroup_driver: self.cgroup_driver,
      },
    })
  }
}

#[cfg(test)]
mod tests {
  use std::{io::Write, net::Ipv4Addr};

  use rstest::*;

  use super::*;

  #[test]
  fn it_builds_configuration_from_flags() {
    let input = TenantInput {
      kubernetes_version: Some("1.28.2".to_string()),
      dns_domain: "cluster.local".to_string(),
      dns_service_ips: vec![IpAddr::V4(Ipv4Addr::new(10, 96, 0, 10))],
      cgroup_driver: CgroupDriver::Systemd,
      cluster_name: Some("tenant-a".to_string()),
      ..TenantInput::default()
    };

    let config = input.configuration().unwrap();
    let params = config.tenant_parameters();

    assert_eq!(params.kubernetes_version, "1.28.2");
    assert_eq!(params.dns_domain, "cluster.local");
    assert_eq!(params.dns_service_ips, vec!["10.96.0.10".to_string()]);
    assert_eq!(
      config.init_configuration.cluster_configuration.kubernetes_version,
      "v1.28.2"
    );
  }

  #[rstest]
  #[case("1.28.2")]
  #[case("v1.28.2")]
  #[case(" 1.28.2")]
  #[case(" v1.28.2 ")]
  fn it_prefixes_cluster_version(#[case] version: &str) {
    let input = TenantInput {
      kubernetes_version: Some(version.to_string()),
      ..TenantInput::default()
    };

    let config = input.configuration().unwrap();
    assert_eq!(
      config.init_configuration.cluster_configuration.kubernetes_version,
      "v1.28.2"
    );
  }

  #[test]
  fn it_requires_a_version() {
    assert!(TenantInput::default().configuration().is_err());
  }

  #[test]
  fn it_reads_configuration_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file
      .write_all(
        br#"
initConfiguration:
  clusterConfiguration:
    kubernetesVersion: v1.27.3
    networking:
      dnsDomain: tenant.example
parameters:
  tenantControlPlaneVersion: 1.27.3
  tenantDNSServiceIPs:
  - 172.20.0.10
  tenantControlPlaneCGroupDriver: cgroupfs
"#,
      )
      .unwrap();

    let input = TenantInput {
      config: Some(file.path().to_path_buf()),
      ..TenantInput::default()
    };
    let params = input.configuration().unwrap().tenant_parameters();

    assert_eq!(params.dns_domain, "tenant.example");
    assert_eq!(params.cgroup_driver, CgroupDriver::Cgroupfs);
    assert_eq!(params.dns_service_ips, vec!["172.20.0.10".to_string()]);
  }
}
