//! Upload of kubeadm and kubelet bootstrap configuration into a tenant control plane
//!
//! Both uploads are full-state upserts: running them again after a partial failure converges
//! on the same objects, so the caller's reconciliation loop owns retries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
  apiclient::ObjectStore,
  kubelet::{self, CgroupDriver, TenantParameters},
  objects, uploadconfig, version, Error, Result,
};

/// Data key kubeadm nodes read the kubelet base configuration from
pub const KUBELET_BASE_CONFIGURATION_KEY: &str = "kubelet";

pub const KUBEADM_API_VERSION: &str = "kubeadm.k8s.io/v1beta3";

/// Everything needed to upload the bootstrap configuration of one tenant control plane
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
  pub init_configuration: InitConfiguration,
  pub parameters: Parameters,
}

/// Tenant settings that kubeadm's own configuration types have no field for
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
  /// Kubernetes version of the tenant control plane, e.g. `1.28.2`
  pub tenant_control_plane_version: String,
  #[serde(rename = "tenantDNSServiceIPs")]
  pub tenant_dns_service_ips: Vec<String>,
  #[serde(rename = "tenantControlPlaneCGroupDriver", default)]
  pub tenant_control_plane_cgroup_driver: CgroupDriver,
}

impl Configuration {
  pub fn tenant_parameters(&self) -> TenantParameters {
    TenantParameters {
      kubernetes_version: self.parameters.tenant_control_plane_version.clone(),
      dns_domain: self.init_configuration.cluster_configuration.networking.dns_domain.clone(),
      dns_service_ips: self.parameters.tenant_dns_service_ips.clone(),
      cgroup_driver: self.parameters.tenant_control_plane_cgroup_driver,
    }
  }
}

/// InitConfiguration holds the settings kubeadm uses to initialize a control plane
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitConfiguration {
  /// The cluster-wide settings; this is the part uploaded to the cluster
  pub cluster_configuration: ClusterConfiguration,

  /// The endpoint of the API server instance deployed on this control plane node
  #[serde(rename = "localAPIEndpoint", default, skip_serializing_if = "Option::is_none")]
  pub local_api_endpoint: Option<ApiEndpoint>,
}

/// ClusterConfiguration contains cluster-wide configuration for a kubeadm cluster
///
/// Only the fields this crate reads are modelled; every other key (`etcd`, `dns`,
/// `featureGates`, ...) is carried in `extra` so the uploaded document matches the input.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfiguration {
  /// Extra settings for the API server control plane component
  #[serde(rename = "apiServer", default, skip_serializing_if = "Option::is_none")]
  pub api_server: Option<ApiServer>,

  /// Where certificates are stored
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub certificates_dir: Option<String>,

  /// The cluster name
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cluster_name: Option<String>,

  /// A stable IP address or DNS name for the control plane
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub control_plane_endpoint: Option<String>,

  /// Container registry to pull control plane images from
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image_repository: Option<String>,

  /// The target version of the control plane
  pub kubernetes_version: String,

  /// Networking topology of the cluster
  #[serde(default)]
  pub networking: Networking,

  #[serde(flatten)]
  pub extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Networking {
  /// DNS domain used by Kubernetes services
  #[serde(default)]
  pub dns_domain: String,

  /// Subnet used by Kubernetes services
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub service_subnet: Option<String>,

  /// Subnet used by pods
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pod_subnet: Option<String>,

  #[serde(flatten)]
  pub extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiServer {
  #[serde(rename = "certSANs", default, skip_serializing_if = "Vec::is_empty")]
  pub cert_sans: Vec<String>,

  /// `extraArgs`, `extraVolumes`, `timeoutForControlPlane` and the rest, passed through as-is
  #[serde(flatten)]
  pub extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEndpoint {
  pub advertise_address: String,
  pub bind_port: i32,
}

/// Upload the tenant's kubeadm ClusterConfiguration
///
/// The upload itself is kubeadm's `upload-config kubeadm` phase; nothing is added here.
pub async fn upload_kubeadm_config<S>(store: &S, config: &Configuration) -> Result<()>
where
  S: ObjectStore + ?Sized,
{
  uploadconfig::upload_configuration(store, &config.init_configuration).await
}

/// Upload the tenant's kubelet base configuration along with the RBAC nodes need to read it
pub async fn upload_kubelet_config<S>(store: &S, config: &Configuration) -> Result<()>
where
  S: ObjectStore + ?Sized,
{
  publish_kubelet_config(store, &config.tenant_parameters()).await
}

/// Publish the hardened kubelet configuration for the tenant's Kubernetes minor version
///
/// Steps run in order and stop at the first failure: ConfigMap, Role, RoleBinding.
pub async fn publish_kubelet_config<S>(store: &S, params: &TenantParameters) -> Result<()>
where
  S: ObjectStore + ?Sized,
{
  let content = kubelet::config_map_content(params)?;
  let names = version::resource_names(&params.kubernetes_version)?;
  debug!(
    version = %params.kubernetes_version,
    config_map = %names.config_map,
    rbac = %names.rbac,
    "Resolved kubelet config names"
  );

  publish_config_map(store, &names.config_map, KUBELET_BASE_CONFIGURATION_KEY, content, &names.rbac).await?;

  info!(config_map = %names.config_map, "Kubelet configuration published");
  Ok(())
}

/// Upsert a ConfigMap in `kube-system`, then a Role and RoleBinding named `rbac_name` that let
/// nodes read it
pub(crate) async fn publish_config_map<S>(
  store: &S,
  name: &str,
  key: &str,
  content: String,
  rbac_name: &str,
) -> Result<()>
where
  S: ObjectStore + ?Sized,
{
  store
    .create_or_update_config_map(&objects::config_map(name, key, content))
    .await
    .map_err(|source| Error::ConfigMapPublish {
      name: name.to_string(),
      source,
    })?;
  debug!(%name, "ConfigMap created or updated");

  store
    .create_or_update_role(&objects::config_map_reader_role(rbac_name, name))
    .await
    .map_err(|source| Error::RolePublish {
      name: rbac_name.to_string(),
      source,
    })?;
  debug!(name = %rbac_name, "Role created or updated");

  store
    .create_or_update_role_binding(&objects::node_role_binding(rbac_name))
    .await
    .map_err(|source| Error::RoleBindingPublish {
      name: rbac_name.to_string(),
      source,
    })?;
  debug!(name = %rbac_name, "RoleBinding created or updated");

  Ok(())
}
