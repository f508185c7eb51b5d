//! kubeadm's `upload-config kubeadm` phase
//!
//! Stores the ClusterConfiguration in `kube-system/kubeadm-config` so that `kubeadm join` on a
//! node can read the cluster-wide settings, and grants bootstrapping and joined nodes access to it.

use serde::Serialize;
use tracing::info;

use crate::{
  apiclient::ObjectStore,
  kubeadm::{self, ClusterConfiguration, InitConfiguration},
  Result,
};

pub const KUBEADM_CONFIG_MAP: &str = "kubeadm-config";

pub const CLUSTER_CONFIGURATION_KEY: &str = "ClusterConfiguration";

/// Role and RoleBinding that let nodes read the `kubeadm-config` ConfigMap
pub const NODES_KUBEADM_CONFIG_ROLE: &str = "kubeadm:nodes-kubeadm-config";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Versioned<'a> {
  api_version: &'static str,
  kind: &'static str,
  #[serde(flatten)]
  config: &'a ClusterConfiguration,
}

/// Serialize the ClusterConfiguration exactly as stored in the `kubeadm-config` ConfigMap
pub fn cluster_configuration_content(config: &ClusterConfiguration) -> Result<String> {
  Ok(serde_yaml::to_string(&Versioned {
    api_version: kubeadm::KUBEADM_API_VERSION,
    kind: CLUSTER_CONFIGURATION_KEY,
    config,
  })?)
}

/// Upload the cluster-wide part of the InitConfiguration and the RBAC rules to read it
pub async fn upload_configuration<S>(store: &S, config: &InitConfiguration) -> Result<()>
where
  S: ObjectStore + ?Sized,
{
  let content = cluster_configuration_content(&config.cluster_configuration)?;

  kubeadm::publish_config_map(
    store,
    KUBEADM_CONFIG_MAP,
    CLUSTER_CONFIGURATION_KEY,
    content,
    NODES_KUBEADM_CONFIG_ROLE,
  )
  .await?;

  info!(config_map = KUBEADM_CONFIG_MAP, "Uploaded kubeadm ClusterConfiguration");
  Ok(())
}
