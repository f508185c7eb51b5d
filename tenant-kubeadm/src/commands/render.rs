use anyhow::Result;
use clap::{Args, ValueEnum};

use super::TenantInput;
use crate::{kubelet, uploadconfig};

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub enum Document {
  /// The hardened KubeletConfiguration published to `kubelet-config-<major>.<minor>`
  #[default]
  Kubelet,
  /// The ClusterConfiguration published to `kubeadm-config`
  Kubeadm,
}

#[derive(Args, Debug)]
pub struct Render {
  /// Which document to print
  #[arg(long, value_enum, default_value_t)]
  pub document: Document,

  #[clap(flatten)]
  pub tenant: TenantInput,
}

impl Render {
  /// Print a document exactly as it would be stored in its ConfigMap, without contacting a cluster
  pub async fn render(&self) -> Result<()> {
    let config = self.tenant.configuration()?;

    let content = match self.document {
      Document::Kubelet => kubelet::config_map_content(&config.tenant_parameters())?,
      Document::Kubeadm => {
        uploadconfig::cluster_configuration_content(&config.init_configuration.cluster_configuration)?
      }
    };
    print!("{content}");

    Ok(())
  }
}
