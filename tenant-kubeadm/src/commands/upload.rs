use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use kube::{
  config::{KubeConfigOptions, Kubeconfig},
  Client, Config,
};
use tracing::{debug, info};

use super::TenantInput;
use crate::kubeadm;

#[derive(Args, Debug)]
pub struct Upload {
  /// Kubeconfig of the tenant control plane
  ///
  /// Defaults to $KUBECONFIG, ~/.kube/config or the in-cluster service account
  #[arg(long)]
  pub kubeconfig: Option<PathBuf>,

  /// Kubeconfig context to use
  #[arg(long)]
  pub context: Option<String>,

  /// Only publish the kubelet configuration, skipping the kubeadm ClusterConfiguration
  #[arg(long)]
  pub kubelet_only: bool,

  #[clap(flatten)]
  pub tenant: TenantInput,
}

impl Upload {
  async fn get_client(&self) -> Result<Client> {
    let options = KubeConfigOptions {
      context: self.context.clone(),
      ..Default::default()
    };

    let config = match (&self.kubeconfig, &self.context) {
      (Some(path), _) => {
        let kubeconfig = Kubeconfig::read_from(path).with_context(|| format!("unable to read {}", path.display()))?;
        Config::from_custom_kubeconfig(kubeconfig, &options).await?
      }
      (None, Some(_)) => Config::from_kubeconfig(&options).await?,
      (None, None) => Config::infer().await?,
    };
    debug!("Tenant control plane API server: {}", config.cluster_url);

    Ok(Client::try_from(config)?)
  }

  /// Upload the kubeadm and kubelet configuration into the tenant control plane
  pub async fn upload(&self) -> Result<()> {
    let config = self.tenant.configuration()?;
    let client = self.get_client().await?;

    if !self.kubelet_only {
      kubeadm::upload_kubeadm_config(&client, &config)
        .await
        .context("uploading kubeadm configuration")?;
    }

    kubeadm::upload_kubelet_config(&client, &config)
      .await
      .context("uploading kubelet configuration")?;

    info!(
      version = %config.parameters.tenant_control_plane_version,
      "Tenant control plane bootstrap configuration uploaded"
    );
    Ok(())
  }
}
