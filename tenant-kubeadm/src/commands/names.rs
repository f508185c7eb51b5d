use anyhow::Result;
use clap::Args;

use crate::version;

#[derive(Args, Debug)]
pub struct Names {
  /// Kubernetes version of the tenant control plane (e.g. 1.28.2)
  pub kubernetes_version: String,
}

impl Names {
  /// Print the ConfigMap and RBAC names nodes of this version look up
  pub async fn names(&self) -> Result<()> {
    let names = version::resource_names(&self.kubernetes_version)?;
    println!("configMap: {}", names.config_map);
    println!("role: {}", names.rbac);
    println!("roleBinding: {}", names.rbac);

    Ok(())
  }
}
