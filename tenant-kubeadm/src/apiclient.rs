//! Create-or-update access to the tenant control plane's API server

use std::fmt::Debug;

use async_trait::async_trait;
use k8s_openapi::{
  api::{
    core::v1::ConfigMap,
    rbac::v1::{Role, RoleBinding},
  },
  NamespaceResourceScope,
};
use kube::{
  api::{Api, PostParams},
  Client, Resource,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::BoxError;

/// Stores the objects published into a tenant control plane
///
/// Every method creates the object when it is absent and otherwise replaces it so that
/// data, rules and subjects match the given object exactly. Implementations must be safe
/// to call repeatedly with the same object.
#[async_trait]
pub trait ObjectStore: Send + Sync {
  async fn create_or_update_config_map(&self, config_map: &ConfigMap) -> Result<(), BoxError>;

  async fn create_or_update_role(&self, role: &Role) -> Result<(), BoxError>;

  async fn create_or_update_role_binding(&self, role_binding: &RoleBinding) -> Result<(), BoxError>;
}

#[async_trait]
impl ObjectStore for Client {
  async fn create_or_update_config_map(&self, config_map: &ConfigMap) -> Result<(), BoxError> {
    create_or_replace(self, config_map).await
  }

  async fn create_or_update_role(&self, role: &Role) -> Result<(), BoxError> {
    create_or_replace(self, role).await
  }

  async fn create_or_update_role_binding(&self, role_binding: &RoleBinding) -> Result<(), BoxError> {
    create_or_replace(self, role_binding).await
  }
}

/// Create the object, replacing it in full if it already exists
///
/// The replacement carries no resourceVersion, so the API server applies it unconditionally
/// instead of rejecting it with a conflict when another writer got there first.
async fn create_or_replace<K>(client: &Client, object: &K) -> Result<(), BoxError>
where
  K: Resource<Scope = NamespaceResourceScope> + Clone + Debug + Serialize + DeserializeOwned,
  K::DynamicType: Default,
{
  let name = object.meta().name.clone().ok_or("object has no name")?;
  let namespace = object.meta().namespace.clone().ok_or("object has no namespace")?;
  let kind = K::kind(&K::DynamicType::default()).to_string();
  let api: Api<K> = Api::namespaced(client.clone(), &namespace);

  match api.create(&PostParams::default(), object).await {
    Ok(_) => {
      debug!(%kind, %name, %namespace, "Created");
      Ok(())
    }
    Err(kube::Error::Api(ae)) if ae.code == 409 => {
      let mut desired = object.clone();
      desired.meta_mut().resource_version = None;
      api.replace(&name, &PostParams::default(), &desired).await?;
      debug!(%kind, %name, %namespace, "Replaced");
      Ok(())
    }
    Err(e) => Err(e.into()),
  }
}
