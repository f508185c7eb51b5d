#![allow(dead_code)]

use std::{collections::BTreeMap, sync::Mutex};

use async_trait::async_trait;
use k8s_openapi::api::{
  core::v1::ConfigMap,
  rbac::v1::{Role, RoleBinding},
};
use tenant_kubeadm::{BoxError, ObjectStore};

/// Which kind of upsert a [`MemoryStore`] should reject
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fail {
  ConfigMap,
  Role,
  RoleBinding,
}

/// In-memory API server that records every upsert it receives
#[derive(Default)]
pub struct MemoryStore {
  pub fail: Option<Fail>,
  pub calls: Mutex<Vec<String>>,
  pub config_maps: Mutex<BTreeMap<String, ConfigMap>>,
  pub roles: Mutex<BTreeMap<String, Role>>,
  pub role_bindings: Mutex<BTreeMap<String, RoleBinding>>,
}

impl MemoryStore {
  pub fn failing(fail: Fail) -> Self {
    MemoryStore {
      fail: Some(fail),
      ..MemoryStore::default()
    }
  }

  pub fn calls(&self) -> Vec<String> {
    self.calls.lock().unwrap().clone()
  }

  pub fn config_map(&self, name: &str) -> Option<ConfigMap> {
    self.config_maps.lock().unwrap().get(name).cloned()
  }

  pub fn role(&self, name: &str) -> Option<Role> {
    self.roles.lock().unwrap().get(name).cloned()
  }

  pub fn role_binding(&self, name: &str) -> Option<RoleBinding> {
    self.role_bindings.lock().unwrap().get(name).cloned()
  }

  /// Snapshot of every stored object, keyed by kind and name
  pub fn state(&self) -> (BTreeMap<String, ConfigMap>, BTreeMap<String, Role>, BTreeMap<String, RoleBinding>) {
    (
      self.config_maps.lock().unwrap().clone(),
      self.roles.lock().unwrap().clone(),
      self.role_bindings.lock().unwrap().clone(),
    )
  }

  fn record(&self, kind: Fail, name: Option<&String>) -> Result<String, BoxError> {
    let name = name.cloned().ok_or("object has no name")?;
    self.calls.lock().unwrap().push(format!("{kind:?}/{name}"));

    match self.fail {
      Some(fail) if fail == kind => Err(format!("{kind:?} {name} rejected").into()),
      _ => Ok(name),
    }
  }
}

#[async_trait]
impl ObjectStore for MemoryStore {
  async fn create_or_update_config_map(&self, config_map: &ConfigMap) -> Result<(), BoxError> {
    let name = self.record(Fail::ConfigMap, config_map.metadata.name.as_ref())?;
    self.config_maps.lock().unwrap().insert(name, config_map.clone());
    Ok(())
  }

  async fn create_or_update_role(&self, role: &Role) -> Result<(), BoxError> {
    let name = self.record(Fail::Role, role.metadata.name.as_ref())?;
    self.roles.lock().unwrap().insert(name, role.clone());
    Ok(())
  }

  async fn create_or_update_role_binding(&self, role_binding: &RoleBinding) -> Result<(), BoxError> {
    let name = self.record(Fail::RoleBinding, role_binding.metadata.name.as_ref())?;
    self.role_bindings.lock().unwrap().insert(name, role_binding.clone());
    Ok(())
  }
}
