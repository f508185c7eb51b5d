//! Desired state of the ConfigMaps and RBAC objects published into `kube-system`

use std::collections::BTreeMap;

use k8s_openapi::api::{
  core::v1::ConfigMap,
  rbac::v1::{PolicyRule, Role, RoleBinding, RoleRef, Subject},
};
use kube::api::ObjectMeta;

/// Namespace holding control-plane-internal objects
pub const NAMESPACE_SYSTEM: &str = "kube-system";

/// Group every node kubelet belongs to once it holds a client certificate
pub const NODES_GROUP: &str = "system:nodes";

/// Group of kubelets authenticating with a kubeadm bootstrap token
pub const NODE_BOOTSTRAP_TOKEN_AUTH_GROUP: &str = "system:bootstrappers:kubeadm:default-node-token";

const RBAC_API_GROUP: &str = "rbac.authorization.k8s.io";

fn system_metadata(name: &str) -> ObjectMeta {
  ObjectMeta {
    name: Some(name.to_string()),
    namespace: Some(NAMESPACE_SYSTEM.to_string()),
    ..Default::default()
  }
}

/// ConfigMap holding a single document under `key`
pub fn config_map(name: &str, key: &str, content: String) -> ConfigMap {
  ConfigMap {
    metadata: system_metadata(name),
    data: Some(BTreeMap::from([(key.to_string(), content)])),
    ..Default::default()
  }
}

/// Role granting `get` on exactly one ConfigMap
pub fn config_map_reader_role(name: &str, config_map_name: &str) -> Role {
  Role {
    metadata: system_metadata(name),
    rules: Some(vec![PolicyRule {
      api_groups: Some(vec![String::new()]),
      resources: Some(vec!["configmaps".to_string()]),
      resource_names: Some(vec![config_map_name.to_string()]),
      verbs: vec!["get".to_string()],
      ..Default::default()
    }]),
  }
}

/// RoleBinding attaching the Role of the same name to bootstrapping and joined nodes
pub fn node_role_binding(name: &str) -> RoleBinding {
  RoleBinding {
    metadata: system_metadata(name),
    role_ref: RoleRef {
      api_group: RBAC_API_GROUP.to_string(),
      kind: "Role".to_string(),
      name: name.to_string(),
    },
    subjects: Some(vec![
      Subject {
        kind: "Group".to_string(),
        name: NODES_GROUP.to_string(),
        ..Default::default()
      },
      Subject {
        kind: "Group".to_string(),
        name: NODE_BOOTSTRAP_TOKEN_AUTH_GROUP.to_string(),
        ..Default::default()
      },
    ]),
  }
}
