//! Kubernetes-version-scoped resource names
//!
//! kubeadm-provisioned nodes locate their kubelet configuration by the control plane's
//! `<major>.<minor>` version, so every name derived here ignores the patch component.
//! All callers go through [`resource_names`] (or the two helpers built on it) so the
//! ConfigMap that gets written and the ConfigMap that RBAC grants access to never disagree.

use semver::Version;

use crate::{Error, Result};

/// Prefix of the versioned kubelet base configuration ConfigMap
pub const KUBELET_CONFIG_MAP_PREFIX: &str = "kubelet-config-";

/// Prefix of the Role and RoleBinding that let nodes read the kubelet ConfigMap
pub const KUBELET_CONFIG_MAP_ROLE_PREFIX: &str = "kubeadm:kubelet-config-";

/// Names of the objects published for one Kubernetes minor version
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceNames {
  /// Name of the kubelet configuration ConfigMap
  pub config_map: String,
  /// Name shared by the Role and RoleBinding
  pub rbac: String,
}

/// Parse a Kubernetes version as a strict semantic version
///
/// Like `kubelet --version` output, a leading `v` is accepted (`v1.28.2`), but all three
/// numeric components are required; `1.28`, `latest` or `v1.x` are rejected. Leading
/// whitespace is ignored, trailing whitespace is not.
pub fn parse(version: &str) -> Result<Version> {
  let trimmed = version.trim_start();
  let bare = trimmed.strip_prefix('v').unwrap_or(trimmed);

  Version::parse(bare).map_err(|source| Error::VersionParse {
    version: version.to_string(),
    source,
  })
}

/// Resolve the ConfigMap and RBAC names for the given Kubernetes version
pub fn resource_names(version: &str) -> Result<ResourceNames> {
  let version = parse(version)?;
  let minor = format!("{}.{}", version.major, version.minor);

  Ok(ResourceNames {
    config_map: format!("{KUBELET_CONFIG_MAP_PREFIX}{minor}"),
    rbac: format!("{KUBELET_CONFIG_MAP_ROLE_PREFIX}{minor}"),
  })
}

pub fn config_map_name(version: &str) -> Result<String> {
  Ok(resource_names(version)?.config_map)
}

pub fn rbac_name(version: &str) -> Result<String> {
  Ok(resource_names(version)?.rbac)
}

#[cfg(test)]
mod tests {
  use rstest::*;

  use super::*;

  #[test]
  fn it_gets_semver_bare() {
    let expected = Version::parse("1.20.4").unwrap();
    assert_eq!(parse("1.20.4").unwrap(), expected);
  }

  #[test]
  fn it_gets_semver_leading() {
    let expected = Version::parse("1.20.4").unwrap();
    assert_eq!(parse("v1.20.4").unwrap(), expected);
  }

  #[test]
  fn it_skips_leading_whitespace() {
    assert_eq!(parse("  v1.27.3").unwrap(), Version::new(1, 27, 3));
  }

  #[test]
  fn it_keeps_prerelease() {
    let version = parse("1.29.0-rc.1").unwrap();
    assert_eq!(version.pre.as_str(), "rc.1");
  }

  #[rstest]
  #[case("1.28.2", "kubelet-config-1.28", "kubeadm:kubelet-config-1.28")]
  #[case("v1.27.0", "kubelet-config-1.27", "kubeadm:kubelet-config-1.27")]
  #[case("1.30.1+build.7", "kubelet-config-1.30", "kubeadm:kubelet-config-1.30")]
  #[case("2.0.0-alpha.0", "kubelet-config-2.0", "kubeadm:kubelet-config-2.0")]
  fn it_resolves_names(#[case] version: &str, #[case] config_map: &str, #[case] rbac: &str) {
    let names = resource_names(version).unwrap();
    assert_eq!(names.config_map, config_map);
    assert_eq!(names.rbac, rbac);
    assert_eq!(config_map_name(version).unwrap(), config_map);
    assert_eq!(rbac_name(version).unwrap(), rbac);
  }

  #[rstest]
  #[case("1.27.0", "1.27.9")]
  #[case("1.27.3", "v1.27.14")]
  #[case("1.28.0-rc.1", "1.28.2")]
  fn it_ignores_patch(#[case] a: &str, #[case] b: &str) {
    assert_eq!(resource_names(a).unwrap(), resource_names(b).unwrap());
  }

  #[test]
  fn it_separates_minors() {
    let a = resource_names("1.27.9").unwrap();
    let b = resource_names("1.28.0").unwrap();
    assert_ne!(a.config_map, b.config_map);
    assert_ne!(a.rbac, b.rbac);
  }

  #[rstest]
  #[case("latest")]
  #[case("")]
  #[case("v1.x")]
  #[case("1.27")]
  #[case("1.27.x")]
  #[case("v")]
  #[case("1.27.3 ")]
  #[case("1.27.3-01")]
  fn it_rejects_non_semver(#[case] version: &str) {
    match resource_names(version) {
      Err(Error::VersionParse { version: bad, .. }) => assert_eq!(bad, version),
      other => panic!("expected version parse error, got {other:?}"),
    }
  }
}
