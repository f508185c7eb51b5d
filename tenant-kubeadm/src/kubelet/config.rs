use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{CgroupDriver, TenantParameters};
use crate::Result;

pub const KIND: &str = "KubeletConfiguration";
pub const API_VERSION: &str = "kubelet.config.k8s.io/v1beta1";

/// A zero duration tells the kubelet to fall back to its compiled-in default
pub const ZERO_DURATION: &str = "0s";

/// Settings that every tenant's kubelet configuration carries, regardless of tenant or version
///
/// This is the single place to audit what nodes bootstrapped from the published ConfigMap
/// will run with. Only the cluster domain, cluster DNS and cgroup driver come from the tenant.
#[derive(Clone, Copy, Debug)]
pub struct HardenedDefaults {
  pub anonymous_auth_enabled: bool,
  pub webhook_auth_enabled: bool,
  pub webhook_auth_cache_ttl: &'static str,
  pub client_ca_file: &'static str,
  pub authorization_mode: &'static str,
  pub authorized_cache_ttl: &'static str,
  pub unauthorized_cache_ttl: &'static str,
  /// Hard eviction signals; 0% means disk pressure is never tolerated silently
  pub eviction_hard: &'static [(&'static str, &'static str)],
  /// Applied to every periodic timer, timeout and grace period
  pub periodic_duration: &'static str,
  pub rotate_certificates: bool,
  pub healthz_bind_address: &'static str,
  pub healthz_port: i32,
  /// 100 leaves image garbage collection to node-level policy
  pub image_gc_high_threshold_percent: i32,
  pub static_pod_path: &'static str,
}

pub const HARDENED_DEFAULTS: HardenedDefaults = HardenedDefaults {
  anonymous_auth_enabled: false,
  webhook_auth_enabled: true,
  webhook_auth_cache_ttl: ZERO_DURATION,
  client_ca_file: "/etc/kubernetes/pki/ca.crt",
  authorization_mode: "Webhook",
  authorized_cache_ttl: ZERO_DURATION,
  unauthorized_cache_ttl: ZERO_DURATION,
  eviction_hard: &[
    ("imagefs.available", "0%"),
    ("nodefs.available", "0%"),
    ("nodefs.inodesFree", "0%"),
  ],
  periodic_duration: ZERO_DURATION,
  rotate_certificates: true,
  healthz_bind_address: "127.0.0.1",
  healthz_port: 10248,
  image_gc_high_threshold_percent: 100,
  static_pod_path: "/etc/kubernetes/manifests",
};

/// KubeletConfiguration contains the configuration for the Kubelet
///
/// Only the fields published to tenant nodes are modelled. Fields are declared in
/// lexicographic order of their serialized names, which is the order kubeadm writes them in.
///
/// https://kubernetes.io/docs/reference/config-api/kubelet-config.v1beta1/
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubeletConfiguration {
  /// APIVersion defines the versioned schema of this representation of an object.
  pub api_version: String,

  /// authentication specifies how requests to the Kubelet's server are authenticated.
  pub authentication: Authentication,

  /// authorization specifies how requests to the Kubelet's server are authorized.
  pub authorization: Authorization,

  /// cgroupDriver is the driver kubelet uses to manipulate CGroups on the host (cgroupfs
  /// or systemd).
  pub cgroup_driver: CgroupDriver,

  /// clusterDNS is a list of IP addresses for the cluster DNS server. If set,
  /// kubelet will configure all containers to use this for DNS resolution
  /// instead of the host's DNS servers.
  #[serde(rename = "clusterDNS")]
  pub cluster_dns: Vec<String>,

  /// clusterDomain is the DNS domain for this cluster. If set, kubelet will
  /// configure all containers to search this domain in addition to the
  /// host's search domains.
  pub cluster_domain: String,

  /// cpuManagerReconcilePeriod is the reconciliation period for the CPU Manager.
  pub cpu_manager_reconcile_period: String,

  /// evictionHard is a map of signal names to quantities that defines hard eviction
  /// thresholds. For example: `{"memory.available": "300Mi"}`.
  pub eviction_hard: BTreeMap<String, String>,

  /// evictionPressureTransitionPeriod is the duration for which the kubelet has to
  /// wait before transitioning out of an eviction pressure condition.
  pub eviction_pressure_transition_period: String,

  /// fileCheckFrequency is the duration between checking config files for new data.
  pub file_check_frequency: String,

  /// healthzBindAddress is the IP address for the healthz server to serve on.
  pub healthz_bind_address: String,

  /// healthzPort is the port of the localhost healthz endpoint (set to 0 to disable).
  pub healthz_port: i32,

  /// httpCheckFrequency is the duration between checking http for new data.
  pub http_check_frequency: String,

  /// imageGCHighThresholdPercent is the percent of disk usage after which image
  /// garbage collection is always run.
  #[serde(rename = "imageGCHighThresholdPercent")]
  pub image_gc_high_threshold_percent: i32,

  /// Kind is a string value representing the REST resource this object represents.
  pub kind: String,

  /// nodeStatusReportFrequency is the frequency that kubelet posts node
  /// status to master if node status does not change.
  pub node_status_report_frequency: String,

  /// nodeStatusUpdateFrequency is the frequency that kubelet computes node
  /// status.
  pub node_status_update_frequency: String,

  /// rotateCertificates enables client certificate rotation.
  pub rotate_certificates: bool,

  /// runtimeRequestTimeout is the timeout for all runtime requests except long running
  /// requests - pull, logs, exec and attach.
  pub runtime_request_timeout: String,

  /// shutdownGracePeriod specifies the total duration that the node should delay the
  /// shutdown and total grace period for pod termination during a node shutdown.
  pub shutdown_grace_period: String,

  /// shutdownGracePeriodCriticalPods specifies the duration used to terminate critical
  /// pods during a node shutdown.
  pub shutdown_grace_period_critical_pods: String,

  /// staticPodPath is the path to the directory containing local (static) pods to
  /// run, or the path to a single static pod file.
  pub static_pod_path: String,

  /// streamingConnectionIdleTimeout is the maximum time a streaming connection
  /// can be idle before the connection is automatically closed.
  pub streaming_connection_idle_timeout: String,

  /// syncFrequency is the max period between synchronizing running
  /// containers and config.
  pub sync_frequency: String,

  /// volumeStatsAggPeriod is the frequency for calculating and caching volume
  /// disk usage for all pods.
  pub volume_stats_agg_period: String,
}

impl KubeletConfiguration {
  /// Merge the tenant's parameters into the hardened defaults
  pub fn new(params: &TenantParameters) -> Self {
    Self::from_defaults(&HARDENED_DEFAULTS, params)
  }

  fn from_defaults(defaults: &HardenedDefaults, params: &TenantParameters) -> Self {
    let periodic = defaults.periodic_duration.to_string();

    KubeletConfiguration {
      api_version: API_VERSION.to_string(),
      authentication: Authentication {
        anonymous: AuthnAnonymous {
          enabled: defaults.anonymous_auth_enabled,
        },
        webhook: AuthnWebhook {
          cache_ttl: defaults.webhook_auth_cache_ttl.to_string(),
          enabled: defaults.webhook_auth_enabled,
        },
        x509: AuthnX509 {
          client_ca_file: defaults.client_ca_file.to_string(),
        },
      },
      authorization: Authorization {
        mode: defaults.authorization_mode.to_string(),
        webhook: AuthzWebhook {
          cache_authorized_ttl: defaults.authorized_cache_ttl.to_string(),
          cache_unauthorized_ttl: defaults.unauthorized_cache_ttl.to_string(),
        },
      },
      cgroup_driver: params.cgroup_driver,
      cluster_dns: params.dns_service_ips.clone(),
      cluster_domain: params.dns_domain.clone(),
      cpu_manager_reconcile_period: periodic.clone(),
      eviction_hard: defaults
        .eviction_hard
        .iter()
        .map(|(signal, threshold)| (signal.to_string(), threshold.to_string()))
        .collect(),
      eviction_pressure_transition_period: periodic.clone(),
      file_check_frequency: periodic.clone(),
      healthz_bind_address: defaults.healthz_bind_address.to_string(),
      healthz_port: defaults.healthz_port,
      http_check_frequency: periodic.clone(),
      image_gc_high_threshold_percent: defaults.image_gc_high_threshold_percent,
      kind: KIND.to_string(),
      node_status_report_frequency: periodic.clone(),
      node_status_update_frequency: periodic.clone(),
      rotate_certificates: defaults.rotate_certificates,
      runtime_request_timeout: periodic.clone(),
      shutdown_grace_period: periodic.clone(),
      shutdown_grace_period_critical_pods: periodic.clone(),
      static_pod_path: defaults.static_pod_path.to_string(),
      streaming_connection_idle_timeout: periodic.clone(),
      sync_frequency: periodic.clone(),
      volume_stats_agg_period: periodic,
    }
  }

  /// Serialize the configuration into the YAML document stored in the ConfigMap
  pub fn to_yaml(&self) -> Result<String> {
    Ok(serde_yaml::to_string(self)?)
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authentication {
  pub anonymous: AuthnAnonymous,
  pub webhook: AuthnWebhook,
  pub x509: AuthnX509,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthnAnonymous {
  pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthnWebhook {
  #[serde(rename = "cacheTTL")]
  pub cache_ttl: String,
  pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthnX509 {
  #[serde(rename = "clientCAFile")]
  pub client_ca_file: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
  pub mode: String,
  pub webhook: AuthzWebhook,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthzWebhook {
  #[serde(rename = "cacheAuthorizedTTL")]
  pub cache_authorized_ttl: String,
  #[serde(rename = "cacheUnauthorizedTTL")]
  pub cache_unauthorized_ttl: String,
}
