use thiserror::Error;

/// Boxed error returned by an [`ObjectStore`](crate::apiclient::ObjectStore) implementation
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while uploading kubeadm and kubelet configuration to a tenant control plane
#[derive(Debug, Error)]
pub enum Error {
  /// The Kubernetes version is not a semantic version
  #[error("unable to parse Kubernetes version {version:?}")]
  VersionParse {
    version: String,
    #[source]
    source: semver::Error,
  },

  /// A configuration document could not be encoded
  #[error("unable to serialize configuration")]
  Serialization(#[from] serde_yaml::Error),

  #[error("unable to create or update ConfigMap {name}")]
  ConfigMapPublish {
    name: String,
    #[source]
    source: BoxError,
  },

  #[error("unable to create or update Role {name}")]
  RolePublish {
    name: String,
    #[source]
    source: BoxError,
  },

  #[error("unable to create or update RoleBinding {name}")]
  RoleBindingPublish {
    name: String,
    #[source]
    source: BoxError,
  },
}

impl Error {
  /// Whether the caller's reconciliation loop may try again
  ///
  /// Remote failures are safe to retry since every upsert replaces the full object.
  /// Input and encoding failures will fail the same way on every attempt.
  pub fn is_retryable(&self) -> bool {
    match self {
      Error::VersionParse { .. } | Error::Serialization(_) => false,
      Error::ConfigMapPublish { .. } | Error::RolePublish { .. } | Error::RoleBindingPublish { .. } => true,
    }
  }
}
