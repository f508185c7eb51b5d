pub mod apiclient;
pub mod cli;
pub mod commands;
pub mod error;
pub mod kubeadm;
pub mod kubelet;
pub mod objects;
pub mod uploadconfig;
pub mod version;

pub use apiclient::ObjectStore;
pub use cli::{Cli, Commands};
pub use error::{BoxError, Error, Result};
pub use kubeadm::{publish_kubelet_config, upload_kubeadm_config, upload_kubelet_config, Configuration};
pub use kubelet::{CgroupDriver, KubeletConfiguration, TenantParameters};
pub use version::ResourceNames;
