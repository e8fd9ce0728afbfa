// ABOUTME: Configuration types and parsing for gantry.yml.
// ABOUTME: Handles YAML parsing, discovery, and deployment payload assembly.

mod init;

pub use init::init_config;

use crate::error::{Error, Result};
use crate::types::{DeploymentPayload, SlotRef, UpgradeMode};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "gantry.yml";
pub const CONFIG_FILENAME_ALT: &str = "gantry.yaml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub subscription_id: String,

    pub service_name: String,

    /// Deployment slot within the hosted service, e.g. `production` or
    /// `staging`.
    pub slot: String,

    /// Blob-storage URL of the already-uploaded application package.
    pub package_url: String,

    /// Path to the service configuration document carried into the
    /// deployment payload.
    pub service_configuration: PathBuf,

    pub deployment_name: String,

    pub deployment_label: String,

    pub role_name: String,

    /// Path to the PEM bundle (certificate plus private key) authenticating
    /// against the management endpoint.
    pub certificate: PathBuf,

    #[serde(default)]
    pub force: bool,

    #[serde(default)]
    pub upgrade_mode: UpgradeMode,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_interval", with = "humantime_serde")]
    pub retry_interval: Duration,
}

fn default_max_retries() -> u32 {
    20
}

fn default_retry_interval() -> Duration {
    Duration::from_secs(15)
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [dir.join(CONFIG_FILENAME), dir.join(CONFIG_FILENAME_ALT)];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// The deployment slot this configuration targets.
    pub fn slot_ref(&self) -> SlotRef {
        SlotRef::new(&self.subscription_id, &self.service_name, &self.slot)
    }

    /// Assembles the deployment payload, reading the service configuration
    /// document from disk.
    pub fn payload(&self) -> Result<DeploymentPayload> {
        let service_configuration = std::fs::read_to_string(&self.service_configuration)
            .map_err(|source| Error::ServiceConfigurationRead {
                path: self.service_configuration.clone(),
                source,
            })?;

        Ok(DeploymentPayload {
            name: self.deployment_name.clone(),
            label: self.deployment_label.clone(),
            package_url: self.package_url.clone(),
            service_configuration,
            role_name: self.role_name.clone(),
            upgrade_mode: self.upgrade_mode,
            force: self.force,
        })
    }
}
