// ABOUTME: Deployment payload carried into create and upgrade requests.
// ABOUTME: Renders the XML request bodies with base64-encoded label and configuration.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;

/// How the service rolls an upgrade across upgrade domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeMode {
    #[default]
    Auto,
    Manual,
}

impl fmt::Display for UpgradeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpgradeMode::Auto => write!(f, "Auto"),
            UpgradeMode::Manual => write!(f, "Manual"),
        }
    }
}

/// Everything a create or upgrade request body needs.
///
/// The service configuration document travels verbatim; the request body
/// base64-encodes it together with the label.
#[derive(Debug, Clone)]
pub struct DeploymentPayload {
    pub name: String,
    pub label: String,
    pub package_url: String,
    pub service_configuration: String,
    pub role_name: String,
    pub upgrade_mode: UpgradeMode,
    pub force: bool,
}

impl DeploymentPayload {
    /// Body for a create-deployment request.
    pub fn create_request_body(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<CreateDeployment xmlns="http://schemas.microsoft.com/windowsazure">
    <Name>{}</Name>
    <PackageUrl>{}</PackageUrl>
    <Label>{}</Label>
    <Configuration>{}</Configuration>
    <StartDeployment>true</StartDeployment>
</CreateDeployment>"#,
            self.name,
            self.package_url,
            BASE64.encode(&self.label),
            BASE64.encode(&self.service_configuration),
        )
    }

    /// Body for an in-place upgrade request.
    pub fn upgrade_request_body(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<UpgradeDeployment xmlns="http://schemas.microsoft.com/windowsazure">
    <Mode>{}</Mode>
    <PackageUrl>{}</PackageUrl>
    <Configuration>{}</Configuration>
    <Label>{}</Label>
    <Force>{}</Force>
</UpgradeDeployment>"#,
            self.upgrade_mode,
            self.package_url,
            BASE64.encode(&self.service_configuration),
            BASE64.encode(&self.label),
            self.force,
        )
    }
}
