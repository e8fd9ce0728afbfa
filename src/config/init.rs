// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates gantry.yml template files.

use std::path::Path;

use crate::error::{Error, Result};

use super::CONFIG_FILENAME;

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, template_yaml())?;

    Ok(())
}

fn template_yaml() -> &'static str {
    r#"subscription_id: 00000000-0000-0000-0000-000000000000
service_name: my-service
slot: staging
package_url: https://mystorageaccount.blob.core.windows.net/packages/my-app.cspkg
service_configuration: ServiceConfiguration.cscfg
deployment_name: my-app
deployment_label: my-app deployment
role_name: WebRole
certificate: management.pem
# force: false
# upgrade_mode: auto
# max_retries: 20
# retry_interval: 15s
"#
}
