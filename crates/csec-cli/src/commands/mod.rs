//! Sub-command implementations.

pub mod config;
pub mod crawl;
pub mod detail;
pub mod itsef;

use std::path::Path;

use csec_core::CsecConfig;

/// Load the configuration for a command.
///
/// An explicit `--config` path must exist. Otherwise the user config file is
/// used when present, falling back to defaults. Environment overrides are
/// applied last.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<CsecConfig> {
    let mut config = match config_path {
        Some(path) => CsecConfig::from_file(Path::new(path))
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path, e))?,
        None => {
            let default_path = config::default_config_path();
            if default_path.exists() {
                CsecConfig::from_file(&default_path)?
            } else {
                CsecConfig::default()
            }
        }
    };
    config.apply_env();
    Ok(config)
}

/// Whether `input` names a remote resource rather than a local file.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}
