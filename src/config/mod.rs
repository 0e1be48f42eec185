mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;
use visionary_common::ExtensionSet;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./visionary.toml",
        "~/.config/visionary/config.toml",
        "/etc/visionary/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    ExtensionSet::new(&config.library.extensions)
        .context("library.extensions must name at least one extension")?;

    if config.selection.preferred_language.trim().is_empty() {
        anyhow::bail!("selection.preferred_language cannot be empty");
    }

    if config.remux.default_language.trim().is_empty() {
        anyhow::bail!("remux.default_language cannot be empty");
    }

    if !config.remux.extract_video && !config.remux.extract_audio {
        anyhow::bail!("remux must extract at least one of video or audio");
    }

    if let Some(ref root) = config.library.root {
        if !root.exists() {
            tracing::warn!("Library root does not exist: {:?}", root);
        }
    }

    Ok(())
}
