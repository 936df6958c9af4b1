mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    expand_paths(&mut config);

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./edumatrix.toml",
        "./config.toml",
        "~/.config/edumatrix/config.toml",
        "/etc/edumatrix/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(Config::default())
}

fn expand(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).as_ref()),
        None => path.to_path_buf(),
    }
}

fn expand_paths(config: &mut Config) {
    config.database.path = expand(&config.database.path);
    if let Some(dir) = config.export.dir.as_mut() {
        *dir = expand(dir);
    }
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.database.path.as_os_str().is_empty() {
        anyhow::bail!("Database path cannot be empty");
    }

    let seed = &config.seed;
    for (name, value) in [
        ("students", seed.students),
        ("professors", seed.professors),
        ("courses", seed.courses),
        ("max_enrollments", seed.max_enrollments),
    ] {
        if value == 0 {
            anyhow::bail!("Seed count '{}' must be at least 1", name);
        }
    }

    if let Some(dir) = &config.export.dir {
        if !dir.exists() {
            tracing::warn!("Export directory does not exist yet: {:?}", dir);
        }
    }

    Ok(())
}
