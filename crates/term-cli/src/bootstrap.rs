use std::path::Path;

use anyhow::Context;
use term_config::TermConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, the layered config, then apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<TermConfig> {
    let mut config = TermConfig::load_with_dotenv().context("failed to load termbase config")?;
    if let Some(path) = &flags.database {
        config.database.path.clone_from(path);
        config.validate()?;
    }
    Ok(config)
}

/// Create the directory holding the database file, if it has one.
pub fn ensure_database_dir(config: &TermConfig) -> anyhow::Result<()> {
    if let Some(dir) = config.database.parent_dir() {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create database directory {}", dir.display()))?;
    }
    Ok(())
}

/// Write the effective config to `path` unless a file is already there.
///
/// Returns whether a file was written.
pub fn write_default_config(config: &TermConfig, path: &Path) -> anyhow::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }
    let rendered = toml::to_string_pretty(config).context("failed to render config")?;
    std::fs::write(path, rendered)
        .with_context(|| format!("failed to write config file {}", path.display()))?;
    Ok(true)
}
