//! Init command implementation

use crate::config::Config;
use crate::error::{Error, Result};
use std::path::PathBuf;
use tracing::info;

/// Write a starter configuration file and return its path.
///
/// Data file paths in the generated config are relative to the working
/// directory the pipeline runs in; edit them to point at the actual
/// evaluation files.
pub fn cmd_init(base_dir: Option<PathBuf>, force: bool) -> Result<PathBuf> {
    let base = base_dir.unwrap_or_else(Config::default_base_dir);
    let config_path = base.join("config.toml");

    if config_path.exists() && !force {
        return Err(Error::AlreadyInitialized(
            config_path.display().to_string(),
        ));
    }

    let mut config = Config::default();
    config.config_path = config_path.clone();
    config.save()?;

    info!("Initialized configuration at {}", config_path.display());
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_config() {
        let tmp = TempDir::new().unwrap();
        let path = cmd_init(Some(tmp.path().to_path_buf()), false).unwrap();
        assert!(path.exists());

        let loaded = Config::load(&path).unwrap();
        assert!(loaded.validate().is_ok());
    }

    #[test]
    fn test_init_refuses_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        cmd_init(Some(tmp.path().to_path_buf()), false).unwrap();

        let err = cmd_init(Some(tmp.path().to_path_buf()), false).unwrap_err();
        assert!(matches!(err, Error::AlreadyInitialized(_)));

        assert!(cmd_init(Some(tmp.path().to_path_buf()), true).is_ok());
    }
}
