use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the database when nothing else is configured
pub const DEFAULT_DATABASE_NAME: &str = "mydatabase.db";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RosterConfig {
    pub database: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("roster.toml")
}

/// The database lives next to the running executable
pub fn default_database_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .map(|dir| dir.join(DEFAULT_DATABASE_NAME))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_NAME))
}

/// Pick the database path: explicit flag, then config file, then default
pub fn resolve_database_path(flag: Option<&Path>, config: Option<&RosterConfig>) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    config
        .and_then(|c| c.database.as_deref())
        .map(PathBuf::from)
        .unwrap_or_else(default_database_path)
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<RosterConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: RosterConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &RosterConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_order() {
        let config = RosterConfig { database: Some("from-config.db".to_string()) };

        assert_eq!(
            resolve_database_path(Some(Path::new("flag.db")), Some(&config)),
            PathBuf::from("flag.db")
        );
        assert_eq!(resolve_database_path(None, Some(&config)), PathBuf::from("from-config.db"));

        let fallback = resolve_database_path(None, Some(&RosterConfig::default()));
        assert_eq!(fallback.file_name().unwrap(), DEFAULT_DATABASE_NAME);
        assert_eq!(resolve_database_path(None, None), fallback);
    }

    #[test]
    fn test_config_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.toml");
        let config = RosterConfig { database: Some("data/people.db".to_string()) };

        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();

        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded.database.as_deref(), Some("data/people.db"));
    }

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.toml"))).unwrap().is_none());
    }

    #[test]
    fn test_ensure_db_dir() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("deeper").join("roster.db");
        ensure_db_dir(&db).unwrap();
        assert!(db.parent().unwrap().is_dir());
        ensure_db_dir(Path::new("roster.db")).unwrap();
    }
}
