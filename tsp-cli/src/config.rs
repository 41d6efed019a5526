use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Admin API of an agent started with the default port layout (8020 + 1).
pub const DEFAULT_ADMIN_URL: &str = "http://localhost:8021";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TspConfig {
    pub admin_url: Option<String>,
    pub api_key: Option<String>,
}

impl TspConfig {
    /// CLI/env value > config file > default.
    pub fn resolve_admin_url(&self, cli: Option<String>) -> String {
        cli.or_else(|| self.admin_url.clone())
            .unwrap_or_else(|| DEFAULT_ADMIN_URL.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn resolve_api_key(&self, cli: Option<String>) -> Option<String> {
        cli.or_else(|| self.api_key.clone())
    }
}

/// Returns `~/.config/tsp/`, creating it if it doesn't exist.
pub fn config_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let dir = dirs::config_dir()
        .ok_or("could not determine config directory")?
        .join("tsp");
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}

/// Returns `~/.config/tsp/config.toml`.
pub fn config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load config from `~/.config/tsp/config.toml`. Returns default if missing.
pub fn load_config() -> Result<TspConfig, Box<dyn std::error::Error>> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<TspConfig, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Ok(TspConfig::default());
    }
    let contents = std::fs::read_to_string(path)?;
    let config: TspConfig = toml::from_str(&contents)
        .map_err(|e| format!("failed to parse {}: {e}", path.display()))?;
    Ok(config)
}

/// Save config to `~/.config/tsp/config.toml`.
pub fn save_config(config: &TspConfig) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = config_path()?;
    save_config_to(config, &path)?;
    Ok(path)
}

pub fn save_config_to(config: &TspConfig, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let contents =
        toml::to_string_pretty(config).map_err(|e| format!("failed to serialize config: {e}"))?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = TspConfig {
            admin_url: Some("http://agent.example.com:8021".into()),
            api_key: Some("secret".into()),
        };
        save_config_to(&config, &path).unwrap();

        let restored = load_config_from(&path).unwrap();
        assert_eq!(
            restored.admin_url.as_deref(),
            Some("http://agent.example.com:8021")
        );
        assert_eq!(restored.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert!(config.admin_url.is_none());
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_invalid_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "admin_url = [").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn test_admin_url_precedence() {
        let config = TspConfig {
            admin_url: Some("http://from-file:9021/".into()),
            api_key: None,
        };
        assert_eq!(
            config.resolve_admin_url(Some("http://cli:8021".into())),
            "http://cli:8021"
        );
        assert_eq!(config.resolve_admin_url(None), "http://from-file:9021");
        assert_eq!(
            TspConfig::default().resolve_admin_url(None),
            DEFAULT_ADMIN_URL
        );
    }
}
