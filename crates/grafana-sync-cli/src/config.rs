use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const TOKEN_ENV: &str = "GRAFANA_TOKEN";

/// Optional defaults read from the config file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    pub bearer: Option<String>,
    pub path: Option<PathBuf>,
}

/// Settings after merging flags, environment and config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub bearer: Option<String>,
    pub path: PathBuf,
}

impl AppConfig {
    /// Flags win over the environment, which wins over the file.
    pub fn resolve(
        &self,
        bearer_flag: Option<String>,
        bearer_env: Option<String>,
        path_flag: Option<PathBuf>,
    ) -> Resolved {
        Resolved {
            bearer: bearer_flag.or(bearer_env).or_else(|| self.bearer.clone()),
            path: path_flag
                .or_else(|| self.path.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
        }
    }
}

/// Config file path: `~/.config/grafana-sync/config.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("grafana-sync").join("config.toml"))
}

/// Load config from file, falling back to defaults if missing.
pub fn load_config() -> AppConfig {
    if let Some(path) = config_path()
        && let Ok(contents) = std::fs::read_to_string(&path)
    {
        match toml::from_str::<AppConfig>(&contents) {
            Ok(config) => return config,
            Err(e) => warn!(
                "failed to parse config at {}, using defaults: {e}",
                path.display()
            ),
        }
    }

    AppConfig::default()
}

pub fn token_from_env() -> Option<String> {
    std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
bearer = "eyJrIjoi"
path = "/srv/grafana-backup"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bearer.as_deref(), Some("eyJrIjoi"));
        assert_eq!(config.path, Some(PathBuf::from("/srv/grafana-backup")));
    }

    #[test]
    fn empty_config_is_default() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.bearer.is_none());
        assert!(config.path.is_none());
    }

    #[test]
    fn defaults_apply_without_any_source() {
        let resolved = AppConfig::default().resolve(None, None, None);
        assert_eq!(resolved.bearer, None);
        assert_eq!(resolved.path, PathBuf::from("data"));
    }

    #[test]
    fn flag_beats_env_beats_file() {
        let config = AppConfig {
            bearer: Some("file".into()),
            path: Some("from-file".into()),
        };

        let resolved = config.resolve(Some("flag".into()), Some("env".into()), None);
        assert_eq!(resolved.bearer.as_deref(), Some("flag"));
        assert_eq!(resolved.path, PathBuf::from("from-file"));

        let resolved = config.resolve(None, Some("env".into()), Some("cli".into()));
        assert_eq!(resolved.bearer.as_deref(), Some("env"));
        assert_eq!(resolved.path, PathBuf::from("cli"));

        let resolved = config.resolve(None, None, None);
        assert_eq!(resolved.bearer.as_deref(), Some("file"));
    }
}
