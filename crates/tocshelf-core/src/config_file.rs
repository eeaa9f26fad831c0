use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::heuristic::HeadingRules;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub storage: Option<StorageConfig>,
    pub heuristic: Option<HeuristicConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub body_limit_mb: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub upload_dir: Option<String>,
    pub documents_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeuristicConfig {
    pub min_font_size: Option<f32>,
    pub min_title_chars: Option<usize>,
    pub max_title_chars: Option<usize>,
}

/// Platform config directory path: `<config_dir>/tocshelf/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tocshelf").join("config.toml"))
}

/// Load config by cascading CWD `.tocshelf.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".tocshelf.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), "ignoring unparsable config: {e}");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_server = base.server.unwrap_or_default();
    let over_server = overlay.server.unwrap_or_default();
    let base_storage = base.storage.unwrap_or_default();
    let over_storage = overlay.storage.unwrap_or_default();
    let base_heuristic = base.heuristic.unwrap_or_default();
    let over_heuristic = overlay.heuristic.unwrap_or_default();

    ConfigFile {
        server: Some(ServerConfig {
            bind: over_server.bind.or(base_server.bind),
            port: over_server.port.or(base_server.port),
            body_limit_mb: over_server.body_limit_mb.or(base_server.body_limit_mb),
        }),
        storage: Some(StorageConfig {
            upload_dir: over_storage.upload_dir.or(base_storage.upload_dir),
            documents_file: over_storage.documents_file.or(base_storage.documents_file),
        }),
        heuristic: Some(HeuristicConfig {
            min_font_size: over_heuristic.min_font_size.or(base_heuristic.min_font_size),
            min_title_chars: over_heuristic
                .min_title_chars
                .or(base_heuristic.min_title_chars),
            max_title_chars: over_heuristic
                .max_title_chars
                .or(base_heuristic.max_title_chars),
        }),
    }
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub bind: String,
    pub port: u16,
    pub body_limit_mb: usize,
    pub upload_dir: PathBuf,
    pub documents_file: PathBuf,
    pub heading_rules: HeadingRules,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8000,
            body_limit_mb: 50,
            upload_dir: PathBuf::from("uploads"),
            documents_file: PathBuf::from("documents.json"),
            heading_rules: HeadingRules::default(),
        }
    }
}

impl Settings {
    /// Config files, then `TOCSHELF_*` environment variables, over defaults.
    pub fn load() -> Self {
        Self::from_config(load_config()).with_env(|key| std::env::var(key).ok())
    }

    pub fn from_config(config: ConfigFile) -> Self {
        let defaults = Self::default();
        let server = config.server.unwrap_or_default();
        let storage = config.storage.unwrap_or_default();
        let heuristic = config.heuristic.unwrap_or_default();
        let rules = defaults.heading_rules;

        Self {
            bind: server.bind.unwrap_or(defaults.bind),
            port: server.port.unwrap_or(defaults.port),
            body_limit_mb: server.body_limit_mb.unwrap_or(defaults.body_limit_mb),
            upload_dir: storage
                .upload_dir
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            documents_file: storage
                .documents_file
                .map(PathBuf::from)
                .unwrap_or(defaults.documents_file),
            heading_rules: HeadingRules {
                min_font_size: heuristic.min_font_size.unwrap_or(rules.min_font_size),
                min_title_chars: heuristic.min_title_chars.unwrap_or(rules.min_title_chars),
                max_title_chars: heuristic.max_title_chars.unwrap_or(rules.max_title_chars),
            },
        }
    }

    /// Apply environment overrides read through `var`. Unparsable values
    /// are ignored with a warning.
    pub fn with_env(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(bind) = var("TOCSHELF_BIND") {
            self.bind = bind;
        }
        if let Some(port) = var("TOCSHELF_PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!("ignoring invalid TOCSHELF_PORT: {port}"),
            }
        }
        if let Some(dir) = var("TOCSHELF_UPLOAD_DIR") {
            self.upload_dir = PathBuf::from(dir);
        }
        if let Some(file) = var("TOCSHELF_DOCUMENTS_FILE") {
            self.documents_file = PathBuf::from(file);
        }
        self
    }

    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_mb * 1024 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_round_trip_toml() {
        let config = ConfigFile {
            storage: Some(StorageConfig {
                upload_dir: Some("/srv/pdfs".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.storage.unwrap().upload_dir.unwrap(), "/srv/pdfs");
    }

    #[test]
    fn absent_sections_deserialize_as_none() {
        let toml_str = "[server]\nport = 9000\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        assert!(parsed.storage.is_none());
        assert_eq!(parsed.server.unwrap().port, Some(9000));
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            server: Some(ServerConfig {
                port: Some(8000),
                bind: Some("127.0.0.1".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            server: Some(ServerConfig {
                port: Some(9000),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay).server.unwrap();
        assert_eq!(merged.port, Some(9000));
        assert_eq!(merged.bind.as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn empty_config_resolves_to_defaults() {
        assert_eq!(Settings::from_config(ConfigFile::default()), Settings::default());
    }

    #[test]
    fn heuristic_section_overrides_rules() {
        let toml_str = "[heuristic]\nmin_font_size = 14.5\n";
        let settings = Settings::from_config(toml::from_str(toml_str).unwrap());
        assert_eq!(settings.heading_rules.min_font_size, 14.5);
        assert_eq!(settings.heading_rules.max_title_chars, 100);
    }

    #[test]
    fn env_overrides_config() {
        let settings = Settings::default().with_env(|key| match key {
            "TOCSHELF_PORT" => Some("8123".to_string()),
            "TOCSHELF_UPLOAD_DIR" => Some("/data/uploads".to_string()),
            _ => None,
        });
        assert_eq!(settings.port, 8123);
        assert_eq!(settings.upload_dir, PathBuf::from("/data/uploads"));
        assert_eq!(settings.documents_file, PathBuf::from("documents.json"));
    }

    #[test]
    fn invalid_env_port_is_ignored() {
        let settings = Settings::default().with_env(|key| {
            (key == "TOCSHELF_PORT").then(|| "not-a-port".to_string())
        });
        assert_eq!(settings.port, 8000);
    }
}
