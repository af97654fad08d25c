use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "./config.toml";

impl Config {

    /// Layer the (optional) TOML file and `MOVIEREORG__*` environment variables.
    /// `path` overrides `MOVIEREORG_CONFIG_PATH`.
    pub fn init(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let config_path = match path {
            Some(p) => p.to_string(),
            None => std::env::var("MOVIEREORG_CONFIG_PATH")
                .unwrap_or_else(|_| String::from(DEFAULT_CONFIG_PATH)),
        };

        let config = config::Config::builder()
            // Add in config toml; an explicit --config must exist
            .add_source(config::File::with_name(&config_path).required(path.is_some()))
            // Add in settings from the environment (with a prefix of MOVIEREORG)
            .add_source(config::Environment::with_prefix("MOVIEREORG").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

// ================================================================================================
// Models
// ================================================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[allow(unused)]
pub struct Config {
    #[serde(default)]
    pub logs: LogsConfig,
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    pub radarr: Option<RadarrConfig>,
}

// ===============================================================================
// Logs
// ===============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Let reqwest/hyper log at debug level instead of warn.
    #[serde(default)]
    pub enable_reqwest_logging: bool,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            enable_reqwest_logging: false,
        }
    }
}

fn default_log_level() -> String {
    String::from("info")
}

// ===============================================================================
// Library
// ===============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryConfig {
    /// Video extensions (without dot, case-insensitive) considered for sorting.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Only report what would be moved.
    #[serde(default)]
    pub dry_run: bool,
    /// Stop the run at the first file that fails.
    #[serde(default)]
    pub fail_fast: bool,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            dry_run: false,
            fail_fast: false,
        }
    }
}

fn default_extensions() -> Vec<String> {
    ["mp4", "mkv", "avi", "mov", "wmv"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

// ===============================================================================
// Metadata
// ===============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Tmdb,
    Radarr,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetadataConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    /// Per-request timeout. Unset means no timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbConfig {
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
    /// v3 API key or v4 read access token.
    #[serde(default)]
    pub api_key: Option<String>,
    /// e.g. "en-US"; titles come back in this language when set.
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub include_adult: bool,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_tmdb_base_url(),
            api_key: None,
            language: None,
            include_adult: false,
        }
    }
}

fn default_tmdb_base_url() -> String {
    String::from("https://api.themoviedb.org/3")
}

// ===============================================================================
// Radarr
// ===============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RadarrConfig {
    pub base_url: String,
    pub api_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = from_toml("");
        assert_eq!(cfg.logs.level, "info");
        assert_eq!(cfg.library.extensions, vec!["mp4", "mkv", "avi", "mov", "wmv"]);
        assert!(!cfg.library.dry_run);
        assert_eq!(cfg.metadata.provider, ProviderKind::Tmdb);
        assert_eq!(cfg.metadata.timeout_secs, None);
        assert_eq!(cfg.tmdb.base_url, "https://api.themoviedb.org/3");
        assert!(cfg.radarr.is_none());
    }

    #[test]
    fn radarr_provider() {
        let cfg = from_toml(
            r#"
            [logs]
            level = "debug"

            [library]
            extensions = ["mkv", "m4v"]
            fail_fast = true

            [metadata]
            provider = "radarr"
            timeout_secs = 10

            [radarr]
            base_url = "http://localhost:7878"
            api_key = "secret"
            "#,
        );
        assert_eq!(cfg.logs.level, "debug");
        assert_eq!(cfg.library.extensions, vec!["mkv", "m4v"]);
        assert!(cfg.library.fail_fast);
        assert_eq!(cfg.metadata.provider, ProviderKind::Radarr);
        assert_eq!(cfg.metadata.timeout_secs, Some(10));
        assert_eq!(cfg.radarr.unwrap().api_key, "secret");
    }

    #[test]
    fn provider_requires_credentials() {
        let cfg = from_toml("");
        assert!(crate::core::metadata::from_config(&cfg).is_err());

        let cfg = from_toml("[metadata]\nprovider = \"radarr\"\n");
        assert!(crate::core::metadata::from_config(&cfg).is_err());

        let cfg = from_toml("[tmdb]\napi_key = \"abc\"\n");
        assert!(crate::core::metadata::from_config(&cfg).is_ok());
    }
}
