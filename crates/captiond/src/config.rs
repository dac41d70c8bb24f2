//! Relay configuration
//!
//! Values come from three layers, highest precedence first:
//! command-line flags (each also readable from an environment variable),
//! an optional TOML file, and built-in defaults. The upstream URL and the
//! subscription key have no default and must be supplied.
//!
//! ```toml
//! [server]
//! port = 3000
//! max_upload_bytes = 20971520
//!
//! [upstream]
//! url = "https://<resource>.cognitiveservices.azure.com/computervision/imageanalysis:analyze?api-version=2023-04-01&features=caption"
//! subscription_key = "<key>"
//! timeout_secs = 30
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use caption_upstream::UpstreamConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Listen port used when nothing else is configured
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Upstream URL is required (--upstream-url, CAPTION_UPSTREAM_URL or [upstream] url)")]
    MissingUpstreamUrl,

    #[error("Invalid upstream URL '{url}': {reason}")]
    InvalidUpstreamUrl { url: String, reason: String },

    #[error(
        "Subscription key is required (--subscription-key, CAPTION_SUBSCRIPTION_KEY or [upstream] subscription_key)"
    )]
    MissingSubscriptionKey,

    #[error("upstream.timeout_secs must be greater than zero")]
    ZeroTimeout,
}

/// `[server]` table
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub max_upload_bytes: Option<usize>,
}

/// `[upstream]` table
#[derive(Debug, Default, Clone, Deserialize)]
pub struct UpstreamSection {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub subscription_key: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Contents of the optional TOML config file
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub upstream: UpstreamSection,
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values given on the command line or through the environment
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub upstream_url: Option<String>,
    pub subscription_key: Option<String>,
}

/// Fully resolved relay configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub port: u16,
    pub max_upload_bytes: Option<usize>,
    pub upstream: UpstreamConfig,
}

impl RelayConfig {
    /// Merge overrides over file values over defaults, and validate
    pub fn resolve(overrides: ConfigOverrides, file: FileConfig) -> Result<Self, ConfigError> {
        let port = overrides
            .port
            .or(file.server.port)
            .unwrap_or(DEFAULT_PORT);

        let raw_url = non_empty(overrides.upstream_url)
            .or_else(|| non_empty(file.upstream.url))
            .ok_or(ConfigError::MissingUpstreamUrl)?;
        let url = parse_upstream_url(&raw_url)?;

        let subscription_key = non_empty(overrides.subscription_key)
            .or_else(|| non_empty(file.upstream.subscription_key))
            .ok_or(ConfigError::MissingSubscriptionKey)?;

        let mut upstream = UpstreamConfig::new(url, subscription_key);
        match file.upstream.timeout_secs {
            Some(0) => return Err(ConfigError::ZeroTimeout),
            Some(secs) => upstream = upstream.with_timeout(Duration::from_secs(secs)),
            None => {}
        }

        Ok(Self {
            port,
            max_upload_bytes: file.server.max_upload_bytes,
            upstream,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_upstream_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUpstreamUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUpstreamUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const URL: &str = "https://vision.example.com/computervision/imageanalysis:analyze?api-version=2023-04-01&features=caption";

    fn required() -> ConfigOverrides {
        ConfigOverrides {
            port: None,
            upstream_url: Some(URL.to_string()),
            subscription_key: Some("key-123".to_string()),
        }
    }

    #[test]
    fn test_port_defaults_to_3000() {
        let config = RelayConfig::resolve(required(), FileConfig::default()).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_upload_bytes, None);
        assert!(config.upstream.timeout.is_none());
    }

    #[test]
    fn test_port_override_is_honored() {
        let overrides = ConfigOverrides {
            port: Some(8080),
            ..required()
        };
        let config = RelayConfig::resolve(overrides, FileConfig::default()).unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_override_beats_file_beats_default() {
        let file: FileConfig = toml::from_str(
            r#"
            [server]
            port = 4000
            max_upload_bytes = 1048576

            [upstream]
            url = "http://file.example.com/analyze"
            subscription_key = "file-key"
            timeout_secs = 15
            "#,
        )
        .unwrap();

        let from_file = RelayConfig::resolve(ConfigOverrides::default(), file.clone()).unwrap();
        assert_eq!(from_file.port, 4000);
        assert_eq!(from_file.max_upload_bytes, Some(1048576));
        assert_eq!(from_file.upstream.url.as_str(), "http://file.example.com/analyze");
        assert_eq!(from_file.upstream.subscription_key, "file-key");
        assert_eq!(from_file.upstream.timeout, Some(Duration::from_secs(15)));

        let overrides = ConfigOverrides {
            port: Some(5000),
            ..required()
        };
        let merged = RelayConfig::resolve(overrides, file).unwrap();
        assert_eq!(merged.port, 5000);
        assert_eq!(merged.upstream.url.as_str(), URL);
        assert_eq!(merged.upstream.subscription_key, "key-123");
    }

    #[test]
    fn test_upstream_url_keeps_query() {
        let config = RelayConfig::resolve(required(), FileConfig::default()).unwrap();
        assert_eq!(
            config.upstream.url.query(),
            Some("api-version=2023-04-01&features=caption")
        );
    }

    #[test]
    fn test_missing_upstream_url() {
        let overrides = ConfigOverrides {
            upstream_url: None,
            ..required()
        };
        let err = RelayConfig::resolve(overrides, FileConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingUpstreamUrl));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let overrides = ConfigOverrides {
            subscription_key: Some("   ".to_string()),
            ..required()
        };
        let err = RelayConfig::resolve(overrides, FileConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSubscriptionKey));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let overrides = ConfigOverrides {
            upstream_url: Some("ftp://vision.example.com/analyze".to_string()),
            ..required()
        };
        let err = RelayConfig::resolve(overrides, FileConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUpstreamUrl { .. }));

        let overrides = ConfigOverrides {
            upstream_url: Some("not a url".to_string()),
            ..required()
        };
        let err = RelayConfig::resolve(overrides, FileConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUpstreamUrl { .. }));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let file: FileConfig = toml::from_str("[upstream]\ntimeout_secs = 0\n").unwrap();
        let err = RelayConfig::resolve(required(), file).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTimeout));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 3100").unwrap();

        let loaded = FileConfig::load(file.path()).unwrap();
        assert_eq!(loaded.server.port, Some(3100));
        assert!(loaded.upstream.url.is_none());
    }

    #[test]
    fn test_load_errors() {
        let err = FileConfig::load(Path::new("/nonexistent/captiond.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = \"not a number\"").unwrap();
        let err = FileConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_errors_never_echo_the_key() {
        let overrides = ConfigOverrides {
            upstream_url: Some("gopher://x".to_string()),
            subscription_key: Some("very-secret".to_string()),
            ..ConfigOverrides::default()
        };
        let err = RelayConfig::resolve(overrides, FileConfig::default()).unwrap_err();
        assert!(!err.to_string().contains("very-secret"));
    }
}
